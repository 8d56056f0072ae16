//! 场景节点层级
//!
//! 导入时一次性构建、之后只读的变换树。节点以稳定的整数索引（`NodeId`）引用，
//! 子节点顺序即导入顺序。

use glam::Mat4;

/// 节点索引
pub type NodeId = usize;

/// 场景节点
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// 节点名称（与骨骼、动画通道按名称对应）
    pub name: String,
    /// 绑定姿态下相对父节点的局部变换
    pub transform: Mat4,
    /// 父节点（根节点为 None）
    pub parent: Option<NodeId>,
    /// 子节点列表（有序）
    pub children: Vec<NodeId>,
}

/// 节点层级（arena 存储）
#[derive(Clone, Debug, PartialEq)]
pub struct NodeHierarchy {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl NodeHierarchy {
    /// 创建只有根节点的层级
    pub fn new(root_name: impl Into<String>, root_transform: Mat4) -> Self {
        Self {
            nodes: vec![SceneNode {
                name: root_name.into(),
                transform: root_transform,
                parent: None,
                children: Vec::new(),
            }],
            root: 0,
        }
    }

    /// 在 `parent` 下追加子节点
    ///
    /// # Panics
    ///
    /// `parent` 不存在时 panic。
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, transform: Mat4) -> NodeId {
        assert!(parent < self.nodes.len(), "parent node {} does not exist", parent);
        let id = self.nodes.len();
        self.nodes.push(SceneNode {
            name: name.into(),
            transform,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SceneNode {
        &self.nodes[self.root]
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// 按名称查找第一个匹配节点
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// 计算绑定姿态下每个节点的全局变换（以索引对应）
    pub fn bind_pose_globals(&self) -> Vec<Mat4> {
        let mut globals = vec![Mat4::IDENTITY; self.nodes.len()];
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_transform)) = stack.pop() {
            let node = &self.nodes[id];
            let global = parent_transform * node.transform;
            globals[id] = global;
            for &child in node.children.iter().rev() {
                stack.push((child, global));
            }
        }
        globals
    }
}
