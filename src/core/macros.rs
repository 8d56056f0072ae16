//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use skinned_model::impl_default;
///
/// struct PlaybackSettings {
///     speed: f32,
///     clip: String,
/// }
///
/// impl_default!(PlaybackSettings {
///     speed: 1.0,
///     clip: String::new(),
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 同时实现Default和new()的宏
///
/// 使用示例:
/// ```rust
/// use skinned_model::impl_default_and_new;
///
/// struct FrameClock {
///     elapsed: f32,
///     frames: u64,
/// }
///
/// impl_default_and_new!(FrameClock {
///     elapsed: 0.0,
///     frames: 0,
/// });
/// ```
#[macro_export]
macro_rules! impl_default_and_new {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }

        impl $struct_name {
            pub fn new() -> Self {
                Self::default()
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct FrameClock {
        elapsed: f32,
        label: String,
    }

    impl_default_and_new!(FrameClock {
        elapsed: 0.0,
        label: String::new(),
    });

    #[test]
    fn test_impl_default_and_new() {
        let c1 = FrameClock::default();
        let c2 = FrameClock::new();

        assert_eq!(c1.elapsed, 0.0);
        assert_eq!(c1.label, "");
        assert_eq!(c2.elapsed, 0.0);
        assert_eq!(c2.label, "");
    }
}
