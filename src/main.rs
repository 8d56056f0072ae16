use skinned_model::config::EngineConfig;
use skinned_model::core::init_logging;
use skinned_model::scene::{Model, MotionProfile, MovingObject};
use skinned_model::EngineResult;

const FRAME_COUNT: usize = 120;
const FRAME_TIME: f32 = 1.0 / 60.0;

fn run(path: &str) -> EngineResult<()> {
    let mut config = EngineConfig::load_or_default();
    config.apply_env_overrides();
    config.validate()?;
    init_logging(&config.logging);

    let mut model = Model::load(path, &config)?;
    let mut sun = MovingObject::new("sun", MotionProfile::sun());
    let mut earth = MovingObject::new("earth", MotionProfile::earth());

    for frame in 0..FRAME_COUNT {
        model.update(FRAME_TIME);
        sun.update(model.elapsed_seconds());
        earth.update(model.elapsed_seconds());

        if frame % 30 == 0 {
            let max_translation = model
                .bone_transforms()
                .iter()
                .map(|m| m.w_axis.truncate().length())
                .fold(0.0f32, f32::max);
            tracing::info!(
                target: "model",
                "frame {}: {} bones, max bone translation {:.3}, earth at {:?}",
                frame,
                model.num_bones(),
                max_translation,
                earth.world().w_axis.truncate()
            );
        }
    }

    let uniform = model.skinning_uniform();
    tracing::info!(
        target: "model",
        "{} vertices, {} indices, {} meshes, skinning uniform {} bytes",
        model.num_vertices(),
        model.num_indices(),
        model.meshes().len(),
        uniform.as_bytes().len()
    );

    Ok(())
}

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: skinned_model <model.gltf|model.glb>");
        std::process::exit(2);
    };

    if let Err(e) = run(&path) {
        eprintln!("Failed to run model: {}", e);
        std::process::exit(1);
    }
}
