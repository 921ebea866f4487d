use std::path::PathBuf;

use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::window::{Runtime, RuntimeConfig};

const SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        vertex_shader: PathBuf::from(SHADER_DIR).join("triangle.vert"),
        fragment_shader: PathBuf::from(SHADER_DIR).join("triangle.frag"),
        ..Default::default()
    };

    match Runtime::run(config) {
        Ok(summary) => {
            log::info!(
                "rendered {} frames, final offset {:.3}",
                summary.frames,
                summary.final_offset
            );
        }
        Err(e) => {
            let code = e.exit_code();
            log::error!("startup failed at {}: {:#}", e.stage(), anyhow::Error::new(e));
            std::process::exit(code);
        }
    }
}
