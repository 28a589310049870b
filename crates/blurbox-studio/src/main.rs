use anyhow::Result;
use blurbox_engine::config::BounceConfig;
use blurbox_engine::device::GpuInit;
use blurbox_engine::logging::{init_logging, LoggingConfig};
use blurbox_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene = BounceConfig::default();
    log::info!(
        "bouncing {:?} rect from {:?} at {:?} px/s",
        scene.size,
        scene.position,
        scene.velocity
    );

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), scene)
}
