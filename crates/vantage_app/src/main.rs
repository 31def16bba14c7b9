use std::sync::Arc;

use vantage_app::{config::AppConfig, runner};
use vantage_runtime::stub::{StubProvider, StubSession};

fn init_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .level_for("naga", log::LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_args(std::env::args().skip(1));
    init_logging(config.log_level())?;

    log::info!("starting vantage (cube volume {0}x{0}x{0})", config.cube_volume);

    let session = StubSession::new();
    let provider = Arc::new(StubProvider::new());
    runner::run(config, session, provider)
}
