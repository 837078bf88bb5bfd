use anyhow::Result;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let log_file = config
        .file_path
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(Mutex::new);

    match (config.format.as_str(), log_file) {
        ("json", Some(file)) => registry.with(fmt::layer().json().with_writer(file)).try_init()?,
        ("json", None) => registry.with(fmt::layer().json()).try_init()?,
        (_, Some(file)) => registry
            .with(fmt::layer().with_ansi(false).with_writer(file))
            .try_init()?,
        (_, None) => registry.with(fmt::layer().with_target(false)).try_init()?,
    }

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(())
}

fn open_log_file(path: &str) -> std::io::Result<File> {
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}
