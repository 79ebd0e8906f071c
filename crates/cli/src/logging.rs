use affinity_core::config::{LogFormat, LoggingConfig};
use anyhow::{anyhow, Context, Result};
use tracing::Level;

/// Installs the global stderr subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = config
        .level
        .trim()
        .parse::<Level>()
        .with_context(|| format!("invalid log level `{}`", config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}
