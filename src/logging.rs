use color_eyre::Result;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cache::CacheManager;

/// Log file name inside the cache directory
pub const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

/// Parse a level name from the CLI or config ("error", "warn", "info", "debug", "trace")
pub fn parse_level(s: &str) -> Option<tracing::Level> {
    s.trim().parse::<tracing::Level>().ok()
}

/// Install the file logger.
///
/// The terminal belongs to the UI, so events go to `custom_log_path` or to the cache directory.
/// `RUST_LOG` is honored; `level` sets the default directive (WARN when absent).
pub fn init_with(
    cache: &CacheManager,
    custom_log_path: Option<PathBuf>,
    level: Option<tracing::Level>,
) -> Result<PathBuf> {
    let log_path = if let Some(path) = custom_log_path {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        path
    } else {
        cache.ensure_cache_dir()?;
        cache.cache_file(LOG_FILE)
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(tracing::Level::WARN).into())
        .from_env_lossy();

    // Open once up front so a bad path fails here instead of inside the writer
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(tracing::Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(tracing::Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(LOG_FILE, "capex.log");
    }
}
