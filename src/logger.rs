//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup. The terminal UI owns the screen, so it logs
//! to a file; the demo logs to stderr.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `level` wins over `RUST_LOG`, which is only
/// consulted when `level` does not parse.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = match parse_level(level) {
        Ok(_) => EnvFilter::new(level),
        Err(level_err) => EnvFilter::try_from_default_env()
            .map_err(|env_err| anyhow!("{level_err}; RUST_LOG parse failed: {env_err}"))?,
    };

    let writer = if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("failed to create log directory")?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        BoxMakeWriter::new(file)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .try_init()
        .map_err(|e| anyhow!("failed to set subscriber: {e}"))?;

    Ok(())
}

/// Parse one of `error`, `warn`, `info`, `debug`, `trace` (or `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    if level.is_empty() {
        bail!("log level must not be empty");
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("unrecognised log level: '{level}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn invalid_level_errors() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }
}
