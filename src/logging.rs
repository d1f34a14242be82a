use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::{fs, io::Write};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "taskboard.log";

/// Sends log output to `<log_dir>/taskboard.log`; the terminal belongs to
/// the board. `RUST_LOG` takes precedence over the configured level.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir {}", config.log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(guard)
}

/// Like [`init`], but a broken log setup only costs the log file: the
/// problem is written to `warnings` and the board runs without it.
pub fn init_or_warn(config: &Config, warnings: &mut impl Write) -> Option<WorkerGuard> {
    match init(config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            let _ = writeln!(warnings, "warning: {err:#}; continuing without a log file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOG_LEVEL;
    use std::path::PathBuf;

    #[test]
    fn unusable_log_dir_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let config = Config {
            data_file: PathBuf::from("kanban_data.json"),
            log_dir: blocker.join("logs"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        };

        let mut warnings = Vec::new();
        assert!(init_or_warn(&config, &mut warnings).is_none());

        let text = String::from_utf8(warnings).unwrap();
        assert!(text.starts_with("warning: failed to create log dir"));
        assert!(text.contains("continuing without a log file"));
    }
}
