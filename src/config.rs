use clap::ArgMatches;
use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// `data` and `log-level` always carry a clap default; only the log dir
    /// depends on the platform and is resolved here.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            data_file: matches.get_one::<PathBuf>("data").cloned().unwrap_or_default(),
            log_dir: matches
                .get_one::<PathBuf>("log-dir")
                .cloned()
                .unwrap_or_else(default_log_dir),
            log_level: matches.get_one::<String>("log-level").cloned().unwrap_or_default(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("taskboard"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command;
    use crate::storage::DEFAULT_DATA_FILE;

    #[test]
    fn bare_invocation_uses_clap_defaults() {
        let matches = command().try_get_matches_from(["taskboard"]).unwrap();
        let config = Config::from_matches(&matches);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log_dir, default_log_dir());
    }

    #[test]
    fn flags_override_defaults() {
        let matches = command()
            .try_get_matches_from([
                "taskboard", "--data", "b.json", "--log-dir", "logs", "--log-level", "debug",
            ])
            .unwrap();
        let config = Config::from_matches(&matches);
        assert_eq!(config.data_file, PathBuf::from("b.json"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_level, "debug");
    }
}
