use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "gigmate.db";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
    /// When set, logs also go to a daily-rolling file in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            db_path: non_empty("GIGMATE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_filter: non_empty("GIGMATE_LOG")
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_dir: non_empty("GIGMATE_LOG_DIR").map(PathBuf::from),
        }
    }
}
