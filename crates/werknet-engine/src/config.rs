use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Database file; `None` runs on an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Wall-clock upper bound for a single operation. An operation that
    /// exceeds it aborts with `Timeout` instead of committing.
    pub op_budget: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            op_budget: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("WERKNET_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(val) = std::env::var("WERKNET_OP_BUDGET_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.op_budget = Duration::from_millis(ms);
            } else {
                tracing::warn!(
                    value = %val,
                    "Invalid WERKNET_OP_BUDGET_MS, using default"
                );
            }
        }

        config
    }
}
