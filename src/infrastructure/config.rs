// Application configuration loaded from TOML

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::application::PlannerOptions;
use crate::domain::{CapacityRule, SolverBackend};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub solver: SolverSection,
    pub model: ModelSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub address: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 50051)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverSection {
    pub backend: SolverBackend,
    pub time_limit_secs: Option<f64>,
    pub gap_tolerance: Option<f64>,
    pub retry_backoff_ms: u64,
    pub verbose: bool,
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit_secs: None,
            gap_tolerance: None,
            retry_backoff_ms: 200,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub capacity_rule: CapacityRule,
}

impl AppConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(secs) = self.solver.time_limit_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "solver.time_limit_secs",
                    reason: format!("must be a positive number of seconds, got {secs}"),
                });
            }
        }
        if let Some(gap) = self.solver.gap_tolerance {
            if !(0.0..1.0).contains(&gap) {
                return Err(ConfigError::Invalid {
                    field: "solver.gap_tolerance",
                    reason: format!("must lie in [0, 1), got {gap}"),
                });
            }
        }
        Ok(())
    }

    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            backend: self.solver.backend,
            time_limit: self.solver.time_limit_secs.map(Duration::from_secs_f64),
            gap_tolerance: self.solver.gap_tolerance,
            retry_backoff: Duration::from_millis(self.solver.retry_backoff_ms),
            capacity_rule: self.model.capacity_rule,
            verbose: self.solver.verbose,
        }
    }
}
