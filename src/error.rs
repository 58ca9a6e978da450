use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Trajectory source could not be turned into a usable sample list.
///
/// Always recoverable: the trajectory stays (or remains) not-ready and every
/// query falls back to the sentinel target until a successful reload.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read trajectory source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no valid samples in trajectory source {path}")]
    Empty { path: PathBuf },
    #[error("trajectory has no source to reload from")]
    NoSource,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// A component was built without a collaborator it cannot work without.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{component} is missing its {dependency} dependency")]
pub struct DependencyMissing {
    pub component: &'static str,
    pub dependency: &'static str,
}

/// Top-level error for the runner binary.
#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_missing_names_both_sides() {
        let err = DependencyMissing { component: "AttitudeController", dependency: "trajectory" };
        assert_eq!(err.to_string(), "AttitudeController is missing its trajectory dependency");
    }

    #[test]
    fn load_error_wraps_into_sim_error() {
        let err: SimError = LoadError::Empty { path: "x.csv".into() }.into();
        assert!(err.to_string().contains("x.csv"));
    }
}
