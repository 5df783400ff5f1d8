//! Error types for deploy operations.
//!
//! Global precondition failures (configuration, target directory resolution)
//! surface through [`DeployError`]. Failures of individual mods never reach this
//! type; they are collected in the deploy report instead.

use thiserror::Error;

/// Result type alias for deploy operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Main error type for all deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid deploy configuration
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// Neither a target directory nor a run directory was configured
    #[error("Unable to resolve the extension directory (searched: {searched:?})")]
    TargetUnresolved {
        /// Locations that were consulted, in priority order
        searched: Vec<String>,
    },

    /// Deployer errors
    #[error("Deploy error: {0}")]
    Deploy(#[from] crate::deployer::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl DeployError {
    /// Builds a [`DeployError::Config`] from anything displayable.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::TargetUnresolved { .. } => vec![
                "Pass --target-dir <DIR> or set MOD_DEPLOYER_TARGET_DIR".to_string(),
                "Or pass --run-dir <DIR> so mods deploy into <DIR>/mods".to_string(),
            ],
            Self::Toml(_) | Self::Config { .. } => {
                vec!["Check the deploy configuration file for typos".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
