//! Install error taxonomy
//!
//! User-correctable failures (validation, configuration, dependency
//! problems) carry the offending value or the full cycle path so the
//! operator can fix their input. System failures carry the failing path
//! or transport detail instead.

use std::path::PathBuf;

use thiserror::Error;

use skillmesh_client::ClientError;

pub type Result<T> = std::result::Result<T, InstallError>;

#[derive(Debug, Error)]
pub enum InstallError {
    /// Malformed target spec or a bundle that does not match its record
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required setting is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A dependency's name reappeared on its own resolution path
    #[error("Dependency cycle detected: {}", cycle_display(.path))]
    DependencyCycle { path: Vec<String> },

    /// No published version satisfies the constraint
    #[error("Cannot resolve dependency {name}: {reason}")]
    DependencyUnresolvable { name: String, reason: String },

    /// Two dependents need incompatible versions of the same skill
    #[error(
        "Dependency conflict on {name}: resolved {resolved} but another dependent requires {constraint}"
    )]
    DependencyConflict {
        name: String,
        resolved: String,
        constraint: String,
    },

    /// Registry or storage unreachable after retry and fallback
    #[error("Network error: {0}")]
    Network(String),

    /// Local I/O failure at a known path
    #[error("File system error at {}: {message}", .path.display())]
    FileSystem { path: PathBuf, message: String },

    /// Malformed lockfile, manifest, or stored payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operator aborted the install
    #[error("Installation cancelled")]
    UserCancelled,
}

impl InstallError {
    /// Wrap an I/O failure with the path it happened at
    pub fn fs(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        InstallError::FileSystem {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<ClientError> for InstallError {
    fn from(err: ClientError) -> Self {
        InstallError::Network(err.to_string())
    }
}

fn cycle_display(path: &[String]) -> String {
    path.join(" -> ")
}
