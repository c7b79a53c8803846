//! CLI error taxonomy with user-facing messages

use thiserror::Error;

use skillmesh_client::ClientError;
use skillmesh_installer::InstallError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Registry(message) => CliError::Registry(message),
            ClientError::Config(message) => CliError::Config(message),
            ClientError::Transport(transport) => CliError::Network(transport.to_string()),
        }
    }
}

impl CliError {
    /// User-friendly message with a next step where one exists
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {message}\n\nRun 'smesh help' for usage information.")
            }
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {msg}\n\nCheck ~/.skillmesh/config.json or the SKILLMESH_* environment variables."
                )
            }
            CliError::Network(msg) => {
                format!(
                    "Network error: {msg}\n\nIs the mesh reachable? Check gatewayUrl and messengerUrl in your configuration."
                )
            }
            CliError::Registry(msg) => format!("Registry error: {msg}"),
            CliError::Install(InstallError::UserCancelled) => "Install cancelled.".to_string(),
            CliError::Install(e) => e.to_string(),
            CliError::Io(e) => format!("File operation failed: {e}"),
            CliError::Internal(msg) => {
                format!("Internal error: {msg}\n\nPlease report this issue.")
            }
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
