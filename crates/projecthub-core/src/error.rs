//! Error types for Projecthub

use thiserror::Error;

/// Result type alias using Projecthub's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Projecthub error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project '{0}' not found. Run `projecthub projects list` to see all projects.")]
    ProjectNotFound(String),

    // Store errors (E100-E199)
    #[error("Failed to load projects: {0}. Please try again.")]
    QueryFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // Authorization errors (E200-E299)
    #[error("Not signed in. Run `projecthub signin <id>` first.")]
    NotSignedIn,

    #[error("Only the project owner can request a certificate for '{0}'.")]
    AuthorizationDenied(String),

    // Selection errors (E300-E399)
    #[error("Invalid selection transition: {0}")]
    InvalidTransition(String),

    // Rendering errors (E400-E499)
    #[error("Certificate cannot be rendered: {0}")]
    RenderPrecondition(String),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::QueryFailed(_) => "E100",
            Self::Storage(_) => "E101",
            Self::NotSignedIn => "E200",
            Self::AuthorizationDenied(_) => "E201",
            Self::InvalidTransition(_) => "E300",
            Self::RenderPrecondition(_) => "E400",
            Self::Image(_) => "E401",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ProjectNotFound(_) => Some("projecthub projects list".to_string()),
            Self::QueryFailed(_) => Some("projecthub projects list".to_string()),
            Self::NotSignedIn => Some("projecthub signin <id>".to_string()),
            Self::ConfigError(_) => Some("projecthub config list".to_string()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
