use thiserror::Error;

/// The evidence file was rejected before any request was built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported media type '{0}', expected application/pdf")]
    UnsupportedType(String),
}

/// Required configuration is missing from the process environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),
}

/// The model answered, but not with something we can render
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),
}

#[derive(Debug, Error)]
pub enum AppealError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to read evidence file: {0}")]
    Io(#[from] std::io::Error),
}

impl AppealError {
    /// Message safe to show to the person who uploaded the evidence.
    ///
    /// Format errors never leak the raw model output; it is only logged.
    pub fn user_message(&self) -> String {
        match self {
            AppealError::Validation(_) => "Please upload a valid PDF file.".to_string(),
            AppealError::Format(_) => {
                "An error occurred: The AI returned an invalid response format.".to_string()
            }
            AppealError::Config(e) => format!("An error occurred: {}", e),
            AppealError::Transport(message) => format!("An error occurred: {}", message),
            AppealError::Io(e) => format!("An error occurred: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppealError>;
