use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("AI error: {0:#}")]
    AI(#[from] AIError), // Errors raised while talking to the completion service.

    #[error("Serialization error: {0:#}")]
    Serialization(#[from] serde_json::Error), // Settings or catalog JSON could not be (de)serialized.

    #[error("IO error: {0:#}")]
    IO(#[from] std::io::Error), // Input/output errors, including the terminal and the listener.

    #[error("Logger error: {0:#}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Scenario catalog error: {0}")]
    Catalog(String),
}

// Errors related to the completion backend are kept apart: the relay swallows them.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("OpenAI API error: {0:#}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Backend answered with status {0}")]
    Status(u16),

    #[error("Backend error: {0}")]
    Backend(String),
}
