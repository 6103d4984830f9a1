use thiserror::Error;

#[derive(Error, Debug)]
pub enum PyupError {
    #[error("pyenv executable not found in PATH; is pyenv installed?")]
    PyenvNotFound,

    #[error("pyenv execution failed: {0}")]
    PyenvExecution(String),

    #[error("Invalid Python version: {0}")]
    InvalidVersion(String),

    #[error("Failed to read python.org release list: {0}")]
    SupportPage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PyupError>;
