use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request could not be sent or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request returned a non-OK status code.
    #[error("Status error: {1} (Status {0})")]
    Status(StatusCode, String),

    #[error("Invalid config `{0}`: {1}")]
    Config(String, String),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
