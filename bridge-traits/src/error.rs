use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Engine operation failed: {0}")]
    Engine(String),

    #[error("Engine capability not available: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
