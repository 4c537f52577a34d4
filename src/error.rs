//! Error types for the wallet signing core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No wallet is connected. Recoverable by connecting again.
    #[error("No wallet connected")]
    Session,

    /// Wrong password, or the vault could not decrypt the key.
    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Hardware key unavailable. Recoverable by reconnecting the device.
    #[error("Device error: {0}")]
    Device(String),

    #[error("Wallet not found: {0}")]
    NotFound(String),

    /// The chain rejected the transaction. A resubmission needs a fresh sequence.
    #[error("Broadcast rejected (code {code}): {raw_log}")]
    Broadcast { code: u32, raw_log: String },

    #[error("Vault gateway error: {0}")]
    Gateway(String),

    #[error("Chain client error: {0}")]
    Chain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
}

impl Error {
    /// Whether the caller can recover by prompting the user (reconnect,
    /// re-enter password, replug the device).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Session | Error::IncorrectPassword | Error::Device(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
