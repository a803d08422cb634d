use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwotError {
    #[error("No MongoDB credentials provided! Set MONGO_URI or MONGO_USERNAME and MONGO_PASSWORD.")]
    MissingCredentials,

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Loro error: {0}")]
    Loro(#[from] loro::LoroError),

    #[error("Loro encode error: {0}")]
    LoroEncode(#[from] loro::LoroEncodeError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid drag payload: {0}")]
    InvalidDragPayload(String),
}

pub type Result<T> = std::result::Result<T, SwotError>;
