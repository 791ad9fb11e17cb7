//! Error types for the billnorm-core library.

use thiserror::Error;

/// Main error type for the billnorm library.
#[derive(Error, Debug)]
pub enum BillnormError {
    /// Document decoding or encoding error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration or rule table error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Request rejected at the service boundary.
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading and writing documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to decode a document from bytes.
    #[error("failed to decode document: {0}")]
    Decode(String),

    /// Failed to encode a document to bytes.
    #[error("failed to encode document: {0}")]
    Encode(String),
}

/// Errors related to configuration and rule tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A normalization pattern does not compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The configuration file is malformed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration file could not be read or written.
    #[error("configuration I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised before a request reaches the processors.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Category key is not one of regular, nondrugs, senior.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// No file was supplied with the request.
    #[error("no file uploaded")]
    MissingFile,

    /// The uploaded filename is empty after sanitizing.
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    /// Requested output does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for the billnorm library.
pub type Result<T> = std::result::Result<T, BillnormError>;
