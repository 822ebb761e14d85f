/// Result alias that carries the custom [`LyricCanvasError`] type.
pub type Result<T> = std::result::Result<T, LyricCanvasError>;

/// Common error type for the core crate.
///
/// Caption parsing and caption queries never produce one of these; malformed
/// timed text degrades to fewer records instead.
#[derive(Debug, thiserror::Error)]
pub enum LyricCanvasError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// Caller supplied arguments that cannot be processed.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The source image could not be turned into a pixel buffer.
    #[error("failed to decode image: {0}")]
    Decode(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// JSON could not be read or written, e.g. a malformed configuration file.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LyricCanvasError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Creates a decode error from anything printable.
    pub fn decode<T: std::fmt::Display>(err: T) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<&str> for LyricCanvasError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for LyricCanvasError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
