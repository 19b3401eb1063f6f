use thiserror::Error as ThisError;

/// Errors that can occur while building or flushing a logger
#[derive(ThisError, Debug)]
pub enum Error {
    /// The logging engine could not be built, usually because the output
    /// sink could not be opened.
    #[error("Construction error: {0}")]
    Construction(String),
    /// Buffered records could not be flushed to the sink.
    #[error("Flush error: {0}")]
    Flush(#[source] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
