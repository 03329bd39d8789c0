use thiserror::Error;

/// Main error type for kgdesc
#[derive(Error, Debug)]
pub enum KgdescError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tab-separated input or CSV output errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text generation API errors
    #[error("Generation API error: {0}")]
    Generation(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using KgdescError
pub type Result<T> = std::result::Result<T, KgdescError>;
