use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidemarkError {
    /// Invalid detection parameters. Raised before any observation is scored.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A malformed input row. `row` is the 1-based data row (header excluded).
    #[error("Input format error at row {row}: {message}")]
    InputFormat { row: usize, message: String },

    /// Detector output does not line up with the input sequence.
    #[error("Sequence mismatch: {0}")]
    SequenceMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TidemarkError {
    pub fn configuration(message: impl Into<String>) -> Self {
        TidemarkError::Configuration(message.into())
    }

    pub fn input_format(row: usize, message: impl Into<String>) -> Self {
        TidemarkError::InputFormat {
            row,
            message: message.into(),
        }
    }
}
