use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A stored record that could not be read back into its typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    /// 1-based line (or row) number in the source file.
    pub line: usize,
    pub reason: String,
}

impl CorruptRecord {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CorruptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Corrupt record at {0}")]
    CorruptData(CorruptRecord),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl VendorError {
    pub fn validation(msg: impl Into<String>) -> Self {
        VendorError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, VendorError>;
