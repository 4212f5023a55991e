use std::fmt;

/// Result type for ascent operations
pub type Result<T> = std::result::Result<T, AscentError>;

/// Main error type for the ascent crate
#[derive(Debug, Clone)]
pub enum AscentError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// A sample request larger than the memory's current contents
    SampleTooLarge {
        requested: usize,
        available: usize,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),
}

impl fmt::Display for AscentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AscentError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            AscentError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            AscentError::SampleTooLarge { requested, available } => {
                write!(f, "Cannot sample {} transitions from a memory of {}", requested, available)
            }
            AscentError::IoError(msg) => write!(f, "IO error: {}", msg),
            AscentError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AscentError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AscentError {}

// Conversion from std::io::Error
impl From<std::io::Error> for AscentError {
    fn from(err: std::io::Error) -> Self {
        AscentError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for AscentError {
    fn from(err: bincode::Error) -> Self {
        AscentError::SerializationError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AscentError {
    fn from(err: serde_json::Error) -> Self {
        AscentError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl AscentError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        AscentError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        AscentError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
