//! Error handling for Wavseal
//!
//! Every failure carries a stable error code and, where it helps, a recovery
//! suggestion for the CLI. A signature that does not match is not an error:
//! verification returns `Ok(false)` for that case.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Wavseal operations
pub type Result<T> = std::result::Result<T, WavsealError>;

/// Main error type for Wavseal operations
#[derive(Error, Debug)]
pub enum WavsealError {
    // Codec Errors
    #[error(
        "Out of capacity: need {required_samples} samples, buffer has {available_samples}"
    )]
    OutOfCapacity {
        required_samples: usize,
        available_samples: usize,
    },

    #[error("Invalid sample buffer: {reason}")]
    InvalidBuffer { reason: String },

    // Key Errors
    #[error("Invalid key material: {reason}")]
    KeyFormat { reason: String },

    // Audio Errors
    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WavsealError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WavsealError::OutOfCapacity { .. } => "OUT_OF_CAPACITY",
            WavsealError::InvalidBuffer { .. } => "INVALID_BUFFER",
            WavsealError::KeyFormat { .. } => "KEY_FORMAT",
            WavsealError::InvalidAudio { .. } => "INVALID_AUDIO",
            WavsealError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WavsealError::FileRead { .. } => "FILE_READ",
            WavsealError::FileWrite { .. } => "FILE_WRITE",
            WavsealError::Config { .. } => "CONFIG",
            WavsealError::Io(_) => "IO_ERROR",
            WavsealError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for I/O failures, which cover both key and audio storage
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            WavsealError::Io(_) | WavsealError::FileRead { .. } | WavsealError::FileWrite { .. }
        )
    }

    /// Check if this error is recoverable by the user without changing the input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WavsealError::FileRead { .. }
                | WavsealError::FileWrite { .. }
                | WavsealError::KeyFormat { .. }
                | WavsealError::Config { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            WavsealError::OutOfCapacity { .. } => vec![
                "The audio is too short to hold the message",
                "A signature needs at least 520 samples (about 12ms of mono 44.1kHz audio)",
            ],
            WavsealError::KeyFormat { .. } => vec![
                "Ed25519 keys are exactly 32 raw bytes",
                "Public keys given as text must be standard base64",
                "Run 'wavseal generate-keys' to create a fresh pair",
            ],
            WavsealError::InvalidAudio { .. } => vec![
                "Only uncompressed WAV files are supported",
                "Lossy formats destroy embedded signatures; convert losslessly first",
            ],
            WavsealError::UnsupportedFormat { .. } => vec![
                "Supported formats: 8, 16, 24, 32-bit integer PCM and 32-bit float WAV",
            ],
            WavsealError::FileRead { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            WavsealError::FileWrite { .. } => vec![
                "Check the destination directory is writable",
                "Free up disk space",
            ],
            WavsealError::Config { .. } => vec![
                "Check WAVSEAL_* environment variables and the --config file",
                "Valid byte orders: little, big, native",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = WavsealError::OutOfCapacity {
            required_samples: 520,
            available_samples: 519,
        };
        assert_eq!(err.error_code(), "OUT_OF_CAPACITY");
        assert!(!err.is_recoverable());
        assert!(!err.is_io());
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = WavsealError::KeyFormat {
            reason: "expected 32 bytes, got 31".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_io_errors_are_grouped() {
        let err = WavsealError::FileRead {
            path: PathBuf::from("key/signing_key.pem"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_io());
        assert!(err.to_string().contains("signing_key.pem"));
    }
}
