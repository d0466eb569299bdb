//! Error types for Solidafy DocSchema
//!
//! The inference core itself never fails: classification, merging and
//! statistics absorb malformed input. Errors only come from path queries
//! and from the outer layers (config, decoding, CLI I/O).

use thiserror::Error;

/// The main error type for Solidafy DocSchema
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Query Errors
    // ============================================================================
    #[error("No property '{segment}' at path '{}'", display_path(.resolved))]
    PathNotFound {
        /// Segment that has no corresponding property
        segment: String,
        /// Deepest prefix that resolved successfully
        resolved: Vec<String>,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode input: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

impl Error {
    /// Create a path-not-found error
    pub fn path_not_found(segment: impl Into<String>, resolved: Vec<String>) -> Self {
        Self::PathNotFound {
            segment: segment.into(),
            resolved,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Full path of the offending segment, for `PathNotFound`
    pub fn missing_path(&self) -> Option<Vec<String>> {
        match self {
            Error::PathNotFound { segment, resolved } => {
                let mut path = resolved.clone();
                path.push(segment.clone());
                Some(path)
            }
            _ => None,
        }
    }
}

/// Result type alias for Solidafy DocSchema
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
