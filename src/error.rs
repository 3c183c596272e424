//! Error types shared across the crate

use thiserror::Error;

/// Errors produced while loading a brick layout.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("No layout for level {0}")]
    NotFound(u32),

    #[error("Failed to read layout for level {level}: {source}")]
    Io {
        level: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed layout for level {level}: {source}")]
    Parse {
        level: u32,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors reported by presentation and telemetry sinks.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Receiver disconnected")]
    Disconnected,

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
