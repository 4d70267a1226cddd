//! Error types for voxreport.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Blob store errors
    #[error("Blob '{name}' not found in container '{container}'")]
    BlobNotFound { container: String, name: String },

    #[error("Blob '{name}' in container '{container}' is not valid UTF-8")]
    BlobNotText { container: String, name: String },

    // Transcription errors
    #[error("Recognition session failed to start: {message}")]
    SpeechSession { message: String },

    #[error("Transcription timed out after {}s waiting for a terminal event", .waited.as_secs())]
    TranscriptionTimeout { waited: std::time::Duration },

    #[error("Transcription produced an empty transcript")]
    TranscriptionEmpty,

    // Extraction errors
    #[error("Completion response is not a valid incident record: {message}")]
    ExtractionParse { message: String },

    // Form errors
    #[error("Template declares {actual} fillable field(s), at least {expected} required")]
    TemplateShape { expected: usize, actual: usize },

    #[error("Template is not a valid form document: {message}")]
    TemplateParse { message: String },

    // Artifact contract errors
    #[error("Artifact '{name}' is not valid JSON: {message}")]
    ArtifactParse { name: String, message: String },

    // Cloud dependencies (network/auth/protocol failures)
    #[error("{service} request failed: {message}")]
    ExternalService { service: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl ReportError {
    /// Shorthand for an `ExternalService` error.
    pub fn external(service: &str, message: impl std::fmt::Display) -> Self {
        ReportError::ExternalService {
            service: service.to_string(),
            message: message.to_string(),
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ReportError>;
