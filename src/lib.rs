//! voxreport - Voice statements to completed report documents
//!
//! Upload → transcribe → extract → fill: a recorded voice statement goes
//! into a blob store, a streaming recognition session turns it into a
//! transcript artifact, a completion service extracts a structured incident
//! record, and a form backend renders the completed report document.

// Error handling discipline: stages propagate, the orchestrator attributes.
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod extract;
pub mod form;
pub mod pipeline;
pub mod speech;
pub mod store;

// Artifact contract
pub use artifact::{IncidentRecord, TranscriptArtifact};

// Collaborator boundaries (store → speech → completion → form)
pub use extract::{CompletionClient, MockCompletionClient};
pub use form::FormBackend;
pub use speech::{MockSpeechEngine, RecognitionEvent, SpeechEngine};
pub use store::{BlobStore, DirStore, MemoryStore};

// Pipeline
pub use pipeline::{Pipeline, Stage, StageFailure};

// Error handling
pub use error::{ReportError, Result};

// Config
pub use config::{Config, MappingMode};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
