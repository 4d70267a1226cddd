//! Pipeline orchestrator: upload → transcribe → extract → fill.
//!
//! Stages run strictly sequentially on the control thread. Each stage reads
//! its input artifact from the blob store by well-known name and writes its
//! output artifact the same way; nothing is handed between stages in
//! memory. A stage failure halts the pipeline and is attributed to that
//! stage: no retry, no compensation, no partial document. A rerun is a
//! fresh invocation that overwrites the same well-known names.

use crate::artifact::{IncidentRecord, TranscriptArtifact};
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::extract::{self, CompletionClient};
use crate::form::{self, FormBackend};
use crate::speech::{SpeechEngine, bounded_wait, run_session};
use crate::store::BlobStore;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// The pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Transcribe,
    Extract,
    Fill,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Transcribe => "transcription",
            Stage::Extract => "extraction",
            Stage::Fill => "form fill",
        };
        write!(f, "{name}")
    }
}

/// A pipeline halt: which stage failed, and why.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: ReportError,
}

/// The report pipeline.
///
/// Owns its collaborators behind trait objects so tests run the identical
/// orchestration against in-memory fakes. The configuration is built once
/// by the caller and borrowed for the pipeline's lifetime.
pub struct Pipeline<'a> {
    config: &'a Config,
    store: Arc<dyn BlobStore>,
    engine: Arc<dyn SpeechEngine>,
    completions: Arc<dyn CompletionClient>,
    forms: Arc<dyn FormBackend>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        store: Arc<dyn BlobStore>,
        engine: Arc<dyn SpeechEngine>,
        completions: Arc<dyn CompletionClient>,
        forms: Arc<dyn FormBackend>,
    ) -> Self {
        Self {
            config,
            store,
            engine,
            completions,
            forms,
        }
    }

    /// Upload a local audio file into the audio container under `name`.
    pub fn upload_audio(&self, local: &Path, name: &str) -> Result<()> {
        let bytes = std::fs::read(local)?;
        self.store
            .put(&self.config.store.audio_container, name, &bytes)?;
        tracing::info!(name, bytes = bytes.len(), "audio uploaded");
        Ok(())
    }

    /// Transcribe the named audio object into the transcript artifact.
    ///
    /// Materializes the audio locally, runs one recognition session to its
    /// terminal event, joins the finalized segments and persists the
    /// artifact under the well-known transcript name, which is returned.
    /// An empty transcript is a valid result here; the orchestrator, not
    /// this stage, decides that it halts the pipeline.
    pub fn transcribe(&self, audio_name: &str) -> Result<String> {
        let scratch = scratch_path(audio_name);
        self.store
            .fetch_to_local(&self.config.store.audio_container, audio_name, &scratch)?;

        let wait = bounded_wait(
            &scratch,
            Duration::from_secs(self.config.speech.base_timeout_secs),
            self.config.speech.secs_per_audio_sec,
        );
        tracing::info!(audio = audio_name, wait_secs = wait.as_secs(), "transcribing");
        let outcome = run_session(self.engine.as_ref(), &scratch, wait);
        if scratch.exists() {
            // Scratch copy is per-run garbage either way.
            if let Err(e) = std::fs::remove_file(&scratch) {
                tracing::debug!("could not remove scratch audio: {e}");
            }
        }
        let outcome = outcome?;

        let artifact = TranscriptArtifact::from_segments(&outcome.segments);
        self.store.put_text(
            &self.config.store.transcript_container,
            &self.config.pipeline.transcript_blob,
            &artifact.to_json()?,
        )?;
        tracing::info!(
            blob = %self.config.pipeline.transcript_blob,
            chars = artifact.transcript.len(),
            "transcript artifact written"
        );
        Ok(self.config.pipeline.transcript_blob.clone())
    }

    /// Extract the incident record from the named transcript artifact.
    pub fn extract(&self, transcript_name: &str) -> Result<String> {
        let artifact = TranscriptArtifact::from_json(
            &self
                .store
                .get_text(&self.config.store.transcript_container, transcript_name)?,
        )?;

        let response = self.completions.complete(
            extract::SYSTEM_PROMPT,
            &extract::build_prompt(&artifact.transcript),
        )?;
        let record = extract::parse_record(&response)?;

        self.store.put_text(
            &self.config.store.record_container,
            &self.config.pipeline.record_blob,
            &record.to_json()?,
        )?;
        tracing::info!(blob = %self.config.pipeline.record_blob, "incident record written");
        Ok(self.config.pipeline.record_blob.clone())
    }

    /// Fill the form template from the named incident record.
    ///
    /// Returns the completed document bytes and persists them back into the
    /// audio container under the well-known completed-document name.
    pub fn fill(&self, record_name: &str) -> Result<Vec<u8>> {
        let template = self.store.get(
            &self.config.store.audio_container,
            &self.config.pipeline.template_blob,
        )?;
        let record = IncidentRecord::from_json(
            &self
                .store
                .get_text(&self.config.store.record_container, record_name)?,
        )?;

        let names = self.forms.field_names(&template)?;
        let values = form::bind_fields(&names, &record, self.config.pipeline.mapping)?;
        let document = self.forms.render(&template, &values)?;

        self.store.put(
            &self.config.store.audio_container,
            &self.config.pipeline.completed_blob,
            &document,
        )?;
        tracing::info!(
            blob = %self.config.pipeline.completed_blob,
            bytes = document.len(),
            "completed document written"
        );
        Ok(document)
    }

    /// Run the full pipeline over a local audio file.
    ///
    /// `Start → Uploaded → Transcribed → Extracted → Filled`, strictly in
    /// order. Every transition requires the prior stage's non-empty,
    /// successfully parsed output; in particular an empty transcript halts
    /// the run before extraction is ever attempted.
    pub fn run(&self, audio: &Path) -> std::result::Result<Vec<u8>, StageFailure> {
        let audio_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| StageFailure {
                stage: Stage::Upload,
                error: ReportError::Other(format!("audio path '{}' has no file name", audio.display())),
            })?;

        self.upload_audio(audio, &audio_name).map_err(|error| StageFailure {
            stage: Stage::Upload,
            error,
        })?;

        let transcript_name = self.transcribe(&audio_name).map_err(|error| StageFailure {
            stage: Stage::Transcribe,
            error,
        })?;

        // Empty transcripts (no speech, or an engine-side cancel) are valid
        // stage output but halt the pipeline here, before extraction.
        if self
            .transcript_is_empty(&transcript_name)
            .map_err(|error| StageFailure {
                stage: Stage::Transcribe,
                error,
            })?
        {
            return Err(StageFailure {
                stage: Stage::Transcribe,
                error: ReportError::TranscriptionEmpty,
            });
        }

        let record_name = self.extract(&transcript_name).map_err(|error| StageFailure {
            stage: Stage::Extract,
            error,
        })?;

        let document = self.fill(&record_name).map_err(|error| StageFailure {
            stage: Stage::Fill,
            error,
        })?;

        tracing::info!("pipeline delivered completed document");
        Ok(document)
    }

    fn transcript_is_empty(&self, transcript_name: &str) -> Result<bool> {
        let artifact = TranscriptArtifact::from_json(
            &self
                .store
                .get_text(&self.config.store.transcript_container, transcript_name)?,
        )?;
        Ok(artifact.is_empty())
    }
}

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Stage-local scratch file the audio object is materialized into.
///
/// Unique per invocation so overlapping sessions in one process (e.g. the
/// test harness) never share a file; removed again once the session ends.
fn scratch_path(audio_name: &str) -> PathBuf {
    let safe: String = audio_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("voxreport_{}_{seq}_{safe}", std::process::id()))
}
