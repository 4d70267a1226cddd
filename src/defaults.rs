//! Default configuration constants for voxreport.
//!
//! Well-known blob names are fixed by convention across pipeline runs: each
//! rerun overwrites the previous artifact under the same name. That makes
//! reruns idempotent and concurrent runs over the same container unsafe.

/// Default container for raw audio, form templates and finished documents.
pub const AUDIO_CONTAINER: &str = "reports";

/// Default container for transcript artifacts.
pub const TRANSCRIPT_CONTAINER: &str = "transcripts";

/// Default container for extracted incident records.
pub const RECORD_CONTAINER: &str = "incident-details";

/// Well-known blob name of the transcript artifact.
pub const TRANSCRIPT_BLOB: &str = "transcript.json";

/// Well-known blob name of the extracted incident record.
pub const RECORD_BLOB: &str = "extracted_incident_details.json";

/// Well-known blob name of the fillable form template.
pub const TEMPLATE_BLOB: &str = "report_template.json";

/// Well-known blob name of the completed report document.
pub const COMPLETED_BLOB: &str = "completed_report.json";

/// Base allowance for a recognition session before the bounded wait expires.
///
/// Covers connection setup and engine spin-up. The per-audio-second
/// allowance below is added on top for the audio itself.
pub const SESSION_BASE_TIMEOUT_SECS: u64 = 30;

/// Extra wait allowed per second of audio in the recognition session.
///
/// 2.0 means a 60s recording may take up to 2 minutes of recognition on top
/// of the base allowance before the session is declared stalled.
pub const SESSION_SECS_PER_AUDIO_SEC: f32 = 2.0;

/// Request timeout for the completion and batch-recognition HTTP calls.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Azure OpenAI REST API version used by the completion client.
pub const OPENAI_API_VERSION: &str = "2024-05-01-preview";
