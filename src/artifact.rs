//! Persisted intermediate artifacts of the report pipeline.
//!
//! Each stage writes exactly one artifact under a well-known blob name and
//! the next stage reads it back by that name; stages never hand each other
//! in-memory values. Artifacts are full-object overwrites: rerunning the
//! pipeline replaces them wholesale, which is what makes reruns idempotent.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Consolidated transcript of one recognition session.
///
/// `transcript` is the concatenation, in recognition order, of all finalized
/// recognition segments, joined by newlines. The empty string is a valid
/// artifact at this layer; the orchestrator treats it as a pipeline failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TranscriptArtifact {
    pub transcript: String,
}

impl TranscriptArtifact {
    /// Join finalized segments, newline-separated, in arrival order.
    pub fn from_segments(segments: &[String]) -> Self {
        Self {
            transcript: segments.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Other(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ReportError::ArtifactParse {
            name: "transcript".to_string(),
            message: e.to_string(),
        })
    }
}

/// Structured incident record extracted from a transcript.
///
/// Exactly three fields, each a possibly-empty string. A completion response
/// that is not a JSON object of this shape is a contract violation; a
/// response that merely omits fields deserializes with those fields empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IncidentRecord {
    #[serde(default)]
    pub aggrieved_name: String,
    #[serde(default)]
    pub aggrieved_surname: String,
    #[serde(default, rename = "ReasonToContact")]
    pub reason_to_contact: String,
}

impl IncidentRecord {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Other(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ReportError::ArtifactParse {
            name: "incident record".to_string(),
            message: e.to_string(),
        })
    }

    /// Value for a template field, by record field name. Unknown names
    /// resolve to `None`; absent values always render as empty strings at
    /// the form layer, never as omitted fields.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "aggrieved_name" => Some(&self.aggrieved_name),
            "aggrieved_surname" => Some(&self.aggrieved_surname),
            "ReasonToContact" => Some(&self.reason_to_contact),
            _ => None,
        }
    }

    /// Record field names in their positional binding order.
    pub const FIELD_ORDER: [&'static str; 3] =
        ["aggrieved_name", "aggrieved_surname", "ReasonToContact"];
}
