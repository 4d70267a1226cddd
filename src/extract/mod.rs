//! Incident extraction boundary: free-text transcript → structured record.
//!
//! The completion service is a black-box text-in/text-out function; this
//! module owns the fixed prompt contract around it and the strict parse of
//! its reply into an [`IncidentRecord`].

pub mod azure_openai;

pub use azure_openai::AzureOpenAiClient;

use crate::artifact::IncidentRecord;
use crate::error::{ReportError, Result};

/// Fixed system role for every extraction request.
pub const SYSTEM_PROMPT: &str = "You are an expert police report assistant.";

/// Trait for language-model completion services.
///
/// This trait allows swapping implementations (Azure OpenAI vs mock).
pub trait CompletionClient: Send + Sync {
    /// Request a single text completion.
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Build the rigid extraction instruction embedding the transcript.
///
/// The model is told to respond with only a JSON object of the three-field
/// schema, no surrounding prose. Everything else about the response is
/// handled by [`parse_record`].
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"You are an AI assistant structuring police reports. Extract key details from the transcript below.

Respond ONLY in valid JSON format, with no explanations or extra text.

JSON structure:
{{
    "aggrieved_name": "<Victim's First Name>",
    "aggrieved_surname": "<Victim's Last Name>",
    "ReasonToContact": "<summary of the incident>"
}}

Transcript:
{transcript}"#
    )
}

/// Parse a completion response as an incident record.
///
/// The response must be a bare JSON object; a reply that is not valid JSON
/// is a contract violation ([`ReportError::ExtractionParse`]), with no
/// retry at this layer. Missing fields deserialize as empty strings.
pub fn parse_record(response: &str) -> Result<IncidentRecord> {
    serde_json::from_str(response.trim()).map_err(|e| ReportError::ExtractionParse {
        message: e.to_string(),
    })
}

/// Mock completion client for testing.
#[derive(Debug, Clone)]
pub struct MockCompletionClient {
    response: String,
    should_fail: bool,
    calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl MockCompletionClient {
    /// Create a mock that returns the given response verbatim.
    pub fn with_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            calls: std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to fail with an external-service error.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of completion requests made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.should_fail {
            Err(ReportError::external(
                "completion service",
                "mock completion failure",
            ))
        } else {
            Ok(self.response.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript_and_schema() {
        let prompt = build_prompt("Jane Doe reported a burglary at 10pm.");
        assert!(prompt.contains("Jane Doe reported a burglary at 10pm."));
        assert!(prompt.contains("\"aggrieved_name\""));
        assert!(prompt.contains("\"aggrieved_surname\""));
        assert!(prompt.contains("\"ReasonToContact\""));
        assert!(prompt.contains("ONLY in valid JSON"));
    }

    #[test]
    fn test_parse_valid_record() {
        let record = parse_record(
            r#"{"aggrieved_name":"Jane","aggrieved_surname":"Doe","ReasonToContact":"burglary reported at 10pm"}"#,
        )
        .unwrap();
        assert_eq!(record.aggrieved_name, "Jane");
        assert_eq!(record.aggrieved_surname, "Doe");
        assert_eq!(record.reason_to_contact, "burglary reported at 10pm");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let record = parse_record("\n  {\"aggrieved_name\": \"Jane\"}  \n").unwrap();
        assert_eq!(record.aggrieved_name, "Jane");
        assert_eq!(record.aggrieved_surname, "");
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_record("Sure! Here is the JSON you asked for: {}").unwrap_err();
        assert!(matches!(err, ReportError::ExtractionParse { .. }));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_record("\"just a string\"").is_err());
        assert!(parse_record("[]").is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let response = r#"{"aggrieved_name":"Jane","aggrieved_surname":"Doe","ReasonToContact":"theft"}"#;
        let first = parse_record(response).unwrap();
        let second = parse_record(response).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_mock_counts_calls() {
        let mock = MockCompletionClient::with_response("{}");
        assert_eq!(mock.call_count(), 0);
        mock.complete(SYSTEM_PROMPT, "prompt").unwrap();
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockCompletionClient::with_response("{}").with_failure();
        let err = mock.complete(SYSTEM_PROMPT, "prompt").unwrap_err();
        assert!(matches!(err, ReportError::ExternalService { .. }));
    }
}
