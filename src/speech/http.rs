//! Batch-recognition HTTP engine.
//!
//! Adapts a request/response speech-to-text endpoint to the streaming
//! session contract: the audio is posted whole, and the returned segments
//! are replayed as `Segment` events followed by `Stopped` on an
//! engine-owned thread. Request failures surface as a `Canceled` terminal
//! event, exactly like an engine-side abort of a live stream.

use crate::error::{ReportError, Result};
use crate::speech::{RecognitionEvent, SessionHandle, SpeechEngine};
use crossbeam_channel::Sender;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    text: String,
}

/// Speech engine backed by a batch transcription HTTP endpoint.
pub struct HttpSpeechEngine {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl HttpSpeechEngine {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        language: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::external("speech service", e))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        })
    }

    fn transcribe(&self, audio: Vec<u8>) -> Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("language", self.language.as_str())])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "audio/wav")
            .body(audio)
            .send()
            .map_err(|e| ReportError::external("speech service", e))?;

        if !response.status().is_success() {
            return Err(ReportError::external(
                "speech service",
                format!("status {}", response.status()),
            ));
        }

        let body: TranscriptionResponse = response
            .json()
            .map_err(|e| ReportError::external("speech service", e))?;
        Ok(body.segments.into_iter().map(|s| s.text).collect())
    }
}

impl SpeechEngine for HttpSpeechEngine {
    fn spawn_session(
        &self,
        audio: &Path,
        events: Sender<RecognitionEvent>,
    ) -> Result<SessionHandle> {
        // Read before spawning so a missing file fails the start, not the
        // session.
        let audio_bytes = std::fs::read(audio)?;

        let engine = Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
        };

        let thread = std::thread::Builder::new()
            .name("speech-http".to_string())
            .spawn(move || replay(engine.transcribe(audio_bytes), &events))
            .map_err(|e| ReportError::SpeechSession {
                message: e.to_string(),
            })?;
        Ok(SessionHandle::new(thread))
    }
}

fn replay(result: Result<Vec<String>>, events: &Sender<RecognitionEvent>) {
    match result {
        Ok(segments) => {
            for text in segments {
                if events.send(RecognitionEvent::Segment(text)).is_err() {
                    return; // receiver gone, session already over
                }
            }
            if events.send(RecognitionEvent::Stopped).is_err() {
                tracing::debug!("session receiver gone before terminal event");
            }
        }
        Err(e) => {
            if events
                .send(RecognitionEvent::Canceled {
                    reason: e.to_string(),
                })
                .is_err()
            {
                tracing::debug!("session receiver gone before cancel event");
            }
        }
    }
}
