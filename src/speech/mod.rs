//! Speech recognition boundary.
//!
//! An engine drives a continuous recognition session on its own thread and
//! delivers [`RecognitionEvent`]s over a channel: zero or more finalized
//! segments followed by exactly one terminal event. The session state
//! machine in [`session`] converts that stream into a single blocking call.

pub mod http;
pub mod session;

pub use http::HttpSpeechEngine;
pub use session::{SessionOutcome, Terminal, bounded_wait, run_session};

use crate::error::{ReportError, Result};
use crossbeam_channel::Sender;
use std::path::Path;
use std::thread::JoinHandle;
use std::time::Duration;

/// One recognition-session event, delivered on the engine's thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A finalized (non-partial) recognition segment.
    Segment(String),
    /// Recognition reached the natural end of the audio. Terminal.
    Stopped,
    /// Recognition was aborted by the engine. Terminal.
    Canceled {
        /// Engine-reported reason, e.g. an upstream error description.
        reason: String,
    },
}

impl RecognitionEvent {
    /// Terminal events end the session; nothing after one is processed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::Stopped | RecognitionEvent::Canceled { .. }
        )
    }
}

/// Trait for engines that recognize speech from a local audio file.
///
/// This trait allows swapping implementations (HTTP batch engine vs mock).
/// The engine must deliver events in recognition order and send exactly one
/// terminal event per session, after which it stops sending.
pub trait SpeechEngine: Send + Sync {
    /// Start a recognition session over `audio`, delivering events to
    /// `events` from an engine-owned thread.
    fn spawn_session(&self, audio: &Path, events: Sender<RecognitionEvent>)
    -> Result<SessionHandle>;
}

/// Handle to an engine's notification thread.
#[derive(Debug)]
pub struct SessionHandle {
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn new(thread: JoinHandle<()>) -> Self {
        Self {
            thread: Some(thread),
        }
    }

    /// Join the engine thread if it has already finished, surfacing panics
    /// in the log. A thread still running (e.g. after a timeout) is
    /// detached and dies with the process.
    pub fn finish(mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.is_finished() {
                if let Err(panic_info) = handle.join() {
                    let msg = panic_info
                        .downcast_ref::<&str>()
                        .copied()
                        .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                        .unwrap_or("unknown panic");
                    tracing::warn!("recognition engine thread panicked: {msg}");
                }
            } else {
                tracing::debug!("recognition engine thread still running, detaching");
            }
        }
    }
}

/// Mock speech engine for testing.
///
/// Replays a scripted event sequence on a spawned thread, optionally pacing
/// events or holding the session open without ever sending a terminal event
/// (to exercise the bounded wait).
#[derive(Debug, Clone, Default)]
pub struct MockSpeechEngine {
    events: Vec<RecognitionEvent>,
    delay: Option<Duration>,
    hold_open: bool,
    fail_start: bool,
}

impl MockSpeechEngine {
    /// A session that recognizes the given segments, then stops naturally.
    pub fn with_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        let mut events: Vec<RecognitionEvent> = segments
            .into_iter()
            .map(|s| RecognitionEvent::Segment(s.into()))
            .collect();
        events.push(RecognitionEvent::Stopped);
        Self {
            events,
            ..Self::default()
        }
    }

    /// A session that ends immediately with zero recognized segments.
    pub fn silent() -> Self {
        Self::with_segments(Vec::<String>::new())
    }

    /// A session the engine aborts before recognizing anything.
    pub fn canceled(reason: &str) -> Self {
        Self {
            events: vec![RecognitionEvent::Canceled {
                reason: reason.to_string(),
            }],
            ..Self::default()
        }
    }

    /// An exact event script, terminal or not.
    pub fn from_events(events: Vec<RecognitionEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Pace events by sleeping between sends.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Keep the session open after the scripted events, never sending a
    /// terminal event. Simulates a stalled or disconnected stream; any
    /// terminal events in the script are dropped.
    pub fn stalled(mut self) -> Self {
        self.events.retain(|e| !e.is_terminal());
        self.hold_open = true;
        self
    }

    /// Fail `spawn_session` itself.
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn spawn_session(
        &self,
        _audio: &Path,
        events: Sender<RecognitionEvent>,
    ) -> Result<SessionHandle> {
        if self.fail_start {
            return Err(ReportError::SpeechSession {
                message: "mock session start failure".to_string(),
            });
        }

        let script = self.events.clone();
        let delay = self.delay;
        let hold_open = self.hold_open;
        let thread = std::thread::Builder::new()
            .name("mock-speech".to_string())
            .spawn(move || {
                for event in script {
                    if let Some(d) = delay {
                        std::thread::sleep(d);
                    }
                    if events.send(event).is_err() {
                        // Receiver gone (timeout or early exit); stop sending.
                        return;
                    }
                }
                if hold_open {
                    // Keep the sender alive so the receiver sees neither a
                    // terminal event nor a disconnect.
                    std::thread::sleep(Duration::from_secs(30));
                }
            })
            .map_err(|e| ReportError::SpeechSession {
                message: e.to_string(),
            })?;
        Ok(SessionHandle::new(thread))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(!RecognitionEvent::Segment("hi".to_string()).is_terminal());
        assert!(RecognitionEvent::Stopped.is_terminal());
        assert!(
            RecognitionEvent::Canceled {
                reason: "network".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_mock_with_segments_ends_with_stop() {
        let engine = MockSpeechEngine::with_segments(["one", "two"]);
        assert_eq!(engine.events.len(), 3);
        assert_eq!(engine.events[2], RecognitionEvent::Stopped);
    }

    #[test]
    fn test_mock_delivers_script_on_channel() {
        let engine = MockSpeechEngine::with_segments(["hello"]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = engine.spawn_session(Path::new("unused.wav"), tx).unwrap();

        assert_eq!(
            rx.recv().unwrap(),
            RecognitionEvent::Segment("hello".to_string())
        );
        assert_eq!(rx.recv().unwrap(), RecognitionEvent::Stopped);
        assert!(rx.recv().is_err()); // sender dropped after script
        handle.finish();
    }

    #[test]
    fn test_stalled_strips_terminal_events() {
        let engine = MockSpeechEngine::with_segments(["one"]).stalled();
        assert!(engine.events.iter().all(|e| !e.is_terminal()));
    }

    #[test]
    fn test_mock_start_failure() {
        let engine = MockSpeechEngine::silent().with_start_failure();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let err = engine.spawn_session(Path::new("unused.wav"), tx).unwrap_err();
        assert!(matches!(err, ReportError::SpeechSession { .. }));
    }
}
