//! Recognition session state machine.
//!
//! Converts the engine's event-driven stream into one blocking call with
//! exactly one exit point:
//!
//! ```text
//! Recording → (zero or more Segment events) → Terminal(Stopped | Canceled) → Done
//! ```
//!
//! The control thread blocks draining the event channel until the first
//! terminal event, the engine disconnecting, or the bounded wait expiring.
//! No event is processed after Done: the loop breaks on the first terminal
//! and the receiver is dropped, so late sends from the engine thread fail
//! harmlessly on its side. Segments are appended by this thread only, in
//! arrival order, and read only after the session is Done.

use crate::error::{ReportError, Result};
use crate::speech::{RecognitionEvent, SpeechEngine};
use crossbeam_channel::RecvTimeoutError;
use std::path::Path;
use std::time::{Duration, Instant};

/// How a session reached Done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Natural end of audio.
    Stopped,
    /// Engine aborted recognition. Carries the engine-reported reason.
    Canceled { reason: String },
}

/// Everything a finished session produced.
///
/// Stopped and Canceled both yield a (possibly empty) transcript at the
/// stage contract; the terminal reason is retained here so callers can log
/// or inspect it without a separate error kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Finalized segments in recognition order.
    pub segments: Vec<String>,
    pub terminal: Terminal,
}

impl SessionOutcome {
    /// The consolidated transcript: segments joined by newlines, empty when
    /// nothing was recognized.
    pub fn transcript(&self) -> String {
        self.segments.join("\n")
    }
}

/// Run one recognition session to completion.
///
/// Blocks until the engine delivers a terminal event or `deadline` elapses.
/// An engine that drops its sender without a terminal event is treated as
/// canceled rather than as a protocol error, matching how engine-side
/// aborts surface. Expiry of the bounded wait is
/// [`ReportError::TranscriptionTimeout`].
pub fn run_session(
    engine: &dyn SpeechEngine,
    audio: &Path,
    deadline: Duration,
) -> Result<SessionOutcome> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = engine.spawn_session(audio, tx)?;

    let expires_at = Instant::now() + deadline;
    let mut segments: Vec<String> = Vec::new();

    let terminal = loop {
        let remaining = expires_at.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(RecognitionEvent::Segment(text)) => {
                tracing::debug!(segment = %text, "recognized");
                segments.push(text);
            }
            Ok(RecognitionEvent::Stopped) => break Terminal::Stopped,
            Ok(RecognitionEvent::Canceled { reason }) => {
                tracing::warn!(%reason, "recognition canceled");
                break Terminal::Canceled { reason };
            }
            Err(RecvTimeoutError::Timeout) => {
                drop(rx);
                handle.finish();
                return Err(ReportError::TranscriptionTimeout { waited: deadline });
            }
            Err(RecvTimeoutError::Disconnected) => {
                break Terminal::Canceled {
                    reason: "engine disconnected before a terminal event".to_string(),
                };
            }
        }
    };

    drop(rx);
    handle.finish();
    tracing::info!(
        segments = segments.len(),
        terminal = ?terminal,
        "recognition session done"
    );
    Ok(SessionOutcome { segments, terminal })
}

/// Bounded wait for a session over the given audio file.
///
/// `base` covers engine spin-up; on top of it each second of audio earns
/// `per_audio_second` seconds of allowance. Audio that can't be probed as
/// WAV gets the flat base allowance.
pub fn bounded_wait(audio: &Path, base: Duration, per_audio_second: f32) -> Duration {
    match hound::WavReader::open(audio) {
        Ok(reader) => {
            let spec = reader.spec();
            let audio_secs = reader.duration() as f64 / spec.sample_rate.max(1) as f64;
            base + Duration::from_secs_f64(audio_secs * per_audio_second.max(0.0) as f64)
        }
        Err(e) => {
            tracing::debug!("could not probe audio duration ({e}), using base wait");
            base
        }
    }
}
