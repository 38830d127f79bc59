//! Capability contracts: the external operations the core depends on
//!
//! Each capability is a thin fallible contract over a platform or network
//! operation: one-shot speech capture, cancellable playback, dialogue
//! generation, and navigation dispatch. The session only ever sees these
//! traits; concrete adapters live behind them.

pub mod gemini;

use crate::language::Locale;
use crate::messages::ChatMessage;
use async_trait::async_trait;
use tracing::info;

pub use crate::action::NavTarget;
pub use gemini::GeminiBackend;

/// Why a capture attempt produced no transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no speech detected")]
    NoSpeech,

    #[error("speech capture timed out")]
    Timeout,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("speech playback failed: {0}")]
pub struct PlaybackError(pub String);

/// Why the dialogue backend produced no reply. No retry is attempted within
/// a turn; the session substitutes a localized fallback instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("dialogue backend rate limited")]
    RateLimited,

    #[error("dialogue backend unreachable: {0}")]
    Unreachable(String),

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// A successful capture: what was heard and how sure the recognizer is.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Recognizer confidence in [0, 1].
    pub confidence: f32,
}

/// How an utterance ended. Cancellation is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Completed,
    Cancelled,
}

/// One-shot microphone capture. At most one call in flight per session.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Capture a single utterance in the given locale.
    async fn capture(&self, locale: Locale) -> Result<Transcript, CaptureError>;

    /// Abort an in-flight capture. The pending call resolves on its own; the
    /// session discards whatever it returns.
    fn cancel(&self);

    /// Probed once at session startup; a `false` here disables voice input
    /// for the session lifetime.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Text-to-speech rendering, cancellable mid-utterance.
#[async_trait]
pub trait SpeechPlayback: Send + Sync {
    /// Speak the text; resolves when audio finishes or is cancelled.
    async fn speak(&self, text: &str, locale: Locale) -> Result<PlaybackEnd, PlaybackError>;

    /// Stop audio immediately; the in-flight `speak` resolves as
    /// [`PlaybackEnd::Cancelled`].
    fn cancel(&self);
}

/// Free-form reply generation over the visible conversation.
#[async_trait]
pub trait DialogueBackend: Send + Sync {
    /// `history` is the visible conversation before this turn's user message;
    /// the new transcript travels separately. The reply is untrusted text that
    /// may embed one `ACTION:` directive fragment.
    async fn generate(
        &self,
        transcript: &str,
        locale: Locale,
        history: &[ChatMessage],
    ) -> Result<String, BackendError>;
}

/// Receives resolved navigation targets. Fire-and-forget.
pub trait NavigationBridge: Send + Sync {
    fn navigate(&self, target: NavTarget);
}

/// Capture adapter for hosts without a recognizer. Always reports
/// unsupported; keeps typed input usable in headless builds.
#[derive(Debug, Default)]
pub struct UnsupportedCapture;

#[async_trait]
impl SpeechCapture for UnsupportedCapture {
    async fn capture(&self, _locale: Locale) -> Result<Transcript, CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn cancel(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}

/// Playback adapter that completes immediately without producing audio.
#[derive(Debug, Default)]
pub struct NullPlayback;

#[async_trait]
impl SpeechPlayback for NullPlayback {
    async fn speak(&self, text: &str, locale: Locale) -> Result<PlaybackEnd, PlaybackError> {
        tracing::debug!(chars = text.len(), locale = locale.code(), "null playback");
        Ok(PlaybackEnd::Completed)
    }

    fn cancel(&self) {}
}

/// Navigation bridge that only logs the target. Default for headless hosts.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl NavigationBridge for LogNavigator {
    fn navigate(&self, target: NavTarget) {
        info!(target = target.as_str(), "navigation requested");
    }
}
