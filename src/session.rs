//! Conversation session: turn sequencing and the listen/speak state machine
//!
//! One logical session per UI surface. Each operation is a single sequential
//! async handler with explicit suspension points at the capability calls, so
//! no two capability calls are ever concurrently in flight for a session and
//! Listening/Speaking are mutually exclusive by construction. The only shared
//! mutable state (history, current state, and the turn epoch) sits behind
//! one mutex that is never held across an await.
//!
//! Out-of-band operations (`clear`, `submit_text` preemption) bump the turn
//! epoch; a handler resuming from an await with a stale epoch discards its
//! result and touches neither history nor state.

use crate::action::{self, ActionDirective};
use crate::capability::{
    CaptureError, DialogueBackend, NavigationBridge, PlaybackEnd, SpeechCapture, SpeechPlayback,
};
use crate::intent::{self, Intent};
use crate::language::{LanguagePack, Locale};
use crate::messages::ChatMessage;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phase of the session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    AwaitingReply,
    Speaking,
}

/// The only errors surfaced to callers. Capability failures never appear
/// here; they become localized assistant messages instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("voice input is not available on this platform")]
    VoiceUnsupported,

    #[error("another turn is already in progress")]
    TurnInProgress,

    #[error("empty input")]
    EmptyInput,
}

/// What a finished turn produced, for local UI hints.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Advisory classification of the captured transcript. Voice turns only.
    pub intent: Option<Intent>,
    /// Navigation directive extracted from the reply, if one was honored.
    pub directive: Option<ActionDirective>,
    /// False when the turn was aborted (capture failed) or superseded.
    pub completed: bool,
}

impl TurnOutcome {
    fn aborted() -> Self {
        Self { intent: None, directive: None, completed: false }
    }

    fn superseded(intent: Option<Intent>) -> Self {
        Self { intent, directive: None, completed: false }
    }
}

struct Inner {
    state: SessionState,
    history: Vec<ChatMessage>,
    /// Bumped at every turn start and by every superseding operation. A
    /// handler whose epoch no longer matches discards its pending result.
    epoch: u64,
    /// Latched when capture reports `Unsupported`; typed input stays usable.
    voice_disabled: bool,
}

/// Owns the message history and drives capture, generation, and playback
/// through one turn at a time.
pub struct ConversationSession {
    inner: Mutex<Inner>,
    capture: Arc<dyn SpeechCapture>,
    playback: Arc<dyn SpeechPlayback>,
    backend: Arc<dyn DialogueBackend>,
    navigator: Arc<dyn NavigationBridge>,
}

impl ConversationSession {
    pub fn new(
        capture: Arc<dyn SpeechCapture>,
        playback: Arc<dyn SpeechPlayback>,
        backend: Arc<dyn DialogueBackend>,
        navigator: Arc<dyn NavigationBridge>,
    ) -> Self {
        let voice_disabled = !capture.is_supported();
        if voice_disabled {
            info!("speech capture unsupported, voice input disabled");
        }
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                history: Vec::new(),
                epoch: 0,
                voice_disabled,
            }),
            capture,
            playback,
            backend,
            navigator,
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Snapshot of the visible history, creation-ordered.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.inner.lock().history.clone()
    }

    pub fn is_voice_supported(&self) -> bool {
        !self.inner.lock().voice_disabled
    }

    /// Run one voice turn: capture → advisory intent → generation →
    /// extraction → playback. Only valid from `Idle`.
    pub async fn start_voice_turn(&self, locale: Locale) -> Result<TurnOutcome, SessionError> {
        let turn = {
            let mut inner = self.inner.lock();
            if inner.voice_disabled {
                return Err(SessionError::VoiceUnsupported);
            }
            if inner.state != SessionState::Idle {
                return Err(SessionError::TurnInProgress);
            }
            inner.epoch += 1;
            inner.state = SessionState::Listening;
            inner.epoch
        };
        debug!(turn, locale = locale.code(), "listening");

        // Re-checked right before the call: a cancel that lands between the
        // transition above and this point must not start a capture at all.
        if self.inner.lock().epoch != turn {
            debug!(turn, "listening cancelled before capture started");
            return Ok(TurnOutcome::superseded(None));
        }
        let captured = self.capture.capture(locale).await;

        let (transcript, history) = {
            let mut inner = self.inner.lock();
            if inner.epoch != turn {
                debug!(turn, "capture result discarded, turn superseded");
                return Ok(TurnOutcome::superseded(None));
            }
            match captured {
                Ok(transcript) => {
                    info!(confidence = transcript.confidence, "transcript captured");
                    let history = inner.history.clone();
                    inner
                        .history
                        .push(ChatMessage::user(transcript.text.clone(), locale));
                    inner.state = SessionState::AwaitingReply;
                    (transcript, history)
                }
                Err(err) => {
                    warn!(%err, "speech capture failed");
                    let pack = LanguagePack::for_locale(locale);
                    let text = if err == CaptureError::Unsupported {
                        inner.voice_disabled = true;
                        pack.voice_unsupported()
                    } else {
                        pack.capture_failed()
                    };
                    inner.history.push(ChatMessage::assistant(text, locale));
                    inner.state = SessionState::Idle;
                    return Ok(TurnOutcome::aborted());
                }
            }
        };

        // Advisory only: the backend forms its own interpretation.
        let hint = intent::parse(&transcript.text, locale);
        debug!(kind = ?hint.kind, confidence = hint.confidence, "intent hint");

        Ok(self
            .reply_phase(turn, transcript.text, locale, Some(hint), history)
            .await)
    }

    /// Run one typed turn. Preempts an in-progress Speaking phase by stopping
    /// playback; rejected while capture or generation is in flight.
    pub async fn submit_text(
        &self,
        text: &str,
        locale: Locale,
    ) -> Result<TurnOutcome, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let (turn, history, was_speaking) = {
            let mut inner = self.inner.lock();
            let was_speaking = match inner.state {
                SessionState::Listening | SessionState::AwaitingReply => {
                    return Err(SessionError::TurnInProgress);
                }
                SessionState::Speaking => true,
                SessionState::Idle => false,
            };
            inner.epoch += 1;
            let history = inner.history.clone();
            inner.history.push(ChatMessage::user(text, locale));
            inner.state = SessionState::AwaitingReply;
            (inner.epoch, history, was_speaking)
        };
        if was_speaking {
            debug!(turn, "typed input preempts playback");
            self.playback.cancel();
        }
        debug!(turn, locale = locale.code(), "typed turn started");

        Ok(self
            .reply_phase(turn, text.to_string(), locale, None, history)
            .await)
    }

    /// Generation → extraction → playback half of a turn. `history` is the
    /// visible conversation before this turn's user message.
    async fn reply_phase(
        &self,
        turn: u64,
        transcript: String,
        locale: Locale,
        hint: Option<Intent>,
        history: Vec<ChatMessage>,
    ) -> TurnOutcome {
        let reply = self.backend.generate(&transcript, locale, &history).await;

        let (visible, directive) = {
            let mut inner = self.inner.lock();
            if inner.epoch != turn {
                debug!(turn, "reply discarded, turn superseded");
                return TurnOutcome::superseded(hint);
            }
            match reply {
                Ok(text) => {
                    let (visible, directive) = action::extract(&text);
                    inner
                        .history
                        .push(ChatMessage::assistant(visible.clone(), locale));
                    inner.state = SessionState::Speaking;
                    (visible, directive)
                }
                Err(err) => {
                    warn!(%err, "dialogue backend failed");
                    let pack = LanguagePack::for_locale(locale);
                    inner
                        .history
                        .push(ChatMessage::assistant(pack.generation_fallback(), locale));
                    inner.state = SessionState::Idle;
                    return TurnOutcome { intent: hint, directive: None, completed: true };
                }
            }
        };

        // Forwarded exactly once per turn, after the assistant message is
        // appended, independent of playback.
        if let Some(directive) = directive {
            info!(target = directive.target.as_str(), "forwarding navigation directive");
            self.navigator.navigate(directive.target);
        }

        // Re-checked right before the call: a stop or preemption that lands
        // between the transition to Speaking and this point must not start
        // playback at all.
        let speak_allowed = {
            let inner = self.inner.lock();
            inner.epoch == turn && inner.state == SessionState::Speaking
        };
        if speak_allowed {
            match self.playback.speak(&visible, locale).await {
                Ok(PlaybackEnd::Completed) => debug!(turn, "playback complete"),
                Ok(PlaybackEnd::Cancelled) => debug!(turn, "playback cancelled"),
                Err(err) => warn!(%err, "playback failed"),
            }
        } else {
            debug!(turn, "playback skipped, turn stopped before it started");
        }

        {
            let mut inner = self.inner.lock();
            if inner.epoch == turn {
                inner.state = SessionState::Idle;
            }
        }

        TurnOutcome { intent: hint, directive, completed: true }
    }

    /// Abort an in-progress capture and return to `Idle`. No message is
    /// appended; the superseded capture result is discarded on arrival.
    pub fn cancel_listening(&self) {
        let was_listening = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Listening {
                inner.epoch += 1;
                inner.state = SessionState::Idle;
                true
            } else {
                false
            }
        };
        if was_listening {
            debug!("listening cancelled");
            self.capture.cancel();
        }
    }

    /// Stop an in-progress utterance and return to `Idle` immediately. The
    /// turn keeps its epoch, so its handler finishes without side effects.
    pub fn stop_speaking(&self) {
        let was_speaking = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Speaking {
                inner.state = SessionState::Idle;
                true
            } else {
                false
            }
        };
        if was_speaking {
            debug!("speaking stopped");
            self.playback.cancel();
        }
    }

    /// Unconditional reset: empties the history and returns to `Idle`.
    /// In-flight capability calls are not retracted; their results are
    /// discarded by the epoch guard when they arrive.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.history.clear();
        inner.state = SessionState::Idle;
        debug!("session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{LogNavigator, NullPlayback, UnsupportedCapture};
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl DialogueBackend for EchoBackend {
        async fn generate(
            &self,
            transcript: &str,
            _locale: Locale,
            _history: &[ChatMessage],
        ) -> Result<String, crate::capability::BackendError> {
            Ok(format!("echo: {transcript}"))
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::new(
            Arc::new(UnsupportedCapture),
            Arc::new(NullPlayback),
            Arc::new(EchoBackend),
            Arc::new(LogNavigator),
        )
    }

    #[test]
    fn starts_idle_and_empty() {
        let session = session();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn unsupported_capture_fails_fast() {
        let session = session();
        assert!(!session.is_voice_supported());
        assert_eq!(
            session.start_voice_turn(Locale::English).await.unwrap_err(),
            SessionError::VoiceUnsupported
        );
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn typed_turn_works_without_voice() {
        let session = session();
        let outcome = session
            .submit_text("how are my crops", Locale::English)
            .await
            .unwrap();
        assert!(outcome.completed);
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text, "echo: how are my crops");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let session = session();
        assert_eq!(
            session.submit_text("   ", Locale::English).await.unwrap_err(),
            SessionError::EmptyInput
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let session = session();
        session.clear();
        assert!(session.history().is_empty());
        session.clear();
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn stop_speaking_outside_speaking_is_a_no_op() {
        let session = session();
        session.stop_speaking();
        session.cancel_listening();
        assert_eq!(session.state(), SessionState::Idle);
    }
}
