//! AgriVoice: voice-interaction core for a multilingual farm assistant
//!
//! Coordinates one-shot microphone capture, per-locale intent recognition,
//! dialogue generation, directive extraction, speech synthesis, and UI
//! navigation through a single listen/speak state machine per session.
//! Capture, playback, and generation are external capabilities behind traits
//! in [`capability`]; the core never touches audio or model weights itself.

pub mod action;
pub mod capability;
pub mod collab;
pub mod config;
pub mod intent;
pub mod language;
pub mod messages;
pub mod session;

pub use action::{extract, ActionDirective, NavTarget};
pub use capability::{
    BackendError, CaptureError, DialogueBackend, NavigationBridge, PlaybackEnd, PlaybackError,
    SpeechCapture, SpeechPlayback, Transcript,
};
pub use config::AssistantConfig;
pub use intent::{Intent, IntentKind};
pub use language::{LanguagePack, Locale};
pub use messages::{Author, ChatMessage};
pub use session::{ConversationSession, SessionError, SessionState, TurnOutcome};
