//! Advisory intent recognition over raw transcripts
//!
//! The parser classifies a transcript against the active locale's matcher
//! table. The result is a local UI hint only; the dialogue backend forms its
//! own interpretation and the two are never required to agree.

use crate::language::{LanguagePack, Locale};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence assigned when a matcher in the table fires.
const MATCH_CONFIDENCE: f32 = 0.8;

/// Confidence assigned when nothing matches.
const UNKNOWN_CONFIDENCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Weather,
    Irrigation,
    Crops,
    Market,
    Alerts,
    Navigate,
    Unknown,
}

/// A classified transcript with kind-specific extracted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub parameters: HashMap<String, String>,
    pub confidence: f32,
}

/// Classify a transcript for the given locale.
///
/// Evaluates the locale's matcher table in its fixed order; the first match
/// wins. Pure and synchronous: identical input always yields identical output.
pub fn parse(transcript: &str, locale: Locale) -> Intent {
    let pack = LanguagePack::for_locale(locale);

    for (kind, pattern) in pack.matchers() {
        if pattern.is_match(transcript) {
            return Intent {
                kind: *kind,
                parameters: extract_parameters(pack, transcript, *kind),
                confidence: MATCH_CONFIDENCE,
            };
        }
    }

    let mut parameters = HashMap::new();
    parameters.insert("transcript".to_string(), transcript.to_string());
    Intent {
        kind: IntentKind::Unknown,
        parameters,
        confidence: UNKNOWN_CONFIDENCE,
    }
}

fn extract_parameters(
    pack: &LanguagePack,
    transcript: &str,
    kind: IntentKind,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    match kind {
        IntentKind::Navigate => {
            if let Some(target) = pack.nav_target(transcript) {
                params.insert("target".to_string(), target.as_str().to_string());
            }
        }
        IntentKind::Irrigation => {
            params.insert(
                "action".to_string(),
                pack.irrigation_action(transcript).to_string(),
            );
        }
        IntentKind::Weather => {
            params.insert("query".to_string(), "current_weather".to_string());
        }
        _ => {}
    }

    params
}
