//! Gemini-backed dialogue generation
//!
//! Adapter over the Generative Language `generateContent` REST endpoint. The
//! session sees only the [`DialogueBackend`] trait; prompt construction and
//! error mapping stay in here.

use super::{BackendError, DialogueBackend};
use crate::language::{LanguagePack, Locale};
use crate::messages::{Author, ChatMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Dialogue backend over the Gemini `generateContent` API.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Build from `GEMINI_API_KEY`; `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("GEMINI_API_KEY").ok()?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Assemble the tagged history plus the instructed user turn.
fn build_contents(transcript: &str, locale: Locale, history: &[ChatMessage]) -> Vec<Content> {
    let pack = LanguagePack::for_locale(locale);

    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content {
            role: match msg.author {
                Author::User => "user",
                Author::Assistant => "model",
            },
            parts: vec![Part { text: msg.text.clone() }],
        })
        .collect();

    let instructions = format!(
        "You are a helpful AI assistant for a smart farming application. {}.\n\n\
         The user said: \"{}\"\n\n\
         Context: This is a farming application that helps with:\n\
         - Weather monitoring and forecasts\n\
         - Irrigation scheduling and water management\n\
         - Crop planning and recommendations\n\
         - Market prices and insights\n\
         - Farm alerts and notifications\n\
         - Sustainable farming practices\n\n\
         Provide a helpful, concise response (max 2-3 sentences) about farming topics.\n\
         If this is a navigation request, also include an action in this format:\n\
         ACTION: {{\"type\": \"navigate\", \"target\": \"dashboard|profile|irrigation|crops|market|alerts|sustainable\"}}\n\n\
         Keep responses conversational and farmer-friendly.",
        pack.reply_instruction(),
        transcript
    );

    contents.push(Content {
        role: "user",
        parts: vec![Part { text: instructions }],
    });

    contents
}

#[async_trait]
impl DialogueBackend for GeminiBackend {
    async fn generate(
        &self,
        transcript: &str,
        locale: Locale,
        history: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: build_contents(transcript, locale, history),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited);
        }
        if !status.is_success() {
            return Err(BackendError::Unreachable(format!("HTTP {status}")));
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        let reply = decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| BackendError::Malformed("response carried no candidates".into()))?;

        debug!(chars = reply.len(), model = %self.model, "reply generated");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_maps_to_alternating_roles() {
        let history = vec![
            ChatMessage::user("crop advice please", Locale::English),
            ChatMessage::assistant("sure, what crop?", Locale::English),
        ];
        let contents = build_contents("rice", Locale::English, &history);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert!(contents[2].parts[0].text.contains("The user said: \"rice\""));
    }

    #[test]
    fn prompt_carries_the_locale_instruction() {
        let contents = build_contents("बारिश", Locale::Hindi, &[]);
        assert!(contents[0].parts[0].text.contains("Respond in Hindi"));
    }

    #[test]
    fn empty_candidate_list_is_malformed() {
        let decoded: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.candidates.is_empty());
    }

    #[test]
    fn response_shape_decodes() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Water early in the morning."}], "role": "model"}}
            ]
        }"#;
        let decoded: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            decoded.candidates[0].content.parts[0].text,
            "Water early in the morning."
        );
    }
}
