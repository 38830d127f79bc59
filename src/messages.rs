//! Chat message types owned by the conversation session

use crate::language::Locale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One entry of the append-only, creation-ordered session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    pub locale: Locale,
}

impl ChatMessage {
    pub fn new(author: Author, text: impl Into<String>, locale: Locale) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            author,
            timestamp: Utc::now(),
            locale,
        }
    }

    pub fn user(text: impl Into<String>, locale: Locale) -> Self {
        Self::new(Author::User, text, locale)
    }

    pub fn assistant(text: impl Into<String>, locale: Locale) -> Self {
        Self::new(Author::Assistant, text, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_tag_the_author() {
        let user = ChatMessage::user("hello", Locale::English);
        let bot = ChatMessage::assistant("hi", Locale::Hindi);
        assert_eq!(user.author, Author::User);
        assert_eq!(bot.author, Author::Assistant);
        assert_eq!(bot.locale, Locale::Hindi);
        assert_ne!(user.id, bot.id);
    }

    #[test]
    fn serializes_with_lowercase_tags() {
        let msg = ChatMessage::user("hello", Locale::Telugu);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["author"], "user");
        assert_eq!(json["locale"], "telugu");
    }
}
