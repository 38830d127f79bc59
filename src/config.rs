//! Assistant configuration
//!
//! Defaults plus environment overrides; `.env` loading is the binary's job.

use crate::language::Locale;

/// Environment variable names recognized by [`AssistantConfig::from_env`].
const ENV_LOCALE: &str = "ASSISTANT_LOCALE";
const ENV_MODEL: &str = "ASSISTANT_MODEL";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Locale used for turns until the UI switches it.
    pub default_locale: Locale,

    /// Generation model name passed to the dialogue backend.
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::English,
            model: "gemini-pro".to_string(),
        }
    }
}

impl AssistantConfig {
    /// Defaults overridden by `ASSISTANT_LOCALE` and `ASSISTANT_MODEL`.
    /// Unparseable values fall back silently.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(locale) = std::env::var(ENV_LOCALE) {
            if let Ok(locale) = locale.parse() {
                config.default_locale = locale;
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        config
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model name must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AssistantConfig::default();
        assert_eq!(config.default_locale, Locale::English);
        assert_eq!(config.model, "gemini-pro");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = AssistantConfig::default()
            .with_locale(Locale::Telugu)
            .with_model("gemini-1.5-flash");
        assert_eq!(config.default_locale, Locale::Telugu);
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn empty_model_fails_validation() {
        let config = AssistantConfig::default().with_model("  ");
        assert!(config.validate().is_err());
    }
}
