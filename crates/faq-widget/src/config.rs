use std::time::Duration;

use faq_common::gemini::GeminiClientConfig;

use crate::controller::{ControllerSettings, DEFAULT_DEBOUNCE};
use crate::error::AppError;
use crate::markup::MarkupPolicy;

/// Application configuration loaded explicitly from environment variables.
///
/// Nothing here is required. Without a usable `GEMINI_API_KEY` the widget still runs
/// and answers every submitted query with a setup notice.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiClientConfig,
    /// Quiet period before live input is filtered.
    pub debounce: Duration,
    /// What markup from generated answers survives.
    pub markup: MarkupPolicy,
    /// Address fragment present when the page loads, e.g. `#how-do-i-reset-my-password`.
    pub initial_fragment: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GEMINI_API_KEY`, `GEMINI_BASE_URL`, `GEMINI_MODEL`, `GEMINI_TIMEOUT_SECS`,
    ///   `GEMINI_MAX_ERROR_BODY_BYTES`: answer service client
    /// - `FAQ_DEBOUNCE_MS`: live filter quiet period (default 300)
    /// - `FAQ_ANSWER_MARKUP`: `escape` (default) or `basic`
    /// - `FAQ_FRAGMENT`: initial deep link
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(GeminiClientConfig::from_env(), |key| std::env::var(key).ok())
    }

    fn from_lookup(
        gemini: GeminiClientConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let debounce = match lookup("FAQ_DEBOUNCE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| AppError::Config(format!("FAQ_DEBOUNCE_MS={raw:?}: {e}")))?,
            None => DEFAULT_DEBOUNCE,
        };

        let markup = match lookup("FAQ_ANSWER_MARKUP") {
            Some(raw) => raw
                .parse::<MarkupPolicy>()
                .map_err(|e| AppError::Config(format!("FAQ_ANSWER_MARKUP: {e}")))?,
            None => MarkupPolicy::default(),
        };

        let initial_fragment = lookup("FAQ_FRAGMENT")
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(Self {
            gemini,
            debounce,
            markup,
            initial_fragment,
        })
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce: self.debounce,
            markup: self.markup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(GeminiClientConfig::default(), |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).expect("config");
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.markup, MarkupPolicy::Escape);
        assert!(config.initial_fragment.is_none());
    }

    #[test]
    fn values_are_read() {
        let config = load(&[
            ("FAQ_DEBOUNCE_MS", "120"),
            ("FAQ_ANSWER_MARKUP", "basic"),
            ("FAQ_FRAGMENT", " #how-do-i-contact-support "),
        ])
        .expect("config");
        assert_eq!(config.debounce, Duration::from_millis(120));
        assert_eq!(config.markup, MarkupPolicy::Basic);
        assert_eq!(config.initial_fragment.as_deref(), Some("#how-do-i-contact-support"));
        assert_eq!(config.controller_settings().debounce, Duration::from_millis(120));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = load(&[("FAQ_DEBOUNCE_MS", "soon")]).expect_err("bad debounce");
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("FAQ_DEBOUNCE_MS"));

        let err = load(&[("FAQ_ANSWER_MARKUP", "html")]).expect_err("bad markup");
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn blank_fragment_is_ignored() {
        let config = load(&[("FAQ_FRAGMENT", "   ")]).expect("config");
        assert!(config.initial_fragment.is_none());
    }
}
