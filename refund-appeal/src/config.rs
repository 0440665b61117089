use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_VAR: &str = "REFUND_APPEAL_MODEL";
pub const BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";
pub const MAX_TOKENS_VAR: &str = "REFUND_APPEAL_MAX_TOKENS";

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Settings for talking to the inference service, read once at startup
#[derive(Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_tokens: get(MAX_TOKENS_VAR)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        require_credential(self.api_key.as_deref())
    }
}

/// The one place a missing or unset API key becomes [`ConfigError::MissingCredential`].
pub fn require_credential(api_key: Option<&str>) -> Result<&str, ConfigError> {
    api_key.ok_or_else(|| ConfigError::MissingCredential(API_KEY_VAR.to_string()))
}

// Keep the key out of logs
impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AnalysisConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AnalysisConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(
            config.require_api_key(),
            Err(ConfigError::MissingCredential(API_KEY_VAR.to_string()))
        );
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (API_KEY_VAR, "sk-or-test"),
            (MODEL_VAR, "anthropic/claude-sonnet-4"),
            (BASE_URL_VAR, "http://localhost:8080/v1/"),
            (MAX_TOKENS_VAR, "1234"),
        ]);
        assert_eq!(config.require_api_key(), Ok("sk-or-test"));
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.max_tokens, 1234);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = config(&[(API_KEY_VAR, "   "), (MAX_TOKENS_VAR, "lots")]);
        assert!(config.require_api_key().is_err());
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_require_credential() {
        assert_eq!(require_credential(Some("sk-or-test")), Ok("sk-or-test"));
        assert_eq!(
            require_credential(None),
            Err(ConfigError::MissingCredential(API_KEY_VAR.to_string()))
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let config = config(&[(API_KEY_VAR, "sk-or-secret")]);
        assert!(!format!("{:?}", config).contains("sk-or-secret"));
    }
}
