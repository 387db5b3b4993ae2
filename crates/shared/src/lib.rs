pub mod events;
pub mod logging;
pub mod message;
pub mod mode;
pub mod template;

pub use message::{Message, MessageId, Role};
pub use mode::Mode;
pub use template::{PromptTemplate, TemplateFilter};

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::env;
    use std::fmt;
    use zeroize::Zeroizing;

    /// Environment variables consulted for the API key, in order
    pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

    fn default_context_window() -> usize {
        6
    }

    fn default_copy_indicator_ms() -> u64 {
        2000
    }

    #[derive(Clone, Default, Serialize, Deserialize)]
    pub struct ProviderAuth {
        #[serde(default)]
        pub api_key: Option<Zeroizing<String>>,
    }

    impl ProviderAuth {
        pub fn with_key(key: impl Into<String>) -> Self {
            Self {
                api_key: Some(Zeroizing::new(key.into())),
            }
        }

        /// Configured key, else the first non-empty environment variable
        pub fn resolve(&self) -> Option<Zeroizing<String>> {
            if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
                return Some(key.clone());
            }
            API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| env::var(name).ok())
                .find(|v| !v.trim().is_empty())
                .map(Zeroizing::new)
        }
    }

    impl fmt::Debug for ProviderAuth {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ProviderAuth")
                .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
                .finish()
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelSettings {
        pub fast_model: String, // business agent + short prompt
        pub pro_model: String,  // advanced prompt
        pub temperature: f32,
        pub base_url: String,
        pub request_timeout_secs: u64,
    }

    impl Default for ModelSettings {
        fn default() -> Self {
            Self {
                fast_model: "gemini-3-flash-preview".into(),
                pro_model: "gemini-3-pro-preview".into(),
                temperature: 0.7,
                base_url: "https://generativelanguage.googleapis.com".into(),
                request_timeout_secs: 45,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ConsultSettings {
        pub model: ModelSettings,
        #[serde(default)]
        pub auth: ProviderAuth,
        /// Number of trailing messages sent as history
        #[serde(default = "default_context_window")]
        pub context_window: usize,
        /// How long a copied message shows its indicator
        #[serde(default = "default_copy_indicator_ms")]
        pub copy_indicator_ms: u64,
    }

    impl Default for ConsultSettings {
        fn default() -> Self {
            Self {
                model: ModelSettings::default(),
                auth: ProviderAuth::default(),
                context_window: default_context_window(),
                copy_indicator_ms: default_copy_indicator_ms(),
            }
        }
    }

    impl ConsultSettings {
        /// Defaults with the credential taken from the environment.
        /// A missing key is not an error here; requests fail individually.
        pub fn from_env() -> Self {
            let mut settings = Self::default();
            settings.auth.api_key = settings.auth.resolve();
            settings
        }
    }
}

pub mod agent_api {
    use serde::{Deserialize, Serialize};

    /// Turn roles in the provider's vocabulary
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TurnRole {
        User,
        Model,
    }

    impl TurnRole {
        pub fn as_str(&self) -> &'static str {
            match self {
                TurnRole::User => "user",
                TurnRole::Model => "model",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChatTurn {
        pub role: TurnRole,
        pub text: String,
    }

    impl ChatTurn {
        pub fn user(text: impl Into<String>) -> Self {
            Self {
                role: TurnRole::User,
                text: text.into(),
            }
        }

        pub fn model(text: impl Into<String>) -> Self {
            Self {
                role: TurnRole::Model,
                text: text.into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::settings::*;

    #[test]
    fn test_default_settings() {
        let settings = ConsultSettings::default();
        assert_eq!(settings.context_window, 6);
        assert_eq!(settings.copy_indicator_ms, 2000);
        assert!((settings.model.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(settings.model.pro_model, "gemini-3-pro-preview");
    }

    #[test]
    fn test_configured_key_wins_and_is_redacted() {
        let auth = ProviderAuth::with_key("secret-key");
        assert_eq!(auth.resolve().as_deref().map(|s| s.as_str()), Some("secret-key"));
        assert!(!format!("{:?}", auth).contains("secret-key"));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = serde_json::json!({
            "model": {
                "fast_model": "flash",
                "pro_model": "pro",
                "temperature": 0.2,
                "base_url": "http://localhost:8080",
                "request_timeout_secs": 5
            }
        });
        let settings: ConsultSettings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.context_window, 6);
        assert!(settings.auth.api_key.is_none());
        assert_eq!(settings.model.fast_model, "flash");
    }
}
