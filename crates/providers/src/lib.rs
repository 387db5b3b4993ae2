//! Providers - text-generation backends
//!
//! A backend takes a fully shaped [`GenerationRequest`] and returns the
//! model's text. Request shaping (model choice, instructions, history) lives
//! with the caller.

pub mod gemini;

use async_trait::async_trait;
use shared::agent_api::ChatTurn;

pub use gemini::GeminiClient;

/// One generation call, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub temperature: f32,
    /// History oldest first, the new user turn last
    pub turns: Vec<ChatTurn>,
}

/// Provider error types
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Authentication rejected ({status}): {detail}")]
    Unauthorized { status: u16, detail: String },

    #[error("Provider returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Marker providers put in messages about bad or absent keys
const CREDENTIAL_MARKER: &str = "API key";

impl ProviderError {
    /// True when the failure is about the credential rather than the request
    pub fn is_credential_error(&self) -> bool {
        match self {
            ProviderError::MissingCredential | ProviderError::Unauthorized { .. } => true,
            other => other.to_string().contains(CREDENTIAL_MARKER),
        }
    }
}

/// Trait for text-generation backends
///
/// Note: Uses async_trait for object safety
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Send one request. Empty text is a valid answer.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}
