//! Generation client: shapes one request per user turn and turns whatever
//! the provider does into a [`GenerationOutcome`].

use providers::{GenerationRequest, ProviderError, TextGenerator};
use shared::agent_api::ChatTurn;
use shared::events::FailureKind;
use shared::settings::ModelSettings;
use shared::Mode;
use std::sync::Arc;
use std::time::Instant;

use crate::prompts::{mode_hint, SYSTEM_INSTRUCTION};

pub const EMPTY_RESPONSE_TEXT: &str =
    "I apologize, but I could not generate a response at this time.";
pub const CREDENTIAL_ERROR_TEXT: &str = "Error: Invalid or missing API Key.";
pub const UNEXPECTED_ERROR_TEXT: &str = "An unexpected error occurred. Please try again later.";

/// Result of one generation call. Every variant renders to non-blank text.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Answer(String),
    /// Provider succeeded but returned no text
    Empty,
    Failed { kind: FailureKind, error: String },
}

impl GenerationOutcome {
    pub fn display_text(&self) -> &str {
        match self {
            GenerationOutcome::Answer(text) => text,
            GenerationOutcome::Empty => EMPTY_RESPONSE_TEXT,
            GenerationOutcome::Failed {
                kind: FailureKind::Credential,
                ..
            } => CREDENTIAL_ERROR_TEXT,
            GenerationOutcome::Failed {
                kind: FailureKind::Unexpected,
                ..
            } => UNEXPECTED_ERROR_TEXT,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            GenerationOutcome::Answer(text) => text,
            other => other.display_text().to_string(),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, GenerationOutcome::Answer(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            GenerationOutcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    fn from_provider(result: Result<String, ProviderError>) -> Self {
        match result {
            Ok(text) if text.trim().is_empty() => GenerationOutcome::Empty,
            Ok(text) => GenerationOutcome::Answer(text),
            Err(e) => {
                let kind = if e.is_credential_error() {
                    FailureKind::Credential
                } else {
                    FailureKind::Unexpected
                };
                GenerationOutcome::Failed {
                    kind,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Model id for a mode: advanced prompts get the pro model, the rest the fast one
pub fn model_for(mode: Mode, models: &ModelSettings) -> &str {
    match mode {
        Mode::AdvancedPrompt => &models.pro_model,
        Mode::BusinessAgent | Mode::ShortPrompt => &models.fast_model,
    }
}

/// History (oldest first) followed by the prompt with its mode hint
pub fn compose_turns(prompt: &str, mode: Mode, history: &[ChatTurn]) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.extend_from_slice(history);
    turns.push(ChatTurn::user(format!("{}{}", prompt, mode_hint(mode))));
    turns
}

#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn TextGenerator>,
    models: ModelSettings,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn TextGenerator>, models: ModelSettings) -> Self {
        Self { backend, models }
    }

    pub fn models(&self) -> &ModelSettings {
        &self.models
    }

    pub fn build_request(&self, prompt: &str, mode: Mode, history: &[ChatTurn]) -> GenerationRequest {
        GenerationRequest {
            model: model_for(mode, &self.models).to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: self.models.temperature,
            turns: compose_turns(prompt, mode, history),
        }
    }

    /// Single attempt. Provider errors are folded into the outcome, never returned.
    pub async fn generate_response(
        &self,
        prompt: &str,
        mode: Mode,
        history: &[ChatTurn],
    ) -> GenerationOutcome {
        let request = self.build_request(prompt, mode, history);
        let model = request.model.clone();
        let started = Instant::now();

        let outcome = GenerationOutcome::from_provider(self.backend.generate(request).await);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            GenerationOutcome::Failed { kind, error } => {
                tracing::warn!(
                    provider = self.backend.id(),
                    %model,
                    ?kind,
                    elapsed_ms,
                    "generation failed: {}",
                    error
                );
            }
            GenerationOutcome::Empty => {
                tracing::warn!(provider = self.backend.id(), %model, elapsed_ms, "empty response");
            }
            GenerationOutcome::Answer(text) => {
                tracing::debug!(%model, elapsed_ms, chars = text.len(), "generation finished");
            }
        }
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use anyhow::anyhow;

    fn client(fake: Arc<FakeGenerator>) -> GenerationClient {
        GenerationClient::new(fake, ModelSettings::default())
    }

    #[test]
    fn test_model_selection_is_two_way() {
        let models = ModelSettings::default();
        assert_eq!(model_for(Mode::AdvancedPrompt, &models), "gemini-3-pro-preview");
        assert_eq!(model_for(Mode::BusinessAgent, &models), "gemini-3-flash-preview");
        assert_eq!(model_for(Mode::ShortPrompt, &models), "gemini-3-flash-preview");
    }

    #[test]
    fn test_compose_turns_appends_hint_to_last_turn() {
        let history = vec![ChatTurn::user("Earlier question"), ChatTurn::model("Earlier answer")];
        let turns = compose_turns("Write a prompt", Mode::ShortPrompt, &history);

        assert_eq!(turns.len(), 3);
        assert_eq!(&turns[..2], &history[..]);
        assert_eq!(
            turns[2].text,
            format!("Write a prompt{}", mode_hint(Mode::ShortPrompt))
        );
        assert_eq!(turns[2].role, shared::agent_api::TurnRole::User);
    }

    #[tokio::test]
    async fn test_request_carries_instruction_and_temperature() {
        let fake = Arc::new(FakeGenerator::replying(&["Here is the plan."]));
        let outcome = client(fake.clone())
            .generate_response("Structure my pitch", Mode::AdvancedPrompt, &[])
            .await;

        assert_eq!(outcome, GenerationOutcome::Answer("Here is the plan.".into()));
        let req = fake.last_request().unwrap();
        assert_eq!(req.model, "gemini-3-pro-preview");
        assert_eq!(req.system_instruction, SYSTEM_INSTRUCTION);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.turns[0].text.starts_with("Structure my pitch\n[SYSTEM NOTE:"));
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_apology() {
        for blank in ["", "   \n"] {
            let fake = Arc::new(FakeGenerator::replying(&[blank]));
            let outcome = client(fake)
                .generate_response("Hi", Mode::BusinessAgent, &[])
                .await;

            assert_eq!(outcome, GenerationOutcome::Empty);
            assert_eq!(outcome.display_text(), EMPTY_RESPONSE_TEXT);
        }
    }

    #[tokio::test]
    async fn test_credential_failure_text() {
        let fake = Arc::new(FakeGenerator::failing(ProviderError::Other(anyhow!(
            "API key not valid. Please pass a valid API key."
        ))));
        let outcome = client(fake)
            .generate_response("Hi", Mode::BusinessAgent, &[])
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Credential));
        assert_eq!(outcome.into_text(), CREDENTIAL_ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_missing_credential_is_credential_failure() {
        let fake = Arc::new(FakeGenerator::failing(ProviderError::MissingCredential));
        let outcome = client(fake)
            .generate_response("Hi", Mode::ShortPrompt, &[])
            .await;

        assert_eq!(outcome.display_text(), CREDENTIAL_ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_other_failure_is_generic() {
        let fake = Arc::new(FakeGenerator::failing(ProviderError::Status {
            status: 503,
            detail: "The model is overloaded.".into(),
        }));
        let outcome = client(fake.clone())
            .generate_response("Hi", Mode::ShortPrompt, &[])
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Unexpected));
        assert_eq!(outcome.display_text(), UNEXPECTED_ERROR_TEXT);
        // single attempt
        assert_eq!(fake.call_count(), 1);
    }
}
