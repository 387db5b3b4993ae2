use shared::MessageId;

/// Consultation error types
#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A response is already being generated")]
    RequestInFlight,

    #[error("Template not found: {template_id}")]
    UnknownTemplate { template_id: String },

    #[error("Message not found: {message_id}")]
    UnknownMessage { message_id: MessageId },

    #[error("Provider setup failed: {0}")]
    Provider(#[from] providers::ProviderError),
}
