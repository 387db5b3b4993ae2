//! Consultant - business-strategy and prompt-engineering chat core
//!
//! This crate provides:
//! - A conversation store with a bounded context window
//! - Mode control (business agent, short prompt, advanced prompt)
//! - Request shaping for the hosted generation model, with fixed fallback texts
//! - The built-in prompt template catalog
//! - [`ConsultSession`], the handle a front end drives

pub mod conversation;
pub mod copy_indicator;
pub mod error;
pub mod generation;
pub mod mode;
pub mod prompts;
pub mod session;
pub mod templates;

pub use conversation::ConversationStore;
pub use error::ConsultError;
pub use generation::{GenerationClient, GenerationOutcome};
pub use mode::ModeController;
pub use prompts::{mode_hint, SYSTEM_INSTRUCTION};
pub use session::{ConsultSession, Reply};
pub use templates::{filter_templates, TemplateCatalog};
