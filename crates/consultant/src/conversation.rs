//! Conversation store for the active session.
//!
//! Messages are kept in conversation order and are never edited or removed
//! individually; `reset` starts a fresh conversation.

use chrono::{DateTime, Utc};
use shared::agent_api::ChatTurn;
use shared::{Message, MessageId, Mode, Role};
use uuid::Uuid;

use crate::error::ConsultError;
use crate::generation::EMPTY_RESPONSE_TEXT;
use crate::mode::ModeController;

pub const DEFAULT_TITLE: &str = "New conversation";
const TITLE_CHARS: usize = 40;

pub struct ConversationStore {
    id: Uuid,
    title: String,
    messages: Vec<Message>,
    mode: ModeController,
    next_id: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationStore {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            mode: ModeController::default(),
            next_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn mode_controller(&self) -> &ModeController {
        &self.mode
    }

    /// Append a user message in the current mode. Blank text is rejected
    /// without touching the conversation.
    pub fn append_user_message(&mut self, text: &str) -> Result<&Message, ConsultError> {
        if text.trim().is_empty() {
            return Err(ConsultError::EmptyMessage);
        }
        if self.title == DEFAULT_TITLE {
            self.title = derive_title(text);
        }
        let mode = self.mode();
        Ok(self.push(Role::User, text.to_string(), mode))
    }

    /// Append an assistant message. Never fails; blank text is replaced by
    /// the apology so no message renders empty.
    pub fn append_assistant_message(&mut self, text: &str, mode: Mode) -> &Message {
        let content = if text.trim().is_empty() {
            EMPTY_RESPONSE_TEXT.to_string()
        } else {
            text.to_string()
        };
        self.push(Role::Assistant, content, mode)
    }

    /// Drop the conversation and return to the default mode
    pub fn reset(&mut self) {
        let now = Utc::now();
        self.id = Uuid::new_v4();
        self.title = DEFAULT_TITLE.to_string();
        self.messages.clear();
        self.mode.set_mode(Mode::default());
        self.created_at = now;
        self.updated_at = now;
    }

    /// Last `n` messages in provider turn shape, oldest first
    pub fn context_window(&self, n: usize) -> Vec<ChatTurn> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..].iter().map(Message::to_turn).collect()
    }

    fn push(&mut self, role: Role, content: String, mode: Mode) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.updated_at = Utc::now();
        self.messages.push(Message::new(id, role, content, mode));
        &self.messages[self.messages.len() - 1]
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_title(text: &str) -> String {
    let mut title = text
        .chars()
        .take(TITLE_CHARS)
        .collect::<String>()
        .trim()
        .to_string();
    if text.chars().count() > TITLE_CHARS {
        title.push_str("...");
    }
    title
}
