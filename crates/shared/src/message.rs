//! Conversation messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent_api::{ChatTurn, TurnRole};
use crate::mode::Mode;

/// Identifier of a message within a session, increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Role in the provider's turn vocabulary
    pub fn turn_role(&self) -> TurnRole {
        match self {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Model,
        }
    }

    /// Speaker label shown above a message
    pub fn speaker_label(&self) -> &'static str {
        match self {
            Role::User => "Client Request",
            Role::Assistant => "E-Services Agency Response",
        }
    }
}

/// A single turn in the conversation. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Mode active when the message was created
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: MessageId, role: Role, content: impl Into<String>, mode: Mode) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            mode,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// `HH:MM` label for display
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role.turn_role(),
            text: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_assistant_maps_to_model_turn() {
        let msg = Message::new(MessageId(7), Role::Assistant, "Here is a plan", Mode::ShortPrompt);
        let turn = msg.to_turn();

        assert_eq!(turn.role, TurnRole::Model);
        assert_eq!(turn.text, "Here is a plan");
        assert_eq!(Role::User.turn_role(), TurnRole::User);
    }

    #[test]
    fn test_time_label() {
        let mut msg = Message::new(MessageId(1), Role::User, "hi", Mode::BusinessAgent);
        msg.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();

        assert_eq!(msg.time_label(), "07:05");
    }
}
