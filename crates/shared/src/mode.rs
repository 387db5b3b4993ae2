//! Conversation modes.
//!
//! Each mode is a distinct consultant behaviour: it decides which model
//! variant answers, which hint is attached to the user's text and what shape
//! the answer is expected to take.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three consultation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Strategy, ideas, analysis, operations and planning
    #[default]
    BusinessAgent,
    /// A single copy-ready prompt for quick execution
    ShortPrompt,
    /// A structured professional prompt
    AdvancedPrompt,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::BusinessAgent, Mode::ShortPrompt, Mode::AdvancedPrompt]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::BusinessAgent => "BUSINESS_AGENT",
            Mode::ShortPrompt => "SHORT_PROMPT",
            Mode::AdvancedPrompt => "ADVANCED_PROMPT",
        }
    }

    /// Header title shown while the mode is active
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::BusinessAgent => "AI Business Consultation",
            Mode::ShortPrompt => "Short Prompt System",
            Mode::AdvancedPrompt => "Advanced Prompt Engineering",
        }
    }

    /// Short label for message badges and picker tabs
    pub fn badge(&self) -> &'static str {
        match self {
            Mode::BusinessAgent => "Business Agent",
            Mode::ShortPrompt => "Short Prompt",
            Mode::AdvancedPrompt => "Advanced Prompt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUSINESS_AGENT" => Ok(Mode::BusinessAgent),
            "SHORT_PROMPT" => Ok(Mode::ShortPrompt),
            "ADVANCED_PROMPT" => Ok(Mode::AdvancedPrompt),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
