//! Session event types and the in-memory event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::message::{MessageId, Role};
use crate::mode::Mode;

/// Why a generation request did not produce an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Missing or rejected API credential
    Credential,
    /// Anything else: transport, provider status, malformed body
    Unexpected,
}

/// Something that happened in a consultation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    MessageAppended {
        message_id: MessageId,
        role: Role,
    },
    /// Generation request sent to the provider
    GenerationStarted {
        request_id: Uuid,
        mode: Mode,
        model: String,
        history_len: usize,
    },
    /// Provider answered (possibly with empty text)
    GenerationFinished {
        request_id: Uuid,
        duration_ms: u64,
        empty: bool,
    },
    GenerationFailed {
        request_id: Uuid,
        kind: FailureKind,
        error: String,
        duration_ms: u64,
    },
    /// Reply arrived after the conversation it belonged to was reset
    ReplyDiscarded {
        request_id: Uuid,
    },
    TemplateSelected {
        template_id: String,
        mode: Mode,
    },
    ConversationReset {
        conversation_id: Uuid,
    },
}

impl SessionEvent {
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            SessionEvent::GenerationStarted { request_id, .. }
            | SessionEvent::GenerationFinished { request_id, .. }
            | SessionEvent::GenerationFailed { request_id, .. }
            | SessionEvent::ReplyDiscarded { request_id } => Some(*request_id),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SessionEvent::GenerationFailed { .. })
    }
}

/// Timestamped log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: SessionEvent,
}

impl EventEntry {
    pub fn new(event: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Filter for querying the event log
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only generation failures
    pub failures_only: bool,
    /// Only events of one request
    pub request_id: Option<Uuid>,
    /// Start time (inclusive)
    pub from: Option<DateTime<Utc>>,
    /// Maximum entries to return (most recent kept)
    pub limit: Option<usize>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(mut self) -> Self {
        self.failures_only = true;
        self
    }

    pub fn request(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn accepts(&self, entry: &EventEntry) -> bool {
        if self.failures_only && !entry.event.is_failure() {
            return false;
        }
        if let Some(id) = self.request_id {
            if entry.event.request_id() != Some(id) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.timestamp < from {
                return false;
            }
        }
        true
    }
}

/// Bounded event log; the oldest entries fall off first
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
    capacity: usize,
}

pub const DEFAULT_EVENT_CAPACITY: usize = 500;

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, event: SessionEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(EventEntry::new(event));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter()
    }

    pub fn query(&self, filter: &EventFilter) -> Vec<EventEntry> {
        let mut matched: Vec<EventEntry> = self
            .entries
            .iter()
            .filter(|e| filter.accepts(e))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            let skip = matched.len().saturating_sub(limit);
            matched.drain(..skip);
        }
        matched
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::with_capacity(2);
        for template_id in ["a", "b", "c"] {
            log.record(SessionEvent::TemplateSelected {
                template_id: template_id.into(),
                mode: Mode::ShortPrompt,
            });
        }

        assert_eq!(log.len(), 2);
        let first = log.entries().next().unwrap();
        assert!(matches!(
            &first.event,
            SessionEvent::TemplateSelected { template_id, .. } if template_id == "b"
        ));
    }

    #[test]
    fn test_filter_failures_for_request() {
        let request_id = Uuid::new_v4();
        let mut log = EventLog::new();
        log.record(SessionEvent::GenerationStarted {
            request_id,
            mode: Mode::BusinessAgent,
            model: "gemini-3-flash-preview".into(),
            history_len: 0,
        });
        log.record(SessionEvent::GenerationFailed {
            request_id,
            kind: FailureKind::Credential,
            error: "API key not valid".into(),
            duration_ms: 12,
        });
        log.record(SessionEvent::GenerationFailed {
            request_id: Uuid::new_v4(),
            kind: FailureKind::Unexpected,
            error: "timeout".into(),
            duration_ms: 45_000,
        });

        let failures = log.query(&EventFilter::new().failures().request(request_id));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].event.request_id(), Some(request_id));

        let last = log.query(&EventFilter::new().limit(1));
        assert!(matches!(
            last[0].event,
            SessionEvent::GenerationFailed {
                kind: FailureKind::Unexpected,
                ..
            }
        ));
    }
}
