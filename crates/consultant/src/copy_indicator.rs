use shared::MessageId;
use std::time::{Duration, Instant};

/// "Copied" marker for one message that clears itself after `ttl`.
/// Expiry is checked on read, so no timer task is needed.
#[derive(Debug, Clone)]
pub struct CopyIndicator {
    ttl: Duration,
    copied: Option<(MessageId, Instant)>,
}

impl CopyIndicator {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, copied: None }
    }

    pub fn mark(&mut self, id: MessageId) {
        self.copied = Some((id, Instant::now()));
    }

    pub fn is_copied(&self, id: MessageId) -> bool {
        self.current() == Some(id)
    }

    /// Message currently showing the marker, if it has not expired
    pub fn current(&self) -> Option<MessageId> {
        self.copied
            .filter(|(_, at)| at.elapsed() < self.ttl)
            .map(|(id, _)| id)
    }

    pub fn clear(&mut self) {
        self.copied = None;
    }
}

impl Default for CopyIndicator {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}
