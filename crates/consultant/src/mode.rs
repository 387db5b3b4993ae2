use shared::Mode;
use tokio::sync::watch;

/// Holds the active mode and notifies subscribers when it changes
#[derive(Debug)]
pub struct ModeController {
    tx: watch::Sender<Mode>,
}

impl ModeController {
    pub fn new(initial: Mode) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Mode {
        *self.tx.borrow()
    }

    /// Replace the mode. Returns the previous one.
    pub fn set_mode(&self, mode: Mode) -> Mode {
        let previous = self.tx.send_replace(mode);
        if previous != mode {
            tracing::debug!(from = %previous, to = %mode, "mode changed");
        }
        previous
    }

    pub fn subscribe(&self) -> watch::Receiver<Mode> {
        self.tx.subscribe()
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_mode_is_total_and_idempotent() {
        let controller = ModeController::default();
        assert_eq!(controller.current(), Mode::BusinessAgent);

        for mode in Mode::all() {
            controller.set_mode(*mode);
            assert_eq!(controller.set_mode(*mode), *mode);
            assert_eq!(controller.current(), *mode);
        }
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let controller = ModeController::default();
        let mut rx = controller.subscribe();

        controller.set_mode(Mode::AdvancedPrompt);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Mode::AdvancedPrompt);
    }
}
