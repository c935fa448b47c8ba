//! Cancellation signals.
//!
//! An [`AbortController`] owns the trigger; every [`AbortSignal`] handed out
//! by it observes the same state. The pipeline only carries the signal to the
//! transport, which decides how to honour it.

use std::sync::Arc;

use tokio::sync::watch;

/// Trigger side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct AbortController {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    /// Create a controller in the non-aborted state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// A signal observing this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Abort. Idempotent.
    pub fn abort(&self) {
        self.sender.send_replace(true);
    }

    /// `true` once [`AbortController::abort`] was called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Observer side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    receiver: watch::Receiver<bool>,
}

impl AbortSignal {
    /// `true` once the controller aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves when the controller aborts.
    ///
    /// Never resolves if the controller is dropped without aborting.
    pub async fn aborted(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
