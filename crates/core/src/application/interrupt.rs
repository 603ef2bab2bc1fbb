// Interrupt Token
// Broadcasts an operator interrupt (Ctrl+C, SIGTERM) to every waiting phase

use std::sync::Arc;
use tokio::sync::watch;

/// Receiving side: cheap to clone, one per waiter
#[derive(Clone)]
pub struct InterruptToken {
    rx: watch::Receiver<bool>,
    // Sender kept alive by `never()` tokens
    _hold: Option<Arc<watch::Sender<bool>>>,
}

impl InterruptToken {
    /// Check if an interrupt was requested
    pub fn is_interrupted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once an interrupt is requested (immediately if it already was).
    /// Never resolves if every sender is dropped without interrupting.
    pub async fn interrupted(&mut self) {
        if self.rx.wait_for(|flag| *flag).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// A token that never fires (for callers with no interrupt source)
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            rx,
            _hold: Some(Arc::new(tx)),
        }
    }
}

/// Sending side, owned by the signal listener
pub struct InterruptSender {
    tx: watch::Sender<bool>,
}

impl InterruptSender {
    /// Signal every token
    pub fn interrupt(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create an interrupt channel
pub fn interrupt_channel() -> (InterruptSender, InterruptToken) {
    let (tx, rx) = watch::channel(false);
    (InterruptSender { tx }, InterruptToken { rx, _hold: None })
}
