// ── Per-list request lifecycle flags ──
//
// Mirrors the pending/fulfilled/rejected lifecycle of one list: a loading
// flag, the last error and the last success message. Concurrent requests
// are not serialized; whichever finishes last wins.

use serde::Serialize;
use tokio::sync::watch;

/// Observable `{loading, error, success}` flags for one entity list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Owner of one `FetchState` channel.
pub(crate) struct FetchCell {
    tx: watch::Sender<FetchState>,
}

impl FetchCell {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(FetchState::default());
        Self { tx }
    }

    pub(crate) fn get(&self) -> FetchState {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.tx.subscribe()
    }

    /// Request started: set loading, clear the previous outcome.
    pub(crate) fn begin(&self) {
        self.tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.success = None;
        });
    }

    pub(crate) fn succeed(&self, message: Option<String>) {
        self.tx.send_modify(|s| s.success = message);
    }

    pub(crate) fn fail(&self, message: String) {
        self.tx.send_modify(|s| s.error = Some(message));
    }

    /// Final step, run whatever the outcome.
    pub(crate) fn finish(&self) {
        self.tx.send_modify(|s| s.loading = false);
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(FetchState::default());
    }
}
