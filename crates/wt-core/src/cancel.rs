//! Cooperative cancellation for the tick loop and forecast workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap, cloneable cancellation flag.
///
/// Pausing the live loop cancels its token; resuming constructs a fresh
/// one.  Each forecast worker gets its own token, cancelled when a newer
/// forecast supersedes it.  Tokens only ever transition from "live" to
/// "cancelled" — there is no reset.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag.  Idempotent.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
