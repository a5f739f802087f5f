//! View-scoped task lifetime
//!
//! Remote calls issued by a view run under its [`TaskScope`]. Once the view
//! is torn down the scope is cancelled: pending calls stop being awaited and
//! their results are never applied to the store.

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The scope was cancelled before the work finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task scope cancelled")]
pub struct Cancelled;

/// Cancellation boundary for one view
#[derive(Debug, Clone, Default)]
pub struct TaskScope {
    token: CancellationToken,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Await `future` unless the scope is cancelled first
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        }
    }
}
