// crates/provision-gate-core/src/runtime/cancel.rs
// ============================================================================
// Module: Cancellation
// Description: Watch-channel cancellation token for pipeline aborts.
// Purpose: Stop gate polling promptly and prevent further minting on abort.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! Operator aborts are delivered through a watch channel. Tokens are cheap
//! to clone and observe the signal at the pipeline's suspension points.
//! Instances already minted are left untouched; cancellation never rolls a
//! mint back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::watch;

// ============================================================================
// SECTION: Cancel Source
// ============================================================================

/// Owning side of a cancellation signal.
///
/// # Invariants
/// - The signal latches: once cancelled, every token observes it forever.
#[derive(Debug)]
pub struct CancelSource {
    /// Channel sender holding the latched flag.
    tx: watch::Sender<bool>,
}

impl CancelSource {
    /// Creates a new, un-cancelled source.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Latches the cancellation signal.
    pub fn cancel(&self) {
        // Send only fails when no receivers exist, which is harmless here.
        let _ = self.tx.send(true);
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Cancel Token
// ============================================================================

/// Observer side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    /// Channel receiver observing the latched flag.
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Returns a token that can never be cancelled.
    ///
    /// Useful for callers that run a pipeline without an abort path.
    #[must_use]
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Keeping the sender alive forever would require storage; dropping it
        // is fine because `cancelled` treats a closed channel as never-fires.
        drop(tx);
        Self { rx }
    }

    /// Returns true when cancellation has been signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation is signalled; never resolves otherwise.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Source dropped without signalling; stay pending forever.
                std::future::pending::<()>().await;
            }
        }
    }
}
