//! Debounce scheduler - coalesces bursts of triggers into one delayed action.
//!
//! ```text
//! Idle --schedule--> Pending --schedule--> Pending (previous timer cancelled)
//! Pending --quiet period elapses--> Idle (action fired)
//! Idle | Pending --dispose--> Disposed (no further firings)
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Observable state of a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
    Disposed,
}

#[derive(Debug)]
enum Slot {
    Idle,
    Pending { generation: u64, token: CancellationToken },
    Disposed,
}

#[derive(Debug)]
struct Inner {
    slot: Slot,
    next_generation: u64,
}

/// Delays an action until no new trigger arrived for the quiet period.
///
/// At most one action is pending per instance. Dropping the debouncer
/// disposes it. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    inner: Arc<Mutex<Inner>>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            inner: Arc::new(Mutex::new(Inner {
                slot: Slot::Idle,
                next_generation: 0,
            })),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn state(&self) -> DebounceState {
        match lock(&self.inner).slot {
            Slot::Idle => DebounceState::Idle,
            Slot::Pending { .. } => DebounceState::Pending,
            Slot::Disposed => DebounceState::Disposed,
        }
    }

    /// Arms the timer for `action`, replacing any pending one.
    ///
    /// `action` is not polled before the quiet period elapses. Ignored once
    /// the debouncer is disposed.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = {
            let mut inner = lock(&self.inner);
            match &inner.slot {
                Slot::Disposed => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("debouncer disposed, schedule ignored");
                    return;
                }
                Slot::Pending { token: previous, .. } => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("replacing pending debounced action");
                    previous.cancel();
                }
                Slot::Idle => {}
            }
            let generation = inner.next_generation;
            inner.next_generation = generation.wrapping_add(1);
            inner.slot = Slot::Pending {
                generation,
                token: token.clone(),
            };
            generation
        };

        let inner = Arc::clone(&self.inner);
        let deadline = Instant::now() + self.quiet_period;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }

            {
                let mut inner = lock(&inner);
                let still_current = matches!(
                    inner.slot,
                    Slot::Pending { generation: current, .. } if current == generation
                );
                if !still_current {
                    return;
                }
                inner.slot = Slot::Idle;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!("quiet period elapsed, firing debounced action");
            action.await;
        });
    }

    /// Drops the pending action, if any, without disposing.
    pub fn cancel(&self) {
        let mut inner = lock(&self.inner);
        if let Slot::Pending { token, .. } = &inner.slot {
            token.cancel();
            inner.slot = Slot::Idle;
        }
    }

    /// Cancels the pending action and refuses every later `schedule`.
    pub fn dispose(&self) {
        let mut inner = lock(&self.inner);
        if let Slot::Pending { token, .. } = &inner.slot {
            token.cancel();
        }
        if !matches!(inner.slot, Slot::Disposed) {
            #[cfg(feature = "tracing")]
            tracing::trace!("debouncer disposed");
            inner.slot = Slot::Disposed;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.dispose();
    }
}
