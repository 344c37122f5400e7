use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crate::error::{Error, Result};

/// Cancellation scope passed to every capability call.
///
/// Clones share the same cancel flag, so cancelling any clone cancels all of
/// them. A context may also carry a deadline, after which it reports itself
/// as cancelled.
#[derive(Clone, Debug, Default)]
pub struct Context {
    canceled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled unless [`Context::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeout too large to be represented as an [`Instant`] means no
    /// deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::new(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            canceled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst) || self.is_expired()
    }

    fn is_expired(&self) -> bool {
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Returns [`Error::Canceled`] if this context has been cancelled or its
    /// deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.canceled.load(Ordering::SeqCst) {
            return Err(Error::Canceled {
                message: "context canceled".into(),
            });
        }
        if self.is_expired() {
            return Err(Error::Canceled {
                message: "context deadline exceeded".into(),
            });
        }
        Ok(())
    }
}
