//! Cooperative cancellation tokens for scheduled tasks.
//!
//! [`CancellationToken`] is a cloneable signal that the
//! [`FrameScheduler`](crate::FrameScheduler) checks before running a task.
//! A cancelled task is dropped without running again.
//!
//! Transitions are fire-and-forget by default: a token nobody cancels changes
//! nothing, and dropping the [`CancellationSource`] does not cancel.
//!
//! # Example
//!
//! ```
//! use loury_core::cancellation::CancellationSource;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(!token.is_cancelled());
//! source.cancel();
//! assert!(token.is_cancelled());
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation token.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel its tokens.
#[derive(Default)]
pub struct CancellationSource {
    inner: Arc<AtomicBool>,
}

impl CancellationSource {
    /// Create a new cancellation source with an uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a cloneable token that observes this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Signal cancellation to every token derived from this source.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    /// Whether cancellation has already been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl CancellationToken {
    /// A token that is never cancelled unless [`cancel`](Self::cancel) is
    /// called on it or one of its clones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Cancel through the token itself.
    ///
    /// Transition handles hand out the token directly, so the holder can
    /// stop the transition without keeping a separate source around.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
