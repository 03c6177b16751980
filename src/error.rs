//! Error types for surface pool operations.
//!
//! Every failure the pool can report means the same thing to the caller: no
//! surface this frame. The variants carry enough context to log why.

use static_assertions;
use thiserror::Error;

use crate::surface::{BufferId, SurfaceSize};

/// Result type alias for surface pool operations.
pub type Result<T> = std::result::Result<T, SurfacePoolError>;

/// Error type for surface pool operations.
///
/// Capacity overflow on recycle and completion signals for untracked
/// surfaces are not errors and never surface here.
#[derive(Debug, Error)]
pub enum SurfacePoolError {
    /// The factory could not allocate a surface of the requested size.
    #[error("Could not create a {size} surface")]
    CreationFailed {
        /// Requested size
        size: SurfaceSize,
    },

    /// The factory returned a surface that failed its own validity check.
    ///
    /// The surface is discarded and never cached.
    #[error("Created {size} surface is not valid")]
    InvalidSurface {
        /// Requested size
        size: SurfaceSize,
    },

    /// Flushing queued acquire/release synchronization failed.
    ///
    /// The surface that failed is discarded rather than returned to the
    /// available set, since it is in an unknown state.
    #[error("Could not flush acquire/release events for buffer {id}")]
    FlushFailed {
        /// Buffer that failed its readiness step
        id: BufferId,
    },

    /// Pool configuration is inconsistent.
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// Pool mutex is poisoned.
    ///
    /// A thread panicked while holding the pool lock. The pool cannot be
    /// safely used after this.
    #[error("Surface pool mutex is poisoned")]
    Poisoned,
}

static_assertions::assert_impl_all!(SurfacePoolError: Send, Sync);
