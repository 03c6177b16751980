//! # surface-pool: reusable GPU surfaces for frame producers
//!
//! Creating a GPU-backed render surface is expensive: driver allocation,
//! shared-memory negotiation with a compositor, image and fence setup.
//! Destroying one too eagerly wastes that cost on the next frame. This crate
//! keeps a bounded cache of retired surfaces and hands them back out by exact
//! size, while tracking surfaces the compositor is still reading from and
//! reclaiming ones that went stale or grew oversized.
//!
//! ## Lifecycle
//!
//! 1. [`SurfacePool::acquire`] returns a cached surface of the exact size,
//!    or creates one through the [`SurfaceFactory`].
//! 2. The caller renders and then [`SurfacePool::submit`]s the surface. The
//!    pool registers a completion hook on it and keeps it in its pending map.
//! 3. When the surface signals that its writes have finished, the hook moves
//!    it back into the available set (or drops it when invalid or the set is
//!    full).
//! 4. [`SurfacePool::age_and_collect`] runs once per frame, evicting surfaces
//!    idle for too long and right-sizing one oversized surface.
//!    [`SurfacePool::shrink_to_fit`] right-sizes all of them on demand, for
//!    low-memory or backgrounding events.
//!
//! ## Example
//!
//! ```rust
//! use surface_pool::{BufferId, Surface, SurfaceFactory, SurfacePool, SurfaceSize, WritesFinished};
//!
//! struct Image {
//!     id: BufferId,
//!     size: SurfaceSize,
//!     age: u32,
//! }
//!
//! impl Surface for Image {
//!     fn buffer_id(&self) -> BufferId { self.id }
//!     fn is_valid(&self) -> bool { true }
//!     fn size(&self) -> SurfaceSize { self.size }
//!     fn allocation_size(&self) -> usize { self.size.area() as usize * 4 }
//!     fn advance_and_get_age(&mut self) -> u32 { self.age += 1; self.age }
//!     fn is_oversized(&self) -> bool { false }
//!     fn has_stable_size_history(&self) -> bool { true }
//!     fn flush_pending_sync(&mut self) -> bool { self.age = 0; true }
//!     // Writes are synchronous here, so the hook runs right away.
//!     fn on_writes_finished(&mut self, callback: WritesFinished) { callback() }
//! }
//!
//! struct Images;
//!
//! impl SurfaceFactory for Images {
//!     type Surface = Image;
//!
//!     fn create(&mut self, size: SurfaceSize, id: BufferId) -> Option<Image> {
//!         Some(Image { id, size, age: 0 })
//!     }
//! }
//!
//! # fn main() -> surface_pool::Result<()> {
//! let pool = SurfacePool::new(Images);
//!
//! let surface = pool.acquire(SurfaceSize::new(640, 480))?;
//! let id = surface.buffer_id();
//! pool.submit(surface)?;
//!
//! // The same surface comes back for the next frame.
//! let again = pool.acquire(SurfaceSize::new(640, 480))?;
//! assert_eq!(again.buffer_id(), id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! Pool operations take `&self` and serialize on one internal mutex.
//! Completion hooks may fire on any thread, or synchronously inside
//! [`Surface::on_writes_finished`]. Hooks hold only a weak reference to the
//! pool: signals arriving after the pool is dropped are ignored.
//!
//! ## Logging
//!
//! Events are emitted with `tracing` under the `surface_pool` target, and the
//! per-period statistics under `surface_pool::stats`. See [`logging`].

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod surface;

pub use config::{ConfigBuilder, LoggingConfig, PoolConfig};
pub use error::{Result, SurfacePoolError};
pub use logging::LogLevel;
pub use pool::{PoolStats, SurfacePool};
pub use surface::{
    BufferId, ResourceCacheUsage, Surface, SurfaceFactory, SurfaceSize, WritesFinished,
};
