//! Capability set the pool consumes from the graphics layer.
//!
//! The pool never touches pixels, fences or device memory. It sees a surface
//! only through the [`Surface`] trait and allocates new ones only through a
//! [`SurfaceFactory`], so the real Vulkan (or any other) implementation stays
//! outside this crate.

use std::fmt;

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SurfaceSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SurfaceSize {
    /// Create a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this size.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for SurfaceSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Identifier handed to the factory for every surface it creates.
///
/// Ids come from a counter owned by each pool, start at 1 and increase
/// monotonically. The id is also the key under which a submitted surface is
/// tracked until its writes finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-shot hook invoked once all writes into a submitted surface are done.
pub type WritesFinished = Box<dyn FnOnce() + Send + 'static>;

/// A GPU-backed render target of fixed size.
///
/// Implementations own their device resources and synchronization
/// primitives. Validity and age are snapshots: an implementation may flip
/// validity from another thread (for example when a fence reset fails) as
/// long as it synchronizes internally.
pub trait Surface: Send + 'static {
    /// Id the factory was given when this surface was created.
    fn buffer_id(&self) -> BufferId;

    /// Whether the surface can still be rendered into and cached.
    fn is_valid(&self) -> bool;

    /// Logical size. Never changes for the lifetime of the surface.
    fn size(&self) -> SurfaceSize;

    /// Bytes of device memory backing the surface.
    fn allocation_size(&self) -> usize;

    /// Advance the idle age by one tick and return the new age.
    fn advance_and_get_age(&mut self) -> u32;

    /// Whether the backing allocation is larger than `size()` requires.
    fn is_oversized(&self) -> bool;

    /// Whether recent uses of this surface all requested the same size.
    fn has_stable_size_history(&self) -> bool;

    /// Flush queued compositor acquire/release synchronization.
    ///
    /// This is the readiness step before a surface is handed out, so
    /// implementations also reset their age to zero here. Returns `false` if
    /// the flush failed.
    fn flush_pending_sync(&mut self) -> bool;

    /// Register the hook to run once all writes into this surface finish.
    ///
    /// The hook may run on any thread, at any later point, or immediately
    /// from inside this call.
    fn on_writes_finished(&mut self, callback: WritesFinished);
}

/// Resource usage reported by the graphics layer's own resource cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCacheUsage {
    /// Number of resources held by the cache
    pub resources: usize,
    /// Bytes held by the cache
    pub bytes: usize,
    /// Bytes the cache could release on demand
    pub purgeable_bytes: usize,
}

/// Allocation context that produces surfaces.
pub trait SurfaceFactory: Send + 'static {
    /// Concrete surface type produced by this factory.
    type Surface: Surface;

    /// Allocate a surface of `size` tagged with `id`.
    ///
    /// Returns `None` if the allocation fails.
    fn create(&mut self, size: SurfaceSize, id: BufferId) -> Option<Self::Surface>;

    /// Current usage of the graphics layer's resource cache.
    fn cache_usage(&self) -> ResourceCacheUsage {
        ResourceCacheUsage::default()
    }
}
