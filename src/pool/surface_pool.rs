//! The public pool type.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, instrument, warn};

use crate::config::PoolConfig;
use crate::error::{Result, SurfacePoolError};
use crate::logging::{self, TARGET};
use crate::surface::{BufferId, Surface, SurfaceFactory, SurfaceSize};

use super::{recycle_pending, PoolInner, PoolStats};

/// Bounded cache of reusable surfaces.
///
/// One owner (typically the rasterizer thread) acquires, submits and runs
/// maintenance. Completion hooks registered on submitted surfaces may fire
/// from any thread; they only ever reach the pool through a weak reference,
/// so a surface never keeps its pool alive.
///
/// # Examples
///
/// ```rust,ignore
/// let pool = SurfacePool::new(factory);
///
/// // Per frame:
/// let surface = pool.acquire(SurfaceSize::new(1920, 1080))?;
/// // ... record draws into `surface` ...
/// pool.submit(surface)?;
/// pool.age_and_collect()?;
/// ```
pub struct SurfacePool<F: SurfaceFactory> {
    pub(super) inner: Arc<Mutex<PoolInner<F>>>,
    config: PoolConfig,
}

impl<F: SurfaceFactory> SurfacePool<F> {
    /// Create a pool with the default configuration.
    pub fn new(factory: F) -> Self {
        let config = PoolConfig::default();
        Self {
            inner: Arc::new(Mutex::new(PoolInner::new(factory, config.max_surfaces))),
            config,
        }
    }

    /// Create a pool with a custom configuration.
    ///
    /// When `config.logging` is enabled, installs the global `tracing`
    /// subscriber unless one is already set.
    ///
    /// # Errors
    ///
    /// Returns [`SurfacePoolError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn with_config(factory: F, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        // Leaves an existing subscriber in place.
        if config.logging.enabled && !logging::init(&config.logging) {
            debug!(target: TARGET, "subscriber already installed, keeping it");
        }

        Ok(Self {
            inner: Arc::new(Mutex::new(PoolInner::new(factory, config.max_surfaces))),
            config,
        })
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get a surface of exactly `size`, reusing a cached one when possible.
    ///
    /// The surface is flushed before it is returned.
    ///
    /// # Errors
    ///
    /// Any error means no surface is available this frame; the caller
    /// should skip the frame and may retry on the next one.
    #[instrument(level = "trace", target = "surface_pool", skip_all, fields(size = %size))]
    pub fn acquire(&self, size: SurfaceSize) -> Result<F::Surface> {
        let (mut surface, cached) = self.cached_or_create(size).map_err(|e| {
            debug!(target: TARGET, %size, "could not acquire surface: {}", e);
            e
        })?;

        if !surface.flush_pending_sync() {
            let id = surface.buffer_id();
            error!(target: TARGET, buffer_id = %id, "could not flush acquire/release events for buffer");
            return Err(SurfacePoolError::FlushFailed { id });
        }

        // Only a hit that is actually handed out counts as reuse.
        if cached {
            PoolInner::lock(&self.inner)?.reused += 1;
        }
        Ok(surface)
    }

    /// Returns the surface and whether it came from the cache.
    fn cached_or_create(&self, size: SurfaceSize) -> Result<(F::Surface, bool)> {
        let mut inner = PoolInner::lock(&self.inner)?;
        match inner.take_cached(size) {
            Some(surface) => Ok((surface, true)),
            None => inner.create_surface(size).map(|surface| (surface, false)),
        }
    }

    /// Hand a surface back once all draws into it have been issued.
    ///
    /// The pool tracks the surface until its writes finish, then recycles
    /// it. Submitting a surface whose id is already pending drops the new
    /// handle.
    #[instrument(level = "trace", target = "surface_pool", skip_all, fields(buffer_id = %surface.buffer_id()))]
    pub fn submit(&self, mut surface: F::Surface) -> Result<()> {
        let id = surface.buffer_id();

        let reserved = PoolInner::lock(&self.inner)?.pending.reserve(id);
        if !reserved {
            warn!(target: TARGET, buffer_id = %id, "surface already pending, dropping duplicate");
            return Ok(());
        }

        // Registered without the lock held: the hook may run right away.
        let pool = Arc::downgrade(&self.inner);
        surface.on_writes_finished(Box::new(move || {
            if let Some(inner) = pool.upgrade() {
                recycle_pending(&inner, id);
            }
        }));

        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => {
                // Release the reservation so the slot is not counted forever.
                let mut inner = poisoned.into_inner();
                inner.pending.complete(id);
                error!(target: TARGET, buffer_id = %id, "pool state poisoned during submit, dropping surface");
                return Err(SurfacePoolError::Poisoned);
            }
        };
        if let Some(surface) = inner.pending.park(id, surface) {
            inner.recycle(surface);
        }
        Ok(())
    }

    /// Age idle surfaces, evict stale or invalid ones and right-size at
    /// most one oversized surface.
    ///
    /// Call once per produced frame.
    #[instrument(level = "trace", target = "surface_pool", skip_all)]
    pub fn age_and_collect(&self) -> Result<()> {
        let max_age = self.config.max_surface_age;
        let mut inner = PoolInner::lock(&self.inner)?;

        let size_before = inner.available.len();
        inner
            .available
            .retain_mut(|surface| surface.is_valid() && surface.advance_and_get_age() < max_age);
        let aged = size_before - inner.available.len();
        if aged > 0 {
            debug!(target: TARGET, aged_surfaces = aged, "collected old surfaces");
        }

        let oversized = inner
            .available
            .iter()
            .position(|surface| surface.is_oversized() && surface.has_stable_size_history());
        if let Some(surface) = oversized.and_then(|index| inner.available.remove(index)) {
            let size = surface.size();
            debug!(target: TARGET, buffer_id = %surface.buffer_id(), %size, "replacing surface with smaller one");
            drop(surface);

            match inner.create_surface(size) {
                Ok(surface) => inner.available.push_back(surface),
                Err(e) => error!(target: TARGET, %size, "failed to create a new shrunk surface: {}", e),
            }
        }

        inner.report_stats();
        Ok(())
    }

    /// Replace every oversized idle surface with a right-sized one.
    ///
    /// All oversized surfaces are released before any replacement is
    /// created, so old and new allocations never coexist.
    #[instrument(level = "trace", target = "surface_pool", skip_all)]
    pub fn shrink_to_fit(&self) -> Result<()> {
        let mut inner = PoolInner::lock(&self.inner)?;

        let mut sizes_to_recreate = Vec::new();
        inner.available.retain(|surface| {
            if surface.is_oversized() {
                sizes_to_recreate.push(surface.size());
                false
            } else {
                true
            }
        });

        for size in sizes_to_recreate {
            match inner.create_surface(size) {
                Ok(surface) => inner.available.push_back(surface),
                Err(e) => error!(target: TARGET, %size, "failed to create resized surface: {}", e),
            }
        }

        inner.report_stats();
        Ok(())
    }

    /// Report statistics for the current period and reset its counters.
    pub fn trace_stats(&self) -> Result<PoolStats> {
        Ok(PoolInner::lock(&self.inner)?.report_stats())
    }

    /// The most recent statistics report, without starting a new period.
    pub fn last_stats(&self) -> Result<PoolStats> {
        Ok(PoolInner::lock(&self.inner)?.last_report)
    }

    /// Number of idle surfaces ready for reuse.
    pub fn available_count(&self) -> Result<usize> {
        Ok(PoolInner::lock(&self.inner)?.available.len())
    }

    /// Number of submitted surfaces still waiting on their writes.
    pub fn pending_count(&self) -> Result<usize> {
        Ok(PoolInner::lock(&self.inner)?.pending.len())
    }

    /// Whether the surface with `id` is waiting on its writes.
    pub fn is_pending(&self, id: BufferId) -> Result<bool> {
        Ok(PoolInner::lock(&self.inner)?.pending.contains(id))
    }

    /// Device memory held by idle surfaces.
    pub fn cached_bytes(&self) -> Result<usize> {
        Ok(PoolInner::lock(&self.inner)?.cached_bytes())
    }

    /// Deliver a completion signal for `id` directly.
    ///
    /// Same path a registered hook takes.
    #[cfg(test)]
    pub(crate) fn recycle_pending(&self, id: BufferId) {
        recycle_pending(&self.inner, id);
    }
}

impl<F: SurfaceFactory> Drop for SurfacePool<F> {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.lock() {
            let pending = inner.pending.len();
            if pending > 0 {
                debug!(
                    target: TARGET,
                    pending_in_consumer = pending,
                    "releasing surfaces still pending in consumer"
                );
            }
        }
    }
}

impl<F: SurfaceFactory> std::fmt::Debug for SurfacePool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("SurfacePool");
        debug.field("config", &self.config);
        if let Ok(inner) = self.inner.lock() {
            debug
                .field("available", &inner.available.len())
                .field("pending", &inner.pending.len());
        }
        debug.finish()
    }
}
