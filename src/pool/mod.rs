//! Surface pool with completion tracking, aging and right-sizing.
//!
//! Surfaces move between three owners: the caller (after `acquire`), the
//! pending map (after `submit`, until the consumer finishes writing) and the
//! available set (after recycling). All pool-side state lives in one
//! [`PoolInner`] behind a mutex, shared with completion hooks through weak
//! references only.

mod pending;
mod stats;
mod surface_pool;


pub use stats::PoolStats;
pub use surface_pool::SurfacePool;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, trace};

use crate::error::{Result, SurfacePoolError};
use crate::logging::{STATS_TARGET, TARGET};
use crate::surface::{BufferId, Surface, SurfaceFactory, SurfaceSize};

use pending::{Completion, PendingSurfaces};

/// Pool state protected by the pool mutex.
pub(crate) struct PoolInner<F: SurfaceFactory> {
    /// Allocation context for new surfaces
    pub(crate) factory: F,
    /// Idle surfaces, oldest first
    pub(crate) available: VecDeque<F::Surface>,
    /// Surfaces waiting on their writes to finish
    pub(crate) pending: PendingSurfaces<F::Surface>,
    /// Cap on `available`
    pub(crate) max_surfaces: usize,
    /// Next id handed to the factory
    pub(crate) next_buffer_id: u64,
    /// Surfaces created in the current reporting period
    pub(crate) created: u64,
    /// Cache hits handed out in the current reporting period
    pub(crate) reused: u64,
    /// Most recent statistics report
    pub(crate) last_report: PoolStats,
}

impl<F: SurfaceFactory> PoolInner<F> {
    pub(crate) fn new(factory: F, max_surfaces: usize) -> Self {
        Self {
            factory,
            available: VecDeque::with_capacity(max_surfaces),
            pending: PendingSurfaces::new(),
            max_surfaces,
            next_buffer_id: 1,
            created: 0,
            reused: 0,
            last_report: PoolStats::default(),
        }
    }

    /// Helper to lock pool state with proper error handling.
    pub(crate) fn lock(inner: &Mutex<PoolInner<F>>) -> Result<MutexGuard<'_, PoolInner<F>>> {
        inner.lock().map_err(|_| SurfacePoolError::Poisoned)
    }

    fn next_buffer_id(&mut self) -> BufferId {
        let id = BufferId(self.next_buffer_id);
        self.next_buffer_id = self.next_buffer_id.wrapping_add(1);
        id
    }

    /// Take the first valid idle surface of exactly `size`.
    pub(crate) fn take_cached(&mut self, size: SurfaceSize) -> Option<F::Surface> {
        let index = self
            .available
            .iter()
            .position(|surface| surface.is_valid() && surface.size() == size)?;
        let surface = self.available.remove(index)?;
        trace!(target: TARGET, buffer_id = %surface.buffer_id(), "exact match found");
        Some(surface)
    }

    /// Allocate a new surface of `size` from the factory.
    pub(crate) fn create_surface(&mut self, size: SurfaceSize) -> Result<F::Surface> {
        let id = self.next_buffer_id();
        let surface = self
            .factory
            .create(size, id)
            .ok_or(SurfacePoolError::CreationFailed { size })?;

        if !surface.is_valid() {
            debug!(target: TARGET, buffer_id = %id, %size, "discarding invalid new surface");
            return Err(SurfacePoolError::InvalidSurface { size });
        }

        self.created += 1;
        debug!(target: TARGET, buffer_id = %id, %size, "created surface");
        Ok(surface)
    }

    /// Return a surface to the available set if it is valid and fits.
    pub(crate) fn recycle(&mut self, surface: F::Surface) {
        // The surface may have become invalid, for example if its fences
        // could not be reset.
        if !surface.is_valid() {
            debug!(target: TARGET, buffer_id = %surface.buffer_id(), "dropping invalid surface");
            return;
        }

        if self.available.len() < self.max_surfaces {
            self.available.push_back(surface);
        } else {
            debug!(
                target: TARGET,
                buffer_id = %surface.buffer_id(),
                max_surfaces = self.max_surfaces,
                "too many surfaces in pool, dropping"
            );
        }
        self.report_stats();
    }

    /// Handle the completion signal for `id`.
    pub(crate) fn recycle_pending(&mut self, id: BufferId) {
        match self.pending.complete(id) {
            Completion::Untracked => {
                trace!(target: TARGET, buffer_id = %id, "completion for untracked surface");
            }
            Completion::BeforePark => {
                trace!(target: TARGET, buffer_id = %id, "completion arrived before surface was parked");
            }
            Completion::Ready(surface) => self.recycle(surface),
        }
    }

    pub(crate) fn cached_bytes(&self) -> usize {
        self.available
            .iter()
            .fold(0usize, |total, surface| {
                total.saturating_add(surface.allocation_size())
            })
    }

    /// Emit statistics for the current period and start a new one.
    pub(crate) fn report_stats(&mut self) -> PoolStats {
        let stats = PoolStats {
            cached_count: self.available.len(),
            cached_bytes: self.cached_bytes(),
            created: self.created,
            reused: self.reused,
            pending_count: self.pending.len(),
            ..PoolStats::default()
        }
        .with_cache_usage(self.factory.cache_usage());

        debug!(
            target: STATS_TARGET,
            cached_count = stats.cached_count,
            created = stats.created,
            reused = stats.reused,
            pending_in_consumer = stats.pending_count,
            cache_resources = stats.cache_resources,
            cached_bytes = stats.cached_bytes,
            cache_bytes = stats.cache_bytes,
            cache_purgeable_bytes = stats.cache_purgeable_bytes,
            "surface pool stats"
        );

        self.created = 0;
        self.reused = 0;
        self.last_report = stats;
        stats
    }
}

/// Completion entry point used by the hooks registered in `submit`.
///
/// Runs on whatever thread signals completion. Lock errors are logged and
/// otherwise ignored, matching how a dropped pool is ignored.
pub(crate) fn recycle_pending<F: SurfaceFactory>(inner: &Mutex<PoolInner<F>>, id: BufferId) {
    match PoolInner::lock(inner) {
        Ok(mut inner) => inner.recycle_pending(id),
        Err(e) => error!(target: TARGET, buffer_id = %id, "cannot recycle surface: {}", e),
    }
}
