//! Pool statistics and reporting.

use crate::surface::ResourceCacheUsage;

/// Snapshot of pool usage for one reporting period.
///
/// `created` and `reused` count events since the previous report; every
/// other field is the state at the moment of the report.
///
/// # Examples
///
/// ```rust
/// use surface_pool::PoolStats;
///
/// let stats = PoolStats {
///     cached_count: 3,
///     cached_bytes: 3 * 4096,
///     created: 1,
///     reused: 3,
///     pending_count: 2,
///     cache_resources: 10,
///     cache_bytes: 1024,
///     cache_purgeable_bytes: 512,
/// };
/// assert_eq!(stats.total_bytes(), 3 * 4096 + 1024);
/// assert_eq!(stats.reuse_percent(), 75.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoolStats {
    /// Number of surfaces in the available set
    pub cached_count: usize,
    /// Device memory held by the available set
    pub cached_bytes: usize,
    /// Surfaces created since the previous report
    pub created: u64,
    /// Cache hits in `acquire` since the previous report
    pub reused: u64,
    /// Surfaces submitted and still waiting on their writes
    pub pending_count: usize,
    /// Resources held by the graphics layer's resource cache
    pub cache_resources: usize,
    /// Bytes held by the graphics layer's resource cache
    pub cache_bytes: usize,
    /// Bytes the graphics layer's resource cache could release
    pub cache_purgeable_bytes: usize,
}

impl PoolStats {
    pub(crate) fn with_cache_usage(mut self, usage: ResourceCacheUsage) -> Self {
        self.cache_resources = usage.resources;
        self.cache_bytes = usage.bytes;
        self.cache_purgeable_bytes = usage.purgeable_bytes;
        self
    }

    /// Bytes held by cached surfaces plus the resource cache.
    pub fn total_bytes(&self) -> usize {
        self.cached_bytes.saturating_add(self.cache_bytes)
    }

    /// Share of acquisitions served from the cache as a percentage.
    ///
    /// Returns 0.0 when nothing was acquired in the period.
    pub fn reuse_percent(&self) -> f64 {
        let total = self.created + self.reused;
        if total == 0 {
            0.0
        } else {
            (self.reused as f64 / total as f64) * 100.0
        }
    }

    /// Whether nothing was created or reused in the period.
    pub fn is_idle(&self) -> bool {
        self.created == 0 && self.reused == 0
    }
}
