//! Reload statistics for monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters for one table's builds.
#[derive(Debug, Default)]
pub struct ReloadStats {
    /// Builds that published a snapshot.
    builds: AtomicU64,
    /// Builds that failed and left the previous snapshot in place.
    failures: AtomicU64,
    /// Source rows read across all builds.
    rows_read: AtomicU64,
    /// Duration of the most recent successful build.
    last_build_micros: AtomicU64,
}

impl ReloadStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a published build.
    pub fn record_build(&self, rows: u64, elapsed: Duration) {
        self.builds.fetch_add(1, Ordering::Relaxed);
        self.rows_read.fetch_add(rows, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.last_build_micros.store(micros, Ordering::Relaxed);
    }

    /// Records a failed build.
    #[inline]
    pub fn record_failure(&self, rows: u64) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.rows_read.fetch_add(rows, Ordering::Relaxed);
    }

    /// Returns the number of published builds.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Returns the number of failed builds.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the source rows read.
    pub fn rows_read(&self) -> u64 {
        self.rows_read.load(Ordering::Relaxed)
    }

    /// Returns the duration of the last published build.
    pub fn last_build(&self) -> Duration {
        Duration::from_micros(self.last_build_micros.load(Ordering::Relaxed))
    }

    /// Returns the share of builds that failed (0.0 to 1.0).
    #[allow(clippy::cast_precision_loss)]
    pub fn failure_ratio(&self) -> f64 {
        let total = self.builds() + self.failures();
        if total == 0 {
            0.0
        } else {
            self.failures() as f64 / total as f64
        }
    }

    /// Resets all statistics.
    pub fn reset(&self) {
        self.builds.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.rows_read.store(0, Ordering::Relaxed);
        self.last_build_micros.store(0, Ordering::Relaxed);
    }
}

impl Clone for ReloadStats {
    fn clone(&self) -> Self {
        Self {
            builds: AtomicU64::new(self.builds()),
            failures: AtomicU64::new(self.failures()),
            rows_read: AtomicU64::new(self.rows_read()),
            last_build_micros: AtomicU64::new(self.last_build_micros.load(Ordering::Relaxed)),
        }
    }
}

impl std::fmt::Display for ReloadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ReloadStats {{ builds: {}, failures: {}, rows_read: {}, last_build: {:?} }}",
            self.builds(),
            self.failures(),
            self.rows_read(),
            self.last_build()
        )
    }
}
