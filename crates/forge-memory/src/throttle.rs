//! Meta-query throttle marker.
//!
//! A payload-free file whose mtime records the last session start. While the
//! marker is younger than [`META_QUERY_WINDOW`], the cross-project store is not
//! queried. The window is measured from the most recent touch, not from the
//! most recent successful meta query.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::errors::MemoryError;

/// Freshness window for meta-store queries.
pub const META_QUERY_WINDOW: Duration = Duration::from_secs(300);

/// Handle on a throttle marker file.
#[derive(Debug, Clone)]
pub struct ThrottleMarker {
    path: PathBuf,
    window: Duration,
}

impl ThrottleMarker {
    /// Marker at `path` with the default window.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            window: META_QUERY_WINDOW,
        }
    }

    /// Override the freshness window.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Marker path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time since the last touch, relative to `now`. `None` if the marker
    /// does not exist or its mtime is unreadable. An mtime in the future
    /// counts as zero age.
    #[must_use]
    pub fn age(&self, now: SystemTime) -> Option<Duration> {
        let modified = std::fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(now.duration_since(modified).unwrap_or(Duration::ZERO))
    }

    /// Whether the marker was touched within the window before `now`.
    #[must_use]
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        self.age(now).is_some_and(|age| age < self.window)
    }

    /// Create the marker if missing and set its mtime to now.
    pub fn touch(&self) -> Result<(), MemoryError> {
        self.touch_at(SystemTime::now())
    }

    /// Create the marker if missing and set its mtime to `at`.
    pub fn touch_at(&self, at: SystemTime) -> Result<(), MemoryError> {
        let file = File::options()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MemoryError::io("touch throttle marker", &self.path, e))?;
        file.set_modified(at)
            .map_err(|e| MemoryError::io("touch throttle marker", &self.path, e))
    }
}
