//! Memoized "license OK" marker keyed by a hash of the license.
//!
//! One file per license under the cache directory (the system temp dir by
//! default), named `devpayr_<hex(sha256(license))>` and containing the
//! literal `YYYY-MM-DD` UTC day of the last successful validation. The
//! entry is trusted only on exact equality with today; anything else —
//! stale date, missing file, unreadable content — is a miss, never a
//! failure. Entries implicitly expire at midnight.

use crate::clock::Clock;
use crate::DevpayrError;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// File-backed day-granularity validation cache.
pub struct ValidationCache {
    cache_dir: PathBuf,
}

impl Default for ValidationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationCache {
    /// Create a cache rooted at the system temp dir.
    pub fn new() -> Self {
        Self {
            cache_dir: std::env::temp_dir(),
        }
    }

    /// Create a cache rooted at a specific directory.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Path of the cache entry for a license.
    pub fn entry_path(&self, license: &str) -> PathBuf {
        self.cache_dir
            .join(format!("devpayr_{}", hash_license(license)))
    }

    /// Whether a same-day entry exists for the license.
    ///
    /// Read errors and date mismatches are misses; this method never
    /// fails.
    pub fn is_fresh(&self, license: &str, clock: &dyn Clock) -> bool {
        let path = self.entry_path(license);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let fresh = contents.trim() == today_string(clock);
                if !fresh {
                    debug!(path = %path.display(), "stale validation cache entry");
                }
                fresh
            }
            Err(_) => false,
        }
    }

    /// Record a successful validation for the license, overwriting any
    /// stale value. Uses temp file + rename for an atomic write.
    pub fn store(&self, license: &str, clock: &dyn Clock) -> Result<(), DevpayrError> {
        let target_path = self.entry_path(license);
        let temp_path = target_path.with_file_name(format!(
            "devpayr_{}.tmp",
            hash_license(license)
        ));

        fs::write(&temp_path, today_string(clock))
            .map_err(|e| DevpayrError::CacheIo(format!("Failed to write temp file: {e}")))?;

        fs::rename(&temp_path, &target_path)
            .map_err(|e| DevpayrError::CacheIo(format!("Failed to rename cache file: {e}")))?;

        Ok(())
    }

    /// Delete the entry for a license, if present.
    pub fn clear(&self, license: &str) -> Result<(), DevpayrError> {
        let path = self.entry_path(license);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| DevpayrError::CacheIo(format!("Failed to delete cache: {e}")))?;
        }
        Ok(())
    }
}

/// One-way hash of the license for use as a cache key.
///
/// Avoids storing the raw license in filenames.
pub fn hash_license(license: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(license.as_bytes()))
}

fn today_string(clock: &dyn Clock) -> String {
    clock.today_utc().format("%Y-%m-%d").to_string()
}
