//! Detector and cache configuration.
//!
//! ## The Knobs
//!
//! Chapter detection is heuristic, so a few thresholds decide how eager it is:
//!
//! ```text
//! min_chapter_length  500   bodies shorter than this are boundary false
//!                           positives (an inline "1. ..." list item)
//! max_similarity      0.8   word-set overlap above this means the same
//!                           physical chapter was detected twice
//! workers             N     line chunks scanned in parallel
//! ```
//!
//! The cache is bounded two ways, by age and by entry count:
//!
//! ```text
//! capacity            100   entries kept at most (oldest evicted first)
//! expiration          30m   entries older than this are dropped
//! ```
//!
//! Both types validate on construction, so an engine built from them never
//! has to re-check its own settings.

use std::time::Duration;

/// Default minimum body length, in bytes, for a chapter to be kept.
pub const DEFAULT_MIN_CHAPTER_LENGTH: usize = 500;

/// Default word-overlap ratio above which two chapters are duplicates.
pub const DEFAULT_MAX_SIMILARITY: f32 = 0.8;

/// Default number of cached documents.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default cache entry lifetime.
pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(30 * 60);

/// Number of workers used when none is configured.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

/// Detection settings.
///
/// # Examples
///
/// ```rust
/// use chapterize::DetectorConfig;
///
/// let config = DetectorConfig::default()
///     .with_min_chapter_length(200)
///     .with_max_similarity(0.6)
///     .unwrap()
///     .with_workers(4)
///     .unwrap();
///
/// assert_eq!(config.min_chapter_length(), 200);
/// assert_eq!(config.workers(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    min_chapter_length: usize,
    max_similarity: f32,
    workers: usize,
}

impl DetectorConfig {
    /// Minimum body length in bytes.
    #[must_use]
    pub const fn min_chapter_length(&self) -> usize {
        self.min_chapter_length
    }

    /// Duplicate-detection similarity threshold.
    #[must_use]
    pub const fn max_similarity(&self) -> f32 {
        self.max_similarity
    }

    /// Number of parallel chunks.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Set the minimum body length. Zero disables the length check.
    #[must_use]
    pub fn with_min_chapter_length(self, length: usize) -> Self {
        Self {
            min_chapter_length: length,
            ..self
        }
    }

    /// Set the duplicate threshold.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0.0 <= threshold <= 1.0`.
    pub fn with_max_similarity(self, threshold: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::SimilarityOutOfRange(threshold));
        }
        Ok(Self {
            max_similarity: threshold,
            ..self
        })
    }

    /// Set the number of parallel chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if `workers == 0`.
    pub fn with_workers(self, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self { workers, ..self })
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_chapter_length: DEFAULT_MIN_CHAPTER_LENGTH,
            max_similarity: DEFAULT_MAX_SIMILARITY,
            workers: default_workers(),
        }
    }
}

/// Result cache bounds.
///
/// ```rust
/// use std::time::Duration;
/// use chapterize::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_capacity(10)
///     .unwrap()
///     .with_expiration(Duration::from_secs(60));
/// assert_eq!(config.capacity(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    capacity: usize,
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    expiration: Duration,
}

impl CacheConfig {
    /// Maximum number of cached documents.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Maximum entry age.
    #[must_use]
    pub const fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Set the entry capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity == 0`.
    pub fn with_capacity(self, capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self { capacity, ..self })
    }

    /// Set the entry lifetime.
    #[must_use]
    pub fn with_expiration(self, expiration: Duration) -> Self {
        Self { expiration, ..self }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            expiration: DEFAULT_CACHE_EXPIRATION,
        }
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Error when configuring detection or caching.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Similarity threshold must lie in `[0, 1]`.
    #[error("similarity threshold {0} must be within 0.0..=1.0")]
    SimilarityOutOfRange(f32),

    /// At least one worker is required.
    #[error("worker count must be > 0")]
    ZeroWorkers,

    /// The cache must hold at least one entry.
    #[error("cache capacity must be > 0")]
    ZeroCapacity,
}
