use std::fmt::Display;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use meridian_types::geo::{InterpolatorDescriptor, ProjectionDescriptor};
use meridian_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::prepare::PreRenderable;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Key that correlates a response with its call.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallKey(u64);

impl Display for CallKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl CallKey {
    /// Returns a key that was not returned before in this process.
    pub fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a key with the given value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Value of the key.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Request to prepare a geometry on a worker.
///
/// Projection and interpolator are sent as descriptors, the worker creates its own instances from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareCall {
    /// Key of the call, the response will carry the same key.
    pub call_key: CallKey,
    /// Geometry to prepare.
    pub geometry: Geometry,
    /// Interpolator that defines paths between vertices. Straight projected segments are used if not set.
    #[serde(default)]
    pub interpolator: Option<InterpolatorDescriptor>,
    /// Projection of the map.
    pub projection: ProjectionDescriptor,
    /// Maximum deviation of the resampled segments from the interpolated paths, in projected units.
    pub perceptible_distance: f64,
}

impl PrepareCall {
    /// Creates a new call with a fresh key.
    pub fn new(
        geometry: Geometry,
        interpolator: Option<InterpolatorDescriptor>,
        projection: ProjectionDescriptor,
        perceptible_distance: f64,
    ) -> Self {
        Self {
            call_key: CallKey::next(),
            geometry,
            interpolator,
            projection,
            perceptible_distance,
        }
    }

    /// Replaces the key of the call.
    pub fn with_call_key(mut self, call_key: CallKey) -> Self {
        self.call_key = call_key;
        self
    }
}

/// Result of a [`PrepareCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareResponse {
    /// Key of the call this is a response to.
    pub call_key: CallKey,
    /// Prepared buffers.
    pub pre_renderables: Vec<PreRenderable>,
}

/// Configuration of a [`WorkerPool`](super::WorkerPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Worker threads are named `{thread_name_prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            thread_name_prefix: "meridian-worker".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Sets the number of workers.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Sets the prefix of worker thread names.
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}
