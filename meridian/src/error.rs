//! Error types used by the crate.

use thiserror::Error;

use crate::dispatch::CallKey;

/// Meridian error type.
#[derive(Debug, Error)]
pub enum MeridianError {
    /// Triangulation engine failed to fill a polygon.
    #[error("failed to triangulate polygon: {0}")]
    Triangulation(String),
    /// The worker handling the call was terminated before it responded.
    #[error("worker terminated before responding to call {call_key}: {reason}")]
    WorkerTerminated {
        /// Key of the rejected call.
        call_key: CallKey,
        /// Why the worker was terminated.
        reason: String,
    },
    /// A call with the same key is still waiting for its response.
    #[error("call {0} is already pending")]
    DuplicateCallKey(CallKey),
    /// All workers of the pool are terminated.
    #[error("worker pool is closed")]
    PoolClosed,
    /// Failed to start a worker thread.
    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),
}
