//! Pool of worker threads that prepare geometries in parallel.
//!
//! Every call is sent to one worker, chosen round-robin. The worker reconstructs the projection and interpolator
//! from their descriptors, prepares the geometry and sends the buffers back through a one-shot channel registered
//! under the key of the call.

use std::collections::hash_map::Entry;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use ahash::AHashMap;
use futures::future::Either;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::error::MeridianError;
use crate::prepare::PrepareContext;
use crate::split::SplitterCache;

mod protocol;

pub use protocol::{CallKey, DispatchConfig, PrepareCall, PrepareResponse};

type CallResult = Result<PrepareResponse, MeridianError>;
type Handler = Arc<dyn Fn(PrepareCall, &mut SplitterCache) -> CallResult + Send + Sync>;

/// State shared between a worker thread and the pool.
#[derive(Default)]
struct WorkerState {
    pending: Mutex<AHashMap<CallKey, oneshot::Sender<CallResult>>>,
    terminated: AtomicBool,
}

impl WorkerState {
    /// Marks the worker as terminated and rejects every call still waiting for it.
    fn terminate(&self, reject: impl Fn(CallKey) -> MeridianError) {
        self.terminated.store(true, Ordering::Release);
        let pending: Vec<_> = self.pending.lock().drain().collect();

        for (call_key, sender) in pending {
            log::debug!("Rejecting call {call_key}");
            // The caller may have dropped the future already.
            let _ = sender.send(Err(reject(call_key)));
        }
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }
}

struct Worker {
    name: String,
    state: Arc<WorkerState>,
    sender: Mutex<Option<mpsc::UnboundedSender<PrepareCall>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

/// Rejects the calls left on a worker when its thread exits, including exits by panic.
struct ExitGuard {
    name: String,
    state: Arc<WorkerState>,
    receiver: mpsc::UnboundedReceiver<PrepareCall>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        log::debug!("Worker {} stopped", self.name);
        // Closed before rejecting, so no call can be queued after the pending table is drained.
        self.receiver.close();
        self.state
            .terminate(|call_key| MeridianError::WorkerTerminated {
                call_key,
                reason: "worker thread exited".to_string(),
            });
    }
}

/// Fixed-size pool of threads that run [`PrepareCall`]s.
///
/// ```no_run
/// use meridian::dispatch::{DispatchConfig, PrepareCall, WorkerPool};
/// use meridian_types::geo::ProjectionDescriptor;
/// use meridian_types::{lonlat, Geometry};
///
/// let pool = WorkerPool::new(DispatchConfig::default()).unwrap();
/// let call = PrepareCall::new(
///     Geometry::Point { coordinates: lonlat!(30.0, 60.0) },
///     None,
///     ProjectionDescriptor::default(),
///     1.0,
/// );
/// let response = futures::executor::block_on(pool.submit(call)).unwrap();
/// assert_eq!(response.pre_renderables.len(), 1);
/// ```
pub struct WorkerPool {
    workers: Vec<Worker>,
    next_worker: AtomicUsize,
}

impl WorkerPool {
    /// Starts the worker threads.
    pub fn new(config: DispatchConfig) -> Result<Self, MeridianError> {
        Self::with_handler(config, Arc::new(prepare))
    }

    fn with_handler(config: DispatchConfig, handler: Handler) -> Result<Self, MeridianError> {
        let worker_count = config.worker_count.max(1);
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let name = format!("{}-{index}", config.thread_name_prefix);
            let state = Arc::new(WorkerState::default());
            let (sender, receiver) = mpsc::unbounded_channel();

            let guard = ExitGuard {
                name: name.clone(),
                state: state.clone(),
                receiver,
            };
            let handler = handler.clone();
            let thread = std::thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_worker(guard, handler))?;

            workers.push(Worker {
                name,
                state,
                sender: Mutex::new(Some(sender)),
                thread: Mutex::new(Some(thread)),
            });
        }

        log::debug!("Started worker pool with {worker_count} workers");

        Ok(Self {
            workers,
            next_worker: AtomicUsize::new(0),
        })
    }

    /// Number of workers in the pool, including terminated ones.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns true if the worker with the given index was terminated.
    pub fn is_terminated(&self, index: usize) -> bool {
        self.workers
            .get(index)
            .map_or(true, |worker| worker.state.is_terminated())
    }

    /// Sends the call to the next live worker.
    ///
    /// The call is dispatched immediately. The returned future resolves with the worker's response, or with an error
    /// if the worker fails to prepare the geometry or is terminated before responding. A call whose key is still
    /// pending is rejected with [`MeridianError::DuplicateCallKey`].
    pub fn submit(&self, call: PrepareCall) -> impl Future<Output = CallResult> + Send + 'static {
        match self.dispatch(call) {
            Ok((call_key, receiver)) => Either::Left(async move {
                receiver.await.unwrap_or_else(|_| {
                    Err(MeridianError::WorkerTerminated {
                        call_key,
                        reason: "response channel closed".to_string(),
                    })
                })
            }),
            Err(err) => Either::Right(futures::future::ready(Err(err))),
        }
    }

    fn dispatch(
        &self,
        mut call: PrepareCall,
    ) -> Result<(CallKey, oneshot::Receiver<CallResult>), MeridianError> {
        let call_key = call.call_key;
        if self
            .workers
            .iter()
            .any(|worker| worker.state.pending.lock().contains_key(&call_key))
        {
            return Err(MeridianError::DuplicateCallKey(call_key));
        }

        for _ in 0..self.workers.len() {
            let index = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len();
            let worker = &self.workers[index];
            if worker.state.is_terminated() {
                continue;
            }

            // Held until the call is sent, so termination cannot miss the pending entry.
            let sender_guard = worker.sender.lock();
            let Some(sender) = sender_guard.as_ref() else {
                continue;
            };

            let (response_sender, response_receiver) = oneshot::channel();
            match worker.state.pending.lock().entry(call_key) {
                Entry::Occupied(_) => return Err(MeridianError::DuplicateCallKey(call_key)),
                Entry::Vacant(entry) => {
                    entry.insert(response_sender);
                }
            }

            match sender.send(call) {
                Ok(()) => {
                    log::trace!("Call {call_key} is sent to worker {}", worker.name);
                    return Ok((call_key, response_receiver));
                }
                Err(mpsc::error::SendError(returned)) => {
                    log::warn!("Worker {} is not accepting calls", worker.name);
                    worker.state.pending.lock().remove(&call_key);
                    call = returned;
                }
            }
        }

        Err(MeridianError::PoolClosed)
    }

    /// Terminates the worker with the given index.
    ///
    /// Calls outstanding on the worker are rejected with [`MeridianError::WorkerTerminated`]. A call the worker is
    /// processing at the moment runs to completion, but its result is dropped. Later calls skip this worker.
    pub fn terminate_worker(&self, index: usize) {
        let Some(worker) = self.workers.get(index) else {
            log::warn!("Cannot terminate worker {index}: pool has only {} workers", self.workers.len());
            return;
        };

        log::debug!("Terminating worker {}", worker.name);
        worker.sender.lock().take();
        worker
            .state
            .terminate(|call_key| MeridianError::WorkerTerminated {
                call_key,
                reason: format!("worker {} was terminated", worker.name),
            });
    }

    /// Terminates all workers and waits for their threads to finish.
    ///
    /// Calls that were not completed are rejected with [`MeridianError::PoolClosed`].
    pub fn shutdown(&self) {
        for worker in &self.workers {
            worker.sender.lock().take();
            worker.state.terminate(|_| MeridianError::PoolClosed);
        }

        for worker in &self.workers {
            let thread = worker.thread.lock().take();
            if let Some(thread) = thread {
                if thread.join().is_err() {
                    log::error!("Worker {} panicked", worker.name);
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(mut guard: ExitGuard, handler: Handler) {
    log::debug!("Worker {} started", guard.name);
    let mut splitters = SplitterCache::new();

    while let Some(call) = guard.receiver.blocking_recv() {
        if guard.state.is_terminated() {
            break;
        }

        let call_key = call.call_key;
        let result = handler(call, &mut splitters);
        if let Err(err) = &result {
            log::debug!("Call {call_key} failed: {err}");
        }

        let sender = guard.state.pending.lock().remove(&call_key);
        match sender {
            Some(sender) => {
                let _ = sender.send(result);
            }
            None => log::trace!("Result of call {call_key} is dropped: call was rejected"),
        }
    }
}

fn prepare(call: PrepareCall, splitters: &mut SplitterCache) -> CallResult {
    let projection = call.projection.build();
    let interpolator = call.interpolator.map(|descriptor| descriptor.build());
    let context = PrepareContext::new(
        projection.as_ref(),
        interpolator.as_deref(),
        call.perceptible_distance,
    )
    .with_splitter(splitters.get(projection.x_span()));

    let mut pre_renderables = vec![];
    context.prepare_into(&call.geometry, &mut pre_renderables)?;

    Ok(PrepareResponse {
        call_key: call.call_key,
        pre_renderables,
    })
}
