//! Lane-routed execution runtime.
//!
//! Every sort is synchronous and CPU-bound. This module runs independent
//! sort invocations on a small set of bounded worker pools so that a batch
//! can proceed concurrently, and so that long quadratic sorts cannot starve
//! short ones. Each job sorts its own copy of the input; no state is shared
//! between jobs.

use std::collections::BTreeMap;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::algorithms::{Algorithm, SortOutcome};
use crate::dispatch::{AlgorithmResult, BatchResponse, Dispatcher, SortRequest};
use crate::error::{ExecutionError, SortError, SortResult};
use crate::value::Number;

/// Execution lane selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionLane {
    /// Short or linearithmic sorts.
    Fast,
    /// Quadratic sorts over large inputs.
    Slow,
}

impl ExecutionLane {
    fn name(self) -> String {
        match self {
            Self::Fast => "fast".to_string(),
            Self::Slow => "slow".to_string(),
        }
    }
}

/// Routes a sort job to an execution lane.
pub trait LaneRouter: Send + Sync {
    /// Selects the lane for sorting `len` elements with `algorithm`.
    fn route(&self, algorithm: Algorithm, len: usize) -> ExecutionLane;
}

/// Default router.
///
/// Policy:
/// - bubble, selection and insertion over more than `threshold` elements are Slow
/// - everything else is Fast
#[derive(Debug, Clone, Copy)]
pub struct DefaultRouter {
    threshold: usize,
}

impl DefaultRouter {
    /// Creates a router that moves elementary sorts above `threshold` to the slow lane.
    #[must_use]
    pub const fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

impl Default for DefaultRouter {
    fn default() -> Self {
        Self::new(RuntimeConfig::default().slow_lane_threshold)
    }
}

impl LaneRouter for DefaultRouter {
    fn route(&self, algorithm: Algorithm, len: usize) -> ExecutionLane {
        if algorithm.is_elementary() && len > self.threshold {
            ExecutionLane::Slow
        } else {
            ExecutionLane::Fast
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of Fast workers.
    pub fast_workers: usize,
    /// Number of Slow workers.
    pub slow_workers: usize,
    /// Maximum queued jobs per lane.
    pub queue_capacity: usize,
    /// Input length above which elementary sorts use the Slow lane.
    pub slow_lane_threshold: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fast_workers: 2,
            slow_workers: 1,
            queue_capacity: 256,
            slow_lane_threshold: 512,
        }
    }
}

enum Job {
    Sort {
        algorithm: Algorithm,
        input: Vec<Number>,
        reply: Sender<SortResult<SortOutcome>>,
    },

    #[cfg(test)]
    Sleep {
        duration: Duration,
        reply: Sender<()>,
    },
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl WorkerPool {
    fn start(name: &'static str, workers: usize, queue_capacity: usize) -> Self {
        let workers = workers.max(1);
        let queue_capacity = queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let thread_name = format!("sortrace-{name}-{idx}");
            let handle = thread::Builder::new()
                .name(thread_name)
                .spawn(move || loop {
                    match rx.recv() {
                        Ok(Job::Sort {
                            algorithm,
                            input,
                            reply,
                        }) => {
                            let result = algorithm.sort(&input);
                            let _ = reply.send(result);
                        }
                        Err(_) => break,

                        #[cfg(test)]
                        Ok(Job::Sleep { duration, reply }) => {
                            thread::sleep(duration);
                            let _ = reply.send(());
                        }
                    }
                })
                .expect("failed to spawn sortrace worker");
            handles.push(handle);
        }

        Self {
            tx,
            workers: handles,
            queue_capacity,
        }
    }

    fn try_submit(&self, job: Job, lane: ExecutionLane) -> Result<(), SortError> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SortError::Execution(ExecutionError::QueueFull {
                lane: lane.name(),
                capacity: self.queue_capacity,
            })),
            Err(TrySendError::Disconnected(_)) => Err(SortError::Execution(ExecutionError::Disconnected {
                lane: lane.name(),
            })),
        }
    }

    /// Fails with `QueueFull` unless `needed` more jobs fit in the queue now.
    fn reserve(&self, needed: usize, lane: ExecutionLane) -> Result<(), SortError> {
        if needed > 0 && self.tx.len() + needed > self.queue_capacity {
            return Err(SortError::Execution(ExecutionError::QueueFull {
                lane: lane.name(),
                capacity: self.queue_capacity,
            }));
        }
        Ok(())
    }

    fn shutdown(self) {
        // Close the channel: workers drain queued jobs then exit.
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }

    fn closed() -> Self {
        Self {
            tx: bounded::<Job>(1).0,
            workers: Vec::new(),
            queue_capacity: 1,
        }
    }
}

/// A batch entry between planning and collection.
enum Pending {
    Queued(SortHandle),
    Inline(Algorithm),
    Unsupported(ExecutionError),
}

/// Handle returned by [`SortRuntime::submit`].
pub struct SortHandle {
    algorithm: Algorithm,
    lane: ExecutionLane,
    rx: Receiver<SortResult<SortOutcome>>,
}

impl SortHandle {
    /// The algorithm this handle is waiting on.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the lane selected by the router.
    #[must_use]
    pub const fn lane(&self) -> ExecutionLane {
        self.lane
    }

    /// Waits for the sort to complete.
    pub fn join(self) -> SortResult<SortOutcome> {
        let lane = self.lane.name();
        self.rx
            .recv()
            .map_err(|_| SortError::Execution(ExecutionError::Disconnected { lane }))?
    }

    /// Waits for the sort to complete, giving up after `timeout`.
    ///
    /// Giving up does not cancel the sort; its result is discarded.
    pub fn join_timeout(self, timeout: Duration) -> SortResult<SortOutcome> {
        let lane = self.lane.name();
        self.rx
            .recv_timeout(timeout)
            .map_err(|err| match err {
                crossbeam_channel::RecvTimeoutError::Timeout => {
                    SortError::Execution(ExecutionError::Timeout {
                        duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }
                crossbeam_channel::RecvTimeoutError::Disconnected => {
                    SortError::Execution(ExecutionError::Disconnected { lane })
                }
            })?
    }
}

/// A lane-routed runtime for concurrent, isolated sort invocations.
pub struct SortRuntime<R: LaneRouter = DefaultRouter> {
    router: R,
    dispatcher: Dispatcher,
    fast: WorkerPool,
    slow: WorkerPool,
}

impl SortRuntime<DefaultRouter> {
    /// Create a runtime with the default router.
    pub fn new(dispatcher: Dispatcher, config: RuntimeConfig) -> Self {
        let router = DefaultRouter::new(config.slow_lane_threshold);
        Self::with_router(dispatcher, router, config)
    }
}

impl<R: LaneRouter> SortRuntime<R> {
    /// Create a runtime with a custom router.
    pub fn with_router(dispatcher: Dispatcher, router: R, config: RuntimeConfig) -> Self {
        let fast = WorkerPool::start("fast", config.fast_workers, config.queue_capacity);
        let slow = WorkerPool::start("slow", config.slow_workers, config.queue_capacity);
        Self {
            router,
            dispatcher,
            fast,
            slow,
        }
    }

    /// Queue a sort of a private copy of `input` on the routed lane.
    pub fn submit(&self, algorithm: Algorithm, input: &[Number]) -> Result<SortHandle, SortError> {
        let lane = self.router.route(algorithm, input.len());
        let (tx, rx) = bounded::<SortResult<SortOutcome>>(1);
        let job = Job::Sort {
            algorithm,
            input: input.to_vec(),
            reply: tx,
        };
        self.pool(lane).try_submit(job, lane)?;
        Ok(SortHandle { algorithm, lane, rx })
    }

    /// Sort synchronously on the routed lane.
    pub fn sort(&self, algorithm: Algorithm, input: &[Number]) -> SortResult<SortOutcome> {
        self.submit(algorithm, input)?.join()
    }

    /// Runs a batch with every resolved algorithm in flight at once.
    ///
    /// Produces the same entries as [`Dispatcher::dispatch`]. If a lane lacks
    /// room for its share of the batch, fails with
    /// [`ExecutionError::QueueFull`] before queuing anything. A job rejected
    /// after that check, by a concurrent submitter taking the slot, runs on
    /// the calling thread instead, so no queued work is ever discarded.
    pub fn dispatch(&self, request: &SortRequest) -> SortResult<BatchResponse> {
        let plan = self.dispatcher.plan(request)?;
        let len = request.array.len();

        let (mut fast, mut slow) = (0, 0);
        for algorithm in plan.iter().filter_map(|(_, r)| r.as_ref().ok()) {
            match self.router.route(*algorithm, len) {
                ExecutionLane::Fast => fast += 1,
                ExecutionLane::Slow => slow += 1,
            }
        }
        for (lane, needed) in [(ExecutionLane::Fast, fast), (ExecutionLane::Slow, slow)] {
            self.pool(lane).reserve(needed, lane)?;
        }

        let mut pending = Vec::with_capacity(plan.len());
        for (id, resolved) in plan {
            let entry = match resolved {
                Ok(algorithm) => match self.submit(algorithm, &request.array) {
                    Ok(handle) => Pending::Queued(handle),
                    Err(err) => {
                        tracing::debug!(request_id = %request.request_id, %algorithm, %err, "running sort inline");
                        Pending::Inline(algorithm)
                    }
                },
                Err(err) => Pending::Unsupported(err),
            };
            pending.push((id, entry));
        }

        let mut results = BTreeMap::new();
        for (id, entry) in pending {
            let result = match entry {
                Pending::Queued(handle) => AlgorithmResult::completed(handle.join()?),
                Pending::Inline(algorithm) => AlgorithmResult::completed(algorithm.sort(&request.array)?),
                Pending::Unsupported(err) => AlgorithmResult::unsupported(&err),
            };
            results.insert(id, result);
        }

        Ok(BatchResponse::new(request.request_id, results))
    }

    /// Returns the dispatcher used for validation and lookup.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn pool(&self, lane: ExecutionLane) -> &WorkerPool {
        match lane {
            ExecutionLane::Fast => &self.fast,
            ExecutionLane::Slow => &self.slow,
        }
    }

    #[cfg(test)]
    fn submit_sleep(&self, lane: ExecutionLane, duration: Duration) -> Result<Receiver<()>, SortError> {
        let (tx, rx) = bounded::<()>(1);
        let job = Job::Sleep { duration, reply: tx };
        self.pool(lane).try_submit(job, lane)?;
        Ok(rx)
    }
}

impl<R: LaneRouter> Drop for SortRuntime<R> {
    fn drop(&mut self) {
        // Deterministic shutdown: stop workers and join threads.
        let fast = std::mem::replace(&mut self.fast, WorkerPool::closed());
        let slow = std::mem::replace(&mut self.slow, WorkerPool::closed());
        fast.shutdown();
        slow.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::value::ints;

    fn runtime(config: RuntimeConfig) -> SortRuntime {
        SortRuntime::new(Dispatcher::default(), config)
    }

    #[test]
    fn router_routes_as_expected() {
        let router = DefaultRouter::new(10);
        assert_eq!(router.route(Algorithm::Bubble, 10), ExecutionLane::Fast);
        assert_eq!(router.route(Algorithm::Bubble, 11), ExecutionLane::Slow);
        assert_eq!(router.route(Algorithm::Insertion, 1000), ExecutionLane::Slow);
        assert_eq!(router.route(Algorithm::Merge, 1000), ExecutionLane::Fast);
        assert_eq!(router.route(Algorithm::Quick, 1000), ExecutionLane::Fast);
    }

    #[test]
    fn submit_sorts_private_copy() {
        let rt = runtime(RuntimeConfig::default());
        let input = ints(&[4, 2, 3, 1]);
        let outcome = rt.sort(Algorithm::Quick, &input).unwrap();
        assert_eq!(outcome.sorted, ints(&[1, 2, 3, 4]));
        assert_eq!(input, ints(&[4, 2, 3, 1]));
    }

    #[test]
    fn slow_work_does_not_starve_fast_lane() {
        let rt = runtime(RuntimeConfig {
            fast_workers: 1,
            slow_workers: 1,
            queue_capacity: 16,
            slow_lane_threshold: 4,
        });

        // Occupy the slow worker.
        let sleep = rt.submit_sleep(ExecutionLane::Slow, Duration::from_millis(200)).unwrap();

        let started = std::time::Instant::now();
        let handle = rt.submit(Algorithm::Merge, &ints(&[3, 1, 2])).unwrap();
        assert_eq!(handle.lane(), ExecutionLane::Fast);
        let _ = handle.join_timeout(Duration::from_millis(100)).unwrap();
        assert!(started.elapsed() < Duration::from_millis(150));

        sleep.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn full_queue_is_retryable_back_pressure() {
        let rt = runtime(RuntimeConfig {
            fast_workers: 1,
            slow_workers: 1,
            queue_capacity: 1,
            slow_lane_threshold: 512,
        });

        let busy = rt.submit_sleep(ExecutionLane::Fast, Duration::from_millis(200)).unwrap();
        // Give the worker time to pick up the sleep job, then fill the queue.
        thread::sleep(Duration::from_millis(50));
        let queued = rt.submit_sleep(ExecutionLane::Fast, Duration::from_millis(1)).unwrap();

        let err = rt.submit(Algorithm::Bubble, &ints(&[2, 1])).err().unwrap();
        assert!(err.is_retryable());
        let SortError::Execution(ExecutionError::QueueFull { lane, capacity }) = err else {
            panic!("expected QueueFull, got {err:?}");
        };
        assert_eq!(lane, "fast");
        assert_eq!(capacity, 1);

        busy.recv_timeout(Duration::from_secs(1)).unwrap();
        queued.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn batch_without_room_fails_before_queuing_anything() {
        let rt = runtime(RuntimeConfig {
            fast_workers: 1,
            slow_workers: 1,
            queue_capacity: 2,
            slow_lane_threshold: 512,
        });

        let busy = rt.submit_sleep(ExecutionLane::Fast, Duration::from_millis(200)).unwrap();
        thread::sleep(Duration::from_millis(50));
        let queued = rt.submit_sleep(ExecutionLane::Fast, Duration::from_millis(1)).unwrap();

        // One free slot, two fast-lane sorts.
        let req = SortRequest::new(ints(&[3, 1, 2]), ["merge", "quick"]);
        let err = rt.dispatch(&req).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(rt.fast.tx.len(), 1);

        busy.recv_timeout(Duration::from_secs(1)).unwrap();
        queued.recv_timeout(Duration::from_secs(1)).unwrap();

        // Once drained the same batch goes through.
        let resp = rt.dispatch(&req).unwrap();
        assert_eq!(resp.completed_count(), 2);
    }

    #[test]
    fn join_timeout_reports_timeout_while_worker_busy() {
        let rt = runtime(RuntimeConfig {
            fast_workers: 1,
            slow_workers: 1,
            queue_capacity: 4,
            slow_lane_threshold: 512,
        });
        let busy = rt.submit_sleep(ExecutionLane::Fast, Duration::from_millis(200)).unwrap();
        let handle = rt.submit(Algorithm::Merge, &ints(&[2, 1])).unwrap();

        let err = handle.join_timeout(Duration::from_millis(10)).unwrap_err();
        assert_eq!(
            err,
            SortError::Execution(ExecutionError::Timeout { duration_ms: 10 })
        );
        busy.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn join_reports_disconnected_when_reply_sender_dropped() {
        let (tx, rx) = bounded::<SortResult<SortOutcome>>(1);
        drop(tx);

        let handle = SortHandle {
            algorithm: Algorithm::Bubble,
            lane: ExecutionLane::Slow,
            rx,
        };

        let err = handle.join().unwrap_err();
        let SortError::Execution(ExecutionError::Disconnected { lane }) = err else {
            panic!("expected Disconnected, got {err:?}");
        };
        assert_eq!(lane, "slow");
    }

    #[test]
    fn batch_matches_sequential_dispatch() {
        let rt = runtime(RuntimeConfig::default());
        let req = SortRequest::new(
            ints(&[9, 4, 7, 1, 8, 2]),
            ["bubble", "selection", "insertion", "quick", "merge", "nope"],
        );

        let concurrent = rt.dispatch(&req).unwrap();
        let sequential = rt.dispatcher().dispatch(&req).unwrap();

        assert_eq!(concurrent.results.len(), 6);
        for (id, result) in &sequential.results {
            let other = concurrent.get(id).unwrap();
            assert_eq!(result.steps(), other.steps(), "steps differ for {id}");
            assert_eq!(result.sorted_output(), other.sorted_output());
        }
    }
}
