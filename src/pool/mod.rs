//! Worker pool for parallel import extraction.
//!
//! A fixed set of long-lived executor threads receives `{id, path,
//! content}` jobs over per-worker channels and replies with `{id, result}`
//! or `{id, error}`; no other message shapes cross the boundary. Jobs are
//! assigned round-robin; completions are correlated to requests by a
//! monotonically increasing task id, never by executor identity, so batch
//! results can be matched back to input order regardless of completion
//! order.
//!
//! An executor that terminates abnormally (a panicking extractor) is
//! replaced the next time its slot is dispatched to. Jobs already queued
//! on the dead executor are abandoned, not retried: their reply channels
//! close and the awaiting caller sees `PoolError::WorkerLost`. Shutdown
//! likewise abandons in-flight work. Callers that cannot tolerate a lost
//! task must apply their own timeout via [`TaskHandle::wait_timeout`].

use crate::parser::{ParseResult, ParserRegistry};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Failures surfaced to a caller awaiting a pool task
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("executor terminated before replying; task abandoned")]
    WorkerLost,
    #[error("timed out waiting for task completion")]
    Timeout,
}

/// Inbound boundary message
struct Job {
    id: u64,
    path: PathBuf,
    content: String,
    reply: Sender<TaskMessage>,
}

/// Outbound boundary message
struct TaskMessage {
    id: u64,
    outcome: Result<ParseResult, String>,
}

/// A pending task. Dropping the handle abandons interest in the result.
pub struct TaskHandle {
    id: u64,
    rx: Receiver<TaskMessage>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the task completes. Hangs only as long as the executor
    /// lives; a dead executor closes the channel and yields `WorkerLost`.
    pub fn wait(self) -> Result<ParseResult, PoolError> {
        match self.rx.recv() {
            Ok(message) => message.outcome.map_err(PoolError::Extraction),
            Err(_) => Err(PoolError::WorkerLost),
        }
    }

    /// Block with an upper bound, the caller-side guard recommended for
    /// anything that must survive executor loss.
    pub fn wait_timeout(self, timeout: Duration) -> Result<ParseResult, PoolError> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => message.outcome.map_err(PoolError::Extraction),
            Err(RecvTimeoutError::Timeout) => Err(PoolError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(PoolError::WorkerLost),
        }
    }
}

struct WorkerSlot {
    sender: Sender<Job>,
    handle: Option<JoinHandle<()>>,
}

/// Fixed-size pool of extraction executors.
///
/// Executors hold no state across jobs: every task is a pure function of
/// its inputs, so replacement after a crash is safe.
pub struct WorkerPool {
    workers: Vec<WorkerSlot>,
    registry: Arc<ParserRegistry>,
    stop: Arc<AtomicBool>,
    next_worker: usize,
    next_task: u64,
}

/// Default pool size: available parallelism minus one for the
/// orchestrator thread, never below one.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

impl WorkerPool {
    pub fn new(registry: Arc<ParserRegistry>, size: usize) -> Self {
        let size = size.max(1);
        let stop = Arc::new(AtomicBool::new(false));
        let workers = (0..size)
            .map(|index| Self::spawn_worker(index, Arc::clone(&registry), Arc::clone(&stop)))
            .collect();

        debug!("Worker pool started with {} executors", size);
        Self {
            workers,
            registry,
            stop,
            next_worker: 0,
            next_task: 0,
        }
    }

    pub fn with_default_size(registry: Arc<ParserRegistry>) -> Self {
        Self::new(registry, default_pool_size())
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    fn spawn_worker(
        index: usize,
        registry: Arc<ParserRegistry>,
        stop: Arc<AtomicBool>,
    ) -> WorkerSlot {
        let (sender, receiver) = channel::<Job>();

        let handle = std::thread::spawn(move || {
            debug!("Executor {} started", index);
            let mut receiver = Some(receiver);
            loop {
                let job = match receiver.as_ref().map(|rx| rx.recv()) {
                    Some(Ok(job)) => job,
                    _ => break,
                };

                // Shutdown abandons whatever is still queued
                if stop.load(Ordering::Relaxed) {
                    break;
                }

                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    registry.parse(&job.path, &job.content)
                }));

                match outcome {
                    Ok(result) => {
                        let _ = job.reply.send(TaskMessage {
                            id: job.id,
                            outcome: Ok(result),
                        });
                    }
                    Err(panic) => {
                        // Terminate abnormally: close the job channel
                        // first so the pool sees this slot as dead from
                        // the moment the error reply lands, abandoning
                        // everything still queued here. Then surface the
                        // error to this task's caller.
                        let message = panic_message(&panic);
                        warn!("Executor {} crashed: {}", index, message);
                        receiver = None;
                        let _ = job.reply.send(TaskMessage {
                            id: job.id,
                            outcome: Err(message),
                        });
                        break;
                    }
                }
            }
            debug!("Executor {} stopped", index);
        });

        WorkerSlot {
            sender,
            handle: Some(handle),
        }
    }

    /// Round-robin dispatch. A dead executor is detected by the failed
    /// send, replaced immediately, and the job goes to the replacement;
    /// only jobs that were already queued on the dead executor are lost.
    fn dispatch(&mut self, path: PathBuf, content: String, reply: Sender<TaskMessage>) -> u64 {
        let id = self.next_task;
        self.next_task += 1;

        let slot = self.next_worker;
        self.next_worker = (self.next_worker + 1) % self.workers.len();

        let job = Job {
            id,
            path,
            content,
            reply,
        };

        if let Err(failed) = self.workers[slot].sender.send(job) {
            warn!("Executor {} is gone, respawning", slot);
            if let Some(handle) = self.workers[slot].handle.take() {
                let _ = handle.join();
            }
            self.workers[slot] =
                Self::spawn_worker(slot, Arc::clone(&self.registry), Arc::clone(&self.stop));
            let _ = self.workers[slot].sender.send(failed.0);
        }

        id
    }

    /// Submit a single file for extraction
    pub fn parse_file(&mut self, path: PathBuf, content: String) -> TaskHandle {
        let (tx, rx) = channel();
        let id = self.dispatch(path, content, tx);
        TaskHandle { id, rx }
    }

    /// Submit a batch and collect results positionally matched to input
    /// order, whatever order the executors complete in. A slot whose
    /// executor died before replying holds `Err(PoolError::WorkerLost)`.
    pub fn parse_files(
        &mut self,
        files: Vec<(PathBuf, String)>,
    ) -> Vec<Result<ParseResult, PoolError>> {
        let (tx, rx) = channel();
        let mut positions = std::collections::HashMap::with_capacity(files.len());

        for (index, (path, content)) in files.into_iter().enumerate() {
            let id = self.dispatch(path, content, tx.clone());
            positions.insert(id, index);
        }
        drop(tx);

        let mut results: Vec<Option<Result<ParseResult, PoolError>>> =
            (0..positions.len()).map(|_| None).collect();

        // The channel closes once every job has replied or been dropped
        // with its executor.
        while let Ok(message) = rx.recv() {
            if let Some(&index) = positions.get(&message.id) {
                results[index] = Some(message.outcome.map_err(PoolError::Extraction));
            }
        }

        results
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(PoolError::WorkerLost)))
            .collect()
    }

    /// Terminate every executor. Outstanding tasks are neither resolved
    /// nor retried; their callers observe `WorkerLost`.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for slot in self.workers.drain(..) {
            drop(slot.sender);
            if let Some(handle) = slot.handle {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Language;
    use crate::parser::Extractor;
    use std::path::Path;

    /// Test extractor: `sleep:<ms>` delays, `panic` crashes the executor,
    /// anything else returns an empty result.
    struct ScriptedExtractor;

    impl Extractor for ScriptedExtractor {
        fn parse(&self, _path: &Path, content: &str) -> ParseResult {
            for line in content.lines() {
                if let Some(ms) = line.strip_prefix("sleep:") {
                    let ms: u64 = ms.trim().parse().unwrap_or(0);
                    std::thread::sleep(Duration::from_millis(ms));
                }
                if line == "panic" {
                    panic!("scripted crash");
                }
            }
            ParseResult::new()
        }
    }

    fn scripted_pool(size: usize) -> WorkerPool {
        let mut registry = ParserRegistry::new();
        registry.register(Language::Python, Box::new(ScriptedExtractor));
        WorkerPool::new(Arc::new(registry), size)
    }

    #[test]
    fn task_ids_are_monotonic() {
        let mut pool = scripted_pool(2);
        let a = pool.parse_file(PathBuf::from("a.py"), String::new());
        let b = pool.parse_file(PathBuf::from("b.py"), String::new());
        assert!(b.id() > a.id());
        a.wait().unwrap();
        b.wait().unwrap();
    }

    #[test]
    fn batch_results_match_input_order() {
        let mut pool = scripted_pool(3);
        let files = vec![
            (PathBuf::from("slow.py"), "sleep:80".to_string()),
            (PathBuf::from("medium.py"), "sleep:30".to_string()),
            (PathBuf::from("fast.py"), String::new()),
        ];

        let results = pool.parse_files(files);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn crashed_executor_is_replaced() {
        let mut pool = scripted_pool(1);

        let poisoned = pool.parse_file(PathBuf::from("boom.py"), "panic".to_string());
        assert!(matches!(
            poisoned.wait_timeout(Duration::from_secs(5)),
            Err(PoolError::Extraction(_))
        ));

        // The sole executor died; subsequent dispatches must still
        // complete via its replacement.
        let results = pool.parse_files(vec![
            (PathBuf::from("a.py"), String::new()),
            (PathBuf::from("b.py"), String::new()),
        ]);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn queued_tasks_on_crashed_executor_are_abandoned() {
        let mut pool = scripted_pool(1);

        // Queue order on the single executor: crash first, victim second.
        // The sleep guarantees the victim is queued before the crash hits.
        let crash = pool.parse_file(PathBuf::from("boom.py"), "sleep:50\npanic".to_string());
        let victim = pool.parse_file(PathBuf::from("victim.py"), String::new());

        assert!(matches!(
            crash.wait_timeout(Duration::from_secs(5)),
            Err(PoolError::Extraction(_))
        ));
        assert_eq!(
            victim.wait_timeout(Duration::from_secs(5)),
            Err(PoolError::WorkerLost)
        );
    }

    #[test]
    fn shutdown_abandons_outstanding_tasks() {
        let mut pool = scripted_pool(1);
        let pending = pool.parse_file(PathBuf::from("slow.py"), "sleep:200".to_string());
        let queued = pool.parse_file(PathBuf::from("queued.py"), "sleep:200".to_string());
        pool.shutdown();

        // The in-flight task may have finished before shutdown joined the
        // executor, but the queued one is gone for certain.
        let _ = pending;
        assert!(queued.wait_timeout(Duration::from_secs(1)).is_err());
    }
}
