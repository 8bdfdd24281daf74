// Copyright @yucwang 2026

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::error::{EstimateError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of worker threads pulling jobs from one shared queue.
///
/// Jobs beyond the worker count wait in the queue. Dropping the pool (or
/// calling `shutdown`) raises the cancel flag, discards queued jobs that have
/// not started and joins every worker once its running job returns.
pub struct WorkerPool {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EstimateError::Validation("worker pool needs at least one worker".into()));
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut pool = Self { sender: Some(sender), workers: Vec::with_capacity(size), cancelled };
        for idx in 0..size {
            let receiver = Arc::clone(&receiver);
            let cancelled = Arc::clone(&pool.cancelled);
            // on error the partially built pool is dropped and joins what it started
            let handle = thread::Builder::new()
                .name(format!("mapper-{}", idx))
                .spawn(move || worker_loop(receiver, cancelled))?;
            pool.workers.push(handle);
        }
        log::debug!("started worker pool with {} workers", size);
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Flag set when the pool is released; long jobs poll it to stop early.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Queues `job` and returns the handle its result is delivered to. A panic
    /// inside the job is reported as a `TaskFailure` for `task`.
    pub fn submit<T, F>(&self, task: usize, job: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Result<T>>(1);
        let wrapped: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                Err(EstimateError::TaskFailure { task, message: panic_message(payload) })
            });
            // the handle may already be gone
            let _ = tx.send(outcome);
        });

        let sender = self.sender.as_ref().ok_or_else(|| shut_down(task))?;
        sender.send(wrapped).map_err(|_| shut_down(task))?;
        Ok(TaskHandle { task, receiver: rx })
    }

    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::warn!("a mapper worker exited abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.release();
    }
}

fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<Job>>>, cancelled: Arc<AtomicBool>) {
    loop {
        let message = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => break,
        };
        match message {
            Ok(job) => {
                if cancelled.load(Ordering::SeqCst) {
                    // dropping the job disconnects its handle
                    continue;
                }
                job();
            }
            Err(_) => break,
        }
    }
}

fn shut_down(task: usize) -> EstimateError {
    EstimateError::TaskFailure { task, message: "worker pool is shut down".into() }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("task panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("task panicked: {}", s)
    } else {
        String::from("task panicked")
    }
}

/// Pending result of one submitted task.
pub struct TaskHandle<T> {
    task: usize,
    receiver: mpsc::Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    pub fn task(&self) -> usize {
        self.task
    }

    /// Blocks until the task completes.
    pub fn resolve(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(dropped(self.task)),
        }
    }

    /// Like `resolve`, but gives up with `TaskTimeout` after `timeout`.
    pub fn resolve_timeout(self, timeout: Duration) -> Result<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(EstimateError::TaskTimeout { task: self.task, timeout }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(dropped(self.task)),
        }
    }
}

fn dropped(task: usize) -> EstimateError {
    EstimateError::TaskFailure { task, message: "task was dropped before producing a result".into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    #[test]
    fn test_results_arrive_per_handle() {
        let pool = WorkerPool::new(3).unwrap();
        let handles: Vec<TaskHandle<usize>> = (0..20)
            .map(|i| pool.submit(i, move || Ok(i * i)).unwrap())
            .collect();
        let results: Vec<usize> = handles.into_iter().map(|h| h.resolve().unwrap()).collect();
        assert_eq!(results, (0..20).map(|i| i * i).collect::<Vec<_>>());
        pool.shutdown();
    }

    #[test]
    fn test_concurrency_is_bounded_by_pool_size() {
        let pool = WorkerPool::new(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let handles: Vec<TaskHandle<()>> = (0..8)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(i, move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap()
            })
            .collect();
        for handle in handles {
            handle.resolve().unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_error_and_panic_surface_on_resolve() {
        let pool = WorkerPool::new(2).unwrap();
        let failing: TaskHandle<u64> = pool
            .submit(1, || Err(EstimateError::TaskFailure { task: 1, message: "bad prism".into() }))
            .unwrap();
        let panicking: TaskHandle<u64> = pool.submit(2, || panic!("boom")).unwrap();
        let fine: TaskHandle<u64> = pool.submit(3, || Ok(9)).unwrap();

        assert!(matches!(failing.resolve(), Err(EstimateError::TaskFailure { task: 1, .. })));
        match panicking.resolve() {
            Err(EstimateError::TaskFailure { task, message }) => {
                assert_eq!(task, 2);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // the worker that caught the panic keeps serving
        assert_eq!(fine.resolve().unwrap(), 9);
    }

    #[test]
    fn test_resolve_timeout() {
        let pool = WorkerPool::new(1).unwrap();
        let slow: TaskHandle<()> = pool
            .submit(0, || {
                thread::sleep(Duration::from_millis(300));
                Ok(())
            })
            .unwrap();
        let start = Instant::now();
        match slow.resolve_timeout(Duration::from_millis(20)) {
            Err(EstimateError::TaskTimeout { task, .. }) => assert_eq!(task, 0),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_millis(300));
    }

    #[test]
    fn test_queued_jobs_are_dropped_on_shutdown() {
        let pool = WorkerPool::new(1).unwrap();
        let blocker: TaskHandle<()> = pool
            .submit(0, || {
                thread::sleep(Duration::from_millis(50));
                Ok(())
            })
            .unwrap();
        let queued: Vec<TaskHandle<()>> = (1..5).map(|i| pool.submit(i, || Ok(())).unwrap()).collect();
        drop(blocker);
        pool.shutdown();
        // the blocker was running and finishes, everything still queued is discarded
        let dropped = queued
            .into_iter()
            .map(|h| h.resolve_timeout(Duration::from_secs(1)))
            .filter(|r| matches!(r, Err(EstimateError::TaskFailure { .. })))
            .count();
        assert_eq!(dropped, 4);
    }

    #[test]
    fn test_cancel_flag_is_raised_on_shutdown() {
        let pool = WorkerPool::new(1).unwrap();
        let flag = pool.cancel_flag();
        let polling: TaskHandle<u32> = pool
            .submit(0, move || {
                let mut polls = 0;
                while !flag.load(Ordering::SeqCst) {
                    polls += 1;
                    thread::sleep(Duration::from_millis(1));
                }
                Ok(polls)
            })
            .unwrap();
        thread::sleep(Duration::from_millis(20));
        let start = Instant::now();
        pool.shutdown();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(polling.resolve().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(EstimateError::Validation(_))));
    }
}
