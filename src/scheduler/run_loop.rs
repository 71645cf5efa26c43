use std::sync::{Arc, Mutex};

use super::{clock_now, Duration, Scheduler, TaskHandle, TaskQueue, Worker};

/// Queue semantics identical to the trampoline, but nothing drains
/// automatically: the host application calls [`RunLoopScheduler::dispatch`]
/// from its own loop to execute everything currently due.
#[derive(Clone, Default)]
pub struct RunLoopScheduler {
  queue: Arc<Mutex<TaskQueue>>,
}

impl RunLoopScheduler {
  pub fn new() -> Self { Self::default() }

  /// Execute every task due at the time of the call, in (due, sequence)
  /// order. Returns how many tasks ran.
  pub fn dispatch(&self) -> usize {
    let mut executed = 0;
    loop {
      let task = self.queue.lock().unwrap().pop_due(clock_now());
      match task {
        Some(task) => {
          task.execute();
          executed += 1;
        }
        None => return executed,
      }
    }
  }

  /// Whether any live entry is queued, due or not.
  pub fn is_empty(&self) -> bool { self.queue.lock().unwrap().is_empty() }
}

impl Scheduler for RunLoopScheduler {
  type Worker = RunLoopWorker;

  fn create_worker(&self) -> RunLoopWorker { RunLoopWorker { queue: self.queue.clone() } }
}

/// Workers share the scheduler's queue; the host drains them all at once.
#[derive(Clone)]
pub struct RunLoopWorker {
  queue: Arc<Mutex<TaskQueue>>,
}

impl Worker for RunLoopWorker {
  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    self.queue.lock().unwrap().push(task, due)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::subscription::Subscription;

  #[test]
  fn nothing_runs_until_dispatched() {
    let scheduler = RunLoopScheduler::new();
    let worker = scheduler.create_worker();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    worker.schedule(move || { c.fetch_add(1, Ordering::SeqCst); }, None);
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(scheduler.dispatch(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(scheduler.is_empty());
  }

  #[test]
  fn cancelled_tasks_never_dispatch() {
    let scheduler = RunLoopScheduler::new();
    let worker = scheduler.create_worker();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let mut handle = worker.schedule(move || { c.fetch_add(1, Ordering::SeqCst); }, None);
    handle.unsubscribe();

    assert_eq!(scheduler.dispatch(), 0);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn future_tasks_wait_for_a_later_dispatch() {
    let scheduler = RunLoopScheduler::new();
    let worker = scheduler.create_worker();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    worker.schedule(move || { c.fetch_add(1, Ordering::SeqCst); }, Some(Duration::from_millis(25)));
    assert_eq!(scheduler.dispatch(), 0);
    assert!(!scheduler.is_empty());

    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(scheduler.dispatch(), 1);
  }
}
