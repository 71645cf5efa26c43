//! Ordered, cancellable deferred execution.
//!
//! A [`Scheduler`] is a factory of [`Worker`]s; a worker consumes
//! [`Schedulable`]s from one logical queue, executing them in
//! (due time ascending, insertion sequence ascending) order. Due times are
//! [`Duration`]s measured from a process-wide monotonic epoch, which makes
//! readings from distinct workers mutually comparable and lets periodic
//! schedules pin every due time to a fixed reference point instead of the
//! previous completion (no drift).
//!
//! Cancellation is cooperative: disposing the returned [`TaskHandle`]
//! before execution drops the entry; an entry popped concurrently with its
//! cancellation re-checks the handle before running.

use std::{
  cmp::Ordering as CmpOrdering,
  collections::BinaryHeap,
  sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
  },
};

use once_cell::sync::Lazy;

pub use std::time::{Duration, Instant};

use crate::subscription::Subscription;

mod current_thread;
mod immediate;
mod new_thread;
mod run_loop;
mod test_scheduler;

pub use current_thread::{CurrentThreadScheduler, CurrentThreadWorker};
pub use immediate::{ImmediateScheduler, ImmediateWorker};
pub use new_thread::{NewThreadScheduler, NewThreadWorker};
pub use run_loop::{RunLoopScheduler, RunLoopWorker};
pub use test_scheduler::{TestScheduler, TestWorker};

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Monotonic reading of the process clock, as a duration since the shared
/// epoch. All wall-clock workers derive `now()` from this.
pub fn clock_now() -> Duration { EPOCH.elapsed() }

/// Factory of workers. Time-based operators receive a scheduler and
/// acquire their own worker at subscribe time.
pub trait Scheduler {
  type Worker: Worker;

  fn create_worker(&self) -> Self::Worker;
}

/// Executor of deferred tasks, in (due, sequence) order.
pub trait Worker: Clone {
  /// The worker's current time, as a duration since the scheduler epoch.
  fn now(&self) -> Duration { clock_now() }

  /// Schedule `task` to run once the worker's clock reaches `due`.
  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static;

  /// Schedule `task` after `delay` from now (immediately when `None`).
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    self.schedule_at(task, self.now() + delay.unwrap_or_default())
  }
}

const TASK_PENDING: u8 = 0;
const TASK_CANCELLED: u8 = 1;
const TASK_FINISHED: u8 = 2;

/// Cancellation handle for one scheduled task.
#[derive(Clone, Debug)]
pub struct TaskHandle(Arc<AtomicU8>);

impl TaskHandle {
  pub(crate) fn pending() -> Self { TaskHandle(Arc::new(AtomicU8::new(TASK_PENDING))) }

  /// A handle whose task already ran, returned by inline executors.
  pub fn finished() -> Self { TaskHandle(Arc::new(AtomicU8::new(TASK_FINISHED))) }

  pub(crate) fn is_cancelled(&self) -> bool { self.0.load(Ordering::Acquire) == TASK_CANCELLED }

  fn mark_finished(&self) {
    let _ =
      self
        .0
        .compare_exchange(TASK_PENDING, TASK_FINISHED, Ordering::AcqRel, Ordering::Acquire);
  }
}

impl Subscription for TaskHandle {
  fn unsubscribe(&mut self) {
    let _ = self.0.compare_exchange(
      TASK_PENDING,
      TASK_CANCELLED,
      Ordering::AcqRel,
      Ordering::Acquire,
    );
  }

  fn is_closed(&self) -> bool { self.0.load(Ordering::Acquire) != TASK_PENDING }
}

/// One deferred unit of work: a callable, its due time and the insertion
/// sequence number breaking due-time ties deterministically.
pub struct Schedulable {
  due: Duration,
  sequence: u64,
  task: Box<dyn FnOnce() + Send>,
  handle: TaskHandle,
}

impl Schedulable {
  pub fn due(&self) -> Duration { self.due }

  pub fn sequence(&self) -> u64 { self.sequence }

  /// Run the task unless its handle was cancelled in the meantime.
  pub(crate) fn execute(self) {
    if self.handle.is_cancelled() {
      return;
    }
    (self.task)();
    self.handle.mark_finished();
  }
}

impl PartialEq for Schedulable {
  fn eq(&self, other: &Self) -> bool {
    self.due == other.due && self.sequence == other.sequence
  }
}

impl Eq for Schedulable {}

impl PartialOrd for Schedulable {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> { Some(self.cmp(other)) }
}

/// Reversed so that `BinaryHeap` pops the earliest (due, sequence) first.
impl Ord for Schedulable {
  fn cmp(&self, other: &Self) -> CmpOrdering {
    other
      .due
      .cmp(&self.due)
      .then_with(|| other.sequence.cmp(&self.sequence))
  }
}

/// The one queue implementation shared by every queue-backed worker.
#[derive(Default)]
pub(crate) struct TaskQueue {
  heap: BinaryHeap<Schedulable>,
  next_sequence: u64,
}

impl TaskQueue {
  pub(crate) fn push<F>(&mut self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::pending();
    let sequence = self.next_sequence;
    self.next_sequence += 1;
    self
      .heap
      .push(Schedulable { due, sequence, task: Box::new(task), handle: handle.clone() });
    handle
  }

  /// Earliest due time among live entries; cancelled entries are dropped
  /// on the way.
  pub(crate) fn peek_due(&mut self) -> Option<Duration> {
    while let Some(top) = self.heap.peek() {
      if top.handle.is_cancelled() {
        self.heap.pop();
      } else {
        return Some(top.due);
      }
    }
    None
  }

  /// Pop the earliest live entry if it is due at `now`.
  pub(crate) fn pop_due(&mut self, now: Duration) -> Option<Schedulable> {
    match self.peek_due() {
      Some(due) if due <= now => self.heap.pop(),
      _ => None,
    }
  }

  pub(crate) fn clear(&mut self) { self.heap.clear(); }

  pub(crate) fn is_empty(&mut self) -> bool { self.peek_due().is_none() }
}
