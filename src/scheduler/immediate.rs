use std::thread;

use super::{clock_now, Duration, Scheduler, TaskHandle, Worker};

/// Runs every task inline, before `schedule` returns, sleeping out any
/// delay on the calling thread.
#[derive(Clone, Copy, Default)]
pub struct ImmediateScheduler;

#[derive(Clone, Copy)]
pub struct ImmediateWorker;

impl Scheduler for ImmediateScheduler {
  type Worker = ImmediateWorker;

  fn create_worker(&self) -> ImmediateWorker { ImmediateWorker }
}

impl Worker for ImmediateWorker {
  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let now = clock_now();
    if due > now {
      thread::sleep(due - now);
    }
    task();
    TaskHandle::finished()
  }
}
