use std::{
  sync::{Arc, Condvar, Mutex},
  thread,
};

use super::{clock_now, Duration, Scheduler, TaskHandle, TaskQueue, Worker};
use crate::subscription::Subscription;

/// One dedicated thread per worker, draining a priority queue in
/// (due, sequence) order. The worker handle is itself a [`Subscription`]:
/// unsubscribing cancels the whole queue and stops the thread, and the
/// thread also stops once every handle to the worker is dropped.
#[derive(Clone, Copy, Default)]
pub struct NewThreadScheduler;

impl Scheduler for NewThreadScheduler {
  type Worker = NewThreadWorker;

  fn create_worker(&self) -> NewThreadWorker {
    let core = Arc::new(WorkerCore {
      state: Mutex::new(WorkerState { queue: TaskQueue::default(), alive: true }),
      available: Condvar::new(),
    });

    let drain = core.clone();
    thread::Builder::new()
      .name("rill-worker".into())
      .spawn(move || drain_loop(&drain))
      .expect("failed to spawn worker thread");

    NewThreadWorker { _shutdown: Arc::new(ShutdownGuard { core: core.clone() }), core }
  }
}

struct WorkerCore {
  state: Mutex<WorkerState>,
  available: Condvar,
}

struct WorkerState {
  queue: TaskQueue,
  alive: bool,
}

impl WorkerCore {
  fn shutdown(&self) {
    let mut state = self.state.lock().unwrap();
    state.alive = false;
    state.queue.clear();
    drop(state);
    self.available.notify_all();
  }
}

/// Stops the drain thread when the last worker handle goes away.
struct ShutdownGuard {
  core: Arc<WorkerCore>,
}

impl Drop for ShutdownGuard {
  fn drop(&mut self) { self.core.shutdown(); }
}

#[derive(Clone)]
pub struct NewThreadWorker {
  core: Arc<WorkerCore>,
  _shutdown: Arc<ShutdownGuard>,
}

impl Worker for NewThreadWorker {
  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let mut state = self.core.state.lock().unwrap();
    if !state.alive {
      let mut handle = TaskHandle::pending();
      handle.unsubscribe();
      return handle;
    }
    let handle = state.queue.push(task, due);
    drop(state);
    self.core.available.notify_one();
    handle
  }
}

impl Subscription for NewThreadWorker {
  fn unsubscribe(&mut self) { self.core.shutdown(); }

  fn is_closed(&self) -> bool { !self.core.state.lock().unwrap().alive }
}

fn drain_loop(core: &WorkerCore) {
  loop {
    let task = {
      let mut state = core.state.lock().unwrap();
      loop {
        if !state.alive {
          return;
        }
        match state.queue.peek_due() {
          None => state = core.available.wait(state).unwrap(),
          Some(due) => {
            let now = clock_now();
            if due <= now {
              break state.queue.pop_due(now);
            }
            state = core.available.wait_timeout(state, due - now).unwrap().0;
          }
        }
      }
    };
    if let Some(task) = task {
      task.execute();
    }
  }
}
