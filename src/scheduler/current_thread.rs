use std::{
  sync::{Arc, Mutex},
  thread,
};

use super::{clock_now, Duration, Scheduler, TaskHandle, TaskQueue, Worker};

/// Trampoline scheduler: tasks always enqueue, and the first non-nested
/// `schedule` call drains the queue in (due, sequence) order until it is
/// empty. Tasks scheduled while a drain is running only enqueue and
/// never start a second, recursive drain, which bounds stack growth under
/// recursive scheduling.
///
/// The queue is explicit state owned by the worker value, not hidden
/// thread-ambient state; every worker created by this scheduler carries
/// its own queue.
#[derive(Clone, Copy, Default)]
pub struct CurrentThreadScheduler;

impl Scheduler for CurrentThreadScheduler {
  type Worker = CurrentThreadWorker;

  fn create_worker(&self) -> CurrentThreadWorker {
    CurrentThreadWorker { core: Arc::new(Mutex::new(TrampolineCore::default())) }
  }
}

#[derive(Clone)]
pub struct CurrentThreadWorker {
  core: Arc<Mutex<TrampolineCore>>,
}

#[derive(Default)]
struct TrampolineCore {
  queue: TaskQueue,
  draining: bool,
}

impl Worker for CurrentThreadWorker {
  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = {
      let mut core = self.core.lock().unwrap();
      let handle = core.queue.push(task, due);
      if core.draining {
        return handle;
      }
      core.draining = true;
      handle
    };
    self.drain();
    handle
  }
}

impl CurrentThreadWorker {
  fn drain(&self) {
    loop {
      let task = {
        let mut core = self.core.lock().unwrap();
        match core.queue.peek_due() {
          None => {
            core.draining = false;
            return;
          }
          Some(due) => {
            let now = clock_now();
            if due > now {
              drop(core);
              thread::sleep(due - now);
              continue;
            }
            core.queue.pop_due(due)
          }
        }
      };
      if let Some(task) = task {
        task.execute();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;

  #[test]
  fn nested_schedule_enqueues_instead_of_recursing() {
    let worker = CurrentThreadScheduler.create_worker();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    let inner_worker = worker.clone();
    worker.schedule(
      move || {
        o.lock().unwrap().push("outer:start");
        let o2 = o.clone();
        // Runs after the outer task returns, not within it.
        inner_worker.schedule(move || o2.lock().unwrap().push("inner"), None);
        o.lock().unwrap().push("outer:end");
      },
      None,
    );

    assert_eq!(*order.lock().unwrap(), vec!["outer:start", "outer:end", "inner"]);
  }

  #[test]
  fn drains_in_due_order() {
    let worker = CurrentThreadScheduler.create_worker();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    let w = worker.clone();
    worker.schedule(
      move || {
        for (label, delay_ms) in [("late", 20u64), ("soon", 5), ("later", 30)] {
          let o = o.clone();
          w.schedule(move || o.lock().unwrap().push(label), Some(Duration::from_millis(delay_ms)));
        }
      },
      None,
    );

    assert_eq!(*order.lock().unwrap(), vec!["soon", "late", "later"]);
  }
}
