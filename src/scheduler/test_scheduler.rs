use std::sync::{Arc, Mutex};

use super::{Duration, Scheduler, TaskHandle, TaskQueue, Worker};

/// Virtual-time scheduler for deterministic tests of time-based
/// operators. Nothing runs until [`TestScheduler::advance_by`] (or
/// [`advance_to`](TestScheduler::advance_to)) moves the virtual clock;
/// tasks then execute in (due, sequence) order with the clock pinned to
/// each task's due time, so periodic schedules observe exact tick times.
#[derive(Clone, Default)]
pub struct TestScheduler {
  core: Arc<Mutex<VirtualCore>>,
}

#[derive(Default)]
struct VirtualCore {
  now: Duration,
  queue: TaskQueue,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// The current virtual time.
  pub fn now(&self) -> Duration { self.core.lock().unwrap().now }

  /// Move the virtual clock forward by `step`, running everything that
  /// becomes due on the way (including tasks scheduled by those tasks).
  pub fn advance_by(&self, step: Duration) {
    let target = self.now() + step;
    self.advance_to(target);
  }

  /// Move the virtual clock to `target`, running everything due up to it.
  pub fn advance_to(&self, target: Duration) {
    loop {
      let task = {
        let mut core = self.core.lock().unwrap();
        match core.queue.peek_due() {
          Some(due) if due <= target => {
            core.now = core.now.max(due);
            core.queue.pop_due(due)
          }
          _ => break,
        }
      };
      if let Some(task) = task {
        task.execute();
      }
    }
    let mut core = self.core.lock().unwrap();
    core.now = core.now.max(target);
  }
}

impl Scheduler for TestScheduler {
  type Worker = TestWorker;

  fn create_worker(&self) -> TestWorker { TestWorker { core: self.core.clone() } }
}

#[derive(Clone)]
pub struct TestWorker {
  core: Arc<Mutex<VirtualCore>>,
}

impl Worker for TestWorker {
  fn now(&self) -> Duration { self.core.lock().unwrap().now }

  fn schedule_at<F>(&self, task: F, due: Duration) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    self.core.lock().unwrap().queue.push(task, due)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn due_offsets_execute_in_ascending_time_order() {
    let scheduler = TestScheduler::new();
    let worker = scheduler.create_worker();
    let order = Arc::new(Mutex::new(Vec::new()));

    // Inserted as +30ms, +10ms, +20ms; must run as +10, +20, +30.
    for (label, delay_ms) in [("+30", 30u64), ("+10", 10), ("+20", 20)] {
      let order = order.clone();
      worker.schedule(
        move || order.lock().unwrap().push(label),
        Some(Duration::from_millis(delay_ms)),
      );
    }

    scheduler.advance_by(Duration::from_millis(30));
    assert_eq!(*order.lock().unwrap(), vec!["+10", "+20", "+30"]);
  }

  #[test]
  fn advance_stops_at_target() {
    let scheduler = TestScheduler::new();
    let worker = scheduler.create_worker();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    worker.schedule(move || o.lock().unwrap().push("early"), Some(Duration::from_millis(5)));
    let o = order.clone();
    worker.schedule(move || o.lock().unwrap().push("late"), Some(Duration::from_millis(50)));

    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*order.lock().unwrap(), vec!["early"]);
    assert_eq!(scheduler.now(), Duration::from_millis(10));

    scheduler.advance_by(Duration::from_millis(40));
    assert_eq!(*order.lock().unwrap(), vec!["early", "late"]);
  }

  #[test]
  fn tasks_scheduled_during_advance_run_in_the_same_advance() {
    let scheduler = TestScheduler::new();
    let worker = scheduler.create_worker();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    let w = worker.clone();
    worker.schedule(
      move || {
        o.lock().unwrap().push("first");
        let o2 = o.clone();
        w.schedule(move || o2.lock().unwrap().push("chained"), Some(Duration::from_millis(5)));
      },
      Some(Duration::from_millis(5)),
    );

    scheduler.advance_by(Duration::from_millis(20));
    assert_eq!(*order.lock().unwrap(), vec!["first", "chained"]);
  }
}
