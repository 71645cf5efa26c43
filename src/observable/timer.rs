use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  scheduler::{Duration, Scheduler, TaskHandle, Worker},
};

/// Emit a single `0` after `delay`, then complete.
pub fn timer<SD>(delay: Duration, scheduler: SD) -> Timer<SD>
where
  SD: Scheduler,
{
  Timer { delay, scheduler }
}

#[derive(Clone)]
pub struct Timer<SD> {
  delay: Duration,
  scheduler: SD,
}

impl<SD> ObservableType for Timer<SD> {
  type Item = usize;
  type Err = Infallible;
}

impl<SD, O> CoreObservable<O> for Timer<SD>
where
  SD: Scheduler,
  O: Observer<usize, Infallible> + Send + 'static,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, observer: O) -> TaskHandle {
    let worker = self.scheduler.create_worker();
    let shared = MutArc::own(Some(observer));
    worker.schedule(
      move || {
        let mut observer = shared;
        if !observer.is_closed() {
          observer.next(0);
          observer.complete();
        }
      },
      Some(self.delay),
    )
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::prelude::*;
  use crate::scheduler::TestScheduler;
  use crate::subscription::Subscription;

  #[test]
  fn fires_once_after_the_delay() {
    let scheduler = TestScheduler::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let e = events.clone();

    timer(Duration::from_millis(20), scheduler.clone()).subscribe_complete(
      move |v| e.lock().unwrap().push(v),
      {
        let e = events.clone();
        move || e.lock().unwrap().push(99)
      },
    );

    scheduler.advance_by(Duration::from_millis(10));
    assert!(events.lock().unwrap().is_empty());

    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*events.lock().unwrap(), vec![0, 99]);
  }

  #[test]
  fn cancelling_before_the_deadline_suppresses_the_emission() {
    let scheduler = TestScheduler::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let e = events.clone();

    let mut sub = timer(Duration::from_millis(20), scheduler.clone())
      .subscribe(move |v| e.lock().unwrap().push(v));
    sub.unsubscribe();

    scheduler.advance_by(Duration::from_millis(50));
    assert!(events.lock().unwrap().is_empty());
  }
}
