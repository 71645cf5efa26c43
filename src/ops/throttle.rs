use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scheduler::{Duration, Scheduler, Worker},
};

/// Leading-edge rate limiting: a value is forwarded immediately, then
/// everything is dropped until `dur` has elapsed on the worker's clock.
/// Purely clock-driven: nothing is scheduled, so there is nothing to
/// cancel.
#[derive(Clone)]
pub struct ThrottleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) dur: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> ObservableType for ThrottleOp<S, SD>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, SD, O> CoreObservable<O> for ThrottleOp<S, SD>
where
  S: CoreObservable<ThrottleObserver<O, SD::Worker>>,
  SD: Scheduler,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ThrottleObserver {
      observer,
      worker: self.scheduler.create_worker(),
      dur: self.dur,
      next_allowed: None,
    })
  }
}

pub struct ThrottleObserver<O, W> {
  observer: O,
  worker: W,
  dur: Duration,
  next_allowed: Option<Duration>,
}

impl<Item, Err, O, W> Observer<Item, Err> for ThrottleObserver<O, W>
where
  O: Observer<Item, Err>,
  W: Worker,
{
  fn next(&mut self, value: Item) {
    let now = self.worker.now();
    match self.next_allowed {
      Some(allowed) if now < allowed => {}
      _ => {
        self.next_allowed = Some(now + self.dur);
        self.observer.next(value);
      }
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;
  use crate::scheduler::TestScheduler;

  #[test]
  fn suppresses_values_inside_the_window() {
    let scheduler = TestScheduler::new();
    let mut source = SharedSubject::<i32, std::convert::Infallible>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    source
      .clone()
      .throttle(Duration::from_millis(10), scheduler.clone())
      .subscribe(move |v| s.lock().unwrap().push(v));

    source.next(1);
    source.next(2);
    scheduler.advance_by(Duration::from_millis(5));
    source.next(3);
    scheduler.advance_by(Duration::from_millis(5));
    source.next(4);
    source.next(5);

    assert_eq!(*seen.lock().unwrap(), vec![1, 4]);
  }
}
