use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Emits only the first `count` values, completing the instant the count
/// is reached. From then on the observer reads as closed, which is the
/// cooperative signal for the upstream to stop producing and release its
/// resources.
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> ObservableType for TakeOp<S>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for TakeOp<S>
where
  S: CoreObservable<TakeObserver<O>>,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut observer = observer;
    let done = self.count == 0;
    if done {
      observer.complete();
    }
    self
      .source
      .actual_subscribe(TakeObserver { observer, remaining: self.count, done })
  }
}

pub struct TakeObserver<O> {
  observer: O,
  remaining: usize,
  done: bool,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.done {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.done = true;
      self.observer.complete();
    }
  }

  fn error(&mut self, err: Err) {
    if !self.done {
      self.done = true;
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.done || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn stops_after_count() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(0..100)
      .take(5)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    assert!(completed);
  }

  #[test]
  fn shorter_sources_pass_through() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(0..2)
      .take(5)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 1]);
    assert!(completed);
  }

  #[test]
  fn take_zero_completes_without_values() {
    let mut values: Vec<i32> = vec![];
    let mut completed = false;
    observable::from_iter(0..5)
      .take(0)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert!(values.is_empty());
    assert!(completed);
  }

  #[test]
  fn tears_down_an_infinite_scheduled_upstream() {
    use std::sync::{Arc, Mutex};

    use crate::scheduler::{Duration, TestScheduler};

    let scheduler = TestScheduler::new();
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let t = ticks.clone();

    observable::interval(Duration::from_millis(10), scheduler.clone())
      .take(3)
      .subscribe(move |v| t.lock().unwrap().push(v));

    // Emits exactly 3 values; the pending tick notices the closed
    // downstream within one period and stops rescheduling.
    scheduler.advance_by(Duration::from_millis(200));
    assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2]);
  }
}
