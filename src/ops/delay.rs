use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  scheduler::{Duration, Scheduler, Worker},
  subscription::{CompositeSubscription, Subscription},
};

/// Re-times each value (and the completion) by a fixed offset on a worker
/// of the injected scheduler. Arrival order is preserved: equal due times
/// resolve by insertion sequence. Errors skip the delay and fail fast,
/// cancelling any pending deliveries.
#[derive(Clone)]
pub struct DelayOp<S, SD> {
  pub(crate) source: S,
  pub(crate) dur: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> ObservableType for DelayOp<S, SD>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, SD, O> CoreObservable<O> for DelayOp<S, SD>
where
  S: CoreObservable<DelayObserver<O, SD::Worker>>,
  SD: Scheduler,
  SD::Worker: Send + 'static,
  S::Item: Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let observer = DelayObserver {
      observer: MutArc::own(Some(observer)),
      worker: self.scheduler.create_worker(),
      dur: self.dur,
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

pub struct DelayObserver<O, W> {
  observer: MutArc<Option<O>>,
  worker: W,
  dur: Duration,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, W> Observer<Item, Err> for DelayObserver<O, W>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  W: Worker + Send + 'static,
{
  fn next(&mut self, value: Item) {
    let observer = self.observer.clone();
    let handle = self.worker.schedule(
      move || {
        let mut observer = observer;
        observer.next(value);
      },
      Some(self.dur),
    );
    self.subscription.add(handle);
  }

  fn error(&mut self, err: Err) {
    // Fail fast: pending deliveries are dropped with the subscription.
    self.subscription.unsubscribe();
    let observer = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = self.observer.clone();
    let handle = self.worker.schedule(
      move || {
        let mut observer = observer;
        observer.complete();
      },
      Some(self.dur),
    );
    self.subscription.add(handle);
  }

  fn is_closed(&self) -> bool { self.observer.rc_deref().is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;
  use crate::scheduler::TestScheduler;

  #[test]
  fn values_arrive_later_in_arrival_order() {
    let scheduler = TestScheduler::new();
    let mut source = SharedSubject::<i32, std::convert::Infallible>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));

    let s = seen.clone();
    let c = completed.clone();
    source
      .clone()
      .delay(Duration::from_millis(10), scheduler.clone())
      .subscribe_complete(move |v| s.lock().unwrap().push(v), move || *c.lock().unwrap() = true);

    source.next(1);
    source.next(2);
    source.complete();
    assert!(seen.lock().unwrap().is_empty());

    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn unsubscribing_cancels_pending_deliveries() {
    let scheduler = TestScheduler::new();
    let mut source = SharedSubject::<i32, std::convert::Infallible>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    let mut sub = source
      .clone()
      .delay(Duration::from_millis(10), scheduler.clone())
      .subscribe(move |v| s.lock().unwrap().push(v));

    source.next(1);
    sub.unsubscribe();
    scheduler.advance_by(Duration::from_millis(20));
    assert!(seen.lock().unwrap().is_empty());
  }
}
