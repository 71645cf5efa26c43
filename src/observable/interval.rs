use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  scheduler::{Duration, Scheduler, Worker},
  subscription::{CompositeSubscription, Subscription},
};

/// Emit `0, 1, 2, ...` every `period` on a worker of `scheduler`.
///
/// Every tick's due time is computed from the subscribe-time reference
/// point (`base + (n + 1) * period`), never from the previous tick's
/// completion, so the schedule does not drift.
pub fn interval<SD>(period: Duration, scheduler: SD) -> Interval<SD>
where
  SD: Scheduler,
{
  Interval { period, scheduler }
}

#[derive(Clone)]
pub struct Interval<SD> {
  period: Duration,
  scheduler: SD,
}

impl<SD> ObservableType for Interval<SD> {
  type Item = usize;
  type Err = Infallible;
}

impl<SD, O> CoreObservable<O> for Interval<SD>
where
  SD: Scheduler,
  SD::Worker: Send + 'static,
  O: Observer<usize, Infallible> + Send + 'static,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let worker = self.scheduler.create_worker();
    let subscription = CompositeSubscription::new();
    let state = TickState {
      observer: MutArc::own(Some(observer)),
      subscription: subscription.clone(),
      period: self.period,
      base: worker.now(),
    };
    schedule_tick(worker, state, 0);
    subscription
  }
}

struct TickState<O> {
  observer: MutArc<Option<O>>,
  subscription: CompositeSubscription,
  period: Duration,
  base: Duration,
}

impl<O> Clone for TickState<O> {
  fn clone(&self) -> Self {
    TickState {
      observer: self.observer.clone(),
      subscription: self.subscription.clone(),
      period: self.period,
      base: self.base,
    }
  }
}

fn schedule_tick<O, W>(worker: W, state: TickState<O>, tick: usize)
where
  W: Worker + Send + 'static,
  O: Observer<usize, Infallible> + Send + 'static,
{
  let due = state.base + state.period * (tick as u32 + 1);
  let subscription = state.subscription.clone();
  let next_worker = worker.clone();
  let handle = worker.schedule_at(
    move || {
      if state.subscription.is_closed() || state.observer.is_closed() {
        return;
      }
      let mut observer = state.observer.clone();
      observer.next(tick);
      schedule_tick(next_worker, state, tick + 1);
    },
    due,
  );
  subscription.add(handle);
}
