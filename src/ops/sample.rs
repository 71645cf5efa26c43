use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  scheduler::{Duration, Scheduler, Worker},
  subscription::{CompositeSubscription, Subscription},
};

/// Every `period`, emits the latest value that arrived since the previous
/// sample, if any. Sampling ticks are pinned to the subscribe-time
/// reference (`base + n * period`), so the sampling grid does not drift.
#[derive(Clone)]
pub struct SampleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) period: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> ObservableType for SampleOp<S, SD>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, SD, O> CoreObservable<O> for SampleOp<S, SD>
where
  S: CoreObservable<SampleObserver<O, S::Item>>,
  SD: Scheduler,
  SD::Worker: Send + 'static,
  S::Item: Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let observer = MutArc::own(Some(observer));
    let latest = MutArc::own(None);

    let worker = self.scheduler.create_worker();
    let base = worker.now();
    schedule_sample::<O, S::Item, S::Err, SD::Worker>(
      worker,
      SampleTick {
        observer: observer.clone(),
        latest: latest.clone(),
        subscription: subscription.clone(),
        period: self.period,
        base,
      },
      1,
    );

    let upstream = SampleObserver { observer, latest, subscription: subscription.clone() };
    subscription.add(self.source.actual_subscribe(upstream));
    subscription
  }
}

struct SampleTick<O, Item> {
  observer: MutArc<Option<O>>,
  latest: MutArc<Option<Item>>,
  subscription: CompositeSubscription,
  period: Duration,
  base: Duration,
}

impl<O, Item> Clone for SampleTick<O, Item> {
  fn clone(&self) -> Self {
    SampleTick {
      observer: self.observer.clone(),
      latest: self.latest.clone(),
      subscription: self.subscription.clone(),
      period: self.period,
      base: self.base,
    }
  }
}

fn schedule_sample<O, Item, Err, W>(worker: W, tick: SampleTick<O, Item>, n: u32)
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: 'static,
  W: Worker + Send + 'static,
{
  let due = tick.base + tick.period * n;
  let subscription = tick.subscription.clone();
  let next_worker = worker.clone();
  let handle = worker.schedule_at(
    move || {
      if tick.subscription.is_closed() || tick.observer.is_closed() {
        return;
      }
      let value = tick.latest.rc_deref_mut().take();
      if let Some(value) = value {
        let mut observer = tick.observer.clone();
        observer.next(value);
      }
      schedule_sample(next_worker, tick, n + 1);
    },
    due,
  );
  subscription.add(handle);
}

pub struct SampleObserver<O, Item> {
  observer: MutArc<Option<O>>,
  latest: MutArc<Option<Item>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for SampleObserver<O, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
{
  fn next(&mut self, value: Item) { *self.latest.rc_deref_mut() = Some(value); }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    let observer = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.complete();
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.observer.rc_deref().is_closed() }
}
