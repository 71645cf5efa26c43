use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  scheduler::{Duration, Scheduler, TaskHandle, Worker},
  subscription::{CompositeSubscription, Subscription},
};

/// Emits a value only after `dur` has passed without a newer one. Every
/// upstream value cancels the pending emission and schedules a fresh one,
/// so at most one emission is ever pending. Completion flushes the
/// trailing value synchronously.
#[derive(Clone)]
pub struct DebounceOp<S, SD> {
  pub(crate) source: S,
  pub(crate) dur: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> ObservableType for DebounceOp<S, SD>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, SD, O> CoreObservable<O> for DebounceOp<S, SD>
where
  S: CoreObservable<DebounceObserver<O, SD::Worker, S::Item>>,
  SD: Scheduler,
  SD::Worker: Send + 'static,
  S::Item: Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let pending: MutArc<Option<TaskHandle>> = MutArc::own(None);
    // Disposing the chain also cancels whichever emission is pending.
    subscription.add(pending.clone());

    let observer = DebounceObserver {
      observer: MutArc::own(Some(observer)),
      worker: self.scheduler.create_worker(),
      dur: self.dur,
      trailing: MutArc::own(None),
      pending,
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

pub struct DebounceObserver<O, W, Item> {
  observer: MutArc<Option<O>>,
  worker: W,
  dur: Duration,
  trailing: MutArc<Option<Item>>,
  pending: MutArc<Option<TaskHandle>>,
}

impl<Item, Err, O, W> Observer<Item, Err> for DebounceObserver<O, W, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  W: Worker + Send + 'static,
{
  fn next(&mut self, value: Item) {
    *self.trailing.rc_deref_mut() = Some(value);
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    let observer = self.observer.clone();
    let trailing = self.trailing.clone();
    let handle = self.worker.schedule(
      move || {
        let value = trailing.rc_deref_mut().take();
        if let Some(value) = value {
          let mut observer = observer;
          observer.next(value);
        }
      },
      Some(self.dur),
    );
    *self.pending.rc_deref_mut() = Some(handle);
  }

  fn error(&mut self, err: Err) {
    self.trailing.rc_deref_mut().take();
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    let observer = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    let trailing = self.trailing.rc_deref_mut().take();
    let observer = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      if let Some(value) = trailing {
        observer.next(value);
      }
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.observer.rc_deref().is_closed() }
}
