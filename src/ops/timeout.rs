use std::fmt;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  scheduler::{Duration, Scheduler, TaskHandle, Worker},
  subscription::{CompositeSubscription, Subscription},
};

/// The failure a timed-out stream terminates with. Convert it into richer
/// error types via `From`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutError;

impl fmt::Display for TimeoutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "stream made no progress within the timeout window")
  }
}

impl std::error::Error for TimeoutError {}

/// Races a deadline against upstream progress. Every upstream event
/// cancels the pending deadline the instant it arrives and, for values,
/// arms a fresh one; if a deadline fires first, the upstream is disposed
/// and the failure is delivered downstream. The two racers resolve their
/// winner through one shared observer cell, so exactly one of them
/// terminates the stream.
#[derive(Clone)]
pub struct TimeoutOp<S, SD> {
  pub(crate) source: S,
  pub(crate) dur: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> ObservableType for TimeoutOp<S, SD>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, SD, O> CoreObservable<O> for TimeoutOp<S, SD>
where
  S: CoreObservable<TimeoutObserver<O, SD::Worker>>,
  SD: Scheduler,
  SD::Worker: Send + 'static,
  S::Err: From<TimeoutError> + Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let pending: MutArc<Option<TaskHandle>> = MutArc::own(None);
    subscription.add(pending.clone());

    let observer = TimeoutObserver {
      observer: MutArc::own(Some(observer)),
      worker: self.scheduler.create_worker(),
      dur: self.dur,
      pending,
      subscription: subscription.clone(),
    };
    // The first deadline covers the window before any upstream event.
    arm_deadline::<O, SD::Worker, S::Item, S::Err>(
      &observer.observer,
      &observer.worker,
      observer.dur,
      &observer.pending,
      &observer.subscription,
    );
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

fn arm_deadline<O, W, Item, Err>(
  observer: &MutArc<Option<O>>, worker: &W, dur: Duration, pending: &MutArc<Option<TaskHandle>>,
  subscription: &CompositeSubscription,
) where
  O: Observer<Item, Err> + Send + 'static,
  Err: From<TimeoutError> + Send + 'static,
  W: Worker + Send + 'static,
{
  if let Some(mut stale) = pending.rc_deref_mut().take() {
    stale.unsubscribe();
  }
  let observer = observer.clone();
  let mut upstream = subscription.clone();
  let handle = worker.schedule(
    move || {
      let winner = observer.rc_deref_mut().take();
      if let Some(mut winner) = winner {
        upstream.unsubscribe();
        winner.error(Err::from(TimeoutError));
      }
    },
    Some(dur),
  );
  *pending.rc_deref_mut() = Some(handle);
}

pub struct TimeoutObserver<O, W> {
  observer: MutArc<Option<O>>,
  worker: W,
  dur: Duration,
  pending: MutArc<Option<TaskHandle>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, W> Observer<Item, Err> for TimeoutObserver<O, W>
where
  O: Observer<Item, Err> + Send + 'static,
  Err: From<TimeoutError> + Send + 'static,
  W: Worker + Send + 'static,
{
  fn next(&mut self, value: Item) {
    // Cancel the racing deadline the instant progress is observed.
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    if let Some(observer) = self.observer.rc_deref_mut().as_mut() {
      observer.next(value);
    }
    arm_deadline::<O, W, Item, Err>(
      &self.observer,
      &self.worker,
      self.dur,
      &self.pending,
      &self.subscription,
    );
  }

  fn error(&mut self, err: Err) {
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    let loser = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = loser {
      self.subscription.unsubscribe();
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    if let Some(mut stale) = self.pending.rc_deref_mut().take() {
      stale.unsubscribe();
    }
    let winner = self.observer.rc_deref_mut().take();
    if let Some(mut observer) = winner {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.observer.rc_deref().is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::TimeoutError;
  use crate::prelude::*;
  use crate::scheduler::TestScheduler;

  #[test]
  fn quiet_upstream_times_out_and_is_disposed() {
    let scheduler = TestScheduler::new();
    let source = SharedSubject::<i32, TimeoutError>::new();
    let errors = Arc::new(Mutex::new(Vec::new()));

    let e = errors.clone();
    source
      .clone()
      .timeout(Duration::from_millis(50), scheduler.clone())
      .subscribe_err(|_| {}, move |err| e.lock().unwrap().push(err));

    scheduler.advance_by(Duration::from_millis(50));
    assert_eq!(*errors.lock().unwrap(), vec![TimeoutError]);
    // The losing upstream branch was disposed the instant the deadline won.
    assert_eq!(source.subscriber_count(), 0);
  }

  #[test]
  fn steady_progress_keeps_the_deadline_at_bay() {
    let scheduler = TestScheduler::new();
    let mut source = SharedSubject::<i32, TimeoutError>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(Mutex::new(0));

    let s = seen.clone();
    let e = errors.clone();
    source
      .clone()
      .timeout(Duration::from_millis(50), scheduler.clone())
      .subscribe_err(move |v| s.lock().unwrap().push(v), move |_| *e.lock().unwrap() += 1);

    for v in 0..4 {
      scheduler.advance_by(Duration::from_millis(30));
      source.next(v);
    }
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(*errors.lock().unwrap(), 0);
  }

  #[test]
  fn completion_cancels_the_pending_deadline() {
    let scheduler = TestScheduler::new();
    let mut source = SharedSubject::<i32, TimeoutError>::new();
    let completed = Arc::new(Mutex::new(false));
    let errors = Arc::new(Mutex::new(0));

    let c = completed.clone();
    let e = errors.clone();
    source
      .clone()
      .timeout(Duration::from_millis(50), scheduler.clone())
      .subscribe_all(|_| {}, move |_| *e.lock().unwrap() += 1, move || *c.lock().unwrap() = true);

    source.complete();
    scheduler.advance_by(Duration::from_millis(200));
    assert!(*completed.lock().unwrap());
    assert_eq!(*errors.lock().unwrap(), 0);
  }
}
