use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDerefMut},
  subscription::Subscription,
};

/// Runs a callback exactly once when the stream terminates, whether by
/// value exhaustion, failure, or unsubscription.
#[derive(Clone)]
pub struct FinalizeOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> ObservableType for FinalizeOp<S, F>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F, O> CoreObservable<O> for FinalizeOp<S, F>
where
  S: CoreObservable<FinalizeObserver<O, F>>,
  F: FnOnce(),
  O: Observer<S::Item, S::Err>,
{
  type Unsub = FinalizeSubscription<S::Unsub, F>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let func = MutArc::own(Some(self.func));
    let inner = self
      .source
      .actual_subscribe(FinalizeObserver { observer, func: func.clone() });
    FinalizeSubscription { inner, func }
  }
}

pub struct FinalizeObserver<O, F> {
  observer: O,
  func: MutArc<Option<F>>,
}

impl<Item, Err, O, F> Observer<Item, Err> for FinalizeObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    self.observer.error(err);
    if let Some(func) = self.func.rc_deref_mut().take() {
      func();
    }
  }

  fn complete(&mut self) {
    self.observer.complete();
    if let Some(func) = self.func.rc_deref_mut().take() {
      func();
    }
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct FinalizeSubscription<U, F> {
  inner: U,
  func: MutArc<Option<F>>,
}

impl<U, F> Subscription for FinalizeSubscription<U, F>
where
  U: Subscription,
  F: FnOnce(),
{
  fn unsubscribe(&mut self) {
    self.inner.unsubscribe();
    if let Some(func) = self.func.rc_deref_mut().take() {
      func();
    }
  }

  fn is_closed(&self) -> bool { self.inner.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use crate::prelude::*;

  #[test]
  fn runs_once_on_completion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let mut sub = observable::from_iter(0..3)
      .finalize(move || {
        c.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe(|_| {});
    sub.unsubscribe();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn runs_on_unsubscribe_without_terminal() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut source = SharedSubject::<i32, std::convert::Infallible>::new();

    let c = calls.clone();
    let mut sub = source
      .clone()
      .finalize(move || {
        c.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe(|_| {});

    source.next(1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    sub.unsubscribe();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn runs_on_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    observable::throw::<i32, _>("boom")
      .finalize(move || {
        c.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe_err(|_| {}, |_| {});
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
