use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{CompositeSubscription, Subscription},
};

/// Flattens a stream of streams by always mirroring the most recent inner
/// stream. The previous inner subscription is disposed the instant a new
/// inner arrives, so at most one inner is ever live. Completes once the
/// outer has completed and the last inner completed.
#[derive(Clone)]
pub struct SwitchOnNextOp<S> {
  pub(crate) source: S,
}

impl<S> ObservableType for SwitchOnNextOp<S>
where
  S: ObservableType,
  S::Item: ObservableType<Err = S::Err>,
{
  type Item = <S::Item as ObservableType>::Item;
  type Err = S::Err;
}

type SwitchStateRc<O> = MutArc<SwitchState<O>>;
type InnerSlot = MutArc<Option<Box<dyn Subscription + Send>>>;

impl<S, O> CoreObservable<O> for SwitchOnNextOp<S>
where
  S: CoreObservable<OuterObserver<O>>,
  S::Item: CoreObservable<InnerObserver<O>, Err = S::Err>,
  <S::Item as CoreObservable<InnerObserver<O>>>::Unsub: Send + 'static,
  S::Unsub: Send + 'static,
  O: Observer<<S::Item as ObservableType>::Item, S::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let state = MutArc::own(SwitchState {
      observer: Some(observer),
      outer_done: false,
      inner_active: false,
    });
    let current: InnerSlot = MutArc::own(None);
    // The slot is registered once; disposing the composite reaches
    // whichever inner is live at that moment.
    subscription.add(current.clone());

    let outer = OuterObserver { state, current, subscription: subscription.clone() };
    subscription.add(self.source.actual_subscribe(outer));
    subscription
  }
}

pub struct SwitchState<O> {
  observer: Option<O>,
  outer_done: bool,
  inner_active: bool,
}

pub struct OuterObserver<O> {
  state: SwitchStateRc<O>,
  current: InnerSlot,
  subscription: CompositeSubscription,
}

impl<Inner, Err, O> Observer<Inner, Err> for OuterObserver<O>
where
  Inner: CoreObservable<InnerObserver<O>, Err = Err>,
  Inner::Unsub: Send + 'static,
  O: Observer<Inner::Item, Err>,
{
  fn next(&mut self, inner: Inner) {
    // Dispose the previous inner before the new one can deliver.
    if let Some(mut previous) = self.current.rc_deref_mut().take() {
      previous.unsubscribe();
    }
    self.state.rc_deref_mut().inner_active = true;
    let inner_observer = InnerObserver {
      state: self.state.clone(),
      subscription: self.subscription.clone(),
    };
    let unsub = inner.actual_subscribe(inner_observer);
    *self.current.rc_deref_mut() = Some(Box::new(unsub));
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.outer_done = true;
      if state.inner_active { None } else { state.observer.take() }
    };
    if let Some(mut observer) = observer {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}

pub struct InnerObserver<O> {
  state: SwitchStateRc<O>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for InnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.inner_active = false;
      if state.outer_done { state.observer.take() } else { None }
    };
    if let Some(mut observer) = observer {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn mirrors_the_most_recent_inner() {
    let mut outer =
      SharedSubject::<SharedSubject<i32, std::convert::Infallible>, std::convert::Infallible>::new();
    let mut first = SharedSubject::<i32, std::convert::Infallible>::new();
    let mut second = SharedSubject::<i32, std::convert::Infallible>::new();

    let values = Arc::new(Mutex::new(Vec::new()));
    let v = values.clone();
    outer
      .clone()
      .switch_on_next()
      .subscribe(move |x| v.lock().unwrap().push(x));

    outer.next(first.clone());
    first.next(1);
    first.next(2);

    outer.next(second.clone());
    // The first inner was disposed the instant the second arrived.
    assert_eq!(first.subscriber_count(), 0);
    first.next(3);
    second.next(10);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 10]);
  }

  #[test]
  fn completes_only_after_outer_and_last_inner() {
    let mut outer =
      SharedSubject::<SharedSubject<i32, std::convert::Infallible>, std::convert::Infallible>::new();
    let mut inner = SharedSubject::<i32, std::convert::Infallible>::new();
    let completed = Arc::new(Mutex::new(false));

    let c = completed.clone();
    outer
      .clone()
      .switch_on_next()
      .subscribe_complete(|_| {}, move || *c.lock().unwrap() = true);

    outer.next(inner.clone());
    outer.complete();
    assert!(!*completed.lock().unwrap());

    inner.complete();
    assert!(*completed.lock().unwrap());
  }
}
