use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDerefMut},
  subscription::{CompositeSubscription, Subscription},
};

/// Exhausts the first source, then subscribes the second. The second
/// source sees no subscription at all until the first completed, which
/// preserves strict source order.
#[derive(Clone)]
pub struct ConcatOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> ObservableType for ConcatOp<A, B>
where
  A: ObservableType,
  B: ObservableType<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;
}

impl<A, B, O> CoreObservable<O> for ConcatOp<A, B>
where
  A: CoreObservable<ConcatFirstObserver<O, B>>,
  B: CoreObservable<ConcatSecondObserver<O>, Item = A::Item, Err = A::Err>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
  O: Observer<A::Item, A::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let first = ConcatFirstObserver {
      observer: MutArc::own(Some(observer)),
      second: MutArc::own(Some(self.b)),
      subscription: subscription.clone(),
    };
    subscription.add(self.a.actual_subscribe(first));
    subscription
  }
}

pub struct ConcatFirstObserver<O, B> {
  observer: MutArc<Option<O>>,
  second: MutArc<Option<B>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, B> Observer<Item, Err> for ConcatFirstObserver<O, B>
where
  O: Observer<Item, Err>,
  B: CoreObservable<ConcatSecondObserver<O>, Item = Item, Err = Err>,
  B::Unsub: Send + 'static,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    self.second.rc_deref_mut().take();
    self.subscription.unsubscribe();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    // Not a terminal for the downstream: hand the observer over to the
    // second source instead.
    let second = self.second.rc_deref_mut().take();
    if let Some(second) = second {
      let next = ConcatSecondObserver {
        observer: self.observer.clone(),
        subscription: self.subscription.clone(),
      };
      let unsub = second.actual_subscribe(next);
      self.subscription.add(unsub);
    } else {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct ConcatSecondObserver<O> {
  observer: MutArc<Option<O>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for ConcatSecondObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    self.observer.complete();
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn second_source_waits_for_the_first() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(0..3)
      .concat(observable::from_iter(10..13))
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 1, 2, 10, 11, 12]);
    assert!(completed);
  }

  #[test]
  fn second_is_not_subscribed_until_first_completes() {
    let subscribed = Arc::new(Mutex::new(false));
    let mut first = SharedSubject::<i32, std::convert::Infallible>::new();

    let s = subscribed.clone();
    let second = observable::defer(move || {
      *s.lock().unwrap() = true;
      observable::of(99)
    });

    let values = Arc::new(Mutex::new(Vec::new()));
    let v = values.clone();
    first
      .clone()
      .concat(second)
      .subscribe(move |x| v.lock().unwrap().push(x));

    first.next(1);
    assert!(!*subscribed.lock().unwrap());

    first.complete();
    assert!(*subscribed.lock().unwrap());
    assert_eq!(*values.lock().unwrap(), vec![1, 99]);
  }

  #[test]
  fn error_in_the_first_skips_the_second() {
    let mut values = vec![];
    let mut errors = 0;
    observable::throw::<i32, _>("boom")
      .concat(observable::from_iter(0..3))
      .subscribe_err(|v| values.push(v), |_| errors += 1);
    assert!(values.is_empty());
    assert_eq!(errors, 1);
  }
}
