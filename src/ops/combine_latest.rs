use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{CompositeSubscription, Subscription},
};

/// Calls the combinator with both sides' latest values on every emission,
/// once each side has produced at least one value. Completes after both
/// sides completed; fails fast on either side's error.
#[derive(Clone)]
pub struct CombineLatestOp<A, B, F> {
  pub(crate) a: A,
  pub(crate) b: B,
  pub(crate) binary_op: F,
}

impl<A, B, F, Out> ObservableType for CombineLatestOp<A, B, F>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
  F: FnMut(A::Item, B::Item) -> Out,
{
  type Item = Out;
  type Err = A::Err;
}

/// Either side's value, tagged so both upstreams can share one observer.
pub enum CombineItem<A, B> {
  First(A),
  Second(B),
}

impl<A, B, F, Out, O> CoreObservable<O> for CombineLatestOp<A, B, F>
where
  A: CoreObservable<SideAObserver<MutArc<CombineLatestObserver<O, F, A::Item, B::Item>>, B::Item>>,
  B: CoreObservable<
    SideBObserver<MutArc<CombineLatestObserver<O, F, A::Item, B::Item>>, A::Item>,
    Err = A::Err,
  >,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
  F: FnMut(A::Item, B::Item) -> Out,
  A::Item: Clone,
  B::Item: Clone,
  O: Observer<Out, A::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let combine = MutArc::own(CombineLatestObserver {
      observer: Some(observer),
      subscription: subscription.clone(),
      binary_op: self.binary_op,
      latest_a: None,
      latest_b: None,
      completed_one: false,
    });
    subscription.add(
      self
        .a
        .actual_subscribe(SideAObserver(combine.clone(), std::marker::PhantomData)),
    );
    subscription.add(self.b.actual_subscribe(SideBObserver(combine, std::marker::PhantomData)));
    subscription
  }
}

pub struct CombineLatestObserver<O, F, A, B> {
  observer: Option<O>,
  subscription: CompositeSubscription,
  binary_op: F,
  latest_a: Option<A>,
  latest_b: Option<B>,
  completed_one: bool,
}

impl<O, F, A, B, Out, Err> Observer<CombineItem<A, B>, Err> for CombineLatestObserver<O, F, A, B>
where
  O: Observer<Out, Err>,
  F: FnMut(A, B) -> Out,
  A: Clone,
  B: Clone,
{
  fn next(&mut self, value: CombineItem<A, B>) {
    match value {
      CombineItem::First(a) => self.latest_a = Some(a),
      CombineItem::Second(b) => self.latest_b = Some(b),
    }
    if let (Some(a), Some(b)) = (self.latest_a.clone(), self.latest_b.clone()) {
      if let Some(observer) = self.observer.as_mut() {
        observer.next((self.binary_op)(a, b));
      }
    }
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    if self.completed_one {
      if let Some(mut observer) = self.observer.take() {
        observer.complete();
      }
      self.subscription.unsubscribe();
    } else {
      self.completed_one = true;
    }
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Tags values of the first upstream before they reach the shared
/// observer.
pub struct SideAObserver<S, B>(S, std::marker::PhantomData<B>);

impl<S, A, B, Err> Observer<A, Err> for SideAObserver<S, B>
where
  S: Observer<CombineItem<A, B>, Err>,
{
  #[inline]
  fn next(&mut self, value: A) { self.0.next(CombineItem::First(value)) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

/// Tags values of the second upstream before they reach the shared
/// observer.
pub struct SideBObserver<S, A>(S, std::marker::PhantomData<A>);

impl<S, A, B, Err> Observer<B, Err> for SideBObserver<S, A>
where
  S: Observer<CombineItem<A, B>, Err>,
{
  #[inline]
  fn next(&mut self, value: B) { self.0.next(CombineItem::Second(value)) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn waits_for_both_sides_then_fires_on_every_emission() {
    let mut a = SharedSubject::<i32, std::convert::Infallible>::new();
    let mut b = SharedSubject::<i32, std::convert::Infallible>::new();
    let sums = Arc::new(Mutex::new(Vec::new()));

    let s = sums.clone();
    a.clone()
      .combine_latest(b.clone(), |x, y| x + y)
      .subscribe(move |v| s.lock().unwrap().push(v));

    a.next(1);
    assert!(sums.lock().unwrap().is_empty());

    b.next(10);
    a.next(2);
    b.next(20);
    assert_eq!(*sums.lock().unwrap(), vec![11, 12, 22]);
  }

  #[test]
  fn completes_after_both_sides() {
    let mut a = SharedSubject::<i32, std::convert::Infallible>::new();
    let mut b = SharedSubject::<i32, std::convert::Infallible>::new();
    let completed = Arc::new(Mutex::new(false));

    let c = completed.clone();
    a.clone()
      .combine_latest(b.clone(), |x, y| (x, y))
      .subscribe_complete(|_| {}, move || *c.lock().unwrap() = true);

    a.complete();
    assert!(!*completed.lock().unwrap());
    b.complete();
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn either_error_fails_fast() {
    let mut a = SharedSubject::<i32, &str>::new();
    let b = SharedSubject::<i32, &str>::new();
    let errors = Arc::new(Mutex::new(0));

    let e = errors.clone();
    a.clone()
      .combine_latest(b.clone(), |x, y| x + y)
      .subscribe_err(|_| {}, move |_| *e.lock().unwrap() += 1);

    a.error("boom");
    assert_eq!(*errors.lock().unwrap(), 1);
    // The sibling subscription was disposed with the failure.
    assert!(b.subscriber_count() == 0);
  }
}
