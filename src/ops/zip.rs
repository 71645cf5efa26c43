use std::collections::VecDeque;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{CompositeSubscription, Subscription},
};

/// Pairs values positionally: an emission happens only when both sides
/// have a queued, not-yet-consumed value, consuming one from each queue.
/// Completes as soon as no further pair can ever form (a side completed
/// with an empty queue) and disposes the remaining subscriptions.
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> ObservableType for ZipOp<A, B>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
}

type ZipStateRc<O, A, B> = MutArc<ZipState<O, A, B>>;

impl<A, B, O> CoreObservable<O> for ZipOp<A, B>
where
  A: CoreObservable<ZipSideA<O, A::Item, B::Item>>,
  B: CoreObservable<ZipSideB<O, A::Item, B::Item>, Err = A::Err>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
  O: Observer<(A::Item, B::Item), A::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let state = MutArc::own(ZipState {
      observer: Some(observer),
      queue_a: VecDeque::new(),
      queue_b: VecDeque::new(),
      done_a: false,
      done_b: false,
    });

    let side_a = ZipSideA { state: state.clone(), subscription: subscription.clone() };
    subscription.add(self.a.actual_subscribe(side_a));
    let side_b = ZipSideB { state, subscription: subscription.clone() };
    subscription.add(self.b.actual_subscribe(side_b));
    subscription
  }
}

pub struct ZipState<O, ItemA, ItemB> {
  observer: Option<O>,
  queue_a: VecDeque<ItemA>,
  queue_b: VecDeque<ItemB>,
  done_a: bool,
  done_b: bool,
}

impl<O, ItemA, ItemB> ZipState<O, ItemA, ItemB> {
  /// No further pair can form once a side has completed and drained.
  fn exhausted(&self) -> bool {
    (self.done_a && self.queue_a.is_empty()) || (self.done_b && self.queue_b.is_empty())
  }

  fn finish<Err>(&mut self, subscription: &mut CompositeSubscription)
  where
    O: Observer<(ItemA, ItemB), Err>,
  {
    if let Some(mut observer) = self.observer.take() {
      subscription.unsubscribe();
      observer.complete();
    }
  }
}

pub struct ZipSideA<O, ItemA, ItemB> {
  state: ZipStateRc<O, ItemA, ItemB>,
  subscription: CompositeSubscription,
}

pub struct ZipSideB<O, ItemA, ItemB> {
  state: ZipStateRc<O, ItemA, ItemB>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, ItemB> Observer<Item, Err> for ZipSideA<O, Item, ItemB>
where
  O: Observer<(Item, ItemB), Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    match state.queue_b.pop_front() {
      Some(b) => {
        if let Some(observer) = state.observer.as_mut() {
          observer.next((value, b));
        }
        if state.exhausted() {
          state.finish::<Err>(&mut self.subscription);
        }
      }
      None => state.queue_a.push_back(value),
    }
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let mut state = self.state.rc_deref_mut();
    state.done_a = true;
    if state.exhausted() {
      state.finish::<Err>(&mut self.subscription);
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}

impl<Item, Err, O, ItemA> Observer<Item, Err> for ZipSideB<O, ItemA, Item>
where
  O: Observer<(ItemA, Item), Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    match state.queue_a.pop_front() {
      Some(a) => {
        if let Some(observer) = state.observer.as_mut() {
          observer.next((a, value));
        }
        if state.exhausted() {
          state.finish::<Err>(&mut self.subscription);
        }
      }
      None => state.queue_b.push_back(value),
    }
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let mut state = self.state.rc_deref_mut();
    state.done_b = true;
    if state.exhausted() {
      state.finish::<Err>(&mut self.subscription);
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}
