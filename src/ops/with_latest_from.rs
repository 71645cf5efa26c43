use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{CompositeSubscription, Subscription},
};

/// Emits a pair on every primary-side value, using the secondary side's
/// latest value; primary values arriving before the secondary has emitted
/// are dropped. Only the primary side's completion completes the output;
/// an error on either side fails fast.
#[derive(Clone)]
pub struct WithLatestFromOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> ObservableType for WithLatestFromOp<A, B>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
}

type StateRc<O, ItemB> = MutArc<LatestState<O, ItemB>>;

impl<A, B, O> CoreObservable<O> for WithLatestFromOp<A, B>
where
  A: CoreObservable<PrimaryObserver<O, B::Item>>,
  B: CoreObservable<SecondaryObserver<O, A::Item, B::Item>, Err = A::Err>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
  B::Item: Clone,
  O: Observer<(A::Item, B::Item), A::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let state = MutArc::own(LatestState { observer: Some(observer), latest: None });

    // Subscribe the secondary first so a synchronous secondary source has
    // its latest value ready for the primary's first emission.
    let secondary = SecondaryObserver {
      state: state.clone(),
      subscription: subscription.clone(),
      _primary: std::marker::PhantomData,
    };
    subscription.add(self.b.actual_subscribe(secondary));

    let primary = PrimaryObserver { state, subscription: subscription.clone() };
    subscription.add(self.a.actual_subscribe(primary));
    subscription
  }
}

pub struct LatestState<O, ItemB> {
  observer: Option<O>,
  latest: Option<ItemB>,
}

pub struct PrimaryObserver<O, ItemB> {
  state: StateRc<O, ItemB>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, ItemB> Observer<Item, Err> for PrimaryObserver<O, ItemB>
where
  O: Observer<(Item, ItemB), Err>,
  ItemB: Clone,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if let Some(latest) = state.latest.clone() {
      if let Some(observer) = state.observer.as_mut() {
        observer.next((value, latest));
      }
    }
  }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.complete();
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}

pub struct SecondaryObserver<O, ItemA, ItemB> {
  state: StateRc<O, ItemB>,
  subscription: CompositeSubscription,
  _primary: std::marker::PhantomData<ItemA>,
}

impl<ItemB, Err, O, ItemA> Observer<ItemB, Err> for SecondaryObserver<O, ItemA, ItemB>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) { self.state.rc_deref_mut().latest = Some(value); }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    if let Some(mut observer) = self.state.rc_deref_mut().observer.take() {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    // The secondary finishing does not end the pair stream.
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().observer.is_closed() }
}
