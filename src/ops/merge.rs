use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::MutArc,
  subscription::{CompositeSubscription, Subscription},
};

/// Interleaves two streams. Completes only after both sides completed; an
/// error on either side is forwarded at once and the sibling subscription
/// is disposed.
#[derive(Clone)]
pub struct MergeOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> ObservableType for MergeOp<A, B>
where
  A: ObservableType,
  B: ObservableType<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;
}

impl<A, B, O> CoreObservable<O> for MergeOp<A, B>
where
  A: CoreObservable<MutArc<MergeObserver<O>>>,
  B: CoreObservable<MutArc<MergeObserver<O>>, Item = A::Item, Err = A::Err>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
  O: Observer<A::Item, A::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    // Both sides share one observer cell, so the completion count and the
    // downstream observer stay consistent under concurrent delivery.
    let shared = MutArc::own(MergeObserver {
      observer: Some(observer),
      subscription: subscription.clone(),
      completed_one: false,
    });
    subscription.add(self.a.actual_subscribe(shared.clone()));
    subscription.add(self.b.actual_subscribe(shared));
    subscription
  }
}

pub struct MergeObserver<O> {
  observer: Option<O>,
  subscription: CompositeSubscription,
  completed_one: bool,
}

impl<Item, Err, O> Observer<Item, Err> for MergeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    self.subscription.unsubscribe();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    if self.completed_one {
      self.observer.complete();
      self.subscription.unsubscribe();
    } else {
      self.completed_one = true;
    }
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
