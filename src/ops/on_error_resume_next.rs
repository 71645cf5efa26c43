use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subscription::{CompositeSubscription, Subscription},
};

/// Instead of forwarding an upstream failure, substitutes the fallback
/// stream produced from the error. Values and completion pass through
/// untouched; the output's error channel is the fallback's.
#[derive(Clone)]
pub struct OnErrorResumeNextOp<S, F> {
  pub(crate) source: S,
  pub(crate) fallback: F,
}

impl<S, F, R> ObservableType for OnErrorResumeNextOp<S, F>
where
  S: ObservableType,
  F: FnOnce(S::Err) -> R,
  R: ObservableType<Item = S::Item>,
{
  type Item = S::Item;
  type Err = R::Err;
}

impl<S, F, R, O> CoreObservable<O> for OnErrorResumeNextOp<S, F>
where
  S: CoreObservable<ResumeObserver<O, F>>,
  F: FnOnce(S::Err) -> R,
  R: CoreObservable<FallbackObserver<O>, Item = S::Item>,
  R::Unsub: Send + 'static,
  S::Unsub: Send + 'static,
  O: Observer<S::Item, R::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let subscription = CompositeSubscription::new();
    let first = ResumeObserver {
      observer: MutArc::own(Some(observer)),
      fallback: MutArc::own(Some(self.fallback)),
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(first));
    subscription
  }
}

pub struct ResumeObserver<O, F> {
  observer: MutArc<Option<O>>,
  fallback: MutArc<Option<F>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O, F, R> Observer<Item, Err> for ResumeObserver<O, F>
where
  F: FnOnce(Err) -> R,
  R: CoreObservable<FallbackObserver<O>, Item = Item>,
  R::Unsub: Send + 'static,
  O: Observer<Item, R::Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.observer.rc_deref_mut().as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    let fallback = self.fallback.rc_deref_mut().take();
    if let Some(fallback) = fallback {
      let next = FallbackObserver {
        observer: self.observer.clone(),
        subscription: self.subscription.clone(),
      };
      let unsub = fallback(err).actual_subscribe(next);
      self.subscription.add(unsub);
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

pub struct FallbackObserver<O> {
  observer: MutArc<Option<O>>,
  subscription: CompositeSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for FallbackObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.observer.rc_deref_mut().as_mut() {
      observer.next(value);
    }
  }

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
