//! Cancellation and resource-release tokens.
//!
//! Every `subscribe` call hands back a [`Subscription`]. Disposing it is
//! idempotent and monotonic: once closed a subscription never reopens, and
//! attaching a child to an already-closed composite disposes the child on
//! the spot instead of registering it, so there is no window in which a
//! resource can leak.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  },
};

use smallvec::SmallVec;

/// Handle to an active subscription, used to stop delivery before the
/// stream terminates on its own.
pub trait Subscription {
  /// Release the resources held by this subscription. Calling it twice
  /// behaves exactly like calling it once.
  fn unsubscribe(&mut self);

  /// Snapshot of whether this subscription has been closed.
  fn is_closed(&self) -> bool;

  /// Wrap this subscription so it is automatically unsubscribed when the
  /// returned guard goes out of scope.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(self)
  }
}

impl<T: Subscription + ?Sized> Subscription for Box<T> {
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// `None` behaves as an already-closed subscription; `Some` delegates to
/// the inner one and is taken on unsubscribe.
impl<S: Subscription> Subscription for Option<S> {
  fn unsubscribe(&mut self) {
    if let Some(mut s) = self.take() {
      s.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Subscription::is_closed) }
}

impl Debug for Box<dyn Subscription + Send> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn Subscription>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// The simplest subscription: one boolean closed flag.
#[derive(Debug, Default, Clone)]
pub struct SingleSubscription {
  closed: bool,
}

impl SingleSubscription {
  /// A subscription that is already spent, returned by sources whose
  /// production finished synchronously inside `subscribe`.
  #[inline]
  pub fn closed() -> Self { SingleSubscription { closed: true } }
}

impl Subscription for SingleSubscription {
  #[inline]
  fn unsubscribe(&mut self) { self.closed = true; }

  #[inline]
  fn is_closed(&self) -> bool { self.closed }
}

/// A subscription owning a set of child subscriptions, disposed together.
///
/// Children attached while the composite is live are stored inline (two
/// slots before the container spills to the heap); children attached after
/// disposal are unsubscribed immediately.
#[derive(Clone, Default)]
pub struct CompositeSubscription(Arc<Mutex<CompositeInner>>);

#[derive(Default)]
struct CompositeInner {
  closed: bool,
  teardown: SmallVec<[Box<dyn Subscription + Send>; 2]>,
}

impl CompositeSubscription {
  pub fn new() -> Self { Self::default() }

  /// Attach `subscription` so it is disposed together with this composite.
  /// If the composite is already closed, `subscription` is disposed right
  /// here instead of being registered.
  pub fn add<S: Subscription + Send + 'static>(&self, subscription: S) {
    let mut subscription = subscription;
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|s| !s.is_closed());
      inner.teardown.push(Box::new(subscription));
    }
  }

  pub fn teardown_size(&self) -> usize { self.0.lock().unwrap().teardown.len() }
}

impl Subscription for CompositeSubscription {
  fn unsubscribe(&mut self) {
    // Swap the children out before disposing them: a child may re-enter
    // this composite from its own teardown path.
    let teardown = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for mut s in teardown {
      s.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

impl Debug for CompositeSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.lock().unwrap();
    f.debug_struct("CompositeSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// A subscription shared by N independent holders, e.g. the branches of a
/// multicast connection. The inner subscription is disposed exactly once,
/// when the last holder releases, even under concurrent releases.
pub struct RefCountSubscription<S: Subscription> {
  inner: Arc<RefCountInner<S>>,
  released: bool,
}

struct RefCountInner<S> {
  holders: AtomicUsize,
  source: Mutex<Option<S>>,
}

impl<S: Subscription> RefCountSubscription<S> {
  /// Wrap `source`, returning the first holder.
  pub fn new(source: S) -> Self {
    RefCountSubscription {
      inner: Arc::new(RefCountInner {
        holders: AtomicUsize::new(1),
        source: Mutex::new(Some(source)),
      }),
      released: false,
    }
  }

  /// Register one more holder of the shared subscription.
  pub fn acquire(&self) -> Self {
    self.inner.holders.fetch_add(1, Ordering::AcqRel);
    RefCountSubscription { inner: self.inner.clone(), released: false }
  }

  pub fn holder_count(&self) -> usize { self.inner.holders.load(Ordering::Acquire) }
}

/// Cloning yields an alias that does not hold the subscription; only
/// [`RefCountSubscription::new`] and [`RefCountSubscription::acquire`]
/// create holders.
impl<S: Subscription> Clone for RefCountSubscription<S> {
  fn clone(&self) -> Self { RefCountSubscription { inner: self.inner.clone(), released: true } }
}

impl<S: Subscription> Subscription for RefCountSubscription<S> {
  fn unsubscribe(&mut self) {
    if self.released {
      return;
    }
    self.released = true;
    // Atomic decrement-and-test: exactly one releaser observes the count
    // reaching zero and disposes the inner subscription.
    if self.inner.holders.fetch_sub(1, Ordering::AcqRel) == 1 {
      if let Some(mut source) = self.inner.source.lock().unwrap().take() {
        source.unsubscribe();
      }
    }
  }

  fn is_closed(&self) -> bool { self.inner.source.lock().unwrap().is_none() }
}

/// RAII wrapper unsubscribing when dropped. Bind it to a variable; an
/// unbound guard unsubscribes immediately.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
