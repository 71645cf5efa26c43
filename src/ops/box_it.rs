use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, BoxedObserverSend, Observer},
  subscription::Subscription,
};

/// Object-safe subscribe capability behind [`LocalBoxOp`]. Implemented
/// for every observable whose chain accepts a boxed observer.
pub trait BoxObservable<'a, Item, Err> {
  fn box_subscribe(
    self: Box<Self>, observer: BoxedObserver<'a, Item, Err>,
  ) -> Box<dyn Subscription + 'a>;
}

impl<'a, Item, Err, T> BoxObservable<'a, Item, Err> for T
where
  T: CoreObservable<BoxedObserver<'a, Item, Err>, Item = Item, Err = Err>,
  T::Unsub: 'a,
{
  fn box_subscribe(
    self: Box<Self>, observer: BoxedObserver<'a, Item, Err>,
  ) -> Box<dyn Subscription + 'a> {
    Box::new((*self).actual_subscribe(observer))
  }
}

/// A type-erased, single-threaded observable. The concrete operator chain
/// is hidden behind one boxed capability so heterogeneous pipelines can
/// share a variable or container. Conversion is explicit and one-way via
/// [`Observable::box_it`](crate::observable::Observable::box_it).
pub struct LocalBoxOp<'a, Item, Err> {
  inner: Box<dyn BoxObservable<'a, Item, Err> + 'a>,
}

impl<'a, Item, Err> LocalBoxOp<'a, Item, Err> {
  pub(crate) fn new<T>(source: T) -> Self
  where
    T: BoxObservable<'a, Item, Err> + 'a,
  {
    LocalBoxOp { inner: Box::new(source) }
  }
}

impl<'a, Item, Err> ObservableType for LocalBoxOp<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<'a, Item, Err, O> CoreObservable<O> for LocalBoxOp<'a, Item, Err>
where
  O: Observer<Item, Err> + 'a,
{
  type Unsub = Box<dyn Subscription + 'a>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.inner.box_subscribe(Box::new(observer))
  }
}

/// Object-safe subscribe capability behind [`SharedBoxOp`].
pub trait BoxObservableSend<Item, Err> {
  fn box_subscribe_send(
    self: Box<Self>, observer: BoxedObserverSend<Item, Err>,
  ) -> Box<dyn Subscription + Send>;
}

impl<Item, Err, T> BoxObservableSend<Item, Err> for T
where
  T: CoreObservable<BoxedObserverSend<Item, Err>, Item = Item, Err = Err>,
  T::Unsub: Send + 'static,
{
  fn box_subscribe_send(
    self: Box<Self>, observer: BoxedObserverSend<Item, Err>,
  ) -> Box<dyn Subscription + Send> {
    Box::new((*self).actual_subscribe(observer))
  }
}

/// A type-erased observable whose subscription may cross threads.
pub struct SharedBoxOp<Item, Err> {
  inner: Box<dyn BoxObservableSend<Item, Err> + Send>,
}

impl<Item, Err> SharedBoxOp<Item, Err> {
  pub(crate) fn new<T>(source: T) -> Self
  where
    T: BoxObservableSend<Item, Err> + Send + 'static,
  {
    SharedBoxOp { inner: Box::new(source) }
  }
}

impl<Item, Err> ObservableType for SharedBoxOp<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for SharedBoxOp<Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = Box<dyn Subscription + Send>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.inner.box_subscribe_send(Box::new(observer))
  }
}
