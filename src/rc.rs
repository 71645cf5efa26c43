//! Shared-cell wrappers used to hand one piece of mutable state to several
//! owners: `MutRc` for single-threaded pipelines, `MutArc` wherever two
//! producers may reach the state concurrently.

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
  sync::{Arc, Mutex, MutexGuard},
};

use crate::{observer::Observer, subscription::Subscription};

pub trait RcDeref {
  type Target<'a>
  where
    Self: 'a;
  fn rc_deref(&self) -> Self::Target<'_>;
}

pub trait RcDerefMut {
  type Target<'a>
  where
    Self: 'a;
  fn rc_deref_mut(&self) -> Self::Target<'_>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutRc<T> {
  #[inline]
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }
}

impl<T> MutArc<T> {
  #[inline]
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }
}

impl<T> RcDeref for MutRc<T> {
  type Target<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Target<'_> { self.0.borrow() }
}

impl<T> RcDeref for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Target<'_> { self.0.lock().unwrap() }
}

impl<T> RcDerefMut for MutRc<T> {
  type Target<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::Target<'_> { self.0.borrow_mut() }
}

impl<T> RcDerefMut for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::Target<'_> { self.0.lock().unwrap() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

macro_rules! observer_impl {
  ($rc:ident) => {
    impl<T, Item, Err> Observer<Item, Err> for $rc<T>
    where
      T: Observer<Item, Err>,
    {
      fn next(&mut self, value: Item) { self.rc_deref_mut().next(value) }
      fn error(&mut self, err: Err) { self.rc_deref_mut().error(err) }
      fn complete(&mut self) { self.rc_deref_mut().complete() }
      fn is_closed(&self) -> bool { self.rc_deref().is_closed() }
    }
  };
}

observer_impl!(MutRc);
observer_impl!(MutArc);

macro_rules! rc_subscription_impl {
  ($rc:ident) => {
    impl<T: Subscription> Subscription for $rc<T> {
      #[inline]
      fn unsubscribe(&mut self) { self.rc_deref_mut().unsubscribe() }

      #[inline]
      fn is_closed(&self) -> bool { self.rc_deref().is_closed() }
    }
  };
}

rc_subscription_impl!(MutRc);
rc_subscription_impl!(MutArc);
