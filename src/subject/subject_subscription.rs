use crate::{
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

use super::subject_core::SubjectCore;

/// Removes one observer from a subject's live set. The back-reference to
/// the subject core is non-owning in spirit: disposal removes by id, and
/// the entry (with the boxed observer) is dropped by the core itself.
pub struct SubjectSubscription<P> {
  core: P,
  id: u64,
  closed: bool,
}

impl<P> SubjectSubscription<P> {
  pub(crate) fn new(core: P, id: u64) -> Self { SubjectSubscription { core, id, closed: false } }

  /// A spent handle for observers that were never added to the live set
  /// (subscription after the terminal).
  pub(crate) fn spent(core: P) -> Self { SubjectSubscription { core, id: u64::MAX, closed: true } }
}

macro_rules! subject_subscription_impl {
  ($rc:ident) => {
    impl<O, M, Err> Subscription for SubjectSubscription<$rc<SubjectCore<O, M, Err>>> {
      fn unsubscribe(&mut self) {
        if !self.closed {
          self.closed = true;
          self.core.rc_deref_mut().remove(self.id);
        }
      }

      fn is_closed(&self) -> bool { self.closed || self.core.rc_deref().terminal.is_some() }
    }
  };
}

subject_subscription_impl!(MutRc);
subject_subscription_impl!(MutArc);
