use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  rc::{MutArc, RcDerefMut},
  subject::SharedSubject,
  subscription::{CompositeSubscription, RefCountSubscription, Subscription},
};

/// Multicasts one upstream subscription to any number of subscribers.
/// The first subscriber connects the upstream into an internal subject;
/// every subscriber holds a reference count on that connection, and the
/// last departing holder disposes it.
pub struct ShareOp<S: ObservableType> {
  state: MutArc<ShareState<S>>,
}

struct ShareState<S: ObservableType> {
  source: Option<S>,
  subject: SharedSubject<S::Item, S::Err>,
  connection: Option<RefCountSubscription<CompositeSubscription>>,
}

impl<S: ObservableType> ShareOp<S> {
  pub(crate) fn new(source: S) -> Self {
    ShareOp {
      state: MutArc::own(ShareState {
        source: Some(source),
        subject: SharedSubject::new(),
        connection: None,
      }),
    }
  }
}

impl<S: ObservableType> Clone for ShareOp<S> {
  fn clone(&self) -> Self { ShareOp { state: self.state.clone() } }
}

impl<S: ObservableType> ObservableType for ShareOp<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for ShareOp<S>
where
  S: CoreObservable<SharedSubject<S::Item, S::Err>>,
  S::Unsub: Send + 'static,
  SharedSubject<S::Item, S::Err>: CoreObservable<O>,
  <SharedSubject<S::Item, S::Err> as CoreObservable<O>>::Unsub: Send + 'static,
  S::Item: Clone + 'static,
  S::Err: Clone + 'static,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = CompositeSubscription;

  fn actual_subscribe(self, observer: O) -> CompositeSubscription {
    let mut state = self.state.rc_deref_mut();
    let subject_sub = state.subject.clone().actual_subscribe(observer);

    let holder = match state.connection.as_ref().filter(|c| !c.is_closed()) {
      Some(connection) => connection.acquire(),
      None => {
        let connection = CompositeSubscription::new();
        if let Some(source) = state.source.take() {
          connection.add(source.actual_subscribe(state.subject.clone()));
        }
        let holder = RefCountSubscription::new(connection);
        // The stored copy is a non-holding alias used only to acquire.
        state.connection = Some(holder.clone());
        holder
      }
    };
    drop(state);

    let subscription = CompositeSubscription::new();
    subscription.add(subject_sub);
    subscription.add(holder);
    subscription
  }
}
