use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserverSend, Observer},
  rc::{MutArc, RcDeref, RcDerefMut},
};

use super::{
  subject_core::{History, LastValue, NoMemory, Subject, SubjectCore, SubjectMemory, SubjectTerminal},
  subject_subscription::SubjectSubscription,
};

/// Thread-safe publish subject; each notification locks the core only to
/// snapshot the live set, so observers run outside the lock.
pub type SharedSubject<Item, Err> =
  Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, NoMemory, Err>>>;

/// Thread-safe behavior subject.
pub type SharedBehaviorSubject<Item, Err> =
  Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, LastValue<Item>, Err>>>;

/// Thread-safe replay subject.
pub type SharedReplaySubject<Item, Err> =
  Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, History<Item>, Err>>>;

impl<Item, Err> SharedSubject<Item, Err> {
  pub fn new() -> Self { Subject { core: MutArc::own(SubjectCore::default()) } }
}

impl<Item, Err> Default for SharedSubject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> SharedBehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    Subject { core: MutArc::own(SubjectCore::with_memory(LastValue::seeded(initial))) }
  }
}

impl<Item, Err> SharedReplaySubject<Item, Err> {
  pub fn unbounded() -> Self { Subject { core: MutArc::own(SubjectCore::default()) } }

  pub fn with_capacity(capacity: usize) -> Self {
    Subject { core: MutArc::own(SubjectCore::with_memory(History::bounded(capacity))) }
  }
}

impl<Item, Err, M> Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, M, Err>>> {
  /// How many observers are currently live.
  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().subscriber_count() }
}

impl<Item, Err, M> Observer<Item, Err>
  for Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, M, Err>>>
where
  Item: Clone,
  Err: Clone,
  M: SubjectMemory<Item>,
{
  fn next(&mut self, value: Item) {
    let mut snapshot = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        return;
      }
      core.memory.record(&value);
      core.begin_dispatch()
    };
    for (_, observer) in snapshot.iter_mut() {
      if !observer.is_closed() {
        observer.next(value.clone());
      }
    }
    self.core.rc_deref_mut().end_dispatch(snapshot);
  }

  fn error(&mut self, err: Err) {
    let snapshot = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        return;
      }
      core.begin_terminal(SubjectTerminal::Error(err.clone()))
    };
    for (_, mut observer) in snapshot {
      if !observer.is_closed() {
        observer.error(err.clone());
      }
    }
    self.core.rc_deref_mut().end_terminal();
  }

  fn complete(&mut self) {
    let snapshot = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        return;
      }
      core.begin_terminal(SubjectTerminal::Completed)
    };
    for (_, mut observer) in snapshot {
      if !observer.is_closed() {
        observer.complete();
      }
    }
    self.core.rc_deref_mut().end_terminal();
  }

  fn is_closed(&self) -> bool { self.core.rc_deref().terminal.is_some() }
}

impl<Item, Err, M> ObservableType
  for Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, M, Err>>>
{
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, M, O> CoreObservable<O>
  for Subject<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, M, Err>>>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
  M: SubjectMemory<Item>,
{
  type Unsub = SubjectSubscription<MutArc<SubjectCore<BoxedObserverSend<Item, Err>, M, Err>>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut observer = observer;
    let ptr = self.core;
    let live_id = {
      let mut core = ptr.rc_deref_mut();
      core.memory.replay(&mut |v| observer.next(v));
      match core.terminal.clone() {
        Some(terminal) => {
          drop(core);
          match terminal {
            SubjectTerminal::Error(err) => observer.error(err),
            SubjectTerminal::Completed => observer.complete(),
          }
          None
        }
        None => Some(core.register(Box::new(observer))),
      }
    };
    match live_id {
      Some(id) => SubjectSubscription::new(ptr, id),
      None => SubjectSubscription::spent(ptr),
    }
  }
}
