use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, Observer},
  rc::{MutRc, RcDeref, RcDerefMut},
};

use super::{
  subject_core::{History, LastValue, NoMemory, Subject, SubjectCore, SubjectMemory, SubjectTerminal},
  subject_subscription::SubjectSubscription,
};

/// Single-threaded publish subject: forwards pushes to everyone
/// subscribed at dispatch start.
pub type LocalSubject<'a, Item, Err> =
  Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, NoMemory, Err>>>;

/// Single-threaded behavior subject: seeded with a current value, which
/// new subscribers receive before live values.
pub type LocalBehaviorSubject<'a, Item, Err> =
  Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, LastValue<Item>, Err>>>;

/// Single-threaded replay subject: new subscribers first receive the
/// buffered history in order.
pub type LocalReplaySubject<'a, Item, Err> =
  Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, History<Item>, Err>>>;

impl<'a, Item, Err> LocalSubject<'a, Item, Err> {
  pub fn new() -> Self { Subject { core: MutRc::own(SubjectCore::default()) } }
}

impl<'a, Item, Err> Default for LocalSubject<'a, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<'a, Item, Err> LocalBehaviorSubject<'a, Item, Err> {
  pub fn new(initial: Item) -> Self {
    Subject { core: MutRc::own(SubjectCore::with_memory(LastValue::seeded(initial))) }
  }
}

impl<'a, Item, Err> LocalReplaySubject<'a, Item, Err> {
  pub fn unbounded() -> Self { Subject { core: MutRc::own(SubjectCore::default()) } }

  pub fn with_capacity(capacity: usize) -> Self {
    Subject { core: MutRc::own(SubjectCore::with_memory(History::bounded(capacity))) }
  }
}

impl<'a, Item, Err, M> Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, M, Err>>> {
  /// How many observers are currently live.
  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().subscriber_count() }
}

impl<'a, Item, Err, M> Observer<Item, Err>
  for Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, M, Err>>>
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

impl<'a, Item, Err, M> ObservableType
  for Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, M, Err>>>
{
  type Item = Item;
  type Err = Err;
}

impl<'a, Item, Err, M, O> CoreObservable<O>
  for Subject<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, M, Err>>>
where
  O: Observer<Item, Err> + 'a,
  Item: Clone + 'a,
  Err: Clone + 'a,
  M: SubjectMemory<Item>,
{
  type Unsub = SubjectSubscription<MutRc<SubjectCore<BoxedObserver<'a, Item, Err>, M, Err>>>;

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
