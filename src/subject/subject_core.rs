use std::collections::VecDeque;

use smallvec::SmallVec;

/// A multicast hub, parameterized by the smart pointer holding its shared
/// core: `MutRc` for single-threaded use (no locks), `MutArc` where
/// producers and subscribers may live on different threads.
pub struct Subject<P> {
  pub(crate) core: P,
}

impl<P: Clone> Clone for Subject<P> {
  fn clone(&self) -> Self { Subject { core: self.core.clone() } }
}

pub(crate) enum SubjectTerminal<Err> {
  Error(Err),
  Completed,
}

impl<Err: Clone> Clone for SubjectTerminal<Err> {
  fn clone(&self) -> Self {
    match self {
      SubjectTerminal::Error(e) => SubjectTerminal::Error(e.clone()),
      SubjectTerminal::Completed => SubjectTerminal::Completed,
    }
  }
}

/// What a subject variant remembers between notifications, replayed to
/// every new subscriber before live delivery starts.
pub trait SubjectMemory<Item> {
  fn record(&mut self, value: &Item);
  fn replay(&mut self, deliver: &mut dyn FnMut(Item));
}

/// Publish behavior: remembers nothing.
#[derive(Default, Clone)]
pub struct NoMemory;

impl<Item> SubjectMemory<Item> for NoMemory {
  fn record(&mut self, _value: &Item) {}

  fn replay(&mut self, _deliver: &mut dyn FnMut(Item)) {}
}

/// Behavior-subject memory: the most recent value.
#[derive(Clone)]
pub struct LastValue<Item>(Option<Item>);

impl<Item> Default for LastValue<Item> {
  fn default() -> Self { LastValue(None) }
}

impl<Item> LastValue<Item> {
  pub(crate) fn seeded(value: Item) -> Self { LastValue(Some(value)) }
}

impl<Item: Clone> SubjectMemory<Item> for LastValue<Item> {
  fn record(&mut self, value: &Item) { self.0 = Some(value.clone()); }

  fn replay(&mut self, deliver: &mut dyn FnMut(Item)) {
    if let Some(value) = &self.0 {
      deliver(value.clone());
    }
  }
}

/// Replay-subject memory: the ordered history, optionally bounded to the
/// most recent `capacity` values.
#[derive(Clone)]
pub struct History<Item> {
  buffer: VecDeque<Item>,
  capacity: Option<usize>,
}

impl<Item> Default for History<Item> {
  fn default() -> Self { History { buffer: VecDeque::new(), capacity: None } }
}

impl<Item> History<Item> {
  pub(crate) fn bounded(capacity: usize) -> Self {
    History { buffer: VecDeque::new(), capacity: Some(capacity) }
  }
}

impl<Item: Clone> SubjectMemory<Item> for History<Item> {
  fn record(&mut self, value: &Item) {
    self.buffer.push_back(value.clone());
    if let Some(capacity) = self.capacity {
      while self.buffer.len() > capacity {
        self.buffer.pop_front();
      }
    }
  }

  fn replay(&mut self, deliver: &mut dyn FnMut(Item)) {
    for value in &self.buffer {
      deliver(value.clone());
    }
  }
}

/// Shared state of a subject: the live observer set in subscription
/// order, the variant memory, and the terminal, if reached.
pub struct SubjectCore<O, M, Err> {
  observers: Vec<(u64, O)>,
  pending_removals: SmallVec<[u64; 2]>,
  dispatching: bool,
  pub(crate) terminal: Option<SubjectTerminal<Err>>,
  pub(crate) memory: M,
  next_id: u64,
}

impl<O, M: Default, Err> Default for SubjectCore<O, M, Err> {
  fn default() -> Self { SubjectCore::with_memory(M::default()) }
}

impl<O, M, Err> SubjectCore<O, M, Err> {
  pub(crate) fn with_memory(memory: M) -> Self {
    SubjectCore {
      observers: Vec::new(),
      pending_removals: SmallVec::new(),
      dispatching: false,
      terminal: None,
      memory,
      next_id: 0,
    }
  }

  pub(crate) fn subscriber_count(&self) -> usize { self.observers.len() }

  pub(crate) fn register(&mut self, observer: O) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    self.observers.push((id, observer));
    id
  }

  /// Take the live-set snapshot for one dispatch. Observers registered
  /// while the snapshot is out land in the (now empty) live vector and
  /// are merged back in afterwards; they are not visited for the
  /// in-flight dispatch.
  pub(crate) fn begin_dispatch(&mut self) -> Vec<(u64, O)> {
    assert!(
      !self.dispatching,
      "re-entrant subject emission; push through a scheduler boundary instead"
    );
    self.dispatching = true;
    std::mem::take(&mut self.observers)
  }

  /// Merge the dispatched snapshot with mid-dispatch registrations and
  /// removals, restoring subscription order.
  pub(crate) fn end_dispatch(&mut self, mut snapshot: Vec<(u64, O)>) {
    self.dispatching = false;
    let appended = std::mem::take(&mut self.observers);
    let removed = std::mem::take(&mut self.pending_removals);
    snapshot.retain(|(id, _)| !removed.contains(id));
    snapshot.extend(appended.into_iter().filter(|(id, _)| !removed.contains(id)));
    self.observers = snapshot;
  }

  /// Transition to terminal, handing back the final live set; the set is
  /// released for good.
  pub(crate) fn begin_terminal(&mut self, terminal: SubjectTerminal<Err>) -> Vec<(u64, O)> {
    assert!(
      !self.dispatching,
      "re-entrant subject emission; push through a scheduler boundary instead"
    );
    self.terminal = Some(terminal);
    self.dispatching = true;
    std::mem::take(&mut self.observers)
  }

  pub(crate) fn end_terminal(&mut self) {
    self.dispatching = false;
    self.observers.clear();
    self.pending_removals.clear();
  }

  pub(crate) fn remove(&mut self, id: u64) {
    if self.dispatching {
      self.pending_removals.push(id);
    } else {
      self.observers.retain(|(observer_id, _)| *observer_id != id);
    }
  }
}
