use std::{collections::HashMap, hash::Hash};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subject::SharedSubject,
};

/// Demultiplexes a stream into per-key groups. Each new key emits a
/// [`GroupObservable`] downstream before the first value of that group is
/// pushed, so a synchronous subscriber sees the whole group. Terminals
/// are forwarded to every group and then downstream.
#[derive(Clone)]
pub struct GroupByOp<S, KS> {
  pub(crate) source: S,
  pub(crate) key_selector: KS,
}

impl<S, KS, K> ObservableType for GroupByOp<S, KS>
where
  S: ObservableType,
  KS: FnMut(&S::Item) -> K,
{
  type Item = GroupObservable<K, S::Item, S::Err>;
  type Err = S::Err;
}

impl<S, KS, K, O> CoreObservable<O> for GroupByOp<S, KS>
where
  S: CoreObservable<GroupByObserver<O, KS, K, S::Item, S::Err>>,
  KS: FnMut(&S::Item) -> K,
  K: Hash + Eq + Clone,
  S::Item: Clone + 'static,
  S::Err: Clone + 'static,
  O: Observer<GroupObservable<K, S::Item, S::Err>, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(GroupByObserver {
      observer,
      key_selector: self.key_selector,
      groups: HashMap::new(),
    })
  }
}

/// One group's stream: the key plus a subject fed by the parent.
pub struct GroupObservable<K, Item, Err> {
  key: K,
  subject: SharedSubject<Item, Err>,
}

impl<K, Item, Err> GroupObservable<K, Item, Err> {
  pub fn key(&self) -> &K { &self.key }
}

impl<K: Clone, Item, Err> Clone for GroupObservable<K, Item, Err> {
  fn clone(&self) -> Self {
    GroupObservable { key: self.key.clone(), subject: self.subject.clone() }
  }
}

impl<K, Item, Err> ObservableType for GroupObservable<K, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<K, Item, Err, O> CoreObservable<O> for GroupObservable<K, Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Unsub = <SharedSubject<Item, Err> as CoreObservable<O>>::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.subject.actual_subscribe(observer)
  }
}

pub struct GroupByObserver<O, KS, K, Item, Err> {
  observer: O,
  key_selector: KS,
  groups: HashMap<K, SharedSubject<Item, Err>>,
}

impl<Item, Err, O, KS, K> Observer<Item, Err> for GroupByObserver<O, KS, K, Item, Err>
where
  O: Observer<GroupObservable<K, Item, Err>, Err>,
  KS: FnMut(&Item) -> K,
  K: Hash + Eq + Clone,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) {
    let key = (self.key_selector)(&value);
    let mut subject = match self.groups.get(&key) {
      Some(subject) => subject.clone(),
      None => {
        let subject = SharedSubject::new();
        self.groups.insert(key.clone(), subject.clone());
        self
          .observer
          .next(GroupObservable { key, subject: subject.clone() });
        subject
      }
    };
    subject.next(value);
  }

  fn error(&mut self, err: Err) {
    for (_, subject) in self.groups.iter_mut() {
      let mut subject = subject.clone();
      subject.error(err.clone());
    }
    self.groups.clear();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    for (_, subject) in self.groups.iter_mut() {
      let mut subject = subject.clone();
      subject.complete();
    }
    self.groups.clear();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn routes_values_to_their_group() {
    let evens = Arc::new(Mutex::new(Vec::new()));
    let odds = Arc::new(Mutex::new(Vec::new()));

    let e = evens.clone();
    let o = odds.clone();
    observable::from_iter(0..8)
      .group_by(|v| v % 2)
      .subscribe(move |group| {
        let store = if *group.key() == 0 { e.clone() } else { o.clone() };
        group.subscribe(move |v| store.lock().unwrap().push(v));
      });

    assert_eq!(*evens.lock().unwrap(), vec![0, 2, 4, 6]);
    assert_eq!(*odds.lock().unwrap(), vec![1, 3, 5, 7]);
  }

  #[test]
  fn groups_complete_with_the_source() {
    let completions = Arc::new(Mutex::new(0));

    let c = completions.clone();
    observable::from_iter(0..4)
      .group_by(|v| v % 2)
      .subscribe(move |group| {
        let c = c.clone();
        group.subscribe_complete(|_| {}, move || *c.lock().unwrap() += 1);
      });

    assert_eq!(*completions.lock().unwrap(), 2);
  }
}
