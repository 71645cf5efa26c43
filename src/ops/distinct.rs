use std::collections::HashSet;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Drops values that already occurred anywhere earlier in the stream.
#[derive(Clone)]
pub struct DistinctOp<S> {
  pub(crate) source: S,
}

impl<S> ObservableType for DistinctOp<S>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for DistinctOp<S>
where
  S: CoreObservable<DistinctObserver<O, S::Item>>,
  S::Item: std::hash::Hash + Eq + Clone,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctObserver { observer, seen: HashSet::new() })
  }
}

pub struct DistinctObserver<O, Item> {
  observer: O,
  seen: HashSet<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DistinctObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: std::hash::Hash + Eq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.seen.insert(value.clone()) {
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Drops values equal to their immediate predecessor only.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<S> ObservableType for DistinctUntilChangedOp<S>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for DistinctUntilChangedOp<S>
where
  S: CoreObservable<DistinctUntilChangedObserver<O, S::Item>>,
  S::Item: PartialEq + Clone,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctUntilChangedObserver { observer, previous: None })
  }
}

pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  previous: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.previous.as_ref() != Some(&value) {
      self.previous = Some(value.clone());
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn distinct_drops_repeats_anywhere() {
    let mut values = vec![];
    observable::from_iter(vec![1, 2, 1, 3, 2, 4])
      .distinct()
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 3, 4]);
  }

  #[test]
  fn distinct_until_changed_drops_adjacent_repeats() {
    let mut values = vec![];
    observable::from_iter(vec![1, 1, 2, 2, 1, 3, 3])
      .distinct_until_changed()
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 1, 3]);
  }
}
