use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct MapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> ObservableType for MapOp<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> B,
{
  type Item = B;
  type Err = S::Err;
}

impl<S, F, B, O> CoreObservable<O> for MapOp<S, F>
where
  S: CoreObservable<MapObserver<O, F>>,
  F: FnMut(S::Item) -> B,
  O: Observer<B, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapObserver { observer, func: self.func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

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
  fn transforms_each_value() {
    let mut collected = vec![];
    observable::from_iter(1..=3)
      .map(|v| v * 10)
      .subscribe(|v| collected.push(v));
    assert_eq!(collected, vec![10, 20, 30]);
  }

  #[test]
  fn mapping_twice_equals_mapping_the_composition() {
    let f = |v: i32| v + 1;
    let g = |v: i32| v * 2;

    let mut chained = vec![];
    observable::from_iter(1..=3)
      .map(f)
      .map(g)
      .subscribe(|v| chained.push(v));

    let mut composed = vec![];
    observable::from_iter(1..=3)
      .map(|v| g(f(v)))
      .subscribe(|v| composed.push(v));

    assert_eq!(chained, composed);
  }

  #[test]
  fn changes_the_item_type() {
    let mut collected = vec![];
    observable::from_iter(vec!['a', 'b'])
      .map(|c| c.to_string())
      .subscribe(|v| collected.push(v));
    assert_eq!(collected, vec!["a".to_string(), "b".to_string()]);
  }
}
