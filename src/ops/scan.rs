use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Accumulation seeded from the first element: the first value passes
/// through untouched and becomes the accumulator.
#[derive(Clone)]
pub struct ScanOp<S, F> {
  pub(crate) source: S,
  pub(crate) binary_op: F,
}

impl<S, F> ObservableType for ScanOp<S, F>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F, O> CoreObservable<O> for ScanOp<S, F>
where
  S: CoreObservable<ScanObserver<O, F, S::Item>>,
  F: FnMut(S::Item, S::Item) -> S::Item,
  S::Item: Clone,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ScanObserver {
      observer,
      binary_op: self.binary_op,
      acc: None,
    })
  }
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  binary_op: F,
  acc: Option<Acc>,
}

impl<Item, Err, O, F> Observer<Item, Err> for ScanObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(Item, Item) -> Item,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let acc = match self.acc.take() {
      Some(acc) => (self.binary_op)(acc, value),
      None => value,
    };
    self.observer.next(acc.clone());
    self.acc = Some(acc);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Accumulation seeded from an explicit initial value; the seed itself is
/// not emitted.
#[derive(Clone)]
pub struct ScanInitialOp<S, B, F> {
  pub(crate) source: S,
  pub(crate) initial: B,
  pub(crate) binary_op: F,
}

impl<S, B, F> ObservableType for ScanInitialOp<S, B, F>
where
  S: ObservableType,
  F: FnMut(B, S::Item) -> B,
{
  type Item = B;
  type Err = S::Err;
}

impl<S, B, F, O> CoreObservable<O> for ScanInitialOp<S, B, F>
where
  S: CoreObservable<ScanInitialObserver<O, F, B>>,
  F: FnMut(B, S::Item) -> B,
  B: Clone,
  O: Observer<B, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ScanInitialObserver {
      observer,
      binary_op: self.binary_op,
      acc: Some(self.initial),
    })
  }
}

pub struct ScanInitialObserver<O, F, B> {
  observer: O,
  binary_op: F,
  acc: Option<B>,
}

impl<Item, Err, B, O, F> Observer<Item, Err> for ScanInitialObserver<O, F, B>
where
  O: Observer<B, Err>,
  F: FnMut(B, Item) -> B,
  B: Clone,
{
  fn next(&mut self, value: Item) {
    // acc is only vacant transiently inside this call.
    if let Some(acc) = self.acc.take() {
      let acc = (self.binary_op)(acc, value);
      self.observer.next(acc.clone());
      self.acc = Some(acc);
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
  fn seeds_from_the_first_element() {
    let mut sums = vec![];
    observable::from_iter(1..=4)
      .scan(|acc, v| acc + v)
      .subscribe(|v| sums.push(v));
    assert_eq!(sums, vec![1, 3, 6, 10]);
  }

  #[test]
  fn seeds_from_an_explicit_initial_value() {
    let mut sums = vec![];
    observable::from_iter(1..=3)
      .scan_initial(100, |acc, v| acc + v)
      .subscribe(|v| sums.push(v));
    assert_eq!(sums, vec![101, 103, 106]);
  }

  #[test]
  fn initial_value_can_change_the_item_type() {
    let mut joined = vec![];
    observable::from_iter(vec!["a", "b", "c"])
      .scan_initial(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .subscribe(|v| joined.push(v));
    assert_eq!(joined, vec!["a", "ab", "abc"]);
  }
}
