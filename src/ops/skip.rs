use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct SkipOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> ObservableType for SkipOp<S>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for SkipOp<S>
where
  S: CoreObservable<SkipObserver<O>>,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(SkipObserver { observer, remaining: self.count })
  }
}

pub struct SkipObserver<O> {
  observer: O,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
    } else {
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
  fn drops_the_first_count_values() {
    let mut values = vec![];
    observable::from_iter(0..6).skip(3).subscribe(|v| values.push(v));
    assert_eq!(values, vec![3, 4, 5]);
  }

  #[test]
  fn skipping_more_than_available_yields_nothing() {
    let mut values: Vec<i32> = vec![];
    let mut completed = false;
    observable::from_iter(0..3)
      .skip(10)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert!(values.is_empty());
    assert!(completed);
  }
}
