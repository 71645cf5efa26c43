use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct SkipWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> ObservableType for SkipWhileOp<S, F>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F, O> CoreObservable<O> for SkipWhileOp<S, F>
where
  S: CoreObservable<SkipWhileObserver<O, F>>,
  F: FnMut(&S::Item) -> bool,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(SkipWhileObserver {
      observer,
      predicate: self.predicate,
      skipping: true,
    })
  }
}

pub struct SkipWhileObserver<O, F> {
  observer: O,
  predicate: F,
  skipping: bool,
}

impl<Item, Err, O, F> Observer<Item, Err> for SkipWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.skipping && (self.predicate)(&value) {
      return;
    }
    self.skipping = false;
    self.observer.next(value);
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
  fn forwards_from_the_first_failure_onwards() {
    let mut values = vec![];
    observable::from_iter(vec![1, 2, 9, 3, 1])
      .skip_while(|v| *v < 5)
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![9, 3, 1]);
  }
}
