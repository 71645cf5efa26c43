use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct TakeWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> ObservableType for TakeWhileOp<S, F>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F, O> CoreObservable<O> for TakeWhileOp<S, F>
where
  S: CoreObservable<TakeWhileObserver<O, F>>,
  F: FnMut(&S::Item) -> bool,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(TakeWhileObserver {
      observer,
      predicate: self.predicate,
      done: false,
    })
  }
}

pub struct TakeWhileObserver<O, F> {
  observer: O,
  predicate: F,
  done: bool,
}

impl<Item, Err, O, F> Observer<Item, Err> for TakeWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.done {
      return;
    }
    if (self.predicate)(&value) {
      self.observer.next(value);
    } else {
      self.done = true;
      self.observer.complete();
    }
  }

  fn error(&mut self, err: Err) {
    if !self.done {
      self.done = true;
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.done || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn completes_on_first_failure() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(0..100)
      .take_while(|v| *v < 4)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 1, 2, 3]);
    assert!(completed);
  }
}
