use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::SingleSubscription,
  type_hint::TypeHint,
};

/// Complete immediately without emitting.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty { _hint: TypeHint::new() } }

/// Never emit and never terminate.
pub fn never<Item, Err>() -> Never<Item, Err> { Never { _hint: TypeHint::new() } }

/// Fail immediately with `err`.
pub fn throw<Item, Err>(err: Err) -> ThrowErr<Item, Err> { ThrowErr { err, _hint: TypeHint::new() } }

#[derive(Clone)]
pub struct Empty<Item, Err> {
  _hint: TypeHint<(Item, Err)>,
}

impl<Item, Err> ObservableType for Empty<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for Empty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, mut observer: O) -> SingleSubscription {
    if !observer.is_closed() {
      observer.complete();
    }
    SingleSubscription::closed()
  }
}

#[derive(Clone)]
pub struct Never<Item, Err> {
  _hint: TypeHint<(Item, Err)>,
}

impl<Item, Err> ObservableType for Never<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, _observer: O) -> SingleSubscription { SingleSubscription::default() }
}

#[derive(Clone)]
pub struct ThrowErr<Item, Err> {
  err: Err,
  _hint: TypeHint<Item>,
}

impl<Item, Err> ObservableType for ThrowErr<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for ThrowErr<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, mut observer: O) -> SingleSubscription {
    if !observer.is_closed() {
      observer.error(self.err);
    }
    SingleSubscription::closed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;

  #[test]
  fn empty_only_completes() {
    let mut values: Vec<i32> = vec![];
    let mut completed = false;
    empty().subscribe_complete(|v| values.push(v), || completed = true);
    assert!(values.is_empty());
    assert!(completed);
  }

  #[test]
  fn never_stays_open() {
    let sub = never::<i32, std::convert::Infallible>().subscribe(|_| {});
    assert!(!sub.is_closed());
  }

  #[test]
  fn throw_delivers_the_error() {
    let mut errors = vec![];
    throw::<i32, _>("boom").subscribe_err(|_| {}, |e| errors.push(e));
    assert_eq!(errors, vec!["boom"]);
  }
}
