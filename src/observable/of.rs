use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::SingleSubscription,
  type_hint::TypeHint,
};

/// Emit `value` once, then complete.
pub fn of<Item, Err>(value: Item) -> Of<Item, Err> { Of { value, _hint: TypeHint::new() } }

#[derive(Clone)]
pub struct Of<Item, Err> {
  value: Item,
  _hint: TypeHint<Err>,
}

impl<Item, Err> ObservableType for Of<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for Of<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, mut observer: O) -> SingleSubscription {
    if !observer.is_closed() {
      observer.next(self.value);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    SingleSubscription::closed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;

  #[test]
  fn emits_once_and_completes() {
    let mut values = vec![];
    let mut completed = false;
    of(42).subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![42]);
    assert!(completed);
  }
}
