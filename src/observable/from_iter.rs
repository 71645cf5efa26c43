use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::SingleSubscription,
  type_hint::TypeHint,
};

/// Emit every element of `iter` in order, then complete. Production stops
/// early once the downstream reports itself closed.
pub fn from_iter<I, Err>(iter: I) -> FromIter<I, Err>
where
  I: IntoIterator,
{
  FromIter { iter, _hint: TypeHint::new() }
}

#[derive(Clone)]
pub struct FromIter<I, Err> {
  iter: I,
  _hint: TypeHint<Err>,
}

impl<I, Err> ObservableType for FromIter<I, Err>
where
  I: IntoIterator,
{
  type Item = I::Item;
  type Err = Err;
}

impl<I, Err, O> CoreObservable<O> for FromIter<I, Err>
where
  I: IntoIterator,
  O: Observer<I::Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, mut observer: O) -> SingleSubscription {
    for value in self.iter {
      if observer.is_closed() {
        return SingleSubscription::closed();
      }
      observer.next(value);
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
  fn emits_in_order_then_completes() {
    let mut values = vec![];
    let mut completed = false;
    from_iter(0..5).subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    assert!(completed);
  }

  #[test]
  fn stops_producing_once_downstream_closes() {
    let mut count = 0;
    from_iter(0..).take(3).subscribe(|_| count += 1);
    assert_eq!(count, 3);
  }
}
