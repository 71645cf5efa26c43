use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscriber::Subscriber,
  subscription::SingleSubscription,
  type_hint::TypeHint,
};

/// Build a stream from arbitrary production logic. The closure receives an
/// observer already wrapped in the grammar defense, so a misbehaving
/// producer cannot deliver events past a terminal; it should also honor
/// `is_closed` to stop early when the downstream cancels.
///
/// ```
/// use std::convert::Infallible;
///
/// use rill::prelude::*;
///
/// let mut sum = 0;
/// observable::create(|o: &mut dyn Observer<i32, Infallible>| {
///   o.next(1);
///   o.next(2);
///   o.complete();
/// })
/// .subscribe(|v| sum += v);
/// assert_eq!(sum, 3);
/// ```
pub fn create<F, Item, Err>(subscribe: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item, Err>),
{
  Create { subscribe, _hint: TypeHint::new() }
}

#[derive(Clone)]
pub struct Create<F, Item, Err> {
  subscribe: F,
  _hint: TypeHint<(Item, Err)>,
}

impl<F, Item, Err> ObservableType for Create<F, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<F, Item, Err, O> CoreObservable<O> for Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item, Err>),
  O: Observer<Item, Err>,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe(self, observer: O) -> SingleSubscription {
    let mut subscriber = Subscriber::new(observer);
    (self.subscribe)(&mut subscriber);
    if subscriber.is_closed() {
      SingleSubscription::closed()
    } else {
      SingleSubscription::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;

  #[test]
  fn misbehaving_producer_is_contained() {
    let mut next = 0;
    let mut errors = 0;
    let mut completed = 0;

    create(|o: &mut dyn Observer<i32, &str>| {
      o.next(1);
      o.next(2);
      o.complete();
      // Contract violations: silently dropped.
      o.next(3);
      o.error("late");
    })
    .subscribe_all(|_| next += 1, |_| errors += 1, || completed += 1);

    assert_eq!(next, 2);
    assert_eq!(completed, 1);
    assert_eq!(errors, 0);
  }

  #[test]
  fn producer_observes_downstream_cancellation() {
    let mut produced = 0;
    create(|o: &mut dyn Observer<i32, std::convert::Infallible>| {
      let mut i = 0;
      while !o.is_closed() {
        produced += 1;
        o.next(i);
        i += 1;
      }
    })
    .take(4)
    .subscribe(|_| {});

    assert_eq!(produced, 4);
  }
}
