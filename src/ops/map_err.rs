use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

#[derive(Clone)]
pub struct MapErrOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, E> ObservableType for MapErrOp<S, F>
where
  S: ObservableType,
  F: FnMut(S::Err) -> E,
{
  type Item = S::Item;
  type Err = E;
}

impl<S, F, E, O> CoreObservable<O> for MapErrOp<S, F>
where
  S: CoreObservable<MapErrObserver<O, F>>,
  F: FnMut(S::Err) -> E,
  O: Observer<S::Item, E>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapErrObserver { observer, func: self.func })
  }
}

pub struct MapErrObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, E, O, F> Observer<Item, Err> for MapErrObserver<O, F>
where
  O: Observer<Item, E>,
  F: FnMut(Err) -> E,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) { self.observer.error((self.func)(err)) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn rewrites_the_error_channel() {
    let mut seen = vec![];
    observable::throw::<i32, _>(404)
      .map_err(|code: i32| format!("status {code}"))
      .subscribe_err(|_| {}, |e| seen.push(e));
    assert_eq!(seen, vec!["status 404".to_string()]);
  }
}
