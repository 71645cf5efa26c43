use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Remembers the most recent value and emits it when the source
/// completes. An empty source completes empty.
#[derive(Clone)]
pub struct LastOp<S> {
  pub(crate) source: S,
}

impl<S> ObservableType for LastOp<S>
where
  S: ObservableType,
{
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for LastOp<S>
where
  S: CoreObservable<LastObserver<O, S::Item>>,
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(LastObserver { observer, last: None })
  }
}

pub struct LastObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for LastObserver<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.last = Some(value); }

  fn error(&mut self, err: Err) {
    self.last = None;
    self.observer.error(err);
  }

  fn complete(&mut self) {
    if let Some(value) = self.last.take() {
      self.observer.next(value);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
