use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Collects values into `Vec` chunks of `count`; the remainder, if any, is
/// flushed on completion.
#[derive(Clone)]
pub struct BufferCountOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> ObservableType for BufferCountOp<S>
where
  S: ObservableType,
{
  type Item = Vec<S::Item>;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for BufferCountOp<S>
where
  S: CoreObservable<BufferCountObserver<O, S::Item>>,
  O: Observer<Vec<S::Item>, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let count = self.count.max(1);
    self
      .source
      .actual_subscribe(BufferCountObserver { observer, buffer: Vec::new(), count })
  }
}

pub struct BufferCountObserver<O, Item> {
  observer: O,
  buffer: Vec<Item>,
  count: usize,
}

impl<Item, Err, O> Observer<Item, Err> for BufferCountObserver<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, value: Item) {
    self.buffer.push(value);
    if self.buffer.len() == self.count {
      self.observer.next(std::mem::take(&mut self.buffer));
    }
  }

  fn error(&mut self, err: Err) {
    self.buffer.clear();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    if !self.buffer.is_empty() {
      self.observer.next(std::mem::take(&mut self.buffer));
    }
    self.observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
