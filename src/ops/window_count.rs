use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subject::SharedSubject,
};

/// Splits the stream into consecutive, non-overlapping windows of `count`
/// values. Each window is opened (and emitted downstream) before it
/// receives its first value; the current window is completed when full or
/// when the source terminates.
#[derive(Clone)]
pub struct WindowCountOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> ObservableType for WindowCountOp<S>
where
  S: ObservableType,
{
  type Item = SharedSubject<S::Item, S::Err>;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for WindowCountOp<S>
where
  S: CoreObservable<WindowCountObserver<O, S::Item, S::Err>>,
  S::Item: Clone + 'static,
  S::Err: Clone + 'static,
  O: Observer<SharedSubject<S::Item, S::Err>, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut observer = observer;
    let window = SharedSubject::new();
    observer.next(window.clone());
    self.source.actual_subscribe(WindowCountObserver {
      observer,
      window,
      count: self.count.max(1),
      filled: 0,
    })
  }
}

pub struct WindowCountObserver<O, Item, Err> {
  observer: O,
  window: SharedSubject<Item, Err>,
  count: usize,
  filled: usize,
}

impl<Item, Err, O> Observer<Item, Err> for WindowCountObserver<O, Item, Err>
where
  O: Observer<SharedSubject<Item, Err>, Err>,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) {
    self.window.next(value);
    self.filled += 1;
    if self.filled == self.count {
      self.window.complete();
      self.filled = 0;
      self.window = SharedSubject::new();
      self.observer.next(self.window.clone());
    }
  }

  fn error(&mut self, err: Err) {
    self.window.error(err.clone());
    self.observer.error(err);
  }

  fn complete(&mut self) {
    self.window.complete();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn windows_carry_consecutive_chunks() {
    let windows: Arc<Mutex<Vec<Arc<Mutex<Vec<i32>>>>>> = Arc::new(Mutex::new(Vec::new()));

    let w = windows.clone();
    observable::from_iter(0..7)
      .window_count(3)
      .subscribe(move |window| {
        let chunk = Arc::new(Mutex::new(Vec::new()));
        w.lock().unwrap().push(chunk.clone());
        window.subscribe(move |v| chunk.lock().unwrap().push(v));
      });

    let collected: Vec<Vec<i32>> = windows
      .lock()
      .unwrap()
      .iter()
      .map(|chunk| chunk.lock().unwrap().clone())
      .collect();
    assert_eq!(collected, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
  }
}
