//! The defense wrapper installed around the consumer's observer.
//!
//! A `Subscriber` enforces the notification grammar at the edge of the
//! chain: events after a terminal are dropped, a second terminal is a
//! no-op, and the closed flag flips *before* the terminal callback runs so
//! that a panicking consumer still leaves the subscription closed.

use crate::observer::Observer;

pub struct Subscriber<O> {
  observer: O,
  closed: bool,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O) -> Self { Subscriber { observer, closed: false } }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.closed && !self.observer.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if !self.closed {
      self.closed = true;
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.closed {
      self.closed = true;
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.closed || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{cell::Cell, rc::Rc};

  fn counting_subscriber(
    next: Rc<Cell<i32>>, error: Rc<Cell<i32>>, complete: Rc<Cell<i32>>,
  ) -> Subscriber<impl Observer<i32, &'static str>> {
    Subscriber::new(crate::observer::ObserverAll {
      next: move |_| next.set(next.get() + 1),
      error: move |_| error.set(error.get() + 1),
      complete: move || complete.set(complete.get() + 1),
    })
  }

  #[test]
  fn nothing_after_complete() {
    let (next, error, complete) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
    let mut subscriber = counting_subscriber(next.clone(), error.clone(), complete.clone());

    subscriber.next(1);
    subscriber.next(2);
    subscriber.complete();
    subscriber.next(3);
    subscriber.error("late");
    subscriber.complete();

    assert_eq!(next.get(), 2);
    assert_eq!(complete.get(), 1);
    assert_eq!(error.get(), 0);
  }

  #[test]
  fn nothing_after_error() {
    let (next, error, complete) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
    let mut subscriber = counting_subscriber(next.clone(), error.clone(), complete.clone());

    subscriber.next(1);
    subscriber.error("boom");
    subscriber.next(2);
    subscriber.complete();

    assert_eq!(next.get(), 1);
    assert_eq!(error.get(), 1);
    assert_eq!(complete.get(), 0);
  }

  #[test]
  fn closed_before_terminal_callback_runs() {
    struct Probe<'a>(&'a Cell<bool>);
    impl Observer<i32, ()> for Probe<'_> {
      fn next(&mut self, _: i32) {}
      fn error(&mut self, _: ()) {}
      fn complete(&mut self) { self.0.set(true) }
      fn is_closed(&self) -> bool { false }
    }

    let reached = Cell::new(false);
    let mut subscriber = Subscriber::new(Probe(&reached));
    subscriber.complete();
    assert!(reached.get());
    assert!(subscriber.is_closed());
  }
}
