use std::sync::{Arc, Mutex};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Wraps a subject so that `next`/`error`/`complete` run under one mutex:
/// concurrent producers collapse into a single consistent notification
/// order. Unserialized subjects instead require caller-enforced
/// single-producer discipline.
///
/// Subscription is delegated untouched; only the notification path is
/// serialized.
pub struct SerializedSubject<S> {
  subject: S,
  gate: Arc<Mutex<()>>,
}

impl<S> SerializedSubject<S> {
  pub fn new(subject: S) -> Self { SerializedSubject { subject, gate: Arc::new(Mutex::new(())) } }
}

impl<S: Clone> Clone for SerializedSubject<S> {
  fn clone(&self) -> Self {
    SerializedSubject { subject: self.subject.clone(), gate: self.gate.clone() }
  }
}

impl<Item, Err, S> Observer<Item, Err> for SerializedSubject<S>
where
  S: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let _gate = self.gate.lock().unwrap();
    self.subject.next(value);
  }

  fn error(&mut self, err: Err) {
    let _gate = self.gate.lock().unwrap();
    self.subject.error(err);
  }

  fn complete(&mut self) {
    let _gate = self.gate.lock().unwrap();
    self.subject.complete();
  }

  fn is_closed(&self) -> bool { self.subject.is_closed() }
}

impl<S: ObservableType> ObservableType for SerializedSubject<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for SerializedSubject<S>
where
  S: CoreObservable<O>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.subject.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod tests {
  use std::{convert::Infallible, thread};

  use super::*;
  use crate::prelude::*;

  #[test]
  fn concurrent_producers_yield_one_consistent_sequence() {
    let serialized = SerializedSubject::new(SharedSubject::<u64, Infallible>::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    serialized.clone().subscribe(move |v| s.lock().unwrap().push(v));

    let producers: Vec<_> = (0..4u64)
      .map(|p| {
        let mut subject = serialized.clone();
        thread::spawn(move || {
          for i in 0..100u64 {
            subject.next(p * 1_000 + i);
          }
        })
      })
      .collect();
    for p in producers {
      p.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    // Nothing lost, nothing duplicated.
    assert_eq!(seen.len(), 400);
    // Each producer's own values arrive in its production order.
    for p in 0..4u64 {
      let ours: Vec<_> = seen.iter().filter(|v| *v / 1_000 == p).copied().collect();
      assert_eq!(ours, (0..100u64).map(|i| p * 1_000 + i).collect::<Vec<_>>());
    }
  }

  #[test]
  fn terminal_still_wins_only_once() {
    let serialized = SerializedSubject::new(SharedSubject::<i32, Infallible>::new());
    let completions = Arc::new(Mutex::new(0));

    let c = completions.clone();
    serialized
      .clone()
      .subscribe_complete(|_| {}, move || *c.lock().unwrap() += 1);

    let mut a = serialized.clone();
    let mut b = serialized.clone();
    a.complete();
    b.complete();

    assert_eq!(*completions.lock().unwrap(), 1);
  }
}
