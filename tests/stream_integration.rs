//! Cross-subsystem pipelines: operator chains, multicast, scheduling and
//! teardown working together.

use std::{
  cell::RefCell,
  convert::Infallible,
  rc::Rc,
  sync::{Arc, Mutex},
};

use rill::prelude::*;

#[test]
fn chains_compose_and_stop_early() {
  let result = Rc::new(RefCell::new(Vec::new()));

  let r = result.clone();
  observable::from_iter(1..=20)
    .filter(|v| v % 2 == 0)
    .map(|v| v * v)
    .scan(|acc, v| acc + v)
    .take_while(|v| *v < 100)
    .skip(1)
    .subscribe(move |v| r.borrow_mut().push(v));

  // Squares of evens: 4, 16, 36, 64, 100... running sums: 4, 20, 56, 120.
  assert_eq!(*result.borrow(), vec![20, 56]);
}

#[test]
fn notification_grammar_holds_for_misbehaving_producers() {
  let log = Rc::new(RefCell::new(Vec::new()));

  let l = log.clone();
  let l2 = log.clone();
  let l3 = log.clone();
  observable::create(|o: &mut dyn Observer<i32, &str>| {
    o.next(1);
    o.complete();
    o.next(2);
    o.error("too late");
    o.complete();
  })
  .subscribe_all(
    move |v| l.borrow_mut().push(format!("next {v}")),
    move |e| l2.borrow_mut().push(format!("error {e}")),
    move || l3.borrow_mut().push("complete".to_string()),
  );

  assert_eq!(*log.borrow(), vec!["next 1".to_string(), "complete".to_string()]);
}

#[test]
fn map_fusion_is_observationally_equivalent() {
  let f = |v: i32| v * 3;
  let g = |v: i32| v - 1;

  let mut chained = Vec::new();
  observable::from_iter(vec![1, 2, 3])
    .map(f)
    .map(g)
    .subscribe(|v| chained.push(v));

  let mut fused = Vec::new();
  observable::from_iter(vec![1, 2, 3])
    .map(|x| g(f(x)))
    .subscribe(|v| fused.push(v));

  assert_eq!(chained, fused);
}

#[test]
fn unsubscribing_twice_behaves_like_once() {
  let subject = LocalSubject::<i32, Infallible>::new();
  let seen = Rc::new(RefCell::new(Vec::new()));

  let s = seen.clone();
  let mut sub = subject.clone().subscribe(move |v| s.borrow_mut().push(v));

  let mut producer = subject.clone();
  producer.next(1);
  sub.unsubscribe();
  sub.unsubscribe();
  producer.next(2);

  assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn merge_on_an_immediate_pipeline_meets_its_contract() {
  let values = Arc::new(Mutex::new(Vec::new()));
  let order = Arc::new(Mutex::new(Vec::new()));

  let v = values.clone();
  let o = order.clone();
  observable::from_iter(vec![1, 2])
    .merge(observable::from_iter(vec![3, 4]))
    .subscribe_complete(
      move |x| {
        v.lock().unwrap().push(x);
        o.lock().unwrap().push("next");
      },
      move || o.lock().unwrap().push("complete"),
    );

  let mut sorted = values.lock().unwrap().clone();
  sorted.sort_unstable();
  assert_eq!(sorted, vec![1, 2, 3, 4]);
  // Completion arrives exactly once, strictly after every value.
  assert_eq!(*order.lock().unwrap(), vec!["next", "next", "next", "next", "complete"]);
}

#[test]
fn behavior_subject_replay_between_pushes() {
  let subject = LocalBehaviorSubject::<i32, Infallible>::new(0);
  let mut producer = subject.clone();
  producer.next(5);

  let seen = Rc::new(RefCell::new(Vec::new()));
  let s = seen.clone();
  subject.clone().subscribe(move |v| s.borrow_mut().push(v));
  producer.next(7);

  assert_eq!(*seen.borrow(), vec![5, 7]);
}

#[test]
fn virtual_time_pipeline_debounces_an_interval_burst() {
  let scheduler = TestScheduler::new();
  let seen = Arc::new(Mutex::new(Vec::new()));

  let s = seen.clone();
  observable::interval(Duration::from_millis(10), scheduler.clone())
    .take(5)
    .debounce(Duration::from_millis(25), scheduler.clone())
    .subscribe(move |v| s.lock().unwrap().push(v));

  // Ticks land every 10ms; the debounce window only closes after the
  // final tick.
  scheduler.advance_by(Duration::from_millis(200));
  assert_eq!(*seen.lock().unwrap(), vec![4]);
}

#[test]
fn run_loop_host_controls_when_work_happens() {
  let scheduler = RunLoopScheduler::new();
  let seen = Arc::new(Mutex::new(Vec::new()));

  let s = seen.clone();
  observable::timer(Duration::ZERO, scheduler.clone())
    .subscribe(move |v| s.lock().unwrap().push(v));

  assert!(seen.lock().unwrap().is_empty());
  scheduler.dispatch();
  assert_eq!(*seen.lock().unwrap(), vec![0]);
}

#[test]
fn boxed_pipelines_are_storable_and_still_cancelable() {
  let subject = LocalSubject::<i32, Infallible>::new();
  let boxed: LocalBoxOp<'static, i32, Infallible> = subject.clone().map(|v| v + 1).box_it();

  let seen = Rc::new(RefCell::new(Vec::new()));
  let s = seen.clone();
  let mut sub = boxed.subscribe(move |v| s.borrow_mut().push(v));

  let mut producer = subject.clone();
  producer.next(1);
  sub.unsubscribe();
  producer.next(2);

  assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn fan_in_fan_out_round_trip() {
  let mut left = SharedSubject::<i32, Infallible>::new();
  let mut right = SharedSubject::<i32, Infallible>::new();

  let sums = Arc::new(Mutex::new(Vec::new()));
  let s = sums.clone();
  left
    .clone()
    .combine_latest(right.clone(), |a, b| a + b)
    .distinct_until_changed()
    .subscribe(move |v| s.lock().unwrap().push(v));

  left.next(1);
  right.next(2);
  left.next(1);
  right.next(3);

  assert_eq!(*sums.lock().unwrap(), vec![3, 4]);
}
