//! The producer side of the push protocol and the operator surface.
//!
//! [`ObservableType`] names a stream's value and error types;
//! [`CoreObservable`] is the subscribe capability, generic over the
//! concrete observer so a whole operator chain monomorphizes into one
//! nested type with no dispatch; [`Observable`] is the blanket extension
//! trait carrying every operator and `subscribe` flavor. Type erasure is
//! one explicit, one-way step via [`Observable::box_it`].

use std::convert::Infallible;

use crate::{
  observer::{Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext},
  ops::{
    box_it::{BoxObservable, BoxObservableSend, LocalBoxOp, SharedBoxOp},
    buffer_count::BufferCountOp,
    combine_latest::CombineLatestOp,
    concat::ConcatOp,
    debounce::DebounceOp,
    delay::DelayOp,
    distinct::{DistinctOp, DistinctUntilChangedOp},
    filter::FilterOp,
    finalize::FinalizeOp,
    group_by::GroupByOp,
    last::LastOp,
    map::MapOp,
    map_err::MapErrOp,
    merge::MergeOp,
    on_error_resume_next::OnErrorResumeNextOp,
    sample::SampleOp,
    scan::{ScanInitialOp, ScanOp},
    share::ShareOp,
    skip::SkipOp,
    skip_while::SkipWhileOp,
    switch_on_next::SwitchOnNextOp,
    take::TakeOp,
    take_while::TakeWhileOp,
    tap::TapOp,
    throttle::ThrottleOp,
    timeout::TimeoutOp,
    window_count::WindowCountOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod create;
mod defer;
mod from_iter;
mod interval;
mod of;
mod timer;
mod trivial;

pub use create::{create, Create};
pub use defer::{defer, Defer};
pub use from_iter::{from_iter, FromIter};
pub use interval::{interval, Interval};
pub use of::{of, Of};
pub use timer::{timer, Timer};
pub use trivial::{empty, never, throw, Empty, Never, ThrowErr};

/// Marker naming the value and error types a stream carries.
pub trait ObservableType {
  type Item;
  type Err;
}

/// The subscribe capability: build the upstream observer around `observer`
/// and start production, returning the subscription that tears the chain
/// down. Construction is strictly inside-out: the downstream observer
/// exists before the upstream is subscribed, so nothing can receive an
/// event before it is ready.
pub trait CoreObservable<O>: ObservableType {
  type Unsub: Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Operator and subscription surface, implemented for every
/// [`ObservableType`].
pub trait Observable: ObservableType + Sized {
  // ==================== transforms ====================

  /// Call `func` on each value and pass its result downstream.
  fn map<B, F>(self, func: F) -> MapOp<Self, F>
  where
    F: FnMut(Self::Item) -> B,
  {
    MapOp { source: self, func }
  }

  /// Transform the error channel, leaving values untouched.
  fn map_err<E, F>(self, func: F) -> MapErrOp<Self, F>
  where
    F: FnMut(Self::Err) -> E,
  {
    MapErrOp { source: self, func }
  }

  /// Run `func` on a reference to each value without consuming it.
  fn tap<F>(self, func: F) -> TapOp<Self, F>
  where
    F: FnMut(&Self::Item),
  {
    TapOp { source: self, func }
  }

  /// Running accumulation seeded from the first element; each accumulated
  /// value is emitted.
  fn scan<F>(self, binary_op: F) -> ScanOp<Self, F>
  where
    F: FnMut(Self::Item, Self::Item) -> Self::Item,
    Self::Item: Clone,
  {
    ScanOp { source: self, binary_op }
  }

  /// Running accumulation seeded from an explicit initial value.
  fn scan_initial<B, F>(self, initial: B, binary_op: F) -> ScanInitialOp<Self, B, F>
  where
    F: FnMut(B, Self::Item) -> B,
    B: Clone,
  {
    ScanInitialOp { source: self, initial, binary_op }
  }

  /// Collect values into chunks of `count`, emitting each full chunk and
  /// any remainder on completion.
  fn buffer_count(self, count: usize) -> BufferCountOp<Self> {
    BufferCountOp { source: self, count }
  }

  /// Split the stream into consecutive windows of `count` values, each
  /// window itself a subscribable stream.
  fn window_count(self, count: usize) -> WindowCountOp<Self> {
    WindowCountOp { source: self, count }
  }

  /// Demultiplex values into per-key group streams.
  fn group_by<K, KS>(self, key_selector: KS) -> GroupByOp<Self, KS>
  where
    KS: FnMut(&Self::Item) -> K,
  {
    GroupByOp { source: self, key_selector }
  }

  // ==================== filtering ====================

  /// Keep only values matching `predicate`.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp { source: self, predicate }
  }

  /// Emit the first `count` values, then complete and release the
  /// upstream.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp { source: self, count } }

  /// Forward values while `predicate` holds, then complete.
  fn take_while<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    TakeWhileOp { source: self, predicate }
  }

  /// Drop the first `count` values.
  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp { source: self, count } }

  /// Drop values until `predicate` first fails.
  fn skip_while<F>(self, predicate: F) -> SkipWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    SkipWhileOp { source: self, predicate }
  }

  /// Emit only the first value, then complete.
  fn first(self) -> TakeOp<Self> { self.take(1) }

  /// Emit only the final value, when the source completes.
  fn last(self) -> LastOp<Self> { LastOp { source: self } }

  /// Drop values that already occurred earlier in the stream.
  fn distinct(self) -> DistinctOp<Self> { DistinctOp { source: self } }

  /// Drop values equal to their immediate predecessor.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self> {
    DistinctUntilChangedOp { source: self }
  }

  // ==================== combination ====================

  /// Interleave this stream with `other`; completes once both complete,
  /// fails as soon as either fails.
  fn merge<B>(self, other: B) -> MergeOp<Self, B>
  where
    B: ObservableType<Item = Self::Item, Err = Self::Err>,
  {
    MergeOp { a: self, b: other }
  }

  /// Exhaust this stream, then subscribe `other`, preserving strict
  /// source order.
  fn concat<B>(self, other: B) -> ConcatOp<Self, B>
  where
    B: ObservableType<Item = Self::Item, Err = Self::Err>,
  {
    ConcatOp { a: self, b: other }
  }

  /// Pair values positionally; emits only from queued, not-yet-consumed
  /// values on both sides.
  fn zip<B>(self, other: B) -> ZipOp<Self, B>
  where
    B: ObservableType<Err = Self::Err>,
  {
    ZipOp { a: self, b: other }
  }

  /// Combine the latest values of both streams on every emission, once
  /// each side has produced at least one value.
  fn combine_latest<B, F, Out>(self, other: B, binary_op: F) -> CombineLatestOp<Self, B, F>
  where
    B: ObservableType<Err = Self::Err>,
    F: FnMut(Self::Item, B::Item) -> Out,
  {
    CombineLatestOp { a: self, b: other, binary_op }
  }

  /// On each value of this stream, emit it paired with the latest value
  /// of `other` (once `other` has emitted at least once).
  fn with_latest_from<B>(self, other: B) -> WithLatestFromOp<Self, B>
  where
    B: ObservableType<Err = Self::Err>,
  {
    WithLatestFromOp { a: self, b: other }
  }

  /// For a stream of streams: always mirror the most recent inner stream,
  /// disposing the previous inner the instant a new one arrives.
  fn switch_on_next(self) -> SwitchOnNextOp<Self>
  where
    Self::Item: ObservableType<Err = Self::Err>,
  {
    SwitchOnNextOp { source: self }
  }

  /// Multicast through one shared upstream connection: the first
  /// subscriber connects it, the last departing one disposes it.
  fn share(self) -> ShareOp<Self> { ShareOp::new(self) }

  // ==================== error handling ====================

  /// Replace a failure with the fallback stream produced by `fallback`.
  fn on_error_resume_next<R, F>(self, fallback: F) -> OnErrorResumeNextOp<Self, F>
  where
    F: FnOnce(Self::Err) -> R,
    R: ObservableType<Item = Self::Item>,
  {
    OnErrorResumeNextOp { source: self, fallback }
  }

  /// Run `func` once when the stream terminates or is unsubscribed.
  fn finalize<F>(self, func: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce(),
  {
    FinalizeOp { source: self, func }
  }

  // ==================== time-based ====================

  /// Re-time each value (and completion) by `dur`, preserving arrival
  /// order. Errors pass through immediately.
  fn delay<SD>(self, dur: Duration, scheduler: SD) -> DelayOp<Self, SD>
  where
    SD: Scheduler,
  {
    DelayOp { source: self, dur, scheduler }
  }

  /// Emit a value only once `dur` has passed without a newer one; every
  /// upstream value cancels and reschedules the pending emission.
  fn debounce<SD>(self, dur: Duration, scheduler: SD) -> DebounceOp<Self, SD>
  where
    SD: Scheduler,
  {
    DebounceOp { source: self, dur, scheduler }
  }

  /// Leading-edge rate limit: emit a value, then drop everything for
  /// `dur`.
  fn throttle<SD>(self, dur: Duration, scheduler: SD) -> ThrottleOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleOp { source: self, dur, scheduler }
  }

  /// Every `period`, emit the latest unseen value, if any. Periods are
  /// computed from the subscribe-time reference point, so they do not
  /// drift.
  fn sample<SD>(self, period: Duration, scheduler: SD) -> SampleOp<Self, SD>
  where
    SD: Scheduler,
  {
    SampleOp { source: self, period, scheduler }
  }

  /// Fail with [`TimeoutError`](crate::ops::timeout::TimeoutError) unless
  /// the upstream makes progress within `dur` of the previous event; the
  /// pending deadline is cancelled the instant the upstream progresses.
  fn timeout<SD>(self, dur: Duration, scheduler: SD) -> TimeoutOp<Self, SD>
  where
    SD: Scheduler,
  {
    TimeoutOp { source: self, dur, scheduler }
  }

  // ==================== type erasure ====================

  /// Erase the concrete chain type behind one boxed capability, for
  /// storing heterogeneous single-threaded pipelines together. One-way.
  fn box_it<'a>(self) -> LocalBoxOp<'a, Self::Item, Self::Err>
  where
    Self: BoxObservable<'a, Self::Item, Self::Err> + 'a,
  {
    LocalBoxOp::new(self)
  }

  /// Erase the concrete chain type behind a thread-safe boxed capability.
  /// One-way.
  fn box_it_shared(self) -> SharedBoxOp<Self::Item, Self::Err>
  where
    Self: BoxObservableSend<Self::Item, Self::Err> + Send + 'static,
  {
    SharedBoxOp::new(self)
  }

  // ==================== subscription ====================

  /// Subscribe with a `next` callback. Only compiles for chains whose
  /// error channel is [`Infallible`]; handle or transform errors first
  /// otherwise.
  fn subscribe<N>(self, next: N) -> <Self as CoreObservable<Subscriber<ObserverNext<N>>>>::Unsub
  where
    N: FnMut(Self::Item),
    Self: CoreObservable<Subscriber<ObserverNext<N>>> + ObservableType<Err = Infallible>,
  {
    self.actual_subscribe(Subscriber::new(ObserverNext { next }))
  }

  /// Subscribe with `next` and `error` callbacks.
  fn subscribe_err<N, E>(
    self, next: N, error: E,
  ) -> <Self as CoreObservable<Subscriber<ObserverErr<N, E>>>>::Unsub
  where
    N: FnMut(Self::Item),
    E: FnMut(Self::Err),
    Self: CoreObservable<Subscriber<ObserverErr<N, E>>>,
  {
    self.actual_subscribe(Subscriber::new(ObserverErr { next, error }))
  }

  /// Subscribe with `next` and `complete` callbacks (error-free chains
  /// only).
  fn subscribe_complete<N, C>(
    self, next: N, complete: C,
  ) -> <Self as CoreObservable<Subscriber<ObserverComp<N, C>>>>::Unsub
  where
    N: FnMut(Self::Item),
    C: FnMut(),
    Self: CoreObservable<Subscriber<ObserverComp<N, C>>> + ObservableType<Err = Infallible>,
  {
    self.actual_subscribe(Subscriber::new(ObserverComp { next, complete }))
  }

  /// Subscribe with all three callbacks.
  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> <Self as CoreObservable<Subscriber<ObserverAll<N, E, C>>>>::Unsub
  where
    N: FnMut(Self::Item),
    E: FnMut(Self::Err),
    C: FnMut(),
    Self: CoreObservable<Subscriber<ObserverAll<N, E, C>>>,
  {
    self.actual_subscribe(Subscriber::new(ObserverAll { next, error, complete }))
  }

  /// Subscribe a custom observer, still wrapped in the grammar-enforcing
  /// [`Subscriber`].
  fn subscribe_with<Ob>(self, observer: Ob) -> <Self as CoreObservable<Subscriber<Ob>>>::Unsub
  where
    Ob: Observer<Self::Item, Self::Err>,
    Self: CoreObservable<Subscriber<Ob>>,
  {
    self.actual_subscribe(Subscriber::new(observer))
  }
}

impl<T: ObservableType + Sized> Observable for T {}
