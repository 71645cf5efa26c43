//! Convenient single import for the crate's public surface.

pub use crate::observable;
pub use crate::observable::{
  CoreObservable, Observable, ObservableType,
};
pub use crate::observer::{
  BoxedObserver, BoxedObserverSend, Observer, ObserverAll, ObserverComp, ObserverErr,
  ObserverNext,
};
pub use crate::ops::box_it::{LocalBoxOp, SharedBoxOp};
pub use crate::ops::group_by::GroupObservable;
pub use crate::ops::timeout::TimeoutError;
pub use crate::rc::{MutArc, MutRc, RcDeref, RcDerefMut};
pub use crate::scheduler::{
  CurrentThreadScheduler, Duration, ImmediateScheduler, Instant, NewThreadScheduler,
  RunLoopScheduler, Scheduler, TaskHandle, TestScheduler, Worker,
};
pub use crate::subject::{
  LocalBehaviorSubject, LocalReplaySubject, LocalSubject, SerializedSubject,
  SharedBehaviorSubject, SharedReplaySubject, SharedSubject, Subject,
};
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{
  CompositeSubscription, RefCountSubscription, SingleSubscription, Subscription,
  SubscriptionGuard,
};
