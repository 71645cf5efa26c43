//! Multicast hubs: a `Subject` is both an observer and an observable,
//! pushing every received notification to the live set of subscribed
//! observers in subscription order.

mod local_subject;
mod serialized;
mod shared_subject;
mod subject_core;
mod subject_subscription;

pub use local_subject::{LocalBehaviorSubject, LocalReplaySubject, LocalSubject};
pub use serialized::SerializedSubject;
pub use shared_subject::{SharedBehaviorSubject, SharedReplaySubject, SharedSubject};
pub use subject_core::{History, LastValue, NoMemory, Subject, SubjectCore, SubjectMemory};
pub use subject_subscription::SubjectSubscription;
