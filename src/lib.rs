pub mod bus;
pub mod error;
pub mod identity;
pub mod models;
pub mod notify;
pub mod snapshot;
pub mod store;
pub mod tree;

// Re-export commonly used items for tests / external users
pub use bus::{Channel, Event, EventBus, SubscriptionId};
pub use error::{StoreError, StoreResult};
pub use identity::{Identity, StaticIdentity};
pub use models::{Id, NewReply, NewThread, Polarity, Reply, SortBy, Thread, UiFlag};
pub use notify::{Notification, NotificationFeed};
pub use snapshot::Snapshot;
pub use store::{ThreadRemoval, ThreadStore};
