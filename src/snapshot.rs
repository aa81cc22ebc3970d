//! Point-in-time JSON snapshot of the store and the notification log, the
//! two independent collections a persistence layer would key by id. The
//! caller decides when a snapshot is taken and where the bytes go; there is
//! no background I/O and no durability guarantee.

use serde::{Deserialize, Serialize};

use crate::models::Thread;
use crate::notify::{Notification, NotificationFeed};
use crate::store::ThreadStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub threads: Vec<Thread>,
    pub notifications: Vec<Notification>,
}

impl Snapshot {
    pub fn capture(store: &ThreadStore, feed: &NotificationFeed) -> Self {
        Self {
            threads: store.dump(),
            notifications: feed.list(None),
        }
    }

    /// Replaces both collections. Each id counter is re-seeded above the
    /// maximum restored id, so ids handed out afterwards stay unique.
    pub fn restore(self, store: &ThreadStore, feed: &NotificationFeed) {
        store.load(self.threads);
        feed.load(self.notifications);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
