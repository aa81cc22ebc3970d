//! Ordered notification log derived from bus events.
//!
//! The log is a history, not a live view: entries outlive the thread or
//! reply that produced them, and deleting a thread retracts nothing.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bus::{Channel, Event, EventBus, SubscriptionId};
use crate::models::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Id,
    pub event: Event,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn kind(&self) -> Channel {
        self.event.channel()
    }
}

#[derive(Default)]
struct FeedState {
    /// Newest first.
    entries: Vec<Notification>,
    next_id: Id,
}

#[derive(Clone)]
pub struct NotificationFeed {
    state: Arc<Mutex<FeedState>>,
    subscriptions: Vec<SubscriptionId>,
}

impl NotificationFeed {
    /// Subscribes to all three channels on the given bus. Arriving events
    /// are prepended, so the most recent notification is always first.
    pub fn attach(bus: &EventBus) -> Self {
        let state = Arc::new(Mutex::new(FeedState::default()));
        let mut subscriptions = Vec::new();
        for channel in [Channel::NewThread, Channel::Mention, Channel::SubscribedReply] {
            let state = state.clone();
            subscriptions.push(bus.subscribe(channel, move |event| {
                let mut feed = state.lock().unwrap();
                feed.next_id += 1;
                let notification = Notification {
                    id: feed.next_id,
                    event: event.clone(),
                    created_at: Utc::now(),
                };
                feed.entries.insert(0, notification);
            }));
        }
        Self { state, subscriptions }
    }

    /// Stops consuming events. Already-logged entries stay.
    pub fn detach(&self, bus: &EventBus) {
        for id in &self.subscriptions {
            bus.unsubscribe(*id);
        }
    }

    /// Log order (newest first), optionally narrowed to one kind. Filtering
    /// never reorders the retained entries.
    pub fn list(&self, filter: Option<Channel>) -> Vec<Notification> {
        let state = self.state.lock().unwrap();
        match filter {
            None => state.entries.clone(),
            Some(kind) => state
                .entries
                .iter()
                .filter(|n| n.kind() == kind)
                .cloned()
                .collect(),
        }
    }

    /// Deletes one notification. No-op returning false when absent.
    pub fn remove(&self, id: Id) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.entries.len();
        state.entries.retain(|n| n.id != id);
        state.entries.len() < before
    }

    pub fn clear_all(&self) {
        self.state.lock().unwrap().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the log, re-seeding the id counter above every id present.
    pub(crate) fn load(&self, entries: Vec<Notification>) {
        let max_id = entries.iter().map(|n| n.id).max().unwrap_or(0);
        let mut state = self.state.lock().unwrap();
        state.entries = entries;
        state.next_id = max_id;
    }
}
