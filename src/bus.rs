//! In-process publish/subscribe bus decoupling store mutations from
//! notification consumers. Constructed explicitly and passed in, so tests
//! can attach probe subscribers and assert exact publishes.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::models::{Id, Reply, Thread};

/// One variant per event channel, each carrying its precisely-typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    NewThread { thread: Thread },
    Mention { thread_id: Id, reply: Reply },
    SubscribedReply { thread_id: Id, reply: Reply },
}

impl Event {
    pub fn channel(&self) -> Channel {
        match self {
            Event::NewThread { .. } => Channel::NewThread,
            Event::Mention { .. } => Channel::Mention,
            Event::SubscribedReply { .. } => Channel::SubscribedReply,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    NewThread,
    Mention,
    SubscribedReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct BusState {
    subscribers: Vec<(SubscriptionId, Channel, Handler)>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, channel: Channel, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.subscribers.push((id, channel, Arc::new(handler)));
        id
    }

    /// Returns false when the handle was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sub_id, _, _)| *sub_id != id);
        state.subscribers.len() < before
    }

    /// Delivers synchronously to every current subscriber of the event's
    /// channel, in subscription order. Infallible: the originating mutation
    /// has already committed by the time this runs. Handlers are invoked
    /// outside the registry lock so they may re-enter the bus or the store.
    pub fn publish(&self, event: &Event) {
        let handlers: Vec<Handler> = {
            let state = self.state.lock().unwrap();
            state
                .subscribers
                .iter()
                .filter(|(_, channel, _)| *channel == event.channel())
                .map(|(_, _, h)| h.clone())
                .collect()
        };
        tracing::debug!(channel = ?event.channel(), subscribers = handlers.len(), "publish");
        for handler in handlers {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn thread_event(id: Id) -> Event {
        Event::NewThread {
            thread: Thread::new(id, "t", "c", vec![], Utc::now()),
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = seen.clone();
            bus.subscribe(Channel::NewThread, move |_| {
                seen.lock().unwrap().push(tag);
            });
        }
        bus.publish(&thread_event(1));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let id = {
            let count = count.clone();
            bus.subscribe(Channel::NewThread, move |_| {
                *count.lock().unwrap() += 1;
            })
        };
        bus.publish(&thread_event(1));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&thread_event(2));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(&thread_event(1));
    }

    #[test]
    fn channels_are_independent() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = count.clone();
            bus.subscribe(Channel::Mention, move |_| {
                *count.lock().unwrap() += 1;
            });
        }
        bus.publish(&thread_event(1));
        assert_eq!(*count.lock().unwrap(), 0);
    }
}
