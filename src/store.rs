//! The thread store owns the forest of threads and is the sole mutation
//! surface. Reads hand out clones; a view can never alias store state.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info};

use crate::bus::{Event, EventBus};
use crate::error::{StoreError, StoreResult};
use crate::identity::Identity;
use crate::models::{parse_subjects, Id, NewReply, NewThread, Polarity, Reply, SortBy, Thread, UiFlag};
use crate::tree;

#[derive(Default)]
struct State {
    threads: Vec<Thread>,
    /// Id of the thread currently open in the consuming view, if any.
    selected: Option<Id>,
    next_id: Id,
}

/// Outcome of `delete_thread`. `was_selected` tells the view layer it must
/// drop its detail view; the store has already cleared the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRemoval {
    pub removed: bool,
    pub was_selected: bool,
}

#[derive(Clone)]
pub struct ThreadStore {
    state: Arc<RwLock<State>>,
    bus: EventBus,
    identity: Arc<dyn Identity>,
}

impl ThreadStore {
    pub fn new(bus: EventBus, identity: Arc<dyn Identity>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            bus,
            identity,
        }
    }

    fn next_id(state: &mut State) -> Id {
        state.next_id += 1;
        state.next_id
    }

    /// Creates a thread from raw form input. Title and content must be
    /// non-blank after trimming; the raw strings are stored as typed.
    /// Publishes `Event::NewThread` on success.
    pub fn create_thread(&self, new: NewThread) -> StoreResult<Thread> {
        if new.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if new.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        let subjects = parse_subjects(&new.subjects);

        let mut state = self.state.write().unwrap();
        let id = Self::next_id(&mut state);
        debug_assert!(
            state.threads.iter().all(|t| t.id != id),
            "duplicate thread id {id}"
        );
        let thread = Thread::new(id, new.title, new.content, subjects, Utc::now());
        state.threads.push(thread.clone());
        drop(state); // release before fan-out so subscribers may re-enter

        info!(id, "thread created");
        self.bus.publish(&Event::NewThread {
            thread: thread.clone(),
        });
        Ok(thread)
    }

    /// Removes the thread and its entire reply forest. No-op when absent.
    /// Clears the selection when the deleted thread was the open one.
    pub fn delete_thread(&self, id: Id) -> ThreadRemoval {
        let mut state = self.state.write().unwrap();
        let before = state.threads.len();
        state.threads.retain(|t| t.id != id);
        let removed = state.threads.len() < before;
        let was_selected = removed && state.selected == Some(id);
        if was_selected {
            state.selected = None;
        }
        if removed {
            debug!(id, "thread deleted");
        }
        ThreadRemoval { removed, was_selected }
    }

    /// Marks a thread as open in the consuming view. `None` clears the
    /// selection; `Some(id)` is rejected when the id is unknown.
    pub fn select_thread(&self, id: Option<Id>) -> bool {
        let mut state = self.state.write().unwrap();
        match id {
            None => {
                state.selected = None;
                true
            }
            Some(id) if state.threads.iter().any(|t| t.id == id) => {
                state.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    pub fn selected(&self) -> Option<Id> {
        self.state.read().unwrap().selected
    }

    pub fn vote_thread(&self, id: Id, polarity: Polarity) -> bool {
        let mut state = self.state.write().unwrap();
        match state.threads.iter_mut().find(|t| t.id == id) {
            Some(thread) => {
                match polarity {
                    Polarity::Up => thread.upvotes += 1,
                    Polarity::Down => thread.downvotes += 1,
                }
                true
            }
            None => false,
        }
    }

    /// Reply votes carry only the reply id, so every thread's forest is
    /// searched until the first (unique) match.
    pub fn vote_reply(&self, id: Id, polarity: Polarity) -> bool {
        let mut state = self.state.write().unwrap();
        state
            .threads
            .iter_mut()
            .any(|t| tree::vote(&mut t.replies, id, polarity))
    }

    /// Flips subscription and returns the new state, `None` when absent.
    /// No event fires from this action alone.
    pub fn toggle_subscribe(&self, id: Id) -> Option<bool> {
        let mut state = self.state.write().unwrap();
        let thread = state.threads.iter_mut().find(|t| t.id == id)?;
        thread.subscribed = !thread.subscribed;
        Some(thread.subscribed)
    }

    /// Posts a reply, top-level (`parent_id == None`) or nested. Blank
    /// content and unknown thread/parent targets reject without mutating.
    /// After a successful insertion the mention and subscription checks run
    /// independently; both, one, or neither event may fire.
    pub fn reply(&self, new: NewReply) -> StoreResult<Reply> {
        if new.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let mut state = self.state.write().unwrap();
        let Some(pos) = state.threads.iter().position(|t| t.id == new.thread_id) else {
            return Err(StoreError::NotFound);
        };
        let id = Self::next_id(&mut state);
        let reply = Reply::new(id, new.content.as_str(), Utc::now());
        let thread = &mut state.threads[pos];
        debug_assert!(
            !tree::contains(&thread.replies, id),
            "duplicate reply id {id}"
        );
        match new.parent_id {
            None => {
                thread.replies.push(reply.clone());
                thread.show_reply_box = false;
                thread.draft_reply.clear();
            }
            Some(parent_id) => {
                if tree::insert_reply(&mut thread.replies, parent_id, reply.clone()).is_err() {
                    return Err(StoreError::NotFound);
                }
                // posting from a reply box closes it
                if let Some(parent) = tree::find_mut(&mut thread.replies, parent_id) {
                    parent.show_reply_box = false;
                }
            }
        }
        let thread_id = thread.id;
        let subscribed = thread.subscribed;
        drop(state);

        debug!(id, thread_id, "reply posted");
        if new.content.contains(self.identity.mention_tag()) {
            self.bus.publish(&Event::Mention {
                thread_id,
                reply: reply.clone(),
            });
        }
        if subscribed {
            self.bus.publish(&Event::SubscribedReply {
                thread_id,
                reply: reply.clone(),
            });
        }
        Ok(reply)
    }

    /// Removes a reply and its subtree from the given thread only.
    pub fn delete_reply(&self, thread_id: Id, reply_id: Id) -> bool {
        let mut state = self.state.write().unwrap();
        match state.threads.iter_mut().find(|t| t.id == thread_id) {
            Some(thread) => tree::delete_node(&mut thread.replies, reply_id),
            None => false,
        }
    }

    /// `reply_id == None` targets the thread's own reply box.
    pub fn toggle_reply_box(&self, thread_id: Id, reply_id: Option<Id>) -> bool {
        let mut state = self.state.write().unwrap();
        let Some(thread) = state.threads.iter_mut().find(|t| t.id == thread_id) else {
            return false;
        };
        match reply_id {
            None => {
                thread.show_reply_box = !thread.show_reply_box;
                true
            }
            Some(id) => tree::toggle_flag(&mut thread.replies, id, UiFlag::ReplyBox),
        }
    }

    pub fn toggle_collapse(&self, thread_id: Id, reply_id: Id) -> bool {
        let mut state = self.state.write().unwrap();
        match state.threads.iter_mut().find(|t| t.id == thread_id) {
            Some(thread) => tree::toggle_flag(&mut thread.replies, reply_id, UiFlag::Collapsed),
            None => false,
        }
    }

    /// Updates the thread's top-level reply input buffer.
    pub fn set_draft_reply(&self, thread_id: Id, text: impl Into<String>) -> bool {
        let mut state = self.state.write().unwrap();
        match state.threads.iter_mut().find(|t| t.id == thread_id) {
            Some(thread) => {
                thread.draft_reply = text.into();
                true
            }
            None => false,
        }
    }

    /// Posts the thread's draft buffer as a top-level reply. The draft is
    /// cleared on success and kept on rejection.
    pub fn post_draft(&self, thread_id: Id) -> StoreResult<Reply> {
        let draft = {
            let state = self.state.read().unwrap();
            state
                .threads
                .iter()
                .find(|t| t.id == thread_id)
                .map(|t| t.draft_reply.clone())
                .ok_or(StoreError::NotFound)?
        };
        self.reply(NewReply {
            thread_id,
            parent_id: None,
            content: draft,
        })
    }

    /// Sorted, filtered view of the threads. Sort first, then filter, so the
    /// relative order among retained threads matches the sorted sequence.
    pub fn list_threads(&self, sort: SortBy, subject_filter: &[String]) -> Vec<Thread> {
        let mut view: Vec<Thread> = self.state.read().unwrap().threads.clone();
        match sort {
            SortBy::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Popular => view.sort_by(|a, b| b.score().cmp(&a.score())),
            SortBy::Starred => view.sort_by(|a, b| {
                b.subscribed
                    .cmp(&a.subscribed)
                    .then(b.created_at.cmp(&a.created_at))
            }),
        }
        if !subject_filter.is_empty() {
            view.retain(|t| {
                t.subjects
                    .iter()
                    .any(|s| subject_filter.iter().any(|f| f == s))
            });
        }
        view
    }

    pub fn get_thread(&self, id: Id) -> Option<Thread> {
        self.state
            .read()
            .unwrap()
            .threads
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn replies_of(&self, thread_id: Id) -> Option<Vec<Reply>> {
        self.state
            .read()
            .unwrap()
            .threads
            .iter()
            .find(|t| t.id == thread_id)
            .map(|t| t.replies.clone())
    }

    /// All subjects across threads, de-duplicated, first-seen order. Feeds
    /// the filter dropdown in the consuming view.
    pub fn subject_options(&self) -> Vec<String> {
        let state = self.state.read().unwrap();
        let mut options: Vec<String> = Vec::new();
        for thread in &state.threads {
            for subject in &thread.subjects {
                if !options.contains(subject) {
                    options.push(subject.clone());
                }
            }
        }
        options
    }

    /// Raw store-order clone of the forest, for snapshotting.
    pub(crate) fn dump(&self) -> Vec<Thread> {
        self.state.read().unwrap().threads.clone()
    }

    /// Replaces the forest, resetting the selection and re-seeding the id
    /// counter above every id present.
    pub(crate) fn load(&self, threads: Vec<Thread>) {
        let mut max_id = 0;
        for thread in &threads {
            max_id = max_id.max(thread.id).max(tree::max_id(&thread.replies));
        }
        let mut state = self.state.write().unwrap();
        state.threads = threads;
        state.selected = None;
        state.next_id = max_id;
    }
}
