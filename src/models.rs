//! # Domain Models
//!
//! Core entities of the discussion engine. Ids are `i64` handed out by a
//! single monotonically increasing counter owned by the store, so every
//! thread and reply id is unique for the lifetime of a store instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Id = i64;

/// A node in a thread's nested comment tree. Replies own their children
/// exclusively; the structure is a tree, never a DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Id,
    pub content: String,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: DateTime<Utc>,
    pub children: Vec<Reply>,
    /// Transient presentation state, never persisted.
    #[serde(skip)]
    pub show_reply_box: bool,
    #[serde(skip)]
    pub collapsed: bool,
}

impl Reply {
    pub fn new(id: Id, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: content.into(),
            upvotes: 0,
            downvotes: 0,
            created_at,
            children: Vec::new(),
            show_reply_box: false,
            collapsed: false,
        }
    }
}

/// A top-level discussion topic, root of a reply forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: Id,
    pub title: String,
    pub content: String,
    /// Free-text tags, insertion order. Not de-duplicated here; see
    /// `ThreadStore::subject_options` for the de-duplicated view.
    pub subjects: Vec<String>,
    pub replies: Vec<Reply>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: DateTime<Utc>,
    /// Toggled by user action only; gates `SubscribedReply` events.
    pub subscribed: bool,
    /// Transient input buffer for a top-level reply.
    #[serde(skip)]
    pub draft_reply: String,
    #[serde(skip)]
    pub show_reply_box: bool,
}

impl Thread {
    pub fn new(
        id: Id,
        title: impl Into<String>,
        content: impl Into<String>,
        subjects: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            subjects,
            replies: Vec::new(),
            upvotes: 0,
            downvotes: 0,
            created_at,
            subscribed: false,
            draft_reply: String::new(),
            show_reply_box: false,
        }
    }

    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

/// Input for `ThreadStore::create_thread`. `subjects` is the raw
/// comma-separated tag string as typed; the store splits and trims it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub content: String,
    pub subjects: String,
}

/// Input for `ThreadStore::reply`. `parent_id == None` targets the thread's
/// top-level reply list, otherwise an existing reply anywhere in its tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReply {
    pub thread_id: Id,
    pub parent_id: Option<Id>,
    pub content: String,
}

/// Which vote counter a vote operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Up,
    Down,
}

/// The two transient presentation flags a reply carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFlag {
    ReplyBox,
    Collapsed,
}

/// Thread listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    Popular,
    Starred,
}

/// Splits a raw comma-separated subject string into trimmed, non-empty tags.
pub(crate) fn parse_subjects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
