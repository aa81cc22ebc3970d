//! Id-targeted mutations over one forest level of the reply tree.
//!
//! All operations walk depth-first in pre-order and stop at the first match;
//! ids are unique, so the first match is the only one. Traversal uses an
//! explicit stack rather than recursion so that reply chains hundreds of
//! levels deep cannot exhaust the call stack. Mutation is in place; callers
//! serialize access through the store's write lock.

use crate::models::{Id, Polarity, Reply, UiFlag};

/// Finds the reply with `id` anywhere in the forest.
pub fn find(forest: &[Reply], id: Id) -> Option<&Reply> {
    let mut stack: Vec<&Reply> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Mutable counterpart of [`find`].
pub fn find_mut(forest: &mut [Reply], id: Id) -> Option<&mut Reply> {
    let mut stack: Vec<&mut Reply> = forest.iter_mut().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter_mut().rev());
    }
    None
}

pub fn contains(forest: &[Reply], id: Id) -> bool {
    find(forest, id).is_some()
}

/// Total number of replies in the forest, all depths included.
pub fn node_count(forest: &[Reply]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&Reply> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children.iter());
    }
    count
}

/// Largest id present anywhere in the forest, 0 when empty.
pub fn max_id(forest: &[Reply]) -> Id {
    let mut max = 0;
    let mut stack: Vec<&Reply> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        max = max.max(node.id);
        stack.extend(node.children.iter());
    }
    max
}

/// Increments one vote counter on the matching reply by exactly 1.
/// Returns false (forest untouched) when the id is absent.
pub fn vote(forest: &mut [Reply], id: Id, polarity: Polarity) -> bool {
    match find_mut(forest, id) {
        Some(reply) => {
            match polarity {
                Polarity::Up => reply.upvotes += 1,
                Polarity::Down => reply.downvotes += 1,
            }
            true
        }
        None => false,
    }
}

/// Appends `reply` to the children of the node matching `parent_id`.
/// When the parent is not in this forest the reply is handed back untouched
/// via `Err` so the caller can try another forest or report the miss.
pub fn insert_reply(forest: &mut [Reply], parent_id: Id, reply: Reply) -> Result<(), Reply> {
    match find_mut(forest, parent_id) {
        Some(parent) => {
            debug_assert!(
                !contains(&parent.children, reply.id),
                "duplicate reply id {}",
                reply.id
            );
            parent.children.push(reply);
            Ok(())
        }
        None => Err(reply),
    }
}

/// Removes the matching reply and its entire subtree from wherever it occurs.
/// No-op returning false when the id is absent.
pub fn delete_node(forest: &mut Vec<Reply>, id: Id) -> bool {
    let mut stack: Vec<&mut Vec<Reply>> = vec![forest];
    while let Some(level) = stack.pop() {
        if let Some(pos) = level.iter().position(|r| r.id == id) {
            level.remove(pos);
            return true;
        }
        stack.extend(level.iter_mut().map(|r| &mut r.children));
    }
    false
}

/// Flips one presentation flag on the matching reply only. Content, votes
/// and children of every node are left untouched.
pub fn toggle_flag(forest: &mut [Reply], id: Id, flag: UiFlag) -> bool {
    match find_mut(forest, id) {
        Some(reply) => {
            match flag {
                UiFlag::ReplyBox => reply.show_reply_box = !reply.show_reply_box,
                UiFlag::Collapsed => reply.collapsed = !reply.collapsed,
            }
            true
        }
        None => false,
    }
}
