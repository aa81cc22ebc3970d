use chrono::Utc;
use rdt::{tree, Polarity, Reply, UiFlag};

fn reply(id: i64, content: &str) -> Reply {
    Reply::new(id, content, Utc::now())
}

/// Two top-level replies; the first has a child with a grandchild.
///
///   1 ── 2 ── 4
///   └─ 3
///   5
fn forest() -> Vec<Reply> {
    let mut root = reply(1, "root");
    let mut child = reply(2, "child");
    child.children.push(reply(4, "grandchild"));
    root.children.push(child);
    root.children.push(reply(3, "sibling"));
    vec![root, reply(5, "second top-level")]
}

#[test]
fn absent_id_operations_are_structural_noops() {
    let original = forest();

    let mut f = original.clone();
    assert!(!tree::vote(&mut f, 999, Polarity::Up));
    assert_eq!(f, original);

    let mut f = original.clone();
    assert!(!tree::delete_node(&mut f, 999));
    assert_eq!(f, original);

    let mut f = original.clone();
    assert!(!tree::toggle_flag(&mut f, 999, UiFlag::Collapsed));
    assert_eq!(f, original);
}

#[test]
fn vote_touches_exactly_one_node() {
    let mut f = forest();
    assert!(tree::vote(&mut f, 4, Polarity::Up));

    let mut expected = forest();
    expected[0].children[0].children[0].upvotes = 1;
    assert_eq!(f, expected);

    assert!(tree::vote(&mut f, 4, Polarity::Down));
    expected[0].children[0].children[0].downvotes = 1;
    assert_eq!(f, expected);
}

#[test]
fn insert_then_delete_round_trips() {
    let original = forest();
    let mut f = original.clone();

    let fresh = reply(42, "fresh");
    assert!(tree::insert_reply(&mut f, 3, fresh).is_ok());
    assert_eq!(f[0].children[1].children.len(), 1);
    assert_eq!(f[0].children[1].children[0].id, 42);

    assert!(tree::delete_node(&mut f, 42));
    assert_eq!(f, original);
}

#[test]
fn insert_with_unknown_parent_hands_the_reply_back() {
    let original = forest();
    let mut f = original.clone();
    let unplaced = tree::insert_reply(&mut f, 999, reply(42, "nowhere")).unwrap_err();
    assert_eq!(unplaced.id, 42);
    assert_eq!(f, original);
}

#[test]
fn delete_mid_chain_removes_entire_subtree() {
    // A(10) -> B(11) -> C(12)
    let mut c = reply(12, "c");
    c.upvotes = 1;
    let mut b = reply(11, "b");
    b.children.push(c);
    let mut a = reply(10, "a");
    a.children.push(b);
    let mut f = vec![a];

    assert!(tree::delete_node(&mut f, 11));
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].id, 10);
    assert!(f[0].children.is_empty());
    assert!(!tree::contains(&f, 12));
}

#[test]
fn delete_top_level_entry() {
    let mut f = forest();
    assert!(tree::delete_node(&mut f, 1));
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].id, 5);
    assert_eq!(tree::node_count(&f), 1);
}

#[test]
fn toggle_flag_leaves_every_other_field_alone() {
    let original = forest();

    let mut f = original.clone();
    assert!(tree::toggle_flag(&mut f, 2, UiFlag::Collapsed));
    let mut expected = original.clone();
    expected[0].children[0].collapsed = true;
    assert_eq!(f, expected);

    // toggling back restores the original forest
    assert!(tree::toggle_flag(&mut f, 2, UiFlag::Collapsed));
    assert_eq!(f, original);

    let mut f = original.clone();
    assert!(tree::toggle_flag(&mut f, 5, UiFlag::ReplyBox));
    assert!(f[1].show_reply_box);
    assert!(!f[0].show_reply_box);
}

#[test]
fn read_helpers_agree_with_structure() {
    let f = forest();
    assert_eq!(tree::node_count(&f), 5);
    assert_eq!(tree::max_id(&f), 5);
    assert_eq!(tree::find(&f, 4).unwrap().content, "grandchild");
    assert!(tree::contains(&f, 3));
    assert!(!tree::contains(&f, 6));
    assert_eq!(tree::max_id(&[]), 0);
}

#[test]
fn deep_chains_do_not_exhaust_the_stack() {
    // 300-deep single chain, ids 1..=300 from root to leaf
    let mut node = reply(300, "leaf");
    for id in (1..300).rev() {
        let mut parent = reply(id, "link");
        parent.children.push(node);
        node = parent;
    }
    let mut f = vec![node];

    assert_eq!(tree::node_count(&f), 300);
    assert!(tree::vote(&mut f, 300, Polarity::Up));
    assert!(tree::toggle_flag(&mut f, 300, UiFlag::Collapsed));
    assert!(tree::insert_reply(&mut f, 300, reply(301, "deeper")).is_ok());
    assert!(tree::delete_node(&mut f, 150));
    assert_eq!(tree::node_count(&f), 149);
}
