//! Testing utilities for error trees
//!
//! Concatenated messages have no specified order beyond "first occurrence
//! wins", so tests comparing against hand-written sentences are brittle. This
//! module provides order-insensitive assertions, a structural comparison for
//! preserved subtrees, and (with the `proptest` feature) generators for
//! validator-shaped trees.
//!
//! # Examples
//!
//! ```rust
//! use errtree::{assert_messages, concatenate_messages};
//!
//! let sentence = concatenate_messages(["Too short", "Required", "Too short"]);
//! assert_messages!(sentence, ["Required", "Too short"]);
//! ```

use crate::node::Node;

/// Returns `true` if `sentence` is exactly the distinct `expected` messages,
/// each followed by `.`, joined by single spaces, in any order.
///
/// # Example
///
/// ```rust
/// use errtree::testing::messages_match;
///
/// assert!(messages_match("b. a.", &["a", "b"]));
/// assert!(!messages_match("a. a.", &["a"]));
/// ```
pub fn messages_match(sentence: &str, expected: &[&str]) -> bool {
    let mut remaining: Vec<String> = Vec::with_capacity(expected.len());
    for message in expected {
        let punctuated = format!("{}.", message);
        if !remaining.contains(&punctuated) {
            remaining.push(punctuated);
        }
    }

    if remaining.is_empty() {
        return sentence.is_empty();
    }
    match_rest(sentence, &mut remaining)
}

// Backtracks because a message may itself contain ". ".
fn match_rest(rest: &str, remaining: &mut Vec<String>) -> bool {
    for i in 0..remaining.len() {
        let candidate = remaining.swap_remove(i);
        let matched = match rest.strip_prefix(candidate.as_str()) {
            Some("") => remaining.is_empty(),
            Some(tail) => match tail.strip_prefix(' ') {
                Some(tail) if !remaining.is_empty() => match_rest(tail, remaining),
                _ => false,
            },
            None => false,
        };
        remaining.push(candidate);
        let last = remaining.len() - 1;
        remaining.swap(i, last);
        if matched {
            return true;
        }
    }
    false
}

/// Returns `true` if `output` has the map keys of `input` at every depth, with
/// each message list of `input` collapsed into a single message in `output`.
///
/// This is the shape relationship between a preserved subtree and its
/// transformed counterpart.
pub fn shape_preserved(input: &Node, output: &Node) -> bool {
    match (input, output) {
        (Node::Map(before), Node::Map(after)) => {
            before.len() == after.len()
                && before.iter().zip(after.iter()).all(|((k1, v1), (k2, v2))| {
                    k1 == k2
                        && match v1 {
                            Node::List(_) => v2.is_message(),
                            _ => shape_preserved(v1, v2),
                        }
                })
        }
        (Node::List(before), Node::List(after)) => {
            before.len() == after.len()
                && before
                    .iter()
                    .zip(after)
                    .all(|(v1, v2)| shape_preserved(v1, v2))
        }
        (Node::Message(before), Node::Message(after)) => before == after,
        _ => false,
    }
}

/// Assert that a concatenated sentence holds exactly the given messages.
///
/// Order is ignored; duplicates in the expected list are ignored.
///
/// # Example
///
/// ```rust
/// use errtree::assert_messages;
///
/// assert_messages!("Required. Too short.", ["Too short", "Required"]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($sentence:expr, [$($message:expr),* $(,)?]) => {{
        let expected: &[&str] = &[$($message),*];
        let sentence = &$sentence;
        let actual: &str = ::core::convert::AsRef::<str>::as_ref(sentence);
        if !$crate::testing::messages_match(actual, expected) {
            panic!(
                "Expected messages {:?} in any order, got {:?}",
                expected, actual
            );
        }
    }};
}

/// Assert that a node is a message holding exactly the given messages.
///
/// # Example
///
/// ```rust
/// use errtree::{assert_message_node, Node};
///
/// let node = Node::message("Required. Too short.");
/// assert_message_node!(node, ["Too short", "Required"]);
/// ```
#[macro_export]
macro_rules! assert_message_node {
    ($node:expr, [$($message:expr),* $(,)?]) => {{
        match &$node {
            $crate::Node::Message(text) => {
                $crate::assert_messages!(text, [$($message),*]);
            }
            other => panic!("Expected a message, got {:?}", other),
        }
    }};
}

#[cfg(feature = "proptest")]
pub use strategies::*;

#[cfg(feature = "proptest")]
mod strategies {
    use proptest::prelude::*;

    use crate::node::{ErrorMap, Node};

    /// Any message text, including punctuation and spaces.
    pub fn message() -> impl Strategy<Value = String> {
        "[A-Za-z .,!]{0,16}"
    }

    /// A list of messages, as a validator reports for one field.
    pub fn message_list() -> impl Strategy<Value = Node> {
        prop::collection::vec(message().prop_map(Node::Message), 0..5).prop_map(Node::List)
    }

    /// A map whose leaves are message lists, nested up to `depth` levels.
    ///
    /// Preserving any key whose value is a map is accepted by the strict
    /// transformation. A top-level message list is only well formed when its
    /// key is flattened, since a preserved list must hold one map per element.
    pub fn field_errors(depth: u32) -> BoxedStrategy<ErrorMap> {
        let leaf = prop::collection::vec(("[a-z]{1,6}", message_list()), 0..4)
            .prop_map(|entries| entries.into_iter().collect::<ErrorMap>());
        leaf.prop_recursive(depth, 32, 4, |inner| {
            prop::collection::vec(
                (
                    "[a-z]{1,6}",
                    prop_oneof![message_list(), inner.prop_map(Node::Map)],
                ),
                0..4,
            )
            .prop_map(|entries| entries.into_iter().collect::<ErrorMap>())
        })
        .boxed()
    }

    impl Arbitrary for Node {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            message()
                .prop_map(Node::Message)
                .prop_recursive(4, 32, 4, |inner| {
                    prop_oneof![
                        prop::collection::vec(inner.clone(), 0..4).prop_map(Node::List),
                        prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                            .prop_map(|entries| Node::Map(entries.into_iter().collect())),
                    ]
                })
                .boxed()
        }
    }

    impl Arbitrary for ErrorMap {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop::collection::vec(("[a-z]{1,6}", any::<Node>()), 0..6)
                .prop_map(|entries| entries.into_iter().collect())
                .boxed()
        }
    }
}
