//! Collapse validator error trees into display-ready messages
//!
//! Validators tend to report every failed rule separately, often repeating the
//! same message and nesting it several levels deep. The functions in this
//! module turn such a tree into something a form can render directly: each
//! list of messages becomes one punctuated sentence, duplicates removed.
//!
//! Top-level keys are fully flattened into a single message unless they are
//! listed in [`PreserveKeys`], in which case their nested structure is kept and
//! only the leaf lists are collapsed.
//!
//! # Examples
//!
//! ```
//! use errtree::{error_map, transform_errors, Node, PreserveKeys};
//!
//! let errors = error_map! {
//!     "name" => vec!["Required", "Required"],
//!     "address" => error_map! {
//!         "street" => vec!["Required"],
//!         "city" => vec!["Too short", "Required"],
//!     },
//! };
//!
//! let flat = transform_errors(&errors, &PreserveKeys::default());
//! assert_eq!(flat.get("name"), Some(&Node::message("Required.")));
//! assert_eq!(flat.get("address"), Some(&Node::message("Required. Too short.")));
//!
//! let nested = transform_errors(&errors, &PreserveKeys::from(["address"]));
//! assert_eq!(
//!     nested.get("address"),
//!     Some(&Node::from(error_map! {
//!         "street" => "Required.",
//!         "city" => "Too short. Required.",
//!     })),
//! );
//! ```
//!
//! # Malformed trees
//!
//! The lenient functions never fail. Shapes a validator would not produce,
//! such as a bare message under a preserved key, are logged as warnings and
//! carried through unchanged. [`try_transform_errors`] reports them as
//! [`TransformError`]s instead.

use std::collections::HashSet;
use std::convert::Infallible;

use crate::error::{NodePath, TransformError};
use crate::node::{ErrorMap, Node};

/// Top-level keys whose nested error structure must be kept.
///
/// # Example
///
/// ```
/// use errtree::PreserveKeys;
///
/// let keys = PreserveKeys::from(["address", "phones"]);
/// assert!(keys.contains("address"));
/// assert!(!keys.contains("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreserveKeys {
    keys: HashSet<String>,
}

impl PreserveKeys {
    /// An empty set: every key gets flattened.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, returning `false` if it was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    /// Returns `true` if `key` keeps its structure.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no keys are preserved.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The preserved keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PreserveKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for PreserveKeys {
    fn from(keys: [S; N]) -> Self {
        keys.into_iter().collect()
    }
}

/// Flatten a subtree into one ordered list of messages.
///
/// Maps contribute their values in insertion order, lists their elements;
/// both are flattened recursively. A bare message yields itself.
///
/// # Example
///
/// ```
/// use errtree::{error_map, flatten_value, Node};
///
/// let node = Node::from(error_map! {
///     "street" => vec!["Required"],
///     "geo" => error_map! { "lat" => vec!["Invalid", "Required"] },
/// });
/// assert_eq!(flatten_value(&node), ["Required", "Invalid", "Required"]);
/// ```
pub fn flatten_value(node: &Node) -> Vec<String> {
    let mut messages = Vec::new();
    flatten_into(node, &mut messages);
    messages
}

fn flatten_into(node: &Node, messages: &mut Vec<String>) {
    match node {
        Node::Message(text) => messages.push(text.clone()),
        Node::List(items) => {
            for item in items {
                flatten_into(item, messages);
            }
        }
        Node::Map(map) => {
            for value in map.values() {
                flatten_into(value, messages);
            }
        }
    }
}

/// Join messages into one sentence, dropping duplicates.
///
/// Every distinct message gets a trailing `.` and messages are separated by a
/// single space. Messages appear in the order of their first occurrence.
///
/// # Example
///
/// ```
/// use errtree::concatenate_messages;
///
/// assert_eq!(concatenate_messages(["a", "a", "b"]), "a. b.");
/// assert_eq!(concatenate_messages(Vec::<String>::new()), "");
/// ```
pub fn concatenate_messages<I, S>(messages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut sentence = String::new();

    for message in messages {
        let message = message.as_ref();
        if !seen.insert(message.to_owned()) {
            continue;
        }
        if seen.len() > 1 {
            sentence.push(' ');
        }
        sentence.push_str(message);
        sentence.push('.');
    }

    sentence
}

/// Collapse every message list in a map, keeping the nesting.
///
/// Keys and their order are unchanged. A list value becomes the
/// [`concatenate_messages`] sentence of its messages; a map value is crawled
/// recursively. A bare message value is logged and kept as-is.
///
/// # Example
///
/// ```
/// use errtree::{crawl_and_concatenate_map, error_map};
///
/// let map = error_map! {
///     "street" => vec!["Required", "Required"],
///     "geo" => error_map! { "lat" => vec!["Invalid"] },
/// };
/// let expected = error_map! {
///     "street" => "Required.",
///     "geo" => error_map! { "lat" => "Invalid." },
/// };
/// assert_eq!(crawl_and_concatenate_map(&map), expected);
/// ```
pub fn crawl_and_concatenate_map(map: &ErrorMap) -> ErrorMap {
    crawl::<Lenient>(map, &NodePath::root()).unwrap_or_else(|never| match never {})
}

/// Collapse the message lists of a preserved subtree.
///
/// A map is crawled with [`crawl_and_concatenate_map`]. A list is treated as a
/// list of per-element maps, each crawled on its own. Anything else is logged
/// and returned unchanged.
pub fn deeply_concatenate_messages(node: &Node) -> Node {
    deeply::<Lenient>(node, &NodePath::root()).unwrap_or_else(|never| match never {})
}

/// Turn a validator's error map into display-ready messages.
///
/// Every top-level entry keeps its key. Keys in `preserve` keep their nested
/// structure via [`deeply_concatenate_messages`]; all other values are
/// flattened and joined into a single message.
pub fn transform_errors(errors: &ErrorMap, preserve: &PreserveKeys) -> ErrorMap {
    transform::<Lenient>(errors, preserve).unwrap_or_else(|never| match never {})
}

/// [`transform_errors`] with no preserved keys.
///
/// # Example
///
/// ```
/// use errtree::{error_map, transform_errors_default};
///
/// let errors = error_map! {
///     "email" => vec!["Invalid", "Invalid"],
/// };
/// let expected = error_map! { "email" => "Invalid." };
/// assert_eq!(transform_errors_default(&errors), expected);
/// ```
pub fn transform_errors_default(errors: &ErrorMap) -> ErrorMap {
    transform_errors(errors, &PreserveKeys::default())
}

/// [`transform_errors`] that rejects malformed trees instead of warning.
///
/// Well-formed input produces exactly the same output as
/// [`transform_errors`].
///
/// # Errors
///
/// Returns the first [`TransformError`] found, in entry order, when a
/// preserved subtree does not have the shape a validator produces.
///
/// # Example
///
/// ```
/// use errtree::{error_map, try_transform_errors, PreserveKeys, TransformError};
///
/// let errors = error_map! { "name" => "Required" };
/// let result = try_transform_errors(&errors, &PreserveKeys::from(["name"]));
/// assert!(matches!(result, Err(TransformError::ExpectedContainer { .. })));
/// ```
pub fn try_transform_errors(
    errors: &ErrorMap,
    preserve: &PreserveKeys,
) -> Result<ErrorMap, TransformError> {
    transform::<Strict>(errors, preserve)
}

/// What to do with a contract violation.
trait ViolationPolicy {
    type Error;

    fn report(violation: TransformError) -> Result<(), Self::Error>;
}

/// Warn and keep going.
enum Lenient {}

impl ViolationPolicy for Lenient {
    type Error = Infallible;

    fn report(violation: TransformError) -> Result<(), Infallible> {
        #[cfg(feature = "tracing")]
        tracing::warn!("Malformed error tree: {}", violation);
        #[cfg(not(feature = "tracing"))]
        eprintln!("Malformed error tree: {}", violation);
        Ok(())
    }
}

/// Stop at the first violation.
enum Strict {}

impl ViolationPolicy for Strict {
    type Error = TransformError;

    fn report(violation: TransformError) -> Result<(), TransformError> {
        Err(violation)
    }
}

fn transform<P: ViolationPolicy>(
    errors: &ErrorMap,
    preserve: &PreserveKeys,
) -> Result<ErrorMap, P::Error> {
    let root = NodePath::root();
    errors
        .iter()
        .map(|(key, value)| {
            let transformed = if preserve.contains(key) {
                deeply::<P>(value, &root.key(key))?
            } else {
                Node::Message(concatenate_messages(flatten_value(value)))
            };
            Ok::<_, P::Error>((key, transformed))
        })
        .collect()
}

fn deeply<P: ViolationPolicy>(node: &Node, path: &NodePath) -> Result<Node, P::Error> {
    match node {
        Node::Map(map) => crawl::<P>(map, path).map(Node::Map),
        Node::List(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = path.index(index);
                match item {
                    Node::Map(map) => crawl::<P>(map, &item_path).map(Node::Map),
                    other => {
                        P::report(TransformError::ExpectedMap {
                            path: item_path,
                            found: other.kind(),
                        })?;
                        Ok(other.clone())
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Node::List),
        Node::Message(_) => {
            P::report(TransformError::ExpectedContainer { path: path.clone() })?;
            Ok(node.clone())
        }
    }
}

fn crawl<P: ViolationPolicy>(map: &ErrorMap, path: &NodePath) -> Result<ErrorMap, P::Error> {
    let mut crawled = ErrorMap::with_capacity(map.len());

    for (key, value) in map {
        let value = match value {
            // Nested containers inside a leaf list are flattened into the sentence.
            Node::List(_) => Node::Message(concatenate_messages(flatten_value(value))),
            Node::Map(inner) => Node::Map(crawl::<P>(inner, &path.key(key))?),
            Node::Message(_) => {
                P::report(TransformError::UnexpectedMessage {
                    path: path.key(key),
                })?;
                value.clone()
            }
        };
        crawled.insert(key, value);
    }

    Ok(crawled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_map;
    use crate::node::NodeKind;

    fn sample() -> ErrorMap {
        error_map! {
            "name" => vec!["Required", "Required"],
            "address" => error_map! {
                "street" => vec!["Required"],
                "city" => vec!["Too short", "Required"],
            },
        }
    }

    #[test]
    fn test_concatenate_deduplicates() {
        assert_eq!(concatenate_messages(["a", "a", "b"]), "a. b.");
        assert_eq!(concatenate_messages(["x", "x", "x"]), "x.");
    }

    #[test]
    fn test_concatenate_empty() {
        assert_eq!(concatenate_messages(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_concatenate_keeps_first_occurrence_order() {
        assert_eq!(concatenate_messages(["b", "a", "b", "c", "a"]), "b. a. c.");
    }

    #[test]
    fn test_concatenate_empty_message() {
        assert_eq!(concatenate_messages(["", "a"]), ". a.");
    }

    #[test]
    fn test_flatten_empty_containers() {
        assert!(flatten_value(&Node::List(vec![])).is_empty());
        assert!(flatten_value(&Node::Map(ErrorMap::new())).is_empty());
    }

    #[test]
    fn test_flatten_bare_message() {
        assert_eq!(flatten_value(&Node::message("Required")), ["Required"]);
    }

    #[test]
    fn test_flatten_nested_lists_and_maps() {
        let node = Node::list([
            Node::message("a"),
            Node::list([Node::message("b"), Node::map([("k", vec!["c"])])]),
        ]);
        assert_eq!(flatten_value(&node), ["a", "b", "c"]);
    }

    #[test]
    fn test_crawl_keeps_key_order() {
        let map = error_map! {
            "z" => vec!["1"],
            "a" => vec!["2"],
            "m" => error_map! { "y" => vec!["3"], "b" => vec!["4"] },
        };
        let crawled = crawl_and_concatenate_map(&map);

        assert_eq!(crawled.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        let inner = crawled.get("m").and_then(Node::as_map);
        assert_eq!(
            inner.map(|m| m.keys().collect::<Vec<_>>()),
            Some(vec!["y", "b"])
        );
    }

    #[test]
    fn test_crawl_passes_bare_message_through() {
        let map = error_map! { "city" => "Required" };
        assert_eq!(crawl_and_concatenate_map(&map), map);
    }

    #[test]
    fn test_crawl_flattens_containers_inside_leaf_list() {
        let map = error_map! {
            "tags" => Node::list([Node::message("a"), Node::list(["b", "a"])]),
        };
        let expected = error_map! { "tags" => "a. b." };
        assert_eq!(crawl_and_concatenate_map(&map), expected);
    }

    #[test]
    fn test_deeply_on_list_of_maps() {
        let node = Node::list([
            Node::map([("number", vec!["Invalid", "Invalid"])]),
            Node::map([("number", vec!["Required"])]),
        ]);
        let expected = Node::list([
            Node::map([("number", "Invalid.")]),
            Node::map([("number", "Required.")]),
        ]);
        assert_eq!(deeply_concatenate_messages(&node), expected);
    }

    #[test]
    fn test_deeply_returns_message_unchanged() {
        let node = Node::message("Required");
        assert_eq!(deeply_concatenate_messages(&node), node);
    }

    #[test]
    fn test_deeply_keeps_non_map_list_elements() {
        let node = Node::list([Node::message("oops"), Node::map([("k", vec!["v"])])]);
        let expected = Node::list([Node::message("oops"), Node::map([("k", "v.")])]);
        assert_eq!(deeply_concatenate_messages(&node), expected);
    }

    #[test]
    fn test_transform_end_to_end_preserved() {
        let result = transform_errors(&sample(), &PreserveKeys::from(["address"]));
        let expected = error_map! {
            "name" => "Required.",
            "address" => error_map! {
                "street" => "Required.",
                "city" => "Too short. Required.",
            },
        };
        assert_eq!(result, expected);
    }

    #[test]
    fn test_transform_end_to_end_flattened() {
        let result = transform_errors_default(&sample());
        let expected = error_map! {
            "name" => "Required.",
            "address" => "Required. Too short.",
        };
        assert_eq!(result, expected);
    }

    #[test]
    fn test_transform_empty() {
        assert!(transform_errors_default(&ErrorMap::new()).is_empty());
    }

    #[test]
    fn test_transform_does_not_modify_input() {
        let input = sample();
        let snapshot = input.clone();
        let _ = transform_errors(&input, &PreserveKeys::from(["address"]));
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_preserve_key_missing_from_map_is_ignored() {
        let result = transform_errors(&sample(), &PreserveKeys::from(["phones"]));
        assert_eq!(result, transform_errors_default(&sample()));
    }

    #[test]
    fn test_strict_matches_lenient_on_well_formed_input() {
        let preserve = PreserveKeys::from(["address"]);
        assert_eq!(
            try_transform_errors(&sample(), &preserve),
            Ok(transform_errors(&sample(), &preserve))
        );
    }

    #[test]
    fn test_strict_rejects_bare_preserved_message() {
        let errors = error_map! { "name" => "Required" };
        let err = try_transform_errors(&errors, &PreserveKeys::from(["name"])).unwrap_err();
        assert_eq!(
            err,
            TransformError::ExpectedContainer {
                path: NodePath::root().key("name")
            }
        );
    }

    #[test]
    fn test_strict_rejects_non_map_list_element() {
        let errors = error_map! {
            "phones" => Node::list([Node::map([("number", vec!["Invalid"])]), Node::list(["x"])]),
        };
        let err = try_transform_errors(&errors, &PreserveKeys::from(["phones"])).unwrap_err();
        assert_eq!(
            err,
            TransformError::ExpectedMap {
                path: NodePath::root().key("phones").index(1),
                found: NodeKind::List,
            }
        );
    }

    #[test]
    fn test_strict_reports_nested_path() {
        let errors = error_map! {
            "phones" => Node::list([Node::map([("geo", error_map! { "lat" => "Invalid" })])]),
        };
        let err = try_transform_errors(&errors, &PreserveKeys::from(["phones"])).unwrap_err();
        assert_eq!(err.path().to_string(), "phones[0].geo.lat");
    }

    #[test]
    fn test_strict_ignores_malformed_flattened_keys() {
        let errors = error_map! { "name" => "Required" };
        let result = try_transform_errors(&errors, &PreserveKeys::default());
        assert_eq!(result, Ok(error_map! { "name" => "Required." }));
    }

    #[cfg(feature = "tracing")]
    mod tracing_tests {
        use super::*;
        use tracing_test::traced_test;

        #[test]
        #[traced_test]
        fn test_bare_preserved_message_logs_warning() {
            let errors = error_map! { "name" => "Required" };
            let result = transform_errors(&errors, &PreserveKeys::from(["name"]));

            assert_eq!(result, errors);
            assert!(logs_contain("Malformed error tree"));
            assert!(logs_contain("expected a list or map at `name`"));
        }

        #[test]
        #[traced_test]
        fn test_well_formed_input_logs_nothing() {
            let _ = transform_errors(&sample(), &PreserveKeys::from(["address"]));
            assert!(!logs_contain("Malformed error tree"));
        }
    }
}
