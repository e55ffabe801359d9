//! Error tree data model
//!
//! Validators report problems as a tree: a map from field names to either a
//! list of messages or a further map for nested fields. This module provides
//! the [`Node`] type describing one position in that tree and the
//! insertion-ordered [`ErrorMap`] used for every mapping level.
//!
//! # Examples
//!
//! ```
//! use errtree::{error_map, Node};
//!
//! let errors = error_map! {
//!     "name" => vec!["Required"],
//!     "address" => error_map! {
//!         "street" => vec!["Required"],
//!     },
//! };
//!
//! assert_eq!(errors.len(), 2);
//! assert!(errors.get("address").is_some_and(Node::is_map));
//! ```

use std::collections::HashMap;
use std::fmt;

/// One position in an error tree.
///
/// A tree bottoms out in [`Node::Message`] leaves. Lists hold messages (or, for
/// list-shaped fields, one map per element) and maps hold named children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single error message.
    Message(String),
    /// An ordered list of nodes, duplicates allowed.
    List(Vec<Node>),
    /// Named children in insertion order.
    Map(ErrorMap),
}

/// The shape of a [`Node`], without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// See [`Node::Message`].
    Message,
    /// See [`Node::List`].
    List,
    /// See [`Node::Map`].
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Message => f.write_str("message"),
            NodeKind::List => f.write_str("list"),
            NodeKind::Map => f.write_str("map"),
        }
    }
}

impl Node {
    /// Create a message leaf.
    pub fn message(text: impl Into<String>) -> Self {
        Node::Message(text.into())
    }

    /// Create a list from anything convertible into nodes.
    ///
    /// # Example
    ///
    /// ```
    /// use errtree::Node;
    ///
    /// let node = Node::list(["Required", "Too short"]);
    /// assert_eq!(node.as_list().map(<[Node]>::len), Some(2));
    /// ```
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Node::List(items.into_iter().map(Into::into).collect())
    }

    /// Create a map node from `(key, value)` pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Node>,
    {
        Node::Map(entries.into_iter().collect())
    }

    /// The shape of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Message(_) => NodeKind::Message,
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Map,
        }
    }

    /// Returns `true` for [`Node::Message`].
    pub fn is_message(&self) -> bool {
        matches!(self, Node::Message(_))
    }

    /// Returns `true` for [`Node::List`].
    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    /// Returns `true` for [`Node::Map`].
    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    /// The message text, if this is a leaf.
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Node::Message(text) => Some(text),
            _ => None,
        }
    }

    /// The list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// The children, if this is a map.
    pub fn as_map(&self) -> Option<&ErrorMap> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Message(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Message(text)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::list(items)
    }
}

impl From<ErrorMap> for Node {
    fn from(map: ErrorMap) -> Self {
        Node::Map(map)
    }
}

/// An insertion-ordered map from field names to error nodes.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps the
/// key at its original position, so iteration order is always the order in
/// which keys were first seen.
///
/// Single-key operations ([`get`](Self::get), [`insert`](Self::insert)) scan
/// the entries, so they are linear in the map's length; error maps are sized
/// like forms, not like databases. Bulk construction through
/// [`FromIterator`], [`Extend`] and deserialization indexes the keys once and
/// stays linear overall.
///
/// Equality compares entries in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Node)>,
}

impl ErrorMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for `key` if there was one.
    ///
    /// Scans the existing entries; use [`Extend`] to add many entries at once.
    ///
    /// # Example
    ///
    /// ```
    /// use errtree::{ErrorMap, Node};
    ///
    /// let mut map = ErrorMap::new();
    /// map.insert("email", vec!["Required"]);
    /// map.insert("name", vec!["Required"]);
    /// let previous = map.insert("email", vec!["Invalid"]);
    ///
    /// assert_eq!(previous, Some(Node::list(["Required"])));
    /// assert_eq!(map.keys().collect::<Vec<_>>(), ["email", "name"]);
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Borrowing iterator over an [`ErrorMap`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Node)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = (&'a str, &'a Node);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMap
where
    K: Into<String>,
    V: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ErrorMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for ErrorMap
where
    K: Into<String>,
    V: Into<Node>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut positions: HashMap<String, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();

        for (key, value) in iter {
            let key = key.into();
            let value = value.into();
            match positions.get(&key) {
                Some(&position) => self.entries[position].1 = value,
                None => {
                    positions.insert(key.clone(), self.entries.len());
                    self.entries.push((key, value));
                }
            }
        }
    }
}

/// Build an [`ErrorMap`] from `key => value` pairs.
///
/// Values may be anything convertible into a [`Node`]: string slices,
/// `Vec`s of messages, or nested maps.
///
/// # Example
///
/// ```
/// use errtree::error_map;
///
/// let errors = error_map! {
///     "name" => vec!["Required", "Required"],
///     "address" => error_map! {
///         "city" => vec!["Too short"],
///     },
/// };
/// assert_eq!(errors.keys().collect::<Vec<_>>(), ["name", "address"]);
/// ```
#[macro_export]
macro_rules! error_map {
    () => {
        $crate::ErrorMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ErrorMap::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
