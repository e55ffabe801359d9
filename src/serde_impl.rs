//! Serde support for error trees (feature-gated)
//!
//! [`Node`] and [`ErrorMap`] use the shape validators already emit in JSON:
//! objects for maps, arrays for lists, strings for messages. Other scalars are
//! rejected on deserialize.
//!
//! # Example
//!
//! ```rust
//! use errtree::{transform_errors, ErrorMap, PreserveKeys};
//!
//! let errors: ErrorMap = serde_json::from_str(
//!     r#"{"name": ["Required", "Required"], "address": {"city": ["Too short"]}}"#,
//! ).unwrap();
//!
//! let display = transform_errors(&errors, &PreserveKeys::from(["address"]));
//! assert_eq!(
//!     serde_json::to_string(&display).unwrap(),
//!     r#"{"name":"Required.","address":{"city":"Too short."}}"#,
//! );
//! ```

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::node::{ErrorMap, Node};

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Message(text) => serializer.serialize_str(text),
            Node::List(items) => serializer.collect_seq(items),
            Node::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an error message, a list, or a map of errors")
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::message(value))
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::Message(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Node, A::Error> {
        ErrorMapVisitor.visit_map(map).map(Node::Map)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct ErrorMapVisitor;

impl<'de> Visitor<'de> for ErrorMapVisitor {
    type Value = ErrorMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of errors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ErrorMap, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, Node>()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ErrorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ErrorMapVisitor)
    }
}
