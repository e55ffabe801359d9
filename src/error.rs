//! Contract violations found while transforming an error tree
//!
//! The lenient transformation API never fails: when a caller hands it a tree
//! whose shape does not match what a validator would produce, it logs a
//! warning and carries the offending node through untouched. The strict API
//! (see [`try_transform_errors`](crate::try_transform_errors)) reports the same
//! situations as a [`TransformError`] instead.
//!
//! Every error carries the [`NodePath`] of the offending node, rendered as
//! dotted keys with bracketed list indices:
//!
//! ```
//! use errtree::{error_map, try_transform_errors, PreserveKeys};
//!
//! let errors = error_map! {
//!     "address" => error_map! { "city" => "Required" },
//! };
//!
//! let err = try_transform_errors(&errors, &PreserveKeys::from(["address"])).unwrap_err();
//! assert_eq!(err.path().to_string(), "address.city");
//! ```

use std::error::Error as StdError;
use std::fmt;

use crate::node::NodeKind;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A map key.
    Key(String),
    /// A list index.
    Index(usize),
}

/// Location of a node inside an error tree, starting from the top-level map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The path of the top-level map itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// This path extended by a map key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// This path extended by a list index.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    /// The steps of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` for the top-level path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }

        Ok(())
    }
}

/// A node whose shape breaks the contract of the transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A preserved top-level value was a bare message instead of a list or map.
    ExpectedContainer {
        /// Where the message was found.
        path: NodePath,
    },
    /// A preserved list contained something other than a map.
    ExpectedMap {
        /// Where the element was found.
        path: NodePath,
        /// What was found instead.
        found: NodeKind,
    },
    /// A map inside a preserved subtree held a bare message where a list of
    /// messages or a nested map was expected.
    UnexpectedMessage {
        /// Where the message was found.
        path: NodePath,
    },
}

impl TransformError {
    /// Location of the offending node.
    pub fn path(&self) -> &NodePath {
        match self {
            TransformError::ExpectedContainer { path }
            | TransformError::ExpectedMap { path, .. }
            | TransformError::UnexpectedMessage { path } => path,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::ExpectedContainer { path } => {
                write!(f, "expected a list or map at `{}`, found a message", path)
            }
            TransformError::ExpectedMap { path, found } => {
                write!(f, "expected a map at `{}`, found a {}", path, found)
            }
            TransformError::UnexpectedMessage { path } => write!(
                f,
                "expected a list of messages or a map at `{}`, found a bare message",
                path
            ),
        }
    }
}

impl StdError for TransformError {}
