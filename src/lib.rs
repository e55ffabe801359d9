//! # errtree
//!
//! Turn validator error trees into messages a form can display.
//!
//! Schema and form validators report failures as nested maps of message lists,
//! usually repeating the same message several times. `errtree` collapses every
//! list into one deduplicated, punctuated sentence and, unless a top-level key
//! is asked to keep its structure, flattens each field down to a single string.
//!
//! ## Quick Example
//!
//! ```rust
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
//! let display = transform_errors(&errors, &PreserveKeys::from(["address"]));
//!
//! assert_eq!(display.get("name"), Some(&Node::message("Required.")));
//! assert_eq!(
//!     display.get("address"),
//!     Some(&Node::from(error_map! {
//!         "street" => "Required.",
//!         "city" => "Too short. Required.",
//!     })),
//! );
//! ```
//!
//! ## Features
//!
//! - `tracing`: report malformed trees through `tracing` instead of stderr
//! - `serde`: (de)serialize [`Node`] and [`ErrorMap`] in their natural JSON shape
//! - `proptest`: `Arbitrary` impls and tree strategies in [`testing`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod node;
pub mod testing;
pub mod transform;

#[cfg(feature = "serde")]
mod serde_impl;

// Re-exports
pub use error::{NodePath, PathSegment, TransformError};
pub use node::{ErrorMap, Node, NodeKind};
pub use transform::{
    concatenate_messages, crawl_and_concatenate_map, deeply_concatenate_messages, flatten_value,
    transform_errors, transform_errors_default, try_transform_errors, PreserveKeys,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::TransformError;
    pub use crate::error_map;
    pub use crate::node::{ErrorMap, Node};
    pub use crate::transform::{transform_errors, try_transform_errors, PreserveKeys};
}
