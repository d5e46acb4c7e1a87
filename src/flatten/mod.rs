//! JSON flattening - collapse nested JSON into single-level rows
//!
//! Every leaf of the input tree becomes one entry keyed by its path,
//! with field names and list indices joined by `_`:
//!
//! ```text
//! {"user": {"name": "Ann", "tags": ["a", "b"]}}
//!   => {"user_name": "Ann", "user_tags_0": "a", "user_tags_1": "b"}
//! ```
//!
//! Recursion is capped by [`FlattenConfig::max_depth`](crate::FlattenConfig),
//! which also guards against pathological nesting.

pub mod flattener;
pub mod writer;

pub use flattener::{flatten, flatten_with_prefix, FlatMap, Flattener, KEY_SEPARATOR};
pub use writer::{FlatWriter, SqlWriter};
