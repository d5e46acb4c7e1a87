//! # jsonflat - JSON flattening for relational loading
//!
//! Collapses arbitrarily nested JSON into a single-level map from
//! composite keys to scalar values, and lays such maps out as database rows.
//!
//! ## Modules
//!
//! - **flatten**: the recursive flattener and record writers
//! - **format**: SQL literal formatting of flattened records
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonflat::{FlattenConfig, Flattener, format_for_database};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let data = json!({
//!     "id": 1,
//!     "user": {"name": "Alice", "tags": ["admin", "ops"]}
//! });
//!
//! let flattener = Flattener::new(FlattenConfig::default());
//! let flat = flattener.flatten(data.clone())?;
//! assert_eq!(flat["user_tags_1"], "ops");
//!
//! let row = format_for_database(data)?;
//! assert_eq!(row.header_string, "id,user_name,user_tags_0,user_tags_1");
//! # Ok(())
//! # }
//! ```
//!
//! ## Quirks
//!
//! Only a non-empty object or list is flattened. A root that is a scalar,
//! null, `{}` or `[]` produces an empty map instead of an error.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::trace;

pub mod config;
pub mod error;
pub mod flatten;
pub mod format;

// Re-export commonly used types for convenience
pub use config::FlattenConfig;
pub use error::FlattenError;
pub use flatten::{flatten, flatten_with_prefix, FlatMap, FlatWriter, Flattener, SqlWriter};
pub use format::{format_for_database, sql_literal, DatabaseRow};

/// Flatten a newline-delimited JSON stream, writing one flat record per line
///
/// Blank lines are skipped. Returns the number of records written.
pub fn flatten_json<R: BufRead, W: Write>(
    reader: R,
    writer: &mut FlatWriter<W>,
    config: FlattenConfig,
) -> Result<usize> {
    let flattener = Flattener::new(config);
    let mut count = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no + 1))?;
        let record = flattener
            .flatten(value)
            .with_context(|| format!("Failed to flatten record on line {}", line_no + 1))?;
        trace!(line = line_no + 1, keys = record.len(), "flattened record");

        writer.write_record(&record)?;
        count += 1;
    }

    Ok(count)
}
