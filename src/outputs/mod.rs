//! Output sinks for converted records.
//!
//! # Submodules
//!
//! - [`jsonl`]: Writes [`Record`](crate::models::Record)s as JSON Lines
//!
//! # Output Structure
//!
//! ```text
//! ../dataset.jsonl      # directory scan, no ids
//! ../test.jsonl         # from test.url.filelist, records carry "id"
//! ```

pub mod jsonl;
