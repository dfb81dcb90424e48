//! Index Module
//!
//! The durable list of live post ids.
//!
//! ## Responsibilities
//! - Define which per-post files are authoritative
//! - Preserve insertion order of posts across restarts
//! - Stay in sync with the in-memory collection on every add/remove
//!
//! ## File Format
//! ```text
//! ┌─────────┐
//! │ 1\n     │
//! │ 2\n     │
//! │ 5\n     │   ids 3 and 4 were removed
//! └─────────┘
//! ```
//!
//! Adds append a line. Removes rewrite the whole file through a temporary
//! sibling and a rename, so a crash mid-rewrite leaves the old index intact.

mod file;

pub use file::IndexFile;
