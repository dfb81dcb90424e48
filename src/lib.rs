//! # TextBook
//!
//! A small, durable post store for a social feed:
//! - Posts with append-only comments, one flat file per post
//! - A master index file listing live post ids in insertion order
//! - Write-through persistence on every mutation
//! - All-or-nothing recovery on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 TextBook (PostStore)                         │
//! │          add / remove / comment / render / query             │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │ startup                        │ mutation
//!                ▼                                ▼
//!         ┌─────────────┐                 ┌─────────────┐
//!         │  Recovery   │                 │  IndexFile  │
//!         │ disk → mem  │                 │  posts.txt  │
//!         └──────┬──────┘                 └─────────────┘
//!                │
//!                ▼
//!         ┌─────────────┐
//!         │ Post (Feed- │  Post-00001.txt, Post-00002.txt, ...
//!         │    Post)    │
//!         └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod format;
pub mod traits;

pub mod post;
pub mod index;
pub mod recovery;
pub mod textbook;
pub mod shared;
pub mod harness;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TextBookError, Result};
pub use config::{Config, SyncStrategy};
pub use format::{PostId, Timestamp};
pub use post::{Comment, Post};
pub use shared::SharedTextBook;
pub use textbook::TextBook;
pub use traits::{FeedPost, PostStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TextBook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
