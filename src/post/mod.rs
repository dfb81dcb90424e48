//! Post Module
//!
//! A single feed entry and its comments.
//!
//! ## Responsibilities
//! - Hold the immutable identity of a post (id, author, text, timestamp)
//! - Append comments, in memory and to the post's backing file
//! - Render the post alone or with all of its comments
//! - Rebuild a post from its backing file during recovery
//!
//! ## Sharing
//! `Post` is a handle: cloning it is cheap and every clone observes the
//! same comment list. The identity fields never change after creation.

mod comment;
mod entry;

pub use comment::Comment;
pub use entry::Post;
