//! Capability traits
//!
//! The contracts a post and a post store provide to their callers.
//! `Post` and `TextBook` are the conforming types.

use crate::error::Result;
use crate::format::{PostId, Timestamp};

/// A single feed entry with its comments.
///
/// Implementations must satisfy these invariants:
/// - `id`, `author`, `text` and `timestamp` never change after creation.
/// - Comments are append-only and kept in the order they were added.
/// - Every comment added through `add_comment` is on disk before it returns.
pub trait FeedPost {
    /// Append a comment stamped with the current time.
    ///
    /// The comment line is appended to the post's backing file as well as
    /// the in-memory list. Empty author or text is `InvalidArgument`.
    fn add_comment(&self, author: &str, text: &str) -> Result<()>;

    /// True if every field is set and the backing file exists and is readable.
    fn is_valid(&self) -> bool;

    /// Post header, the post line, a comments header, then one line per comment.
    ///
    /// ```text
    /// Post:
    /// 00010 2021-11-30T23:38:23.085Z Mason Did stuff.
    /// Comments:
    /// 2021-12-01T08:18:21.055Z Luke It's late...
    /// ```
    fn render(&self) -> String;

    /// The post line alone, identical to the second line of `render()`.
    fn render_summary(&self) -> String;

    /// Backing file name, e.g. `Post-00010.txt`.
    fn filename(&self) -> String;

    fn id(&self) -> PostId;

    fn text(&self) -> &str;

    fn timestamp(&self) -> Timestamp;

    fn author(&self) -> &str;
}

/// An ordered, durable collection of posts.
///
/// Indexes are positions in the live collection (0-based), not ids.
/// Removing a post shifts every later post down by one.
///
/// Out-of-range indexes are an expected outcome and are reported through
/// `None` / `false`, never through `Err`.
pub trait PostStore {
    type Post: FeedPost;

    /// Highest id ever assigned; 0 for a fresh, empty store.
    fn last_id(&self) -> PostId;

    fn post_count(&self) -> usize;

    /// Full rendering of the post at `index`, or `None` if out of range.
    fn post_string(&self, index: usize) -> Option<String>;

    /// Create a post with the next id and the current time.
    ///
    /// Returns the new id. On `Err` nothing is committed: the post count and
    /// last id are unchanged.
    fn add_post(&mut self, author: &str, text: &str) -> Result<PostId>;

    /// Remove and return the post at `index`, or `Ok(None)` if out of range.
    fn remove_post(&mut self, index: usize) -> Result<Option<Self::Post>>;

    /// Comment on the post at `index`; `Ok(false)` if out of range.
    fn add_comment(&mut self, index: usize, author: &str, text: &str) -> Result<bool>;

    /// `TextBook contains {n} posts:` followed by `{index} - {summary}` lines.
    fn render(&self) -> String;

    /// A new list of the posts in positional order.
    ///
    /// Changing the list never affects the store. The posts themselves are
    /// shared handles, so comments added through them are visible to the store.
    fn posts(&self) -> Vec<Self::Post>;
}
