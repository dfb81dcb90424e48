//! Post implementation
//!
//! Shared handle over an immutable post record and its comment list.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, TextBookError};
use crate::format::{self, PostId, RecordError, Timestamp};
use crate::traits::FeedPost;

use super::Comment;

/// A single feed entry
///
/// Cloning yields another handle to the same post.
#[derive(Debug, Clone)]
pub struct Post {
    inner: Arc<PostInner>,
}

#[derive(Debug)]
struct PostInner {
    id: PostId,
    timestamp: Timestamp,
    author: String,
    text: String,

    /// Backing file: post line followed by one line per comment
    path: PathBuf,

    sync_strategy: SyncStrategy,

    /// Append-only; the write lock is held across the file append so that
    /// file order and memory order agree
    comments: RwLock<Vec<Comment>>,
}

impl Post {
    /// Create a post and write its backing file
    ///
    /// Any stale file already at the derived path is overwritten: the id is
    /// fresh, so whatever is there is not referenced by the index.
    pub(crate) fn create(config: &Config, id: PostId, author: &str, text: &str) -> Result<Self> {
        format::validate_author(author)?;
        format::validate_text(text)?;

        let post = Self::from_parts(
            config,
            id,
            format::now(),
            author.to_string(),
            text.to_string(),
            Vec::new(),
        );

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(post.path())?;
        writeln!(file, "{}", post.render_summary())?;
        sync(&file, post.inner.sync_strategy)?;

        Ok(post)
    }

    /// Rebuild a post from its backing file
    ///
    /// The first line must be a post line carrying `id`; every following
    /// non-blank line must be a comment line.
    pub fn load(config: &Config, id: PostId) -> Result<Self> {
        let path = config.post_path(id);
        let contents = fs::read_to_string(&path)?;
        let corrupt = |e: RecordError| TextBookError::corrupt(&path, e.to_string());

        let mut lines = contents.lines();
        let first = lines
            .next()
            .ok_or_else(|| TextBookError::corrupt(&path, "file is empty"))?;

        let fields = format::split_fields(first, &["id", "timestamp", "author", "text"])
            .map_err(corrupt)?;
        let file_id = format::parse_id(fields[0]).map_err(corrupt)?;
        if file_id != id {
            return Err(TextBookError::corrupt(
                &path,
                format!("expected post {:05}, found {:05}", id, file_id),
            ));
        }
        let timestamp = format::parse_timestamp(fields[1]).map_err(corrupt)?;

        let comments = lines
            .filter(|line| !line.trim().is_empty())
            .map(Comment::parse_line)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        Ok(Self::from_parts(
            config,
            id,
            timestamp,
            fields[2].to_string(),
            fields[3].to_string(),
            comments,
        ))
    }

    fn from_parts(
        config: &Config,
        id: PostId,
        timestamp: Timestamp,
        author: String,
        text: String,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            inner: Arc::new(PostInner {
                id,
                timestamp,
                author,
                text,
                path: config.post_path(id),
                sync_strategy: config.sync_strategy,
                comments: RwLock::new(comments),
            }),
        }
    }

    /// Full path of the backing file
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Snapshot of the comments in chronological order
    pub fn comments(&self) -> Vec<Comment> {
        self.inner.comments.read().clone()
    }

    pub fn comment_count(&self) -> usize {
        self.inner.comments.read().len()
    }

    /// True if both handles refer to the same post instance
    pub fn ptr_eq(&self, other: &Post) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FeedPost for Post {
    /// The file is opened without `create`, so a post whose backing file was
    /// removed rejects new comments with an I/O error.
    fn add_comment(&self, author: &str, text: &str) -> Result<()> {
        let comment = Comment::new(author, text)?;

        let mut comments = self.inner.comments.write();
        let mut file = OpenOptions::new().append(true).open(&self.inner.path)?;
        writeln!(file, "{}", comment.to_line())?;
        sync(&file, self.inner.sync_strategy)?;

        tracing::debug!(post = self.inner.id, author, "Comment appended");
        comments.push(comment);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        let inner = &self.inner;
        inner.id > 0
            && !inner.author.is_empty()
            && !inner.text.is_empty()
            && inner.path.is_file()
            && File::open(&inner.path).is_ok()
    }

    fn render(&self) -> String {
        let mut out = format!("Post:\n{}\nComments:", self.render_summary());
        for comment in self.inner.comments.read().iter() {
            out.push('\n');
            out.push_str(&comment.to_line());
        }
        out
    }

    fn render_summary(&self) -> String {
        format!(
            "{} {} {} {}",
            format::format_id(self.inner.id),
            format::format_timestamp(&self.inner.timestamp),
            self.inner.author,
            self.inner.text
        )
    }

    fn filename(&self) -> String {
        self.inner
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn id(&self) -> PostId {
        self.inner.id
    }

    fn text(&self) -> &str {
        &self.inner.text
    }

    fn timestamp(&self) -> Timestamp {
        self.inner.timestamp
    }

    fn author(&self) -> &str {
        &self.inner.author
    }
}

/// Posts compare by content, not by handle or location
impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.id == other.inner.id
                && self.inner.timestamp == other.inner.timestamp
                && self.inner.author == other.inner.author
                && self.inner.text == other.inner.text
                && *self.inner.comments.read() == *other.inner.comments.read())
    }
}

impl Eq for Post {}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn sync(file: &File, strategy: SyncStrategy) -> Result<()> {
    if strategy == SyncStrategy::EveryWrite {
        file.sync_data()?;
    }
    Ok(())
}
