//! TextBook Module
//!
//! The post store: authoritative in-memory collection plus its on-disk form.
//!
//! ## Responsibilities
//! - Recover the collection from disk on open
//! - Assign ids and timestamps to new posts
//! - Keep the index file in step with every add/remove
//! - Answer positional queries and render the feed
//!
//! Every mutation is write-through: the call returns only after its file
//! writes complete.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::Config;
use crate::error::{Result, TextBookError};
use crate::format::PostId;
use crate::index::IndexFile;
use crate::post::Post;
use crate::recovery::{Recovery, RecoveryResult};
use crate::traits::{FeedPost, PostStore};

/// The post store
///
/// ## Concurrency Model: Single Writer
///
/// Mutating operations take `&mut self` and perform their I/O inline.
/// There is no internal locking; wrap the store in
/// [`SharedTextBook`](crate::shared::SharedTextBook) to share it across threads.
/// Two stores opened on the same directory are not coordinated.
#[derive(Debug)]
pub struct TextBook {
    /// Store configuration
    config: Config,

    /// Live posts in insertion order
    posts: Vec<Post>,

    /// Highest id ever assigned
    last_id: PostId,

    /// Index of live post ids
    index: IndexFile,

    /// What recovery found at open
    recovery: RecoveryResult,
}

impl TextBook {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Recover posts listed in the index, if any
    /// 3. Set last id to the highest recovered id
    ///
    /// Any recovery failure aborts the open.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let index = IndexFile::new(config.index_path(), config.sync_strategy);
        let (posts, recovery) = Recovery::run(&config, &index)?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            posts = posts.len(),
            last_id = recovery.last_id,
            "TextBook opened"
        );

        Ok(Self {
            last_id: recovery.last_id,
            config,
            posts,
            index,
            recovery,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Post at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    /// Position of the post with the given id (linear scan)
    pub fn position_of(&self, id: PostId) -> Option<usize> {
        self.posts.iter().position(|post| post.id() == id)
    }

    /// Iterate posts in positional order without copying the list
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the index file path
    pub fn index_path(&self) -> &Path {
        self.index.path()
    }

    /// What recovery found when this store was opened
    pub fn recovery_result(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl PostStore for TextBook {
    type Post = Post;

    fn last_id(&self) -> PostId {
        self.last_id
    }

    fn post_count(&self) -> usize {
        self.posts.len()
    }

    fn post_string(&self, index: usize) -> Option<String> {
        self.posts.get(index).map(Post::render)
    }

    /// Fails with `IdsExhausted` once `last_id` is `PostId::MAX`.
    ///
    /// Steps:
    /// 1. Write the post file
    /// 2. Append the id to the index (undo step 1 on failure)
    /// 3. Commit to memory and bump last id
    fn add_post(&mut self, author: &str, text: &str) -> Result<PostId> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or(TextBookError::IdsExhausted(self.last_id))?;
        let post = Post::create(&self.config, id, author, text)?;

        if let Err(e) = self.index.append(id) {
            tracing::error!(id, error = %e, "Index append failed, discarding post file");
            let _ = fs::remove_file(post.path());
            return Err(e);
        }

        self.posts.push(post);
        self.last_id = id;
        tracing::debug!(id, author, "Post added");
        Ok(id)
    }

    /// Steps:
    /// 1. Rewrite the index without the post's id
    /// 2. Drop the post from memory
    /// 3. Delete its backing file (failure is logged, not returned)
    fn remove_post(&mut self, index: usize) -> Result<Option<Post>> {
        let Some(target) = self.posts.get(index) else {
            return Ok(None);
        };
        let id = target.id();

        let remaining: Vec<PostId> = self
            .posts
            .iter()
            .map(Post::id)
            .filter(|&other| other != id)
            .collect();
        self.index.rewrite(&remaining)?;

        let post = self.posts.remove(index);
        match fs::remove_file(post.path()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(id, path = %post.path().display(), error = %e, "Failed to delete post file");
            }
        }

        tracing::debug!(id, index, "Post removed");
        Ok(Some(post))
    }

    fn add_comment(&mut self, index: usize, author: &str, text: &str) -> Result<bool> {
        match self.posts.get(index) {
            Some(post) => {
                post.add_comment(author, text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("TextBook contains {} posts:", self.posts.len());
        for (index, post) in self.posts.iter().enumerate() {
            out.push_str(&format!("\n{} - {}", index, post.render_summary()));
        }
        out
    }

    fn posts(&self) -> Vec<Post> {
        self.posts.clone()
    }
}

impl fmt::Display for TextBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&PostStore::render(self))
    }
}
