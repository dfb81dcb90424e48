//! Recovery
//!
//! Rebuilds the in-memory collection from the index and per-post files.
//!
//! Recovery is all-or-nothing: a store that came up with a subset of its
//! posts would compute a wrong last id and could reissue ids.

use crate::config::Config;
use crate::error::{Result, TextBookError};
use crate::format::PostId;
use crate::index::IndexFile;
use crate::post::Post;

/// Runs the recovery procedure once at store construction
pub struct Recovery;

/// Result of a recovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Whether an index file was present
    pub index_found: bool,

    /// Number of posts loaded
    pub posts_recovered: usize,

    /// Number of comments loaded across all posts
    pub comments_recovered: usize,

    /// Highest recovered id, or 0
    pub last_id: PostId,
}

impl Recovery {
    /// Recover posts in index order
    ///
    /// This will:
    /// 1. Treat a missing index as a fresh, empty store
    /// 2. Load every referenced post from its backing file
    /// 3. Fail the whole run on the first missing or corrupt post
    /// 4. Report the highest id seen as the last id
    pub fn run(config: &Config, index: &IndexFile) -> Result<(Vec<Post>, RecoveryResult)> {
        let ids = match index.read_ids() {
            Ok(Some(ids)) => ids,
            Ok(None) => {
                tracing::info!(
                    index = %index.path().display(),
                    "No index file found, starting with an empty store"
                );
                return Ok((Vec::new(), RecoveryResult::default()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read index");
                return Err(e);
            }
        };

        let mut posts = Vec::with_capacity(ids.len());
        for &id in &ids {
            let post = Post::load(config, id).map_err(|e| {
                let err = TextBookError::recovery(Some(id), e.to_string());
                tracing::error!(error = %err, "Failed to recover post");
                err
            })?;
            posts.push(post);
        }

        let result = RecoveryResult {
            index_found: true,
            posts_recovered: posts.len(),
            comments_recovered: posts.iter().map(Post::comment_count).sum(),
            last_id: ids.iter().copied().max().unwrap_or(0),
        };

        tracing::info!(
            posts = result.posts_recovered,
            comments = result.comments_recovered,
            last_id = result.last_id,
            "Recovery complete"
        );

        Ok((posts, result))
    }
}
