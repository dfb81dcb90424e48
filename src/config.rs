//! Configuration for TextBook
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, TextBookError};
use crate::format::{self, PostId};

/// Main configuration for a TextBook instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── posts.txt        (index: one live post id per line)
    ///     ├── Post-00001.txt   (post line + comment lines)
    ///     └── Post-00002.txt
    pub data_dir: PathBuf,

    /// Well-known name of the index file
    pub index_filename: String,

    /// Prefix of every per-post file name
    pub post_file_prefix: String,

    /// Suffix of every per-post file name
    pub post_file_suffix: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Whether writes are fsynced before a call returns
    pub sync_strategy: SyncStrategy,
}

/// File sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./textbook_data"),
            index_filename: "posts.txt".to_string(),
            post_file_prefix: "Post-".to_string(),
            post_file_suffix: ".txt".to_string(),
            sync_strategy: SyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_filename)
    }

    /// File name of the post with the given id, e.g. `Post-00010.txt`
    pub fn post_filename(&self, id: PostId) -> String {
        format::post_filename(&self.post_file_prefix, id, &self.post_file_suffix)
    }

    /// Full path of the post with the given id
    pub fn post_path(&self, id: PostId) -> PathBuf {
        self.data_dir.join(self.post_filename(id))
    }

    /// Reject settings under which index and post files could collide
    pub fn validate(&self) -> Result<()> {
        if self.index_filename.trim().is_empty() {
            return Err(TextBookError::Config(
                "index filename must not be empty".to_string(),
            ));
        }
        if self.index_filename.contains(['/', '\\']) {
            return Err(TextBookError::Config(format!(
                "index filename '{}' must be a bare file name",
                self.index_filename
            )));
        }

        // A post name is prefix + digits + suffix; the index must never match that shape
        let could_collide = self
            .index_filename
            .strip_prefix(self.post_file_prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.post_file_suffix.as_str()))
            .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false);
        if could_collide {
            return Err(TextBookError::Config(format!(
                "index filename '{}' collides with post file pattern '{}#####{}'",
                self.index_filename, self.post_file_prefix, self.post_file_suffix
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the index file name
    pub fn index_filename(mut self, name: impl Into<String>) -> Self {
        self.config.index_filename = name.into();
        self
    }

    /// Set the prefix and suffix of per-post file names
    pub fn post_file_pattern(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.config.post_file_prefix = prefix.into();
        self.config.post_file_suffix = suffix.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
