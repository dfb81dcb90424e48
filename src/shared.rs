//! Shared TextBook
//!
//! A cloneable, thread-safe handle on a single store. Every operation runs
//! under one mutex, so index and post writes from different threads never
//! interleave.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::format::PostId;
use crate::post::Post;
use crate::textbook::TextBook;
use crate::traits::PostStore;

/// Mutex-guarded [`TextBook`]
#[derive(Debug, Clone)]
pub struct SharedTextBook {
    inner: Arc<Mutex<TextBook>>,
}

impl SharedTextBook {
    /// Open a store and wrap it
    pub fn open(config: Config) -> Result<Self> {
        Ok(Self::new(TextBook::open(config)?))
    }

    pub fn new(textbook: TextBook) -> Self {
        Self {
            inner: Arc::new(Mutex::new(textbook)),
        }
    }

    pub fn last_id(&self) -> PostId {
        self.inner.lock().last_id()
    }

    pub fn post_count(&self) -> usize {
        self.inner.lock().post_count()
    }

    pub fn post_string(&self, index: usize) -> Option<String> {
        self.inner.lock().post_string(index)
    }

    pub fn add_post(&self, author: &str, text: &str) -> Result<PostId> {
        self.inner.lock().add_post(author, text)
    }

    pub fn remove_post(&self, index: usize) -> Result<Option<Post>> {
        self.inner.lock().remove_post(index)
    }

    pub fn add_comment(&self, index: usize, author: &str, text: &str) -> Result<bool> {
        self.inner.lock().add_comment(index, author, text)
    }

    pub fn render(&self) -> String {
        self.inner.lock().render()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.inner.lock().posts()
    }

    /// Run `f` with exclusive access, for multi-step operations
    pub fn with<R>(&self, f: impl FnOnce(&mut TextBook) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
