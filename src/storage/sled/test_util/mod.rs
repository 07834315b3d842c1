#![allow(dead_code)]
use std::sync::Arc;

use crate::storage::{FlushStorage, NewPost, Post, PostStorage};
use sled::Config;

use super::SledStorage;

/// Builds a post store on a throwaway sled db, optionally pre-filled.
pub struct TestStorageBuilder {
    posts: Vec<NewPost>,
    storage: Arc<SledStorage>,
}

impl TestStorageBuilder {
    pub fn new() -> Self {
        let db = Config::new().temporary(true).open().unwrap();
        Self {
            posts: Vec::new(),
            storage: Arc::new(SledStorage::from_db(&db).unwrap()),
        }
    }

    pub fn with_posts(mut self, count: usize) -> Self {
        self.posts = (0..count)
            .map(|i| NewPost {
                title: format!("post {i}"),
                description: (i % 2 == 0).then(|| format!("description {i}")),
                published: i % 3 == 0,
            })
            .collect();
        self
    }

    /// Stores the prepared posts and returns them as created, in creation order.
    pub async fn build_post(&self) -> (Arc<dyn PostStorage>, Vec<Post>) {
        let mut created = Vec::with_capacity(self.posts.len());
        for fields in &self.posts {
            created.push(self.storage.create(fields.clone()).await.unwrap());
        }

        (self.storage.clone() as Arc<dyn PostStorage>, created)
    }

    pub fn build_flush(&self) -> Arc<dyn FlushStorage> {
        self.storage.clone() as Arc<dyn FlushStorage>
    }
}

impl Default for TestStorageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
