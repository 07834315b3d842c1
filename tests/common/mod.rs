#![allow(dead_code, unused_imports)]

mod client;
mod server;

use axum::Router;
pub use client::TestAppClient;
use post_api::{build_app, Post, Service, Settings, TestStorageBuilder};

pub use server::{spawn_test_app, TestAppHandle};

/// Router over a fresh temporary store, plus the posts it was seeded with.
pub async fn create_test_app(seeded_posts: usize) -> (Router, Vec<Post>) {
    let settings = Settings::from_file("test").unwrap();

    let builder = TestStorageBuilder::new().with_posts(seeded_posts);
    let (post_storage, seeded) = builder.build_post().await;
    let service = Service::new(post_storage, builder.build_flush(), &settings);

    (build_app(service, settings).unwrap(), seeded)
}
