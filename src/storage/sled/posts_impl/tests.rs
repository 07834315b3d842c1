use super::*;

use crate::storage::sled::test_util::TestStorageBuilder;

fn fields(title: &str, description: Option<&str>, published: bool) -> NewPost {
    NewPost {
        title: title.to_string(),
        description: description.map(str::to_string),
        published,
    }
}

#[tokio::test]
async fn test_create_and_find() {
    let (storage, _) = TestStorageBuilder::new().build_post().await;

    let input = fields("Hi", Some("d"), true);
    let created = storage.create(input.clone()).await.unwrap();

    let found = storage.find_by_id(created.id).await.unwrap();

    assert_eq!(found, created);
    assert_eq!(found.title, input.title);
    assert_eq!(found.description, input.description);
    assert_eq!(found.published, input.published);

    let result = storage.find_by_id(PostId::new()).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_create_assigns_distinct_ids() {
    let (storage, _) = TestStorageBuilder::new().build_post().await;

    let first = storage.create(fields("same", None, false)).await.unwrap();
    let second = storage.create(fields("same", None, false)).await.unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_delete_returns_removed_post() {
    let (storage, posts) = TestStorageBuilder::new().with_posts(3).build_post().await;
    let target = posts[1].clone();

    let deleted = storage.delete_by_id(target.id).await.unwrap();
    assert_eq!(deleted, target);

    let result = storage.find_by_id(target.id).await;
    assert!(matches!(result, Err(StorageError::NotFound)));

    let result = storage.delete_by_id(target.id).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_delete_nonexistent() {
    let (storage, _) = TestStorageBuilder::new().with_posts(2).build_post().await;

    let result = storage.delete_by_id(PostId::new()).await;

    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_find_all_in_creation_order() {
    let (storage, posts) = TestStorageBuilder::new().with_posts(12).build_post().await;

    let all = storage.find_all().await.unwrap();

    assert_eq!(all, posts);
}

#[tokio::test]
async fn test_find_all_after_deletes() {
    let created = 10;
    let deleted = 4;
    let (storage, posts) = TestStorageBuilder::new()
        .with_posts(created)
        .build_post()
        .await;

    for post in posts.iter().take(deleted) {
        storage.delete_by_id(post.id).await.unwrap();
    }

    let all = storage.find_all().await.unwrap();

    assert_eq!(all.len(), created - deleted);
    assert_eq!(all, posts[deleted..].to_vec());
}

#[tokio::test]
async fn test_find_all_empty() {
    let (storage, _) = TestStorageBuilder::new().build_post().await;

    assert!(storage.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_flush() {
    let builder = TestStorageBuilder::new().with_posts(1);
    let _ = builder.build_post().await;

    builder.build_flush().flush().await.unwrap();
}
