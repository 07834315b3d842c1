use super::PostId;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Post {
    #[schema(value_type = String)]
    pub id: PostId,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
}

/// Caller-supplied fields of a post that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
}

impl Post {
    pub(crate) fn new(id: PostId, fields: NewPost) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            published: fields.published,
        }
    }
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug)]
#[serde(tag = "version", content = "data")]
pub(crate) enum PostVersion {
    V1 {
        id: PostId,
        title: String,
        description: Option<String>,
        published: bool,
    },
}

impl From<PostVersion> for Post {
    fn from(value: PostVersion) -> Self {
        match value {
            PostVersion::V1 {
                id,
                title,
                description,
                published,
            } => Self {
                id,
                title,
                description,
                published,
            },
        }
    }
}

impl From<Post> for PostVersion {
    fn from(value: Post) -> Self {
        Self::V1 {
            id: value.id,
            title: value.title,
            description: value.description,
            published: value.published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_json_keeps_field_order() {
        let id: PostId = "0190a5b2-8c3e-7d41-9a2b-3c4d5e6f7a8b".parse().unwrap();
        let post = Post::new(
            id,
            NewPost {
                title: "Hi".to_string(),
                description: None,
                published: true,
            },
        );

        assert_eq!(
            serde_json::to_string(&post).unwrap(),
            r#"{"id":"0190a5b2-8c3e-7d41-9a2b-3c4d5e6f7a8b","title":"Hi","description":null,"published":true}"#
        );
    }
}
