use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{config::types::PostDefaults, handlers::error::AppError, storage::NewPost};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, ToSchema)]
pub struct HealthResponse {
    pub data: String,
}

/// Create-post input, read from the query string or a JSON body.
/// Omitted fields fall back to the configured post defaults.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreatePost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

impl CreatePost {
    pub(crate) fn resolve(self, defaults: &PostDefaults) -> Result<NewPost, AppError> {
        let title = self
            .title
            .or_else(|| defaults.title.clone())
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| AppError::ValidationFailure("`title` is required".to_owned()))?;

        Ok(NewPost {
            title,
            description: self.description.or_else(|| defaults.description.clone()),
            published: self.published.or(defaults.published).unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields_win_over_defaults() {
        let defaults = PostDefaults {
            title: Some("default title".into()),
            description: Some("default description".into()),
            published: Some(true),
        };
        let input = CreatePost {
            title: Some("Hi".into()),
            description: None,
            published: Some(false),
        };

        let fields = input.resolve(&defaults).unwrap();

        assert_eq!(
            fields,
            NewPost {
                title: "Hi".into(),
                description: Some("default description".into()),
                published: false,
            }
        );
    }

    #[test]
    fn empty_input_uses_defaults() {
        let defaults = PostDefaults {
            title: Some("default title".into()),
            description: None,
            published: None,
        };

        let fields = CreatePost::default().resolve(&defaults).unwrap();

        assert_eq!(fields.title, "default title");
        assert_eq!(fields.description, None);
        assert!(!fields.published);
    }

    #[test]
    fn title_is_required() {
        let result = CreatePost::default().resolve(&PostDefaults::default());
        assert!(matches!(result, Err(AppError::ValidationFailure(_))));

        let blank = CreatePost {
            title: Some(" \t".into()),
            ..CreatePost::default()
        };
        assert!(matches!(
            blank.resolve(&PostDefaults::default()),
            Err(AppError::ValidationFailure(_))
        ));
    }
}
