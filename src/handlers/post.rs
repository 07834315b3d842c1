use super::error::AppError;
use super::types::*;
use crate::{
    dispatch::{ErrorBody, HandlerContext},
    handlers::Service,
    storage::{Post, PostId},
};
use axum::http::StatusCode;
use tracing::info;

fn path_post_id(ctx: &HandlerContext) -> Result<PostId, AppError> {
    let id = ctx.param("id").ok_or(AppError::NotFound)?;
    let id = id.parse::<PostId>()?;

    if let Some(root_span) = ctx.root_span() {
        root_span.record().post_id(&id);
    }
    Ok(id)
}

async fn create(ctx: HandlerContext, service: Service, input: CreatePost) -> Result<(), AppError> {
    let post = service.post().create(input).await.inspect_err(|e| {
        tracing::error!(err = ?e, "failed to create post");
    })?;

    if let Some(root_span) = ctx.root_span() {
        root_span.record().post_id(&post.id);
    }
    info!(post_id = %post.id, "post created");

    ctx.respond_json(StatusCode::CREATED, &post)
}

#[utoipa::path(
    get,
    path = "/create-post",
    params(CreatePost),
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing title or malformed query", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "posts"
)]
#[tracing::instrument(name = "handlers::post::create_from_query", skip_all)]
pub(crate) async fn create_from_query(
    ctx: HandlerContext,
    service: Service,
) -> Result<(), AppError> {
    let input: CreatePost = ctx.query()?;
    create(ctx, service, input).await
}

#[utoipa::path(
    post,
    path = "/create-post",
    request_body(
        content = CreatePost,
        description = "New post fields",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing title or malformed body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "posts"
)]
#[tracing::instrument(name = "handlers::post::create_from_body", skip_all)]
pub(crate) async fn create_from_body(
    ctx: HandlerContext,
    service: Service,
) -> Result<(), AppError> {
    let input: CreatePost = if ctx.has_body() {
        ctx.json()?
    } else {
        CreatePost::default()
    };
    create(ctx, service, input).await
}

#[utoipa::path(
    get,
    path = "/get-post",
    responses(
        (status = 200, description = "All live posts in creation order", body = Vec<Post>),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "posts"
)]
#[tracing::instrument(name = "handlers::post::list", skip_all)]
pub(crate) async fn list(ctx: HandlerContext, service: Service) -> Result<(), AppError> {
    let posts = service.post().find_all().await?;

    info!("Get {} posts", posts.len());

    ctx.respond_json(StatusCode::OK, &posts)
}

#[utoipa::path(
    get,
    path = "/get-post/{id}",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post by ID", body = Post),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "posts"
)]
#[tracing::instrument(name = "handlers::post::get", skip_all)]
pub(crate) async fn get(ctx: HandlerContext, service: Service) -> Result<(), AppError> {
    let id = path_post_id(&ctx)?;

    let post = service.post().find_by_id(id).await?;

    ctx.respond_json(StatusCode::OK, &post)
}

#[utoipa::path(
    get,
    path = "/delete-post/{id}",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Deleted post", body = Post),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "posts"
)]
#[tracing::instrument(name = "handlers::post::delete", skip_all)]
pub(crate) async fn delete(ctx: HandlerContext, service: Service) -> Result<(), AppError> {
    let id = path_post_id(&ctx)?;

    let post = service.post().delete_by_id(id).await?;

    info!(post_id = %post.id, "post deleted");

    ctx.respond_json(StatusCode::OK, &post)
}
