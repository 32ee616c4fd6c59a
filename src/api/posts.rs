// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Post endpoints: the feed, single posts, likes, and comments.
//!
//! Every route here is protected. Ownership is enforced by the post
//! repository: post deletion against the post's owner, comment deletion
//! against the comment's author.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CommentRequest, CreatePostRequest, MessageResponse},
    state::AppState,
    storage::{Comment, StoredPost},
};

/// Publish a post. Author name and avatar are snapshotted from the
/// caller's account.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Created post", body = StoredPost),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<StoredPost>, ApiError> {
    let text = request.validate().map_err(ApiError::validation)?;
    let user = state.db.users().get(&caller.user_id)?;
    let post = state
        .db
        .posts()
        .create(&user.id, &user.name, &user.avatar, &text)?;
    Ok(Json(post))
}

/// List every post, most recent first.
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    security(("bearer" = [])),
    responses((status = 200, body = [StoredPost]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Auth(_caller): Auth,
) -> Result<Json<Vec<StoredPost>>, ApiError> {
    Ok(Json(state.db.posts().list()?))
}

/// Get a post by id.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredPost),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<StoredPost>, ApiError> {
    Ok(Json(state.db.posts().get(&id)?))
}

/// Delete a post. Owner only.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 403, description = "Caller does not own the post"),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.posts().delete(&id, &caller.user_id)?;
    Ok(Json(MessageResponse::new("Post removed")))
}

/// Like a post. Fails if the caller already likes it.
#[utoipa::path(
    put,
    path = "/posts/like/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated like set", body = [String]),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Already liked"),
    )
)]
pub async fn like_post(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.db.posts().like(&id, &caller.user_id)?))
}

/// Remove the caller's like. Fails if the caller never liked it.
#[utoipa::path(
    put,
    path = "/posts/unlike/{id}",
    params(("id" = String, Path, description = "Post id")),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated like set", body = [String]),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Not yet liked"),
    )
)]
pub async fn unlike_post(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.db.posts().unlike(&id, &caller.user_id)?))
}

/// Comment on a post. The author snapshot comes from the caller's account.
#[utoipa::path(
    post,
    path = "/posts/comment/{id}",
    params(("id" = String, Path, description = "Post id")),
    request_body = CommentRequest,
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated comment sequence", body = [Comment]),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let text = request.validate().map_err(ApiError::validation)?;
    let user = state.db.users().get(&caller.user_id)?;
    let comments = state
        .db
        .posts()
        .add_comment(&id, &user.id, &user.name, &user.avatar, &text)?;
    Ok(Json(comments))
}

/// Delete a comment. Comment author only, regardless of who owns the post.
#[utoipa::path(
    delete,
    path = "/posts/comment/{id}/{comment_id}",
    params(
        ("id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id"),
    ),
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated comment sequence", body = [Comment]),
        (status = 403, description = "Caller did not write the comment"),
        (status = 404, description = "Post or comment not found"),
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state
        .db
        .posts()
        .delete_comment(&id, &comment_id, &caller.user_id)?;
    Ok(Json(comments))
}
