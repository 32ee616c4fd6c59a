// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Profile endpoints: upsert, reads, experience history, the account
//! cascade delete, and the GitHub passthrough.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    github::{self, GithubError},
    models::{ExperienceRequest, MessageResponse, UpsertProfileRequest},
    state::AppState,
    storage::StoredProfile,
};

/// Get the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/profile/me",
    tag = "Profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile for this user"),
    )
)]
pub async fn my_profile(
    State(state): State<AppState>,
    Auth(caller): Auth,
) -> Result<Json<StoredProfile>, ApiError> {
    Ok(Json(state.db.profiles().get(&caller.user_id)?))
}

/// Create or update the caller's profile.
#[utoipa::path(
    post,
    path = "/profile",
    request_body = UpsertProfileRequest,
    tag = "Profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Post-update profile", body = StoredProfile),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<StoredProfile>, ApiError> {
    let fields = request.validate().map_err(ApiError::validation)?;
    Ok(Json(state.db.profiles().upsert(&caller.user_id, &fields)?))
}

/// List every profile.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profiles",
    responses((status = 200, body = [StoredProfile]))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredProfile>>, ApiError> {
    Ok(Json(state.db.profiles().list_all()?))
}

/// Get a profile by its owning user id.
#[utoipa::path(
    get,
    path = "/profile/user/{user_id}",
    params(("user_id" = String, Path, description = "Owning user id")),
    tag = "Profiles",
    responses(
        (status = 200, body = StoredProfile),
        (status = 404, description = "Profile not found"),
    )
)]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StoredProfile>, ApiError> {
    Ok(Json(state.db.profiles().get(&user_id)?))
}

/// Delete the caller's account: every post, the profile, the user record.
#[utoipa::path(
    delete,
    path = "/profile",
    tag = "Profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Auth(caller): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.profiles().delete_account(&caller.user_id)?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// Add an experience entry to the caller's profile.
#[utoipa::path(
    put,
    path = "/profile/exp",
    request_body = ExperienceRequest,
    tag = "Profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = StoredProfile),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile for this user"),
    )
)]
pub async fn add_experience(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Json(request): Json<ExperienceRequest>,
) -> Result<Json<StoredProfile>, ApiError> {
    let entry = request.validate().map_err(ApiError::validation)?;
    Ok(Json(
        state.db.profiles().add_experience(&caller.user_id, entry)?,
    ))
}

/// Remove an experience entry by id.
#[utoipa::path(
    delete,
    path = "/profile/exp/{exp_id}",
    params(("exp_id" = String, Path, description = "Experience entry id")),
    tag = "Profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found"),
    )
)]
pub async fn delete_experience(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(exp_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .db
        .profiles()
        .remove_experience(&caller.user_id, &exp_id)?;
    Ok(Json(MessageResponse::new("Experience removed")))
}

/// Relay a user's five most recent public GitHub repositories.
#[utoipa::path(
    get,
    path = "/profile/github/{username}",
    params(("username" = String, Path, description = "GitHub username")),
    tag = "Profiles",
    responses(
        (status = 200, description = "GitHub's repository list, relayed untouched"),
        (status = 404, description = "No GitHub profile"),
    )
)]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match github::list_repos(&state.http, &username).await {
        Ok(repos) => Ok(Json(repos)),
        Err(GithubError::NoProfile) => Err(ApiError::not_found("No GitHub profile found")),
        Err(err) => {
            tracing::error!(error = %err, "github passthrough failed");
            Err(ApiError::internal())
        }
    }
}
