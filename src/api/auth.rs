// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Login and current-user endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{LoginRequest, TokenResponse, UserResponse},
    password,
    state::AppState,
};

/// Authenticate with email and password and return an access token.
///
/// Unknown email and wrong password answer identically so the response
/// does not reveal which accounts exist.
#[utoipa::path(
    post,
    path = "/auth",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let credentials = request.validate().map_err(ApiError::validation)?;

    let user = state
        .db
        .users()
        .find_by_email(&credentials.email)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let stored_hash = user.password_hash.clone();
    let raw_password = credentials.password;
    let verified =
        tokio::task::spawn_blocking(move || password::verify(&raw_password, &stored_hash))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "password verification task failed");
                ApiError::internal()
            })?;
    if !verified {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.tokens.issue(&user.id)?;
    Ok(Json(TokenResponse { token }))
}

/// Get the authenticated caller's account, without the password hash.
#[utoipa::path(
    get,
    path = "/auth",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.db.users().get(&caller.user_id)?;
    Ok(Json(user.into()))
}
