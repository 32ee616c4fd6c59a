// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! User registration endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    avatar,
    error::ApiError,
    models::{RegisterRequest, TokenResponse},
    password,
    state::AppState,
    storage::StoredUser,
};

/// Register a new account and return an access token.
///
/// The avatar is derived from the email, the password hashed with a fresh
/// salt. Neither the password nor its hash appears in the response.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let registration = request.validate().map_err(ApiError::validation)?;

    let avatar = avatar::gravatar_url(&registration.email);

    // Argon2 is CPU-bound; keep it off the async workers.
    let raw_password = registration.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash(&raw_password))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing task failed");
            ApiError::internal()
        })?
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            ApiError::internal()
        })?;

    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        name: registration.name,
        email: registration.email,
        avatar,
        password_hash,
        created_at: Utc::now(),
    };
    state.db.users().create(&user)?;

    let token = state.tokens.issue(&user.id)?;
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::Database;
    use axum::http::StatusCode;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = Database::open(&dir.path().join("devhub.redb")).expect("open db");
        let state = AppState::new(db, TokenService::new("test-secret", 3600));
        (state, dir)
    }

    fn ana() -> RegisterRequest {
        RegisterRequest {
            name: Some("Ana".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
        }
    }

    #[tokio::test]
    async fn register_returns_token_for_created_user() {
        let (state, _dir) = test_state();

        let Json(response) = register(State(state.clone()), Json(ana())).await.unwrap();

        // The token's subject is the stored account's id.
        let user_id = state.tokens.verify(&response.token).unwrap();
        let stored = state.db.users().get(&user_id).unwrap();
        assert_eq!(stored.email, "a@x.com");
        assert_eq!(stored.name, "Ana");
        assert!(stored.avatar.starts_with("https://www.gravatar.com/avatar/"));
        assert_ne!(stored.password_hash, "secret1");
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let (state, _dir) = test_state();
        register(State(state.clone()), Json(ana())).await.unwrap();

        let err = register(State(state.clone()), Json(ana())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "User already exists");
    }

    #[tokio::test]
    async fn register_invalid_input_lists_field_errors() {
        let (state, _dir) = test_state();
        let err = register(
            State(state),
            Json(RegisterRequest {
                name: None,
                email: Some("bad".to_string()),
                password: Some("123".to_string()),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.field_errors.len(), 3);
    }
}
