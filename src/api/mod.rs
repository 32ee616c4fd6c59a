// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::FieldError,
    models::{
        CommentRequest, CreatePostRequest, ExperienceRequest, LoginRequest, MessageResponse,
        RegisterRequest, TokenResponse, UpsertProfileRequest, UserResponse,
    },
    state::AppState,
    storage::{
        profiles::ExperienceEntry, Comment, SocialLinks, StoredPost, StoredProfile,
    },
};

pub mod auth;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/users", post(users::register))
        .route("/auth", post(auth::login).get(auth::current_user))
        .route("/profile/me", get(profiles::my_profile))
        .route(
            "/profile",
            get(profiles::list_profiles)
                .post(profiles::upsert_profile)
                .delete(profiles::delete_account),
        )
        .route("/profile/user/{user_id}", get(profiles::profile_by_user))
        .route("/profile/exp", put(profiles::add_experience))
        .route("/profile/exp/{exp_id}", delete(profiles::delete_experience))
        .route("/profile/github/{username}", get(profiles::github_repos))
        .route("/posts", post(posts::create_post).get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post).delete(posts::delete_post))
        .route("/posts/like/{id}", put(posts::like_post))
        .route("/posts/unlike/{id}", put(posts::unlike_post))
        .route("/posts/comment/{id}", post(posts::add_comment))
        .route(
            "/posts/comment/{id}/{comment_id}",
            delete(posts::delete_comment),
        )
        .route("/health", get(health::health))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        auth::login,
        auth::current_user,
        profiles::my_profile,
        profiles::upsert_profile,
        profiles::list_profiles,
        profiles::profile_by_user,
        profiles::delete_account,
        profiles::add_experience,
        profiles::delete_experience,
        profiles::github_repos,
        posts::create_post,
        posts::list_posts,
        posts::get_post,
        posts::delete_post,
        posts::like_post,
        posts::unlike_post,
        posts::add_comment,
        posts::delete_comment,
        health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            MessageResponse,
            FieldError,
            UpsertProfileRequest,
            ExperienceRequest,
            StoredProfile,
            SocialLinks,
            ExperienceEntry,
            CreatePostRequest,
            CommentRequest,
            StoredPost,
            Comment,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account registration"),
        (name = "Auth", description = "Login and caller identity"),
        (name = "Profiles", description = "Developer profiles and experience history"),
        (name = "Posts", description = "Post feed, likes, and comments"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::Database;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("devhub.redb")).unwrap();
        let state = AppState::new(db, TokenService::new("test-secret", 3600));
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
