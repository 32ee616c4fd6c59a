// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Request fields are deserialized as options and checked by `validate`,
//! which consumes the request and either returns the typed input for the
//! stores or the full list of per-field failures. A field that is present
//! but empty counts as absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldError;
use crate::storage::{profiles::NewExperience, ProfileFields, StoredUser};

fn is_blank(value: &Option<String>) -> bool {
    match value {
        Some(value) => value.trim().is_empty(),
        None => true,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Minimal syntactic email check: non-empty local part, one `@`, and a
/// dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// =============================================================================
// User Registration & Login
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        if is_blank(&self.name) {
            errors.push(FieldError::new("name", "Name is required"));
        }
        let email = non_blank(self.email).unwrap_or_default();
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Please enter a valid email"));
        }
        let password = self.password.unwrap_or_default();
        if password.len() < 6 {
            errors.push(FieldError::new(
                "password",
                "Please enter a password with 6 or more characters",
            ));
        }

        if errors.is_empty() {
            Ok(Registration {
                name: self.name.unwrap_or_default().trim().to_string(),
                email,
                password,
            })
        } else {
            Err(errors)
        }
    }
}

/// Request to log in with an existing account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login credentials that passed validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = non_blank(self.email).unwrap_or_default();
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Please enter a valid email"));
        }
        if is_blank(&self.password) {
            errors.push(FieldError::new("password", "Password is required"));
        }

        if errors.is_empty() {
            Ok(Credentials {
                email,
                password: self.password.unwrap_or_default(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Response carrying a freshly issued access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Account information without the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// =============================================================================
// Profile Requests
// =============================================================================

/// Request to create or update the caller's profile.
///
/// Partial-update semantics: present-and-non-empty fields are applied,
/// everything else keeps its stored value. `skills` is a comma-delimited
/// string, split and trimmed. Social platforms merge individually; omitted
/// platforms are preserved.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpsertProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub github_username: Option<String>,
    /// Comma-delimited skill tags, e.g. "go,rust"
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl UpsertProfileRequest {
    pub fn validate(self) -> Result<ProfileFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        if is_blank(&self.status) {
            errors.push(FieldError::new("status", "Status is required"));
        }
        if is_blank(&self.skills) {
            errors.push(FieldError::new("skills", "Skills is required"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let skills = non_blank(self.skills).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|skill| !skill.is_empty())
                .map(String::from)
                .collect()
        });

        let mut fields = ProfileFields {
            company: non_blank(self.company),
            website: non_blank(self.website),
            location: non_blank(self.location),
            bio: non_blank(self.bio),
            status: non_blank(self.status),
            github_username: non_blank(self.github_username),
            skills,
            ..ProfileFields::default()
        };
        fields.social.youtube = non_blank(self.youtube);
        fields.social.twitter = non_blank(self.twitter);
        fields.social.facebook = non_blank(self.facebook);
        fields.social.linkedin = non_blank(self.linkedin);
        fields.social.instagram = non_blank(self.instagram);

        Ok(fields)
    }
}

/// Request to add an experience entry to the caller's profile.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceRequest {
    pub fn validate(self) -> Result<NewExperience, Vec<FieldError>> {
        let mut errors = Vec::new();

        if is_blank(&self.title) {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if is_blank(&self.company) {
            errors.push(FieldError::new("company", "Company is required"));
        }
        let Some(from) = self.from else {
            errors.push(FieldError::new("from", "From date is required"));
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewExperience {
            title: self.title.unwrap_or_default().trim().to_string(),
            company: self.company.unwrap_or_default().trim().to_string(),
            location: non_blank(self.location),
            from,
            to: self.to,
            current: self.current,
            description: non_blank(self.description),
        })
    }
}

// =============================================================================
// Post Requests
// =============================================================================

/// Request to publish a post.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub text: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        match non_blank(self.text) {
            Some(text) => Ok(text),
            None => Err(vec![FieldError::new("text", "Text is required")]),
        }
    }
}

/// Request to comment on a post.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub text: Option<String>,
}

impl CommentRequest {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        match non_blank(self.text) {
            Some(text) => Ok(text),
            None => Err(vec![FieldError::new("text", "Text is required")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_and_rejects() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn register_collects_every_field_failure() {
        let request = RegisterRequest {
            name: Some("  ".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("short".to_string()),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        assert_eq!(params, vec!["name", "email", "password"]);
    }

    #[test]
    fn register_accepts_valid_input() {
        let request = RegisterRequest {
            name: Some("Ana".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
        };
        let registration = request.validate().unwrap();
        assert_eq!(registration.name, "Ana");
        assert_eq!(registration.email, "a@x.com");
    }

    #[test]
    fn profile_requires_status_and_skills() {
        let errors = UpsertProfileRequest::default().validate().unwrap_err();
        let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        assert_eq!(params, vec!["status", "skills"]);
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        let request = UpsertProfileRequest {
            status: Some("Developer".to_string()),
            skills: Some(" go , rust ,,".to_string()),
            ..UpsertProfileRequest::default()
        };
        let fields = request.validate().unwrap();
        assert_eq!(fields.skills.unwrap(), vec!["go", "rust"]);
    }

    #[test]
    fn empty_profile_fields_count_as_absent() {
        let request = UpsertProfileRequest {
            status: Some("Developer".to_string()),
            skills: Some("go".to_string()),
            company: Some("".to_string()),
            twitter: Some("   ".to_string()),
            ..UpsertProfileRequest::default()
        };
        let fields = request.validate().unwrap();
        assert!(fields.company.is_none());
        assert!(fields.social.twitter.is_none());
    }

    #[test]
    fn experience_requires_title_company_and_from() {
        let request = ExperienceRequest {
            title: None,
            company: None,
            location: None,
            from: None,
            to: None,
            current: false,
            description: None,
        };
        let errors = request.validate().unwrap_err();
        let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        assert_eq!(params, vec!["title", "company", "from"]);
    }

    #[test]
    fn post_text_is_required() {
        assert!(CreatePostRequest { text: None }.validate().is_err());
        assert!(CreatePostRequest {
            text: Some(" ".to_string())
        }
        .validate()
        .is_err());
        assert_eq!(
            CreatePostRequest {
                text: Some("hello".to_string())
            }
            .validate()
            .unwrap(),
            "hello"
        );
    }
}
