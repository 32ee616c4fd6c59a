// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Profile repository: profile documents with their embedded experience
//! sub-collection, plus the account cascade delete.
//!
//! Profiles are keyed by owning user id, which is the one-profile-per-user
//! constraint. Upserts and experience mutations each run in a single write
//! transaction, so concurrent calls for the same user collapse to one
//! resulting document.

use chrono::{DateTime, NaiveDate, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    time_index_key, Database, StorageError, StorageResult, POSTS, POST_TIME_INDEX, PROFILES,
    USERS, USER_EMAILS,
};
use crate::storage::posts::StoredPost;

/// Social platform links. Every platform is independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl SocialLinks {
    /// Merge-preserve: platforms present in `incoming` are set, omitted
    /// platforms keep their previous value.
    fn merge_from(&mut self, incoming: &SocialLinks) {
        if incoming.youtube.is_some() {
            self.youtube = incoming.youtube.clone();
        }
        if incoming.twitter.is_some() {
            self.twitter = incoming.twitter.clone();
        }
        if incoming.facebook.is_some() {
            self.facebook = incoming.facebook.clone();
        }
        if incoming.linkedin.is_some() {
            self.linkedin = incoming.linkedin.clone();
        }
        if incoming.instagram.is_some() {
            self.instagram = incoming.instagram.clone();
        }
    }
}

/// One entry in the experience history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ExperienceEntry {
    /// Unique entry identifier (UUID)
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Experience input before the repository assigns an id.
#[derive(Debug, Clone)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Profile document with its embedded experience sub-collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredProfile {
    /// Owning user id
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Headline, e.g. "Senior Developer"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// Skill tags, trimmed, in the order given
    pub skills: Vec<String>,
    pub social: SocialLinks,
    /// Experience history, most recent entry first
    pub experience: Vec<ExperienceEntry>,
    pub created_at: DateTime<Utc>,
}

impl StoredProfile {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            company: None,
            website: None,
            location: None,
            bio: None,
            status: None,
            github_username: None,
            skills: Vec::new(),
            social: SocialLinks::default(),
            experience: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update: present fields are set, absent fields keep
    /// their stored value.
    fn apply(&mut self, fields: &ProfileFields) {
        if let Some(company) = &fields.company {
            self.company = Some(company.clone());
        }
        if let Some(website) = &fields.website {
            self.website = Some(website.clone());
        }
        if let Some(location) = &fields.location {
            self.location = Some(location.clone());
        }
        if let Some(bio) = &fields.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(status) = &fields.status {
            self.status = Some(status.clone());
        }
        if let Some(github_username) = &fields.github_username {
            self.github_username = Some(github_username.clone());
        }
        if let Some(skills) = &fields.skills {
            self.skills = skills.clone();
        }
        self.social.merge_from(&fields.social);
    }
}

/// Recognized profile upsert fields.
///
/// Effect of each field: present → set on the document; `None` → the stored
/// value is left untouched (or omitted on creation). `skills` replaces the
/// whole list when present. `social` platforms merge individually.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub github_username: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: SocialLinks,
}

/// Repository for profile operations.
pub struct ProfileRepository<'a> {
    db: &'a Database,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create the profile if absent, otherwise apply a partial update.
    /// Returns the post-update document.
    pub fn upsert(&self, user_id: &str, fields: &ProfileFields) -> StorageResult<StoredProfile> {
        let write_txn = self.db.begin_write()?;
        let profile = {
            let mut profiles = write_txn.open_table(PROFILES)?;

            let mut profile = {
                let existing = profiles.get(user_id)?;
                match existing {
                    Some(value) => serde_json::from_slice(value.value())?,
                    None => StoredProfile::new(user_id),
                }
            };
            profile.apply(fields);

            let json = serde_json::to_vec(&profile)?;
            profiles.insert(user_id, json.as_slice())?;
            profile
        };
        write_txn.commit()?;
        Ok(profile)
    }

    /// Get the profile for a user.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredProfile> {
        let read_txn = self.db.begin_read()?;
        let profiles = read_txn.open_table(PROFILES)?;
        match profiles.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound("Profile not found".into())),
        }
    }

    /// List every profile. Empty when none exist, never an error.
    pub fn list_all(&self) -> StorageResult<Vec<StoredProfile>> {
        let read_txn = self.db.begin_read()?;
        let profiles = read_txn.open_table(PROFILES)?;

        let mut result = Vec::new();
        for entry in profiles.range::<&str>(..)? {
            let (_, value) = entry?;
            result.push(serde_json::from_slice(value.value())?);
        }
        Ok(result)
    }

    /// Prepend a new experience entry and return the updated profile.
    pub fn add_experience(
        &self,
        user_id: &str,
        entry: NewExperience,
    ) -> StorageResult<StoredProfile> {
        let write_txn = self.db.begin_write()?;
        let profile = {
            let mut profiles = write_txn.open_table(PROFILES)?;

            let mut profile: StoredProfile = {
                let existing = profiles
                    .get(user_id)?
                    .ok_or_else(|| StorageError::NotFound("Profile not found".into()))?;
                serde_json::from_slice(existing.value())?
            };

            profile.experience.insert(
                0,
                ExperienceEntry {
                    id: Uuid::new_v4().to_string(),
                    title: entry.title,
                    company: entry.company,
                    location: entry.location,
                    from: entry.from,
                    to: entry.to,
                    current: entry.current,
                    description: entry.description,
                },
            );

            let json = serde_json::to_vec(&profile)?;
            profiles.insert(user_id, json.as_slice())?;
            profile
        };
        write_txn.commit()?;
        Ok(profile)
    }

    /// Remove exactly the experience entry with the given id.
    pub fn remove_experience(&self, user_id: &str, experience_id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut profiles = write_txn.open_table(PROFILES)?;

            let mut profile: StoredProfile = {
                let existing = profiles
                    .get(user_id)?
                    .ok_or_else(|| StorageError::NotFound("Profile not found".into()))?;
                serde_json::from_slice(existing.value())?
            };

            let index = profile
                .experience
                .iter()
                .position(|entry| entry.id == experience_id)
                .ok_or_else(|| StorageError::NotFound("Experience entry not found".into()))?;
            profile.experience.remove(index);

            let json = serde_json::to_vec(&profile)?;
            profiles.insert(user_id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete an account and everything it owns: all posts, then the
    /// profile, then the user record. One transaction, all or nothing.
    ///
    /// This is the single entry point for account deletion; callers never
    /// delete posts, profile, or user independently.
    pub fn delete_account(&self, user_id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            // Posts first, so an interrupted cascade can never leave posts
            // pointing at a missing author.
            let mut posts = write_txn.open_table(POSTS)?;
            let mut owned: Vec<(String, i64)> = Vec::new();
            for entry in posts.range::<&str>(..)? {
                let (key, value) = entry?;
                let post: StoredPost = serde_json::from_slice(value.value())?;
                if post.user_id == user_id {
                    owned.push((key.value().to_string(), post.created_at.timestamp_millis()));
                }
            }

            let mut time_index = write_txn.open_table(POST_TIME_INDEX)?;
            for (post_id, created_millis) in &owned {
                posts.remove(post_id.as_str())?;
                let key = time_index_key(*created_millis, post_id);
                time_index.remove(key.as_slice())?;
            }

            let mut profiles = write_txn.open_table(PROFILES)?;
            profiles.remove(user_id)?;

            let mut users = write_txn.open_table(USERS)?;
            let email = {
                let user = users.remove(user_id)?;
                match user {
                    Some(value) => {
                        let stored: super::StoredUser = serde_json::from_slice(value.value())?;
                        Some(stored.email)
                    }
                    None => None,
                }
            };
            if let Some(email) = email {
                let mut emails = write_txn.open_table(USER_EMAILS)?;
                emails.remove(email.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}
