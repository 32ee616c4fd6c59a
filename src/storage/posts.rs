// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Post repository: post documents with their embedded likes and comments
//! sub-collections.
//!
//! Likes and comments are mutated through conditional updates: the
//! precondition (not yet liked, comment exists, caller owns the comment)
//! is checked and the mutation committed inside one write transaction.
//! Listing is newest-first via the `post_time_index` table.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{time_index_key, Database, StorageError, StorageResult, POSTS, POST_TIME_INDEX};

/// A comment on a post.
///
/// Author name and avatar are snapshots taken when the comment was written,
/// so historical display survives later account changes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Comment {
    /// Unique comment identifier (UUID)
    pub id: String,
    /// Comment author's user id (ownership is per-comment)
    pub user_id: String,
    pub text: String,
    pub author_name: String,
    pub author_avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Post document with its embedded likes and comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredPost {
    /// Unique post identifier (UUID)
    pub id: String,
    /// Owning user id
    pub user_id: String,
    pub text: String,
    /// Author display name, snapshotted at creation
    pub author_name: String,
    /// Author avatar URL, snapshotted at creation
    pub author_avatar: String,
    /// User ids that have liked this post; each appears at most once
    pub likes: Vec<String>,
    /// Comments, most recent first
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

/// Repository for post operations.
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a post, denormalizing the author's name and avatar.
    pub fn create(
        &self,
        user_id: &str,
        author_name: &str,
        author_avatar: &str,
        text: &str,
    ) -> StorageResult<StoredPost> {
        let post = StoredPost {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            author_name: author_name.to_string(),
            author_avatar: author_avatar.to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec(&post)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;
            posts.insert(post.id.as_str(), json.as_slice())?;

            let mut time_index = write_txn.open_table(POST_TIME_INDEX)?;
            let key = time_index_key(post.created_at.timestamp_millis(), &post.id);
            time_index.insert(key.as_slice(), post.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(post)
    }

    /// Look up a post by id.
    pub fn get(&self, post_id: &str) -> StorageResult<StoredPost> {
        let read_txn = self.db.begin_read()?;
        let posts = read_txn.open_table(POSTS)?;
        match posts.get(post_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound("Post not found".into())),
        }
    }

    /// List every post, most recent first.
    pub fn list(&self) -> StorageResult<Vec<StoredPost>> {
        let read_txn = self.db.begin_read()?;
        let time_index = read_txn.open_table(POST_TIME_INDEX)?;
        let posts = read_txn.open_table(POSTS)?;

        let mut result = Vec::new();
        for entry in time_index.range::<&[u8]>(..)? {
            let (_, post_id) = entry?;
            if let Some(value) = posts.get(post_id.value())? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }

    /// Delete a post. Only the owner may delete; the post and its
    /// sub-collections go atomically.
    pub fn delete(&self, post_id: &str, caller_id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut posts = write_txn.open_table(POSTS)?;

            let post: StoredPost = {
                let existing = posts
                    .get(post_id)?
                    .ok_or_else(|| StorageError::NotFound("Post not found".into()))?;
                serde_json::from_slice(existing.value())?
            };
            if post.user_id != caller_id {
                return Err(StorageError::Forbidden("User not authorized".into()));
            }

            posts.remove(post_id)?;
            let mut time_index = write_txn.open_table(POST_TIME_INDEX)?;
            let key = time_index_key(post.created_at.timestamp_millis(), post_id);
            time_index.remove(key.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Add the caller to the like set if absent. Returns the updated set.
    pub fn like(&self, post_id: &str, caller_id: &str) -> StorageResult<Vec<String>> {
        self.mutate(post_id, |post| {
            if post.likes.iter().any(|id| id == caller_id) {
                return Err(StorageError::Conflict("Post already liked".into()));
            }
            post.likes.insert(0, caller_id.to_string());
            Ok(())
        })
        .map(|post| post.likes)
    }

    /// Remove the caller from the like set if present. Returns the updated set.
    pub fn unlike(&self, post_id: &str, caller_id: &str) -> StorageResult<Vec<String>> {
        self.mutate(post_id, |post| {
            let index = post
                .likes
                .iter()
                .position(|id| id == caller_id)
                .ok_or_else(|| StorageError::Conflict("Post has not yet been liked".into()))?;
            post.likes.remove(index);
            Ok(())
        })
        .map(|post| post.likes)
    }

    /// Prepend a comment with a fresh id and author snapshot. Returns the
    /// updated comment sequence.
    pub fn add_comment(
        &self,
        post_id: &str,
        caller_id: &str,
        author_name: &str,
        author_avatar: &str,
        text: &str,
    ) -> StorageResult<Vec<Comment>> {
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            user_id: caller_id.to_string(),
            text: text.to_string(),
            author_name: author_name.to_string(),
            author_avatar: author_avatar.to_string(),
            created_at: Utc::now(),
        };
        self.mutate(post_id, move |post| {
            post.comments.insert(0, comment);
            Ok(())
        })
        .map(|post| post.comments)
    }

    /// Remove exactly the comment with the given id. Ownership is checked
    /// against the comment's author, not the post's. Returns the updated
    /// comment sequence.
    pub fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        caller_id: &str,
    ) -> StorageResult<Vec<Comment>> {
        self.mutate(post_id, |post| {
            let index = post
                .comments
                .iter()
                .position(|comment| comment.id == comment_id)
                .ok_or_else(|| StorageError::NotFound("Comment does not exist".into()))?;
            if post.comments[index].user_id != caller_id {
                return Err(StorageError::Forbidden("User not authorized".into()));
            }
            post.comments.remove(index);
            Ok(())
        })
        .map(|post| post.comments)
    }

    /// Load a post, apply a conditional mutation, and persist it inside one
    /// write transaction. The mutation's precondition failure aborts the
    /// transaction with nothing written.
    fn mutate<F>(&self, post_id: &str, mutation: F) -> StorageResult<StoredPost>
    where
        F: FnOnce(&mut StoredPost) -> StorageResult<()>,
    {
        let write_txn = self.db.begin_write()?;
        let post = {
            let mut posts = write_txn.open_table(POSTS)?;

            let mut post: StoredPost = {
                let existing = posts
                    .get(post_id)?
                    .ok_or_else(|| StorageError::NotFound("Post not found".into()))?;
                serde_json::from_slice(existing.value())?
            };
            mutation(&mut post)?;

            let json = serde_json::to_vec(&post)?;
            posts.insert(post_id, json.as_slice())?;
            post
        };
        write_txn.commit()?;
        Ok(post)
    }
}
