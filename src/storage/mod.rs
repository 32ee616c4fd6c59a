// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Embedded document storage backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `user_emails`: email → user_id (uniqueness index)
//! - `profiles`: user_id → serialized StoredProfile (one per user)
//! - `posts`: post_id → serialized StoredPost
//! - `post_time_index`: composite key (!timestamp|post_id) → post_id
//!
//! Every mutating repository operation runs inside a single write
//! transaction: the precondition check (already liked, comment exists,
//! caller owns the entity) and the mutation commit together. redb
//! serializes write transactions, so two concurrent identical requests
//! cannot both pass the precondition.

use std::path::Path;

use redb::{Database as RedbDatabase, ReadableDatabase, TableDefinition};

pub mod posts;
pub mod profiles;
pub mod users;

pub use posts::{Comment, PostRepository, StoredPost};
pub use profiles::{ProfileFields, ProfileRepository, SocialLinks, StoredProfile};
pub use users::{StoredUser, UserRepository};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: email (case-sensitive, as stored) → user_id.
pub(crate) const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Primary table: user_id → serialized StoredProfile (JSON bytes).
/// Keying by user_id is the one-profile-per-user constraint.
pub(crate) const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Primary table: post_id → serialized StoredPost (JSON bytes).
pub(crate) const POSTS: TableDefinition<&str, &[u8]> = TableDefinition::new("posts");

/// Index: composite key → post_id.
/// Key format: `!timestamp_millis_be|post_id` for newest-first range scans.
pub(crate) const POST_TIME_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("post_time_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the post_time_index table.
///
/// Format: `inverted_timestamp_be_bytes | post_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning
/// forward; the post id suffix keeps keys unique for same-millisecond posts.
pub(crate) fn time_index_key(timestamp_millis: i64, post_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + post_id.len());
    key.extend_from_slice(&(!timestamp_millis as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(post_id.as_bytes());
    key
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID document database.
pub struct Database {
    db: RedbDatabase,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = RedbDatabase::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(PROFILES)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(POST_TIME_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self)
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(self)
    }

    pub fn posts(&self) -> PostRepository<'_> {
        PostRepository::new(self)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<redb::WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub(crate) fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("devhub.redb")).unwrap();

        // Freshly created database answers reads without table errors.
        let read_txn = db.begin_read().unwrap();
        let table = read_txn.open_table(USERS).unwrap();
        assert!(redb::ReadableTable::get(&table, "missing").unwrap().is_none());
    }

    #[test]
    fn time_index_keys_order_newest_first() {
        let older = time_index_key(1_000, "a");
        let newer = time_index_key(2_000, "b");
        assert!(newer < older);
    }

    #[test]
    fn time_index_keys_unique_per_post() {
        let a = time_index_key(1_000, "a");
        let b = time_index_key(1_000, "b");
        assert_ne!(a, b);
    }
}
