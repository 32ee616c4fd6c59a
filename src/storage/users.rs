// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! User account repository.
//!
//! Accounts are created once at registration and destroyed only through
//! the profile cascade delete. Email uniqueness is enforced by the
//! `user_emails` index inside the same write transaction that inserts the
//! account, so a duplicate can never slip in between check and write.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::{Database, StorageError, StorageResult, USERS, USER_EMAILS};

/// User account record.
///
/// The password hash is a PHC string and never leaves the storage layer;
/// wire responses use `models::UserResponse`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email, compared case-sensitively as stored
    pub email: String,
    /// Derived avatar URL
    pub avatar: String,
    /// Argon2id PHC hash of the password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Repository for user account operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new account.
    ///
    /// Fails with `AlreadyExists` when the email index already holds this
    /// email. The check and both inserts share one write transaction.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(user.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists("User already exists".into()));
            }
            emails.insert(user.email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up an account by id.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound("User not found".into())),
        }
    }

    /// Look up an account by email (case-sensitive, as stored).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;

        let user_id = match emails.get(email)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = Database::open(&dir.path().join("devhub.redb")).expect("open db");
        (db, dir)
    }

    fn test_user(id: &str, email: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: email.to_string(),
            avatar: "https://www.gravatar.com/avatar/abc".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let (db, _dir) = test_db();
        let repo = db.users();

        let user = test_user("u1", "a@x.com");
        repo.create(&user).unwrap();

        let loaded = repo.get("u1").unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn duplicate_email_rejected_and_first_account_untouched() {
        let (db, _dir) = test_db();
        let repo = db.users();

        let first = test_user("u1", "a@x.com");
        repo.create(&first).unwrap();

        let mut second = test_user("u2", "a@x.com");
        second.name = "Impostor".to_string();
        let err = repo.create(&second).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));

        // The original account is unchanged and the duplicate never landed.
        assert_eq!(repo.get("u1").unwrap(), first);
        assert!(matches!(
            repo.get("u2").unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[test]
    fn email_compare_is_case_sensitive() {
        let (db, _dir) = test_db();
        let repo = db.users();

        repo.create(&test_user("u1", "a@x.com")).unwrap();
        // A different casing is a different stored email.
        repo.create(&test_user("u2", "A@x.com")).unwrap();

        assert_eq!(repo.find_by_email("a@x.com").unwrap().unwrap().id, "u1");
        assert_eq!(repo.find_by_email("A@x.com").unwrap().unwrap().id, "u2");
    }

    #[test]
    fn find_by_email_returns_none_when_absent() {
        let (db, _dir) = test_db();
        assert!(db.users().find_by_email("nobody@x.com").unwrap().is_none());
    }
}
