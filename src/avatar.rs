// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Deterministic avatar derivation.
//!
//! Gravatar URL from the SHA-256 of the normalized email. Sized 200px,
//! PG-rated, with the "mystery person" fallback for addresses without a
//! Gravatar account.

use sha2::{Digest, Sha256};

/// Derive the avatar URL for an email address.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(gravatar_url("a@x.com"), gravatar_url("a@x.com"));
        assert_ne!(gravatar_url("a@x.com"), gravatar_url("b@x.com"));
    }

    #[test]
    fn email_is_normalized_before_hashing() {
        assert_eq!(gravatar_url("  A@X.com  "), gravatar_url("a@x.com"));
    }

    #[test]
    fn url_carries_display_parameters() {
        let url = gravatar_url("a@x.com");
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
    }
}
