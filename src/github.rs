// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! GitHub repository listing passthrough.
//!
//! Fetches a user's five most recent public repositories and relays the
//! response body untouched. No caching, no shaping; the client renders
//! GitHub's own JSON.

use reqwest::Client;
use serde_json::Value;

const GITHUB_API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "devhub-server";

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("No GitHub profile found")]
    NoProfile,

    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// List a user's most recent public repositories.
pub async fn list_repos(client: &Client, username: &str) -> Result<Value, GithubError> {
    let url = format!("{GITHUB_API_BASE_URL}/users/{username}/repos?per_page=5&sort=created:asc");

    let response = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GithubError::NoProfile);
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_url_is_well_formed() {
        // The URL shape is the contract with GitHub; a typo here fails
        // every passthrough call.
        let url =
            format!("{GITHUB_API_BASE_URL}/users/octocat/repos?per_page=5&sort=created:asc");
        assert_eq!(
            url,
            "https://api.github.com/users/octocat/repos?per_page=5&sort=created:asc"
        );
    }
}
