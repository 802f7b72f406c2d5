//! Response shapes for the handful of endpoints the exporter touches.
//!
//! Every field the exporter reads is optional: search results are passed
//! through as-is and a missing field becomes a blank column, never an error.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrgMembership {
    pub organization: OrgRef,
}

#[derive(Debug, Deserialize)]
pub struct OrgRef {
    pub login: String,
}

/// An item from `/search/issues` (issues and pull requests alike).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchIssue {
    pub repository_url: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
}

/// An item from `/search/commits`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchCommit {
    pub sha: Option<String>,
    pub html_url: Option<String>,
    pub commit: Option<CommitDetail>,
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitDetail {
    pub message: Option<String>,
    pub author: Option<GitSignature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitSignature {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RepositoryRef {
    pub full_name: Option<String>,
}
