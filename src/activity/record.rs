use crate::github::models::{SearchCommit, SearchIssue};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    PrsOpened,
    PrsMerged,
    PrsReviewed,
    PrsCommented,
    IssuesOpened,
    InvolvesMe,
    Commits,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::PrsOpened => "prs_opened",
            Kind::PrsMerged => "prs_merged",
            Kind::PrsReviewed => "prs_reviewed",
            Kind::PrsCommented => "prs_commented",
            Kind::IssuesOpened => "issues_opened",
            Kind::InvolvesMe => "involves_me",
            Kind::Commits => "commits",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pull request or issue returned by one of the issue-search queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueRecord {
    pub kind: Kind,
    pub org: String,
    pub repo: String,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRecord {
    pub kind: Kind,
    pub org: String,
    pub repo: Option<String>,
    pub sha: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
    pub author_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActivityRecord {
    Issue(IssueRecord),
    Commit(CommitRecord),
}

/// `(kind, unique id)`: two records with the same key are the same activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub kind: Kind,
    pub id: String,
}

impl IssueRecord {
    pub fn from_search(kind: Kind, org: &str, item: SearchIssue) -> Self {
        Self {
            kind,
            org: org.to_string(),
            repo: repo_full_name(item.repository_url.as_deref().unwrap_or_default()),
            number: item.number,
            title: item.title,
            state: item.state,
            url: item.html_url,
            created_at: item.created_at,
            updated_at: item.updated_at,
            closed_at: item.closed_at,
        }
    }
}

impl CommitRecord {
    pub fn from_search(org: &str, item: SearchCommit) -> Self {
        let commit = item.commit.unwrap_or_default();
        Self {
            kind: Kind::Commits,
            org: org.to_string(),
            repo: item.repository.and_then(|r| r.full_name),
            sha: item.sha,
            message: commit
                .message
                .as_deref()
                .and_then(|m| m.lines().next())
                .map(str::to_string),
            url: item.html_url,
            author_date: commit.author.and_then(|a| a.date),
        }
    }
}

impl ActivityRecord {
    pub fn kind(&self) -> Kind {
        match self {
            ActivityRecord::Issue(r) => r.kind,
            ActivityRecord::Commit(r) => r.kind,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        let id = match self {
            ActivityRecord::Issue(r) => non_empty(&r.url).unwrap_or_else(|| {
                let number = r.number.map(|n| n.to_string()).unwrap_or_default();
                format!("{}:{}:{}#{}", r.org, r.kind, r.repo, number)
            }),
            ActivityRecord::Commit(r) => non_empty(&r.sha)
                .or_else(|| non_empty(&r.url))
                .unwrap_or_else(|| serde_json::to_string(r).unwrap_or_default()),
        };
        DedupKey {
            kind: self.kind(),
            id,
        }
    }

    /// One CSV row in [`CSV_COLUMNS`] order; columns foreign to the kind
    /// stay blank.
    pub fn csv_row(&self) -> [String; 13] {
        fn cell(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        match self {
            ActivityRecord::Issue(r) => [
                r.kind.to_string(),
                r.org.clone(),
                r.repo.clone(),
                r.number.map(|n| n.to_string()).unwrap_or_default(),
                cell(&r.title),
                cell(&r.state),
                cell(&r.url),
                cell(&r.created_at),
                cell(&r.updated_at),
                cell(&r.closed_at),
                String::new(),
                String::new(),
                String::new(),
            ],
            ActivityRecord::Commit(r) => [
                r.kind.to_string(),
                r.org.clone(),
                cell(&r.repo),
                String::new(),
                String::new(),
                String::new(),
                cell(&r.url),
                String::new(),
                String::new(),
                String::new(),
                cell(&r.sha),
                cell(&r.message),
                cell(&r.author_date),
            ],
        }
    }
}

/// Blank identifiers count as missing.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

pub const CSV_COLUMNS: [&str; 13] = [
    "kind",
    "org",
    "repo",
    "number",
    "title",
    "state",
    "url",
    "created_at",
    "updated_at",
    "closed_at",
    "sha",
    "message",
    "author_date",
];

/// `https://api.github.com/repos/OWNER/REPO` -> `OWNER/REPO`. Anything that
/// does not contain exactly one `/repos/` segment is returned unchanged.
pub fn repo_full_name(repository_url: &str) -> String {
    let trimmed = repository_url.trim_end_matches('/');
    let mut parts = trimmed.split("/repos/");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(name), None) => name.to_string(),
        _ => repository_url.to_string(),
    }
}
