pub mod export;

use crate::error::Result;
use crate::github::GithubClient;
use std::collections::HashSet;

/// Active organization memberships, narrowed to `allow` when one is given.
pub async fn resolve_orgs(allow: Option<&[String]>, client: &GithubClient) -> Result<Vec<String>> {
    let memberships = client.active_organizations().await?;
    Ok(filter_orgs(memberships, allow))
}

/// Keeps membership order; allow-list entries that are not memberships are
/// ignored.
pub fn filter_orgs(memberships: Vec<String>, allow: Option<&[String]>) -> Vec<String> {
    let Some(allow) = allow else {
        return memberships;
    };
    let wanted: HashSet<&str> = allow.iter().map(String::as_str).collect();
    memberships
        .into_iter()
        .filter(|org| wanted.contains(org.as_str()))
        .collect()
}
