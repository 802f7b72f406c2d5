use crate::config::ApiConfig;
use crate::error::{ActivityError, Result};
use crate::github::link::next_link_from;
use crate::github::models::{AuthenticatedUser, OrgMembership};
use chrono::Utc;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const API_VERSION: &str = "2022-11-28";
pub const PER_PAGE: &str = "100";

/// Extra seconds to wait past the advertised reset, to absorb clock skew.
const RATE_LIMIT_MARGIN_SECS: i64 = 5;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Query parameters for a request.
pub type Query = Vec<(&'static str, String)>;

pub struct GithubClient {
    http: Client,
    base_url: Url,
    retry_delay: Duration,
}

enum Cursor {
    First(Query),
    Next(String),
    Done,
}

impl GithubClient {
    pub fn new(token: &str, api: &ApiConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ActivityError::Config("token contains characters not allowed in a header".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(header::AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(concat!("gh-activity/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(api.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: parse_base_url(&api.base_url)?,
            retry_delay: api.retry_delay(),
        })
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn resolve(&self, url_or_path: &str) -> Result<Url> {
        let parsed = if url_or_path.starts_with("http") {
            Url::parse(url_or_path)
        } else {
            self.base_url.join(url_or_path.trim_start_matches('/'))
        };
        parsed.map_err(|e| ActivityError::InvalidUrl {
            url: url_or_path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Send one GET, retrying network failures and rate-limit exhaustion
    /// until the server gives a definitive answer. Any other non-2xx status
    /// is returned as [`ActivityError::HttpStatus`].
    pub async fn fetch_raw(
        &self,
        url_or_path: &str,
        params: Option<&[(&'static str, String)]>,
    ) -> Result<Response> {
        let url = self.resolve(url_or_path)?;

        loop {
            let mut request = self.http.get(url.clone());
            if let Some(params) = params {
                request = request.query(params);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if e.is_builder() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Network error. Retrying in {:?}...",
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
            };

            let status = response.status();
            tracing::debug!(
                %url,
                %status,
                remaining = header_str(response.headers(), RATE_LIMIT_REMAINING).unwrap_or("-"),
                "GET"
            );

            if let Some(wait) = rate_limit_wait(status, response.headers(), Utc::now().timestamp())
            {
                tracing::warn!("Rate limit hit. Waiting {} seconds...", wait.as_secs());
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ActivityError::HttpStatus {
                    status,
                    url: url.to_string(),
                    body,
                });
            }

            return Ok(response);
        }
    }

    /// [`fetch_raw`](Self::fetch_raw) plus the body read. A connection that
    /// drops or times out mid-body is retried like any other network error;
    /// a complete body that isn't valid JSON is not.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url_or_path: &str,
        params: Option<&[(&'static str, String)]>,
    ) -> Result<(HeaderMap, T)> {
        loop {
            let response = self.fetch_raw(url_or_path, params).await?;
            let headers = response.headers().clone();
            match response.bytes().await {
                Ok(body) => return Ok((headers, serde_json::from_slice(&body)?)),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Network error reading response. Retrying in {:?}...",
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// Lazily walk a paginated endpoint, following `Link: rel="next"`.
    ///
    /// `params` are only sent with the first request; the next-page URLs
    /// handed out by the server already carry them. With `items_key` unset
    /// each page body is the item array itself, otherwise the items live
    /// under that key (an absent key is an empty page).
    pub fn paginate<'a, T>(
        &'a self,
        path: &'a str,
        params: Query,
        items_key: Option<&'a str>,
    ) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        stream::try_unfold(Cursor::First(params), move |cursor| async move {
            let (headers, body): (HeaderMap, Value) = match cursor {
                Cursor::First(params) => {
                    let params = (!params.is_empty()).then_some(params.as_slice());
                    self.fetch_json(path, params).await?
                }
                Cursor::Next(url) => self.fetch_json(&url, None).await?,
                Cursor::Done => return Ok::<_, ActivityError>(None),
            };

            let next = next_link_from(&headers).map_or(Cursor::Done, Cursor::Next);
            let items: Vec<T> = page_items(body, items_key)?;
            tracing::debug!(count = items.len(), "page fetched");

            Ok(Some((
                stream::iter(items.into_iter().map(Ok::<T, ActivityError>)),
                next,
            )))
        })
        .try_flatten()
    }

    pub async fn whoami(&self) -> Result<AuthenticatedUser> {
        let (_, user) = self.fetch_json("/user", None).await?;
        Ok(user)
    }

    /// Logins of the organizations the caller is an active member of, in
    /// the order the API lists them.
    pub async fn active_organizations(&self) -> Result<Vec<String>> {
        let params: Query = vec![("state", "active".into()), ("per_page", PER_PAGE.into())];
        self.paginate::<OrgMembership>("/user/memberships/orgs", params, None)
            .map_ok(|membership| membership.organization.login)
            .try_collect()
            .await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // `Url::join` drops the last path segment unless it ends with a slash.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| ActivityError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

/// How long to sleep before retrying a rate-limited response, or `None`
/// when the response is not a rate-limit rejection.
fn rate_limit_wait(status: StatusCode, headers: &HeaderMap, now: i64) -> Option<Duration> {
    if status != StatusCode::FORBIDDEN || header_str(headers, RATE_LIMIT_REMAINING)? != "0" {
        return None;
    }
    let reset = header_str(headers, RATE_LIMIT_RESET)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let secs = (reset - now + RATE_LIMIT_MARGIN_SECS).max(0);
    Some(Duration::from_secs(secs as u64))
}

fn page_items<T: DeserializeOwned>(body: Value, items_key: Option<&str>) -> Result<Vec<T>> {
    let items = match (items_key, body) {
        (None, body) => body,
        (Some(key), Value::Object(mut map)) => match map.remove(key) {
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(items) => items,
        },
        (Some(_), _) => Value::Array(Vec::new()),
    };
    Ok(serde_json::from_value(items)?)
}
