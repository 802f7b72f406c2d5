use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("set GITHUB_TOKEN in your environment (or `auth.token` in the config file).")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{value}': expected YYYY-MM-DD ({source})")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("GitHub API returned {status} for {url}: {body}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl ActivityError {
    /// Process exit status for this error. A missing token is reported
    /// distinctly so wrappers can tell "not configured" from "failed".
    pub fn exit_code(&self) -> i32 {
        match self {
            ActivityError::MissingToken => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ActivityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_has_distinct_exit_code() {
        assert_eq!(ActivityError::MissingToken.exit_code(), 2);
        assert_eq!(ActivityError::Config("bad".into()).exit_code(), 1);
    }

    #[test]
    fn http_status_message_includes_url() {
        let err = ActivityError::HttpStatus {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            url: "https://api.github.com/search/issues".into(),
            body: "Validation Failed".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("/search/issues"));
    }
}
