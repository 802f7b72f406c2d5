use crate::error::{ActivityError, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const DEFAULT_OUT_PREFIX: &str = "github_activity";

const TOKEN_ENV: &str = "GITHUB_TOKEN";
const API_URL_ENV: &str = "GITHUB_API_URL";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DefaultsConfig {
    pub orgs: Option<Vec<String>>,
    pub out: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_delay_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
            retry_delay_secs: 5,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Config {
    /// The token from `GITHUB_TOKEN`, falling back to the config file.
    pub fn token(&self) -> Result<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.auth.token.clone())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ActivityError::MissingToken)
    }

    /// API settings with `GITHUB_API_URL` applied over the file value.
    pub fn api(&self) -> ApiConfig {
        let mut api = self.api.clone();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                api.base_url = url.trim().to_string();
            }
        }
        api
    }

    pub fn out_prefix(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.defaults.out.clone())
            .unwrap_or_else(|| DEFAULT_OUT_PREFIX.to_string())
    }

    /// Organization allow-list: the `--org` flags, else `defaults.orgs`.
    /// `None` means every active membership is exported.
    pub fn org_filter(&self, flags: &[String]) -> Option<Vec<String>> {
        if !flags.is_empty() {
            return Some(flags.to_vec());
        }
        self.defaults
            .orgs
            .as_ref()
            .filter(|orgs| !orgs.is_empty())
            .cloned()
    }
}

pub fn config_path() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("gh-activity").join("config.toml");
        return Ok(path);
    }

    let home = dirs::home_dir()
        .ok_or_else(|| ActivityError::Config("Cannot find home directory".into()))?;
    Ok(home.join(".config").join("gh-activity").join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
