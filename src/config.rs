use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".discussions-proxy.toml";

/// Environment variable holding the GitHub access token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .discussions-proxy.toml.
/// All fields are optional; the service runs with zero config apart from the token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Upstream GitHub settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// GraphQL endpoint
    pub api_url: String,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Slug of the only discussion category this service exposes
    pub category_slug: String,
    /// Value sent in the User-Agent header
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com/graphql".to_string(),
            owner: "Kilo-Org".to_string(),
            repo: "kilocode".to_string(),
            category_slug: "built-with-kilo".to_string(),
            user_agent: "share-kilo-love-api".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on, e.g. 127.0.0.1:3000
    pub listen: String,
    /// max-age sent in Cache-Control on successful responses
    pub cache_max_age_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            cache_max_age_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from .discussions-proxy.toml in the
    /// current directory when no path is given.
    /// Returns default config if the default file doesn't exist; an explicit
    /// path that doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.github_token().is_none() {
            config.github.token = std::env::var(TOKEN_ENV_VAR).ok();
        }

        Ok(config)
    }

    /// Load from a specific path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The configured GitHub token, with blank values treated as absent.
    pub fn github_token(&self) -> Option<&str> {
        self.github
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
