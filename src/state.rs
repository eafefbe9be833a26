use std::sync::Arc;

use tracing::warn;

use crate::config::{Config, TOKEN_ENV_VAR};
use crate::github::{GraphQlClient, HttpGraphQlClient, RepoTarget};

/// Shared application state. Nothing in here is mutated after startup, so
/// concurrent requests need no synchronization.
#[derive(Clone)]
pub struct AppState {
    /// None when no access token is configured
    pub github: Option<Arc<dyn GraphQlClient>>,
    pub target: Arc<RepoTarget>,
    pub cache_max_age_secs: u64,
}

impl AppState {
    pub fn new(
        github: Option<Arc<dyn GraphQlClient>>,
        target: RepoTarget,
        cache_max_age_secs: u64,
    ) -> Self {
        Self {
            github,
            target: Arc::new(target),
            cache_max_age_secs,
        }
    }

    /// Build state from loaded configuration. A missing token is not fatal:
    /// the server starts and every request reports the misconfiguration.
    pub fn from_config(config: &Config) -> Self {
        let github = match config.github_token() {
            Some(token) => Some(Arc::new(HttpGraphQlClient::new(
                config.github.api_url.clone(),
                token,
                config.github.user_agent.clone(),
            )) as Arc<dyn GraphQlClient>),
            None => {
                warn!(env_var = TOKEN_ENV_VAR, "no GitHub token configured; all requests will fail");
                None
            }
        };

        let target = RepoTarget {
            owner: config.github.owner.clone(),
            repo: config.github.repo.clone(),
            category_slug: config.github.category_slug.clone(),
        };

        Self::new(github, target, config.server.cache_max_age_secs)
    }

    /// Value of the Cache-Control header on successful responses.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }
}
