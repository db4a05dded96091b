use std::env;
use std::path::PathBuf;

use crate::models::Sort;

pub const DEFAULT_SUBREDDIT: &str = "AIArtwork";
pub const DEFAULT_POST_LIMIT: usize = 5000;
pub const DEFAULT_LOG_FILE: &str = "parse.log";

const PLACEHOLDER_CREDENTIAL: &str = "xxx";

/// Reddit application credentials
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub subreddit: String,
    pub post_limit: usize,
    pub sort: Sort,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Missing credentials fall back to placeholders; Reddit will then reject the
    /// token request and the run ends with nothing downloaded.
    pub fn from_env() -> Self {
        Self::try_load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = |key: &str| {
            lookup(key).unwrap_or_else(|| PLACEHOLDER_CREDENTIAL.to_string())
        };

        Self {
            credentials: Credentials {
                client_id: credential("REDDIT_CLIENT_ID"),
                client_secret: credential("REDDIT_CLIENT_SECRET"),
                user_agent: credential("REDDIT_USER_AGENT"),
            },
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            post_limit: DEFAULT_POST_LIMIT,
            sort: Sort::default(),
            download_dir: PathBuf::from(DEFAULT_SUBREDDIT),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    /// Switches the feed. The download directory follows the feed name unless it
    /// was set explicitly afterwards.
    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self.download_dir = PathBuf::from(&self.subreddit);
        self
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/reddit-images/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("reddit-images").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.credentials.client_id, "xxx");
        assert_eq!(config.credentials.client_secret, "xxx");
        assert_eq!(config.credentials.user_agent, "xxx");
        assert_eq!(config.subreddit, "AIArtwork");
        assert_eq!(config.post_limit, 5000);
        assert_eq!(config.sort, Sort::Hot);
        assert_eq!(config.download_dir, PathBuf::from("AIArtwork"));
        assert_eq!(config.log_file, PathBuf::from("parse.log"));
    }

    #[test]
    fn test_credentials_read_from_named_variables() {
        let vars: HashMap<&str, &str> = [
            ("REDDIT_CLIENT_ID", "id-123"),
            ("REDDIT_CLIENT_SECRET", "s3cret"),
            ("REDDIT_USER_AGENT", "image-collector/0.1 by someone"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.credentials,
            Credentials {
                client_id: "id-123".to_string(),
                client_secret: "s3cret".to_string(),
                user_agent: "image-collector/0.1 by someone".to_string(),
            }
        );
    }

    #[test]
    fn test_with_subreddit_moves_download_dir() {
        let config = Config::from_lookup(|_| None).with_subreddit("Art");
        assert_eq!(config.subreddit, "Art");
        assert_eq!(config.download_dir, PathBuf::from("Art"));
    }
}
