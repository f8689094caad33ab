use anyhow::Context;

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MAX_TITLE_LENGTH: usize = 256;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 3;

pub const POSTS_LIST_KEY: &str = "posts_list";
pub const USERS_LIST_KEY: &str = "users_list";

pub fn post_key(id: &str) -> String {
    format!("post:{}", id)
}

pub fn user_key(id: &str) -> String {
    format!("user:{}", id)
}

pub fn token_key(token: &str) -> String {
    format!("token:{}", token)
}

const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings read from `FORUM_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lifetime of a login token before it is rejected
    pub token_expiration_hours: i64,
    /// Listen address of the native server
    pub bind_addr: String,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_expiration_hours: DEFAULT_TOKEN_EXPIRATION_HOURS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; unset variables
    /// fall back to defaults, malformed ones are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_expiration_hours = match lookup("FORUM_TOKEN_EXPIRATION_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("FORUM_TOKEN_EXPIRATION_HOURS is not a number: {:?}", raw))?,
            None => DEFAULT_TOKEN_EXPIRATION_HOURS,
        };

        Ok(Self {
            token_expiration_hours,
            bind_addr: lookup("FORUM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_filter: lookup("FORUM_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
