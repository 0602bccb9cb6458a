//! Hosting account credentials
//!
//! Read once at process entry from `GITHUB_USERNAME` and `GITHUB_TOKEN`
//! (a `.env` file in the working directory is loaded into the environment
//! first by the binary).

use super::ConfigError;
use secrecy::{ExposeSecret, SecretString};

pub const ACCOUNT_ENV: &str = "GITHUB_USERNAME";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Developer account name and access token
#[derive(Clone)]
pub struct Credentials {
    pub account_name: String,
    access_token: SecretString,
}

impl Credentials {
    pub fn new(account_name: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        let account_name = required(ACCOUNT_ENV)?;
        let access_token = required(TOKEN_ENV)?;
        Ok(Self::new(account_name, access_token))
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// Token as plain text, for building request headers only
    pub fn expose_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_name", &self.account_name)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
