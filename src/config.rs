//! Configuration management for the Spotify account sync CLI.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Credentials for the two accounts
//! and the target playlist id are gathered once into a [`Config`] value that
//! is passed into the sync drivers; endpoint URLs and server settings are
//! plain accessors with overridable defaults.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then the working directory
//! 3. Application defaults (endpoint URLs, server address)

use std::{env, path::PathBuf};

use clap::ValueEnum;

use crate::error::SyncError;

/// Which of the two configured accounts an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AccountKind {
    /// The account whose library is the source of truth.
    Source,
    /// The account that receives the synced items.
    Target,
}

impl AccountKind {
    fn prefix(&self) -> &'static str {
        match self {
            AccountKind::Source => "SOURCE",
            AccountKind::Target => "TARGET",
        }
    }

    /// Environment variable holding this account's refresh token.
    pub fn refresh_token_var(&self) -> String {
        format!("{}_REFRESH_TOKEN", self.prefix())
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Source => write!(f, "source"),
            AccountKind::Target => write!(f, "target"),
        }
    }
}

/// Everything needed to refresh tokens for one account.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Full run configuration, built once via [`Config::from_env`] and passed
/// down into the sync drivers.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: AccountCredentials,
    pub target: AccountCredentials,
    pub target_playlist_id: String,
}

impl Config {
    /// Reads the complete sync configuration from the environment.
    ///
    /// All missing variables are collected into a single configuration
    /// error, so one run reports everything that still needs to be set.
    pub fn from_env() -> Result<Config, SyncError> {
        let required = [
            "SOURCE_CLIENT_ID",
            "SOURCE_CLIENT_SECRET",
            "SOURCE_REFRESH_TOKEN",
            "TARGET_CLIENT_ID",
            "TARGET_CLIENT_SECRET",
            "TARGET_REFRESH_TOKEN",
            "TARGET_PLAYLIST_ID",
        ];

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| env::var(name).map_or(true, |v| v.is_empty()))
            .collect();

        if !missing.is_empty() {
            return Err(SyncError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Config {
            source: Self::credentials(AccountKind::Source)?,
            target: Self::credentials(AccountKind::Target)?,
            target_playlist_id: env::var("TARGET_PLAYLIST_ID").unwrap_or_default(),
        })
    }

    /// Client id and secret plus refresh token for one account.
    pub fn credentials(account: AccountKind) -> Result<AccountCredentials, SyncError> {
        let prefix = account.prefix();
        Ok(AccountCredentials {
            client_id: Self::var(&format!("{}_CLIENT_ID", prefix))?,
            client_secret: Self::var(&format!("{}_CLIENT_SECRET", prefix))?,
            refresh_token: Self::var(&format!("{}_REFRESH_TOKEN", prefix))?,
        })
    }

    /// Client id and secret only, for the auth flow where no refresh token
    /// exists yet.
    pub fn client_app(account: AccountKind) -> Result<(String, String), SyncError> {
        let prefix = account.prefix();
        Ok((
            Self::var(&format!("{}_CLIENT_ID", prefix))?,
            Self::var(&format!("{}_CLIENT_SECRET", prefix))?,
        ))
    }

    fn var(name: &str) -> Result<String, SyncError> {
        env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SyncError::config(format!("{} must be set", name)))
    }
}

/// Loads environment variables from a `.env` file.
///
/// Looks in the platform-specific local data directory first
/// (`<data dir>/spotsync/.env`), creating the directory structure if it does
/// not exist, and falls back to a `.env` in the working directory. A missing
/// file is fine; the environment may already carry everything.
pub async fn load_env() {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotsync/.env");
    if let Some(parent) = path.parent() {
        let _ = async_fs::create_dir_all(parent).await;
    }

    if path.is_file() {
        let _ = dotenv::from_path(&path);
    } else {
        let _ = dotenv::dotenv();
    }
}

/// Returns the server address for the local OAuth callback server.
///
/// Override with the `SERVER_ADDRESS` environment variable.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8888".to_string())
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match the redirect URI registered in the Spotify application
/// settings for both accounts. Override with `SPOTIFY_API_REDIRECT_URI`.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .unwrap_or_else(|_| "http://127.0.0.1:8888/callback".to_string())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Override with `SPOTIFY_API_AUTH_URL`.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Override with `SPOTIFY_API_TOKEN_URL`.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Override with `SPOTIFY_API_URL`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}
