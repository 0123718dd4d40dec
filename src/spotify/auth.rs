//! Token lifecycle for one account.
//!
//! Every fetch or mutation starts by asking the account's [`TokenManager`]
//! for a valid access token. The manager refreshes lazily through the
//! OAuth refresh-token grant when the cached token is missing or about to
//! expire. Refresh failures are authentication errors and abort the whole
//! operation; they are never retried.
//!
//! The one-time authorization-code exchange used by `spotsync auth` also
//! lives here, shared with the callback handler.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;

use crate::{
    config::{self, AccountCredentials},
    error::SyncError,
    types::{Token, TokenResponse},
};

/// OAuth scopes the sync needs on both accounts.
pub const REQUIRED_SCOPES: &[&str] = &[
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-follow-read",
    "user-follow-modify",
];

/// Caches an access token for one account and refreshes it on demand.
pub struct TokenManager {
    credentials: AccountCredentials,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(credentials: AccountCredentials) -> Self {
        TokenManager {
            credentials,
            token: None,
        }
    }

    /// Returns a valid access token, refreshing first when the cached one
    /// is absent or within the expiry buffer.
    pub async fn access_token(&mut self) -> Result<String, SyncError> {
        if self.is_expired() {
            self.refresh().await?;
        }

        match &self.token {
            Some(token) => Ok(token.access_token.clone()),
            None => Err(SyncError::Auth {
                message: "no access token after refresh".to_string(),
                source: None,
            }),
        }
    }

    fn is_expired(&self) -> bool {
        match &self.token {
            Some(token) => {
                let now = Utc::now().timestamp() as u64;
                // refresh 240s early so a token never expires mid-request
                now >= token.obtained_at + token.expires_in - 240
            }
            None => true,
        }
    }

    async fn refresh(&mut self) -> Result<(), SyncError> {
        let response = request_token(
            &self.credentials.client_id,
            &self.credentials.client_secret,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", &self.credentials.refresh_token),
            ],
        )
        .await
        .map_err(|e| SyncError::auth("failed to refresh access token", e))?;

        self.token = Some(Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| self.credentials.refresh_token.clone()),
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        });

        Ok(())
    }
}

/// Exchanges an authorization code for a token pair.
///
/// Final step of the `spotsync auth` flow, called from the callback handler
/// with the code Spotify appended to the redirect. The returned token
/// carries the refresh token the user copies into their environment.
pub async fn exchange_code(
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Result<Token, SyncError> {
    let redirect_uri = config::spotify_redirect_uri();
    let response = request_token(
        client_id,
        client_secret,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &redirect_uri),
        ],
    )
    .await
    .map_err(|e| SyncError::auth("failed to exchange authorization code", e))?;

    let refresh_token = response.refresh_token.ok_or_else(|| SyncError::Auth {
        message: "token response carried no refresh token".to_string(),
        source: None,
    })?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token,
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// One call against the token endpoint with HTTP basic client
/// authentication, as the accounts service expects for confidential apps.
async fn request_token(
    client_id: &str,
    client_secret: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SyncError> {
    let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));

    let client = Client::new();
    let response = client
        .post(config::spotify_apitoken_url())
        .header("Authorization", format!("Basic {}", basic))
        .form(form)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<TokenResponse>().await?)
}
