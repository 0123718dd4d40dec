use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config::{self, AccountKind, Config},
    error, info,
    server::start_api_server,
    spotify::auth::REQUIRED_SCOPES,
    success,
    types::{AuthFlow, Token},
    utils, warning,
};

/// Runs the one-time authorization flow for one account.
///
/// Starts the local callback server, opens the Spotify consent page in the
/// browser and waits for the callback handler to complete the code
/// exchange. On success the refresh token is printed together with the
/// environment variable it belongs in.
pub async fn auth(account: AccountKind, shared_state: Arc<Mutex<Option<AuthFlow>>>) {
    let (client_id, client_secret) = match Config::client_app(account) {
        Ok(app) => app,
        Err(e) => error::exit_with(&e),
    };

    let state = utils::generate_state();

    // Store the flow before the redirect so the callback can find it
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthFlow {
            account,
            client_id: client_id.clone(),
            client_secret,
            state: state.clone(),
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}&scope={scope}",
        auth_url = &config::spotify_apiauth_url(),
        client_id = client_id,
        redirect_uri = &config::spotify_redirect_uri(),
        state = state,
        scope = REQUIRED_SCOPES.join("%20")
    );

    info!("Authorizing the {} account...", account);

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(token) => {
            success!("Authentication successful!");
            info!(
                "Set {} to the following refresh token:\n{}",
                account.refresh_token_var(),
                token.refresh_token
            );
        }
        None => {
            crate::error!("Authentication failed or timed out.");
        }
    }
}

/// Polls the shared state until the callback handler has stored a token,
/// giving up after five minutes.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthFlow>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(300);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(flow) = lock.as_ref() {
            if let Some(token) = &flow.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
