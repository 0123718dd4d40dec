use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify, types::AuthFlow, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthFlow>>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(ref mut flow) = state.as_mut() else {
        return Html("<h4>No authorization flow in progress.</h4>");
    };

    // CSRF guard: the state we sent must come back unchanged
    if params.get("state") != Some(&flow.state) {
        warning!("Callback state parameter mismatch, ignoring response");
        return Html("<h4>State mismatch.</h4>");
    }

    match spotify::auth::exchange_code(&flow.client_id, &flow.client_secret, code).await {
        Ok(token) => {
            flow.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
