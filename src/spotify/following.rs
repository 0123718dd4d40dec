use reqwest::Client;

use crate::{
    batch, config,
    error::SyncError,
    paging::{self, CursorPage},
    retry::RetryPolicy,
    types::{Artist, FollowArtistsRequest, FollowedArtistsResponse},
};

use super::auth::TokenManager;

const PAGE_LIMIT: u64 = 50;

/// Fully materializes the account's followed artists.
///
/// The following endpoint paginates with an opaque `after` cursor instead
/// of numeric offsets; traversal chains cursors strictly and stops after a
/// page without one. Failures stay API-kind errors, the callers wrap
/// mutations only.
pub async fn get_followed_artists(
    token_mgr: &mut TokenManager,
    policy: &RetryPolicy,
) -> Result<Vec<Artist>, SyncError> {
    let token = token_mgr.access_token().await?;
    let base_url = config::spotify_apiurl();
    let client = Client::new();

    paging::fetch_all_cursor(policy, |after| {
        let client = client.clone();
        let token = token.clone();
        let mut api_url = format!(
            "{uri}/me/following?type=artist&limit={limit}",
            uri = base_url,
            limit = PAGE_LIMIT
        );
        if let Some(after_val) = &after {
            api_url.push_str(&format!("&after={}", after_val));
        }
        async move { followed_artists_page(&client, &api_url, &token).await }
    })
    .await
}

async fn followed_artists_page(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<CursorPage<Artist>, SyncError> {
    let response = client
        .get(api_url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let body = response.json::<FollowedArtistsResponse>().await?;
    let after = body.artists.cursors.and_then(|c| c.after);

    Ok(CursorPage {
        items: body.artists.items,
        after,
    })
}

/// Follows the given artists in chunks.
///
/// Following an artist the account already follows is accepted by the API,
/// so reruns after partial failures are safe.
pub async fn follow_artists(
    token_mgr: &mut TokenManager,
    ids: &[String],
    policy: &RetryPolicy,
) -> Result<(), SyncError> {
    mutate_following(token_mgr, ids, policy, FollowAction::Follow).await
}

/// Unfollows the given artists in chunks.
pub async fn unfollow_artists(
    token_mgr: &mut TokenManager,
    ids: &[String],
    policy: &RetryPolicy,
) -> Result<(), SyncError> {
    mutate_following(token_mgr, ids, policy, FollowAction::Unfollow).await
}

#[derive(Clone, Copy)]
enum FollowAction {
    Follow,
    Unfollow,
}

async fn mutate_following(
    token_mgr: &mut TokenManager,
    ids: &[String],
    policy: &RetryPolicy,
    action: FollowAction,
) -> Result<(), SyncError> {
    let token = token_mgr.access_token().await?;
    let api_url = format!(
        "{uri}/me/following?type=artist",
        uri = config::spotify_apiurl()
    );
    let client = Client::new();

    batch::apply_in_chunks(policy, ids, |chunk| {
        let client = client.clone();
        let token = token.clone();
        let api_url = api_url.clone();
        async move {
            let body = FollowArtistsRequest { ids: chunk };
            let request = match action {
                FollowAction::Follow => client.put(&api_url),
                FollowAction::Unfollow => client.delete(&api_url),
            };
            request
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        }
    })
    .await
    .map_err(|e| match action {
        FollowAction::Follow => SyncError::follow("failed to follow artists", e),
        FollowAction::Unfollow => SyncError::follow("failed to unfollow artists", e),
    })?;

    Ok(())
}
