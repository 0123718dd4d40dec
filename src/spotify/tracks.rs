use reqwest::Client;

use crate::{
    config,
    error::SyncError,
    paging::{self, OffsetPage},
    retry::RetryPolicy,
    spotify::auth::TokenManager,
    types::{SavedTracksResponse, Track},
};

const PAGE_LIMIT: u64 = 50;

/// Fully materializes the account's saved ("liked") tracks.
///
/// Pages through `GET /me/tracks` with offset/limit pagination until the
/// reported total is reached. The token is refreshed once up front; each
/// page request is individually retried per `policy`. Any failure surfaces
/// as a track error wrapping the underlying cause, and no partial list is
/// returned.
pub async fn get_saved_tracks(
    token_mgr: &mut TokenManager,
    policy: &RetryPolicy,
) -> Result<Vec<Track>, SyncError> {
    let token = token_mgr.access_token().await?;
    let api_url = config::spotify_apiurl();
    let client = Client::new();

    paging::fetch_all_offset(policy, PAGE_LIMIT, |offset| {
        let client = client.clone();
        let token = token.clone();
        let api_url = format!(
            "{uri}/me/tracks?limit={limit}&offset={offset}",
            uri = api_url,
            limit = PAGE_LIMIT,
            offset = offset
        );
        async move { saved_tracks_page(&client, &api_url, &token).await }
    })
    .await
    .map_err(|e| SyncError::track("failed to fetch saved tracks", e))
}

async fn saved_tracks_page(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<OffsetPage<Track>, SyncError> {
    let response = client
        .get(api_url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let body = response.json::<SavedTracksResponse>().await?;

    Ok(OffsetPage {
        total: body.total,
        items: body
            .items
            .into_iter()
            .map(|item| Track::from_api(item.track, item.added_at))
            .collect(),
    })
}
