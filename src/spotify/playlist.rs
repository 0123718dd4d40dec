use reqwest::Client;

use crate::{
    batch, config,
    error::SyncError,
    paging::{self, OffsetPage},
    retry::{RetryPolicy, with_retry},
    types::{
        AddTracksToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse, PlaylistItem,
        PlaylistTracksResponse, RemoveTracksFromPlaylistRequest, SnapshotResponse, Track, TrackUri,
        UserProfileResponse,
    },
};

use super::auth::TokenManager;

const PAGE_LIMIT: u64 = 50;

/// Fully materializes the tracks of one playlist.
///
/// Offset/limit pagination over `GET /playlists/{id}/tracks`; entries whose
/// track object is null (removed or unavailable tracks) are skipped. Same
/// retry and abort semantics as the saved-tracks fetch, wrapped as a
/// playlist error.
pub async fn get_tracks(
    token_mgr: &mut TokenManager,
    playlist_id: &str,
    policy: &RetryPolicy,
) -> Result<Vec<Track>, SyncError> {
    let token = token_mgr.access_token().await?;
    let api_url = config::spotify_apiurl();
    let client = Client::new();

    paging::fetch_all_offset(policy, PAGE_LIMIT, |offset| {
        let client = client.clone();
        let token = token.clone();
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?limit={limit}&offset={offset}",
            uri = api_url,
            id = playlist_id,
            limit = PAGE_LIMIT,
            offset = offset
        );
        async move { playlist_tracks_page(&client, &api_url, &token).await }
    })
    .await
    .map_err(|e| SyncError::playlist("failed to fetch playlist tracks", e))
}

async fn playlist_tracks_page(
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

    let body = response.json::<PlaylistTracksResponse>().await?;

    Ok(OffsetPage {
        total: body.total,
        items: body
            .items
            .into_iter()
            .filter_map(|item| match item {
                PlaylistItem {
                    track: Some(track),
                    added_at,
                } => Some(Track::from_api(track, added_at)),
                PlaylistItem { track: None, .. } => None,
            })
            .collect(),
    })
}

/// Adds tracks to a playlist in chunks of at most 100 uris.
///
/// Empty input is a no-op. A chunk that ultimately fails aborts the call;
/// chunks already applied stay applied and the next sync run picks up the
/// remainder.
pub async fn add_tracks(
    token_mgr: &mut TokenManager,
    playlist_id: &str,
    uris: &[String],
    policy: &RetryPolicy,
) -> Result<(), SyncError> {
    let token = token_mgr.access_token().await?;
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::spotify_apiurl(),
        id = playlist_id
    );
    let client = Client::new();

    batch::apply_in_chunks(policy, uris, |chunk| {
        let client = client.clone();
        let token = token.clone();
        let api_url = api_url.clone();
        async move {
            let body = AddTracksToPlaylistRequest { uris: chunk };
            let response = client
                .post(&api_url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            response.json::<SnapshotResponse>().await?;
            Ok(())
        }
    })
    .await
    .map_err(|e| SyncError::playlist("failed to add tracks to playlist", e))?;

    Ok(())
}

/// Removes tracks from a playlist in chunks of at most 100 uris.
///
/// Removing a uri that is no longer present is accepted by the API, so a
/// rerun after a partial failure is safe.
pub async fn remove_tracks(
    token_mgr: &mut TokenManager,
    playlist_id: &str,
    uris: &[String],
    policy: &RetryPolicy,
) -> Result<(), SyncError> {
    let token = token_mgr.access_token().await?;
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::spotify_apiurl(),
        id = playlist_id
    );
    let client = Client::new();

    batch::apply_in_chunks(policy, uris, |chunk| {
        let client = client.clone();
        let token = token.clone();
        let api_url = api_url.clone();
        async move {
            let body = RemoveTracksFromPlaylistRequest {
                tracks: chunk.into_iter().map(|uri| TrackUri { uri }).collect(),
            };
            let response = client
                .delete(&api_url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            response.json::<SnapshotResponse>().await?;
            Ok(())
        }
    })
    .await
    .map_err(|e| SyncError::playlist("failed to remove tracks from playlist", e))?;

    Ok(())
}

/// Creates a private playlist on the account and returns it.
///
/// Resolves the account's user id first, then posts the playlist. Both
/// calls are retried per `policy`.
pub async fn create(
    token_mgr: &mut TokenManager,
    name: &str,
    description: &str,
    policy: &RetryPolicy,
) -> Result<CreatePlaylistResponse, SyncError> {
    let token = token_mgr.access_token().await?;
    let base_url = config::spotify_apiurl();
    let client = Client::new();

    let profile = with_retry(policy, || {
        let client = client.clone();
        let token = token.clone();
        let api_url = format!("{}/me", base_url);
        async move {
            let response = client
                .get(&api_url)
                .bearer_auth(&token)
                .send()
                .await?
                .error_for_status()?;
            Ok(response.json::<UserProfileResponse>().await?)
        }
    })
    .await
    .map_err(|e| SyncError::playlist("failed to resolve user profile", e))?;

    let created = with_retry(policy, || {
        let client = client.clone();
        let token = token.clone();
        let api_url = format!("{}/users/{}/playlists", base_url, profile.id);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };
        async move {
            let response = client
                .post(&api_url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            Ok(response.json::<CreatePlaylistResponse>().await?)
        }
    })
    .await
    .map_err(|e| SyncError::playlist("failed to create playlist", e))?;

    Ok(created)
}
