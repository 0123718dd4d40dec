use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::config::AccountKind;

/// An access token plus the metadata needed to know when to refresh it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Token endpoint response body. `refresh_token` is absent on refresh-grant
/// responses unless Spotify decides to rotate it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
}

/// In-flight state of one `spotsync auth` run, shared between the CLI and
/// the callback handler.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    pub account: AccountKind,
    pub client_id: String,
    pub client_secret: String,
    /// CSRF guard echoed back by the authorization server.
    pub state: String,
    pub token: Option<Token>,
}

/// A track as the sync pipeline sees it, flattened from the wire types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Stable id; absent for local files, in which case the uri identifies
    /// the track.
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub added_at: Option<String>,
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub action: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub action: String,
    pub name: String,
    pub genres: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrackItem {
    pub added_at: Option<String>,
    pub track: TrackObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
    pub total: u64,
}

/// Playlist entries can reference deleted or unavailable tracks, in which
/// case `track` is null and the entry is skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub added_at: Option<String>,
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

impl Track {
    /// Flattens one wire track plus the save timestamp of its containing
    /// entry into the sync representation.
    pub fn from_api(track: TrackObject, added_at: Option<String>) -> Self {
        Track {
            id: track.id,
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            added_at,
            popularity: track.popularity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<Artist>,
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksFromPlaylistRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowArtistsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}
