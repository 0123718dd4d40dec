//! # Spotify Integration Module
//!
//! This module is the integration layer between the sync pipeline and the
//! Spotify Web API: authentication, collection fetches and mutation calls.
//! It abstracts the HTTP plumbing behind functions that either return a
//! fully materialized collection or apply a complete mutation set, so the
//! CLI layer only deals with domain values and classified errors.
//!
//! ## Core Modules
//!
//! - [`auth`] - Token lifecycle per account: lazy refresh through the OAuth
//!   refresh-token grant, plus the one-time authorization-code exchange used
//!   by `spotsync auth`.
//! - [`tracks`] - Saved-tracks retrieval with offset/limit pagination.
//! - [`playlist`] - Playlist track retrieval, chunked add/remove mutations
//!   and playlist creation.
//! - [`following`] - Followed-artists retrieval with cursor pagination and
//!   chunked follow/unfollow mutations.
//!
//! ## Error Handling
//!
//! Raw transport failures are classified as API errors with their HTTP
//! status (or 500 when none is available). Each service re-wraps failures
//! of its own operations into the matching resource kind - track, playlist
//! or follow - keeping the original cause attached. Retrying happens below
//! this layer, per page request and per mutation chunk, driven by the
//! policy the caller passes in.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - saved tracks with offset pagination
//! - `GET /playlists/{id}/tracks` - playlist tracks with offset pagination
//! - `POST /playlists/{id}/tracks` - add up to 100 track uris
//! - `DELETE /playlists/{id}/tracks` - remove up to 100 track uris
//! - `GET /me/following?type=artist` - followed artists with cursor pagination
//! - `PUT /me/following?type=artist` - follow artists
//! - `DELETE /me/following?type=artist` - unfollow artists
//! - `GET /me` - user profile for playlist creation
//! - `POST /users/{user_id}/playlists` - create the sync playlist
//! - `POST /api/token` - token refresh and code exchange
//!
//! ## Thread Safety
//!
//! The module is designed for async single-threaded use: one logical thread
//! of control per sync run, all waits cooperative, no global mutable state.

pub mod auth;
pub mod following;
pub mod playlist;
pub mod tracks;
