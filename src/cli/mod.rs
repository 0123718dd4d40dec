//! # CLI Module
//!
//! User-facing command implementations. Each command coordinates the
//! configuration layer, the Spotify services and the sync planner, and
//! presents progress and results on the terminal.
//!
//! ## Commands
//!
//! - [`auth`] - One-time OAuth flow that obtains a refresh token for the
//!   source or target account via a local callback server.
//! - [`sync_tracks`] - Mirrors the source account's saved tracks into the
//!   target playlist: fetch both collections, diff, add missing tracks and
//!   (unless add-only) remove stale ones.
//! - [`sync_artists`] - Mirrors the source account's followed artists into
//!   the target account the same way.
//! - [`diff`] - Shows the planned additions and removals as tables without
//!   mutating anything.
//! - [`create_playlist`] - Creates the private target playlist and prints
//!   the id to configure.
//!
//! ## Flow
//!
//! Every sync command follows the same strictly ordered sequence: refresh
//! tokens, fetch the source collection, fetch the target collection, plan
//! the set difference, apply additions, apply removals. There are no
//! retries at this level; transient failures are handled per page request
//! and per mutation chunk further down, and a classified error aborts the
//! command with the remainder of the plan unapplied.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod artists;
mod auth;
mod diff;
mod playlist;
mod tracks;

pub use artists::sync_artists;
pub use auth::auth;
pub use diff::diff;
pub use playlist::create_playlist;
pub use tracks::sync_tracks;

/// Spinner shown while a collection fetch is in flight.
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
