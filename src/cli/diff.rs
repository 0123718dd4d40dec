use tabled::Table;

use crate::{
    config::Config,
    error::SyncError,
    info,
    retry::RetryPolicy,
    spotify::{self, auth::TokenManager},
    success,
    sync::{self, TrackFilter},
    types::{Artist, ArtistTableRow, Track, TrackTableRow},
};

/// Shows what a sync would change, without mutating anything.
///
/// Fetches the selected collection pairs and prints the planned additions
/// and removals as tables. With neither flag set both pairs are shown.
pub async fn diff(
    config: &Config,
    tracks: bool,
    artists: bool,
    filter: &TrackFilter,
) -> Result<(), SyncError> {
    let both = !tracks && !artists;
    let policy = RetryPolicy::default();
    let mut source = TokenManager::new(config.source.clone());
    let mut target = TokenManager::new(config.target.clone());

    if tracks || both {
        let pb = super::spinner("Fetching saved tracks from the source account...");
        let result = spotify::tracks::get_saved_tracks(&mut source, &policy).await;
        pb.finish_and_clear();
        let saved = sync::filter_tracks(result?, filter);

        let pb = super::spinner("Fetching playlist tracks from the target account...");
        let result =
            spotify::playlist::get_tracks(&mut target, &config.target_playlist_id, &policy).await;
        pb.finish_and_clear();
        let playlist_tracks = result?;

        let plan = sync::plan(&saved, &playlist_tracks);
        if plan.is_empty() {
            success!("Playlist already matches the saved tracks.");
        } else {
            info!(
                "Tracks: {} to add, {} to remove",
                plan.to_add.len(),
                plan.to_remove.len()
            );
            let mut rows: Vec<TrackTableRow> = plan
                .to_add
                .iter()
                .map(|t| track_row("add", t))
                .chain(plan.to_remove.iter().map(|t| track_row("remove", t)))
                .collect();
            rows.sort_by(|a, b| (&a.action, &a.name).cmp(&(&b.action, &b.name)));
            println!("{}", Table::new(rows));
        }
    }

    if artists || both {
        let pb = super::spinner("Fetching followed artists from the source account...");
        let result = spotify::following::get_followed_artists(&mut source, &policy).await;
        pb.finish_and_clear();
        let source_artists = result?;

        let pb = super::spinner("Fetching followed artists from the target account...");
        let result = spotify::following::get_followed_artists(&mut target, &policy).await;
        pb.finish_and_clear();
        let target_artists = result?;

        let plan = sync::plan(&source_artists, &target_artists);
        if plan.is_empty() {
            success!("Followed artists already match.");
        } else {
            info!(
                "Artists: {} to follow, {} to unfollow",
                plan.to_add.len(),
                plan.to_remove.len()
            );
            let mut rows: Vec<ArtistTableRow> = plan
                .to_add
                .iter()
                .map(|a| artist_row("follow", a))
                .chain(plan.to_remove.iter().map(|a| artist_row("unfollow", a)))
                .collect();
            rows.sort_by(|a, b| (&a.action, &a.name).cmp(&(&b.action, &b.name)));
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

fn track_row(action: &str, track: &Track) -> TrackTableRow {
    TrackTableRow {
        action: action.to_string(),
        name: track.name.clone(),
        artists: track.artists.join(", "),
    }
}

fn artist_row(action: &str, artist: &Artist) -> ArtistTableRow {
    ArtistTableRow {
        action: action.to_string(),
        name: artist.name.clone(),
        genres: artist
            .genres
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(","),
    }
}
