use crate::{
    config::Config,
    error::SyncError,
    info,
    retry::RetryPolicy,
    spotify::{self, auth::TokenManager},
    success,
    sync::{self, TrackFilter},
    warning,
};

/// Mirrors the source account's saved tracks into the target playlist.
///
/// Fetches both collections to completion, computes the symmetric
/// difference and applies additions first, then removals (unless running
/// add-only). A failing chunk aborts the command; chunks already applied
/// stay applied and the next run picks up the rest.
pub async fn sync_tracks(
    config: &Config,
    add_only: bool,
    filter: &TrackFilter,
) -> Result<(), SyncError> {
    let policy = RetryPolicy::default();
    let mut source = TokenManager::new(config.source.clone());
    let mut target = TokenManager::new(config.target.clone());

    let pb = super::spinner("Fetching saved tracks from the source account...");
    let result = spotify::tracks::get_saved_tracks(&mut source, &policy).await;
    pb.finish_and_clear();
    let mut saved = result?;
    info!("Found {} saved tracks", saved.len());

    if !filter.is_empty() {
        saved = sync::filter_tracks(saved, filter);
        info!("{} saved tracks match the filter", saved.len());
    }

    let pb = super::spinner("Fetching playlist tracks from the target account...");
    let result = spotify::playlist::get_tracks(&mut target, &config.target_playlist_id, &policy).await;
    pb.finish_and_clear();
    let playlist_tracks = result?;
    info!("Found {} playlist tracks", playlist_tracks.len());

    let plan = sync::plan(&saved, &playlist_tracks);

    if plan.is_empty() {
        success!("Playlist already matches the saved tracks.");
        return Ok(());
    }

    if plan.to_add.is_empty() {
        info!("No tracks to add");
    } else {
        info!("Adding {} tracks to the playlist...", plan.to_add.len());
        let uris: Vec<String> = plan.to_add.iter().map(|t| t.uri.clone()).collect();
        spotify::playlist::add_tracks(&mut target, &config.target_playlist_id, &uris, &policy)
            .await?;
        success!("Added {} tracks to the playlist", uris.len());
    }

    if plan.to_remove.is_empty() {
        info!("No tracks to remove");
    } else if add_only {
        warning!(
            "Skipping removal of {} tracks (add-only mode)",
            plan.to_remove.len()
        );
    } else {
        info!("Removing {} tracks from the playlist...", plan.to_remove.len());
        let uris: Vec<String> = plan.to_remove.iter().map(|t| t.uri.clone()).collect();
        spotify::playlist::remove_tracks(&mut target, &config.target_playlist_id, &uris, &policy)
            .await?;
        success!("Removed {} tracks from the playlist", uris.len());
    }

    success!("Track sync complete.");
    Ok(())
}
