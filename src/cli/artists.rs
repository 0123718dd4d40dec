use crate::{
    config::Config,
    error::SyncError,
    info,
    retry::RetryPolicy,
    spotify::{self, auth::TokenManager},
    success, sync, warning,
};

/// Mirrors the source account's followed artists into the target account.
///
/// Same shape as the track sync: fetch both follow lists to completion,
/// diff by artist id, follow the missing artists and (unless add-only)
/// unfollow the stale ones.
pub async fn sync_artists(config: &Config, add_only: bool) -> Result<(), SyncError> {
    let policy = RetryPolicy::default();
    let mut source = TokenManager::new(config.source.clone());
    let mut target = TokenManager::new(config.target.clone());

    let pb = super::spinner("Fetching followed artists from the source account...");
    let result = spotify::following::get_followed_artists(&mut source, &policy).await;
    pb.finish_and_clear();
    let source_artists = result?;
    info!("Source account follows {} artists", source_artists.len());

    let pb = super::spinner("Fetching followed artists from the target account...");
    let result = spotify::following::get_followed_artists(&mut target, &policy).await;
    pb.finish_and_clear();
    let target_artists = result?;
    info!("Target account follows {} artists", target_artists.len());

    let plan = sync::plan(&source_artists, &target_artists);

    if plan.is_empty() {
        success!("Followed artists already match.");
        return Ok(());
    }

    if plan.to_add.is_empty() {
        info!("No artists to follow");
    } else {
        info!("Following {} artists...", plan.to_add.len());
        let ids: Vec<String> = plan.to_add.iter().map(|a| a.id.clone()).collect();
        spotify::following::follow_artists(&mut target, &ids, &policy).await?;
        success!("Followed {} artists", ids.len());
    }

    if plan.to_remove.is_empty() {
        info!("No artists to unfollow");
    } else if add_only {
        warning!(
            "Skipping unfollow of {} artists (add-only mode)",
            plan.to_remove.len()
        );
    } else {
        info!("Unfollowing {} artists...", plan.to_remove.len());
        let ids: Vec<String> = plan.to_remove.iter().map(|a| a.id.clone()).collect();
        spotify::following::unfollow_artists(&mut target, &ids, &policy).await?;
        success!("Unfollowed {} artists", ids.len());
    }

    success!("Artist sync complete.");
    Ok(())
}
