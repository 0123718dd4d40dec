use crate::{
    config::{AccountKind, Config},
    error::SyncError,
    info,
    retry::RetryPolicy,
    spotify::{self, auth::TokenManager},
    success,
};

/// Creates the private sync playlist on the target account.
///
/// Prints the new playlist id so it can be stored as `TARGET_PLAYLIST_ID`.
/// Only the target credentials are needed; the playlist id itself is what
/// this command produces.
pub async fn create_playlist(name: &str, description: Option<&str>) -> Result<(), SyncError> {
    let credentials = Config::credentials(AccountKind::Target)?;
    let policy = RetryPolicy::default();
    let mut target = TokenManager::new(credentials);

    let description =
        description.unwrap_or("Saved tracks mirrored from the source account by spotsync.");

    let pb = super::spinner("Creating playlist on the target account...");
    let result = spotify::playlist::create(&mut target, name, description, &policy).await;
    pb.finish_and_clear();
    let created = result?;

    success!("Created playlist '{}'", created.name);
    info!("Set TARGET_PLAYLIST_ID to: {}", created.id);
    Ok(())
}
