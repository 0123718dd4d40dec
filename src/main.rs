use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotsync::{
    cli, config,
    config::{AccountKind, Config},
    error,
    error::SyncError,
    sync::{self, TrackFilter},
    types::AuthFlow,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Obtain a refresh token for one of the two accounts
    Auth(AuthOptions),

    /// Reconcile the target account with the source account
    Sync(SyncOptions),

    /// Show what a sync would change without mutating anything
    Diff(DiffOptions),

    #[clap(about = "Create the sync playlist on the target account")]
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Which account to authorize
    #[clap(long, value_enum)]
    pub account: AccountKind,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Reconcile the target account with the source account",
    args_conflicts_with_subcommands = true // disallow mixing --add-only with subcommands
)]
pub struct SyncOptions {
    /// Only add missing items, never remove stale ones
    #[clap(long)]
    pub add_only: bool,

    /// Subcommands under `sync` (e.g., `tracks`, `artists`)
    #[command(subcommand)]
    pub command: Option<SyncSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SyncSubcommand {
    /// Sync saved tracks into the target playlist
    Tracks(SyncTracksOpts),

    /// Sync followed artists
    Artists(SyncArtistsOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncTracksOpts {
    /// Only add missing tracks, never remove stale ones
    #[clap(long)]
    pub add_only: bool,

    #[command(flatten)]
    pub filter: FilterOpts,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncArtistsOpts {
    /// Only follow missing artists, never unfollow stale ones
    #[clap(long)]
    pub add_only: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DiffOptions {
    /// Show the track diff
    #[clap(long)]
    tracks: bool,

    /// Show the artist diff
    #[clap(long)]
    artists: bool,

    #[command(flatten)]
    filter: FilterOpts,
}

/// Narrows which saved tracks take part in the sync.
#[derive(Parser, Debug, Clone)]
pub struct FilterOpts {
    /// Only consider tracks by these artists; can be repeated
    #[clap(long = "artist", action = ArgAction::Append, num_args = 1)]
    pub artists: Vec<String>,

    /// Only consider tracks with at least this popularity (0-100)
    #[clap(long)]
    pub min_popularity: Option<u32>,

    /// Only consider tracks with at most this popularity (0-100)
    #[clap(long)]
    pub max_popularity: Option<u32>,

    /// Only consider tracks saved on or after this date (YYYY-MM-DD)
    #[clap(long)]
    pub added_after: Option<String>,

    /// Only consider tracks saved on or before this date (YYYY-MM-DD)
    #[clap(long)]
    pub added_before: Option<String>,
}

impl FilterOpts {
    fn parse(&self) -> Result<TrackFilter, SyncError> {
        Ok(TrackFilter {
            artists: self.artists.clone(),
            min_popularity: self.min_popularity,
            max_popularity: self.max_popularity,
            added_after: self
                .added_after
                .as_deref()
                .map(sync::parse_filter_date)
                .transpose()?,
            added_before: self
                .added_before
                .as_deref()
                .map(sync::parse_filter_date)
                .transpose()?,
        })
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Name of the playlist to create
    name: String,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn run_sync(opt: SyncOptions) -> Result<(), SyncError> {
    let config = Config::from_env()?;

    match opt.command {
        Some(SyncSubcommand::Tracks(t)) => {
            let filter = t.filter.parse()?;
            cli::sync_tracks(&config, t.add_only, &filter).await
        }
        Some(SyncSubcommand::Artists(a)) => cli::sync_artists(&config, a.add_only).await,
        None => {
            cli::sync_tracks(&config, opt.add_only, &TrackFilter::default()).await?;
            cli::sync_artists(&config, opt.add_only).await
        }
    }
}

async fn run_diff(opt: DiffOptions) -> Result<(), SyncError> {
    let config = Config::from_env()?;
    let filter = opt.filter.parse()?;
    cli::diff(&config, opt.tracks, opt.artists, &filter).await
}

#[tokio::main]
async fn main() {
    config::load_env().await;

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Auth(opt) => {
            let oauth_result: Arc<Mutex<Option<AuthFlow>>> = Arc::new(Mutex::new(None));
            cli::auth(opt.account, Arc::clone(&oauth_result)).await;
            Ok(())
        }

        Command::Sync(opt) => run_sync(opt).await,

        Command::Diff(opt) => run_diff(opt).await,

        Command::Playlist(opt) => cli::create_playlist(&opt.name, opt.description.as_deref()).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error::exit_with(&e);
    }
}
