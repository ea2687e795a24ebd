//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `add`: request an album and drive the orchestration run
//! - `status`: inspect album presence / completeness, discographies and artists
//! - `setup`: write connection settings to the config file

mod add;
mod setup;
mod status;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::downstream::{AlbumClient, ArtistClient, Transport};

pub use add::cmd_add;
pub use setup::cmd_setup;
pub use status::{cmd_artists, cmd_discography, cmd_status};

/// Music Courier CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Downstream service base URL (overrides config)
    #[arg(long, global = true, env = "MUSIC_COURIER_URL")]
    pub url: Option<String>,

    /// Downstream service API key (overrides config)
    #[arg(long, global = true, env = "MUSIC_COURIER_API_KEY")]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Request that an album be acquired by the library
    Add {
        /// External (MusicBrainz release-group) id of the album
        album_mbid: String,
        /// Artist name fallback when the catalog result names no artist
        #[arg(long)]
        artist: Option<String>,
        /// Root folder override for a newly created artist
        #[arg(long)]
        root_folder: Option<String>,
    },
    /// Show an album's presence and completeness in the library
    Status {
        /// External (MusicBrainz release-group) id of the album
        album_mbid: String,
    },
    /// Show an artist's discography as the library sees it
    Discography {
        /// External (MusicBrainz) id of the artist
        artist_mbid: String,
    },
    /// List artists known to the library
    Artists,
    /// Write connection settings to the config file
    Setup {
        /// Base URL of the library service
        #[arg(long)]
        set_url: Option<String>,
        /// API key of the library service
        #[arg(long)]
        set_api_key: Option<String>,
        /// Default root folder for new artists
        #[arg(long)]
        set_root_folder: Option<String>,
    },
}

/// Load config, apply CLI overrides and dispatch the chosen command.
pub async fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let mut config = crate::config::load();
    if let Some(url) = &cli.url {
        config.server.base_url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.server.api_key = key.clone();
    }

    match &cli.command {
        Commands::Add {
            album_mbid,
            artist,
            root_folder,
        } => cmd_add(&config, album_mbid, artist.as_deref(), root_folder.as_deref()).await,
        Commands::Status { album_mbid } => cmd_status(&config, album_mbid).await,
        Commands::Discography { artist_mbid } => cmd_discography(&config, artist_mbid).await,
        Commands::Artists => cmd_artists(&config).await,
        Commands::Setup {
            set_url,
            set_api_key,
            set_root_folder,
        } => {
            cmd_setup(
                &config,
                set_url.as_deref(),
                set_api_key.as_deref(),
                set_root_folder.as_deref(),
            )
            .await
        }
    }
}

/// Build the downstream clients from config. Fails fast on unusable
/// settings, before any network call.
fn build_clients(config: &Config) -> crate::error::Result<(AlbumClient, ArtistClient)> {
    let transport = Transport::new(&config.server.base_url, &config.server.api_key)?;
    let albums = AlbumClient::new(transport.clone());
    let artists = ArtistClient::new(transport, config.add_defaults(), config.polling_policy());
    Ok((albums, artists))
}
