//! The `add` command: request an album and run the orchestration.

use crate::audit::TracingAuditSink;
use crate::config::Config;
use crate::downstream::AdditionRequest;
use crate::error::Error;
use crate::sync::Orchestrator;

/// Look the album up in the catalog, pick the entry path based on whether
/// the artist already exists, and run the orchestrator to a terminal state.
pub async fn cmd_add(
    config: &Config,
    album_mbid: &str,
    artist_name: Option<&str>,
    root_folder: Option<&str>,
) -> anyhow::Result<()> {
    let (albums, artists) = super::build_clients(config)?;

    println!("Looking up album {album_mbid}...");
    let album = albums
        .lookup_by_mbid(album_mbid)
        .await?
        .ok_or_else(|| Error::not_found(format!("album {album_mbid} in the catalog")))?;

    let lookup_artist = album.artist_info();
    let name = match (&lookup_artist, artist_name) {
        (Some(info), _) => info.name.clone(),
        (None, Some(name)) => name.to_string(),
        (None, None) => anyhow::bail!(
            "catalog result for \"{}\" names no artist; pass --artist",
            album.title
        ),
    };

    let request = AdditionRequest {
        foreign_album_id: album.foreign_album_id.clone(),
        title: album.title.clone(),
        artist_name: name.clone(),
        root_folder: root_folder.map(str::to_string),
    };

    // Prefer the stable external id; fall back to a name match when the
    // catalog result carries none.
    let existing = match &lookup_artist {
        Some(info) => artists.find_by_mbid(&info.foreign_artist_id).await?,
        None => None,
    };
    let existing = match existing {
        Some(artist) => Some(artist),
        None => artists.find_by_name(&name).await?,
    };

    let orchestrator = Orchestrator::new(albums, artists, TracingAuditSink);
    let report = match existing {
        Some(artist) => {
            println!("Artist \"{}\" already in library", artist.name);
            orchestrator
                .handle_existing_artist(&artist, &request.foreign_album_id, &request)
                .await?
        }
        None => {
            let info = lookup_artist.ok_or_else(|| {
                anyhow::anyhow!(
                    "artist \"{name}\" is not in the library and the catalog result \
                     carries no artist id to create them from"
                )
            })?;
            println!("Creating artist \"{}\"...", info.name);
            orchestrator
                .handle_new_artist(&info, &request.foreign_album_id, &request)
                .await?
        }
    };

    if report.success {
        println!("✓ {}", report.message);
        println!(
            "  monitored: {}  search triggered: {}  complete: {:.0}%",
            report.monitored, report.search_triggered, report.percent_complete
        );
        Ok(())
    } else {
        println!("✗ {}", report.message);
        std::process::exit(1);
    }
}
