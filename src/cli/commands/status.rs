//! Library inspection commands.

use crate::config::Config;

/// Show whether an album is in the library and how complete it is.
pub async fn cmd_status(config: &Config, album_mbid: &str) -> anyhow::Result<()> {
    let (albums, _) = super::build_clients(config)?;

    match albums.find_in_library(album_mbid).await {
        Some(album) => {
            println!("✓ \"{}\" is in the library", album.title);
            println!(
                "  monitored: {}  tracks: {}/{}  complete: {:.0}%",
                album.monitored,
                album.status.track_file_count,
                album.status.track_count,
                album.status.percent_complete
            );
            if album.status.fully_available {
                println!("  fully acquired");
            }
        }
        None => match albums.lookup_by_mbid(album_mbid).await? {
            Some(album) => {
                println!(
                    "✗ \"{}\" exists in the catalog but is not in the library",
                    album.title
                );
                println!("  request it with: music-courier add {album_mbid}");
            }
            None => println!("✗ album {album_mbid} is not known to the catalog"),
        },
    }
    Ok(())
}

/// Show an artist's discography with completeness and artwork state.
pub async fn cmd_discography(config: &Config, artist_mbid: &str) -> anyhow::Result<()> {
    let (albums, artists) = super::build_clients(config)?;

    let artist = artists
        .find_by_mbid(artist_mbid)
        .await?
        .ok_or_else(|| crate::error::Error::not_found(format!("artist {artist_mbid} in the library")))?;
    let artist_id = artist
        .id
        .ok_or_else(|| crate::error::Error::not_found(format!("library id for {artist_mbid}")))?;

    let root = artists.get_root_folder(artist_id).await;
    println!(
        "{}  [{}]  {}",
        artist.name,
        artist.foreign_artist_id,
        root.as_deref().unwrap_or("-")
    );

    let discography = albums.get_all_with_cover_art(artist_id).await?;
    let mut entries: Vec<_> = discography.values().collect();
    entries.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));

    for album in entries {
        let marker = if album.status.fully_available {
            "✓"
        } else if album.monitored {
            "●"
        } else {
            "○"
        };
        let art = if album.cover_url.is_some() { "" } else { "  (no artwork)" };
        println!(
            "  {marker} {}  {:.0}%{art}",
            album.title, album.status.percent_complete
        );
    }
    println!("{} albums", discography.len());
    Ok(())
}

/// List every artist the library knows.
pub async fn cmd_artists(config: &Config) -> anyhow::Result<()> {
    let (_, artists) = super::build_clients(config)?;

    let mut list = artists.get_all().await?;
    list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if list.is_empty() {
        println!("Library has no artists yet");
        return Ok(());
    }
    for artist in &list {
        let marker = if artist.monitored { "●" } else { "○" };
        println!(
            "{marker} {}  [{}]  {}",
            artist.name,
            artist.foreign_artist_id,
            artist.root_folder.as_deref().unwrap_or("-")
        );
    }
    println!("{} artists", list.len());
    Ok(())
}
