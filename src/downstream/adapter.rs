//! Convert Lidarr wire records into domain models.
//!
//! Also home of the pure status computation: the orchestrator's decisions
//! (monitor? search?) all key off [`AlbumStatus`], never off raw statistics.

use super::domain::{Album, AlbumStatus, Artist};
use super::dto;

/// Tracks fully acquired.
pub const PERCENT_COMPLETE: f64 = 100.0;

/// Compute an album's availability from its raw statistics.
///
/// Lookup results for albums the library does not know carry no statistics
/// at all; everything missing defaults to zero.
///
/// `fully_available` deliberately requires `in_library` on top of a 100%
/// track percentage: catalog lookup records can echo statistics for a
/// record the library does not hold, and those must never read as acquired.
pub fn enrich_status(in_library: bool, stats: Option<&dto::StatisticsResource>) -> AlbumStatus {
    let percent = stats.map(|s| s.percent_of_tracks).unwrap_or(0.0);
    AlbumStatus {
        in_library,
        fully_available: in_library && percent >= PERCENT_COMPLETE,
        percent_complete: percent,
        track_count: stats.map(|s| s.track_count).unwrap_or(0),
        track_file_count: stats.map(|s| s.track_file_count).unwrap_or(0),
    }
}

/// Pick the artwork URL for an album.
///
/// Prefers a "cover"-typed image, falls back to the first one listed, and
/// within an image prefers the remote URL over the service-relative one.
pub fn resolve_cover_url(images: &[dto::ImageResource]) -> Option<String> {
    let image = images
        .iter()
        .find(|i| i.cover_type.eq_ignore_ascii_case("cover"))
        .or_else(|| images.first())?;
    image.remote_url.clone().or_else(|| image.url.clone())
}

/// Build a domain [`Album`] from its wire record.
///
/// Lookup results report `id: 0` for albums the library does not have; that
/// is normalized to `None` so "in library" is a simple id check.
pub fn album_from_resource(resource: dto::AlbumResource) -> Album {
    let id = resource.id.filter(|&id| id > 0);
    let status = enrich_status(id.is_some(), resource.statistics.as_ref());
    let cover_url = resolve_cover_url(&resource.images);
    Album {
        id,
        foreign_album_id: resource.foreign_album_id.clone(),
        title: resource.title.clone(),
        artist_id: resource.artist_id,
        release_date: resource.release_date.clone(),
        monitored: resource.monitored,
        status,
        cover_url,
        resource,
    }
}

/// Build a domain [`Artist`] from its wire record.
pub fn artist_from_resource(resource: dto::ArtistResource) -> Artist {
    Artist {
        id: resource.id.filter(|&id| id > 0),
        foreign_artist_id: resource.foreign_artist_id,
        name: resource.artist_name,
        root_folder: resource.root_folder_path,
        monitored: resource.monitored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(track_count: u32, track_file_count: u32, percent: f64) -> dto::StatisticsResource {
        dto::StatisticsResource {
            track_count,
            track_file_count,
            percent_of_tracks: percent,
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_status_missing_statistics_default_to_zero() {
        let status = enrich_status(true, None);
        assert!(status.in_library);
        assert!(!status.fully_available);
        assert_eq!(status.percent_complete, 0.0);
        assert_eq!(status.track_count, 0);
    }

    #[test]
    fn test_enrich_status_full_album() {
        let status = enrich_status(true, Some(&stats(12, 12, 100.0)));
        assert!(status.fully_available);
        assert_eq!(status.percent_complete, 100.0);
    }

    #[test]
    fn test_enrich_status_outside_library_never_fully_available() {
        let status = enrich_status(false, Some(&stats(12, 12, 100.0)));
        assert!(!status.in_library);
        assert!(!status.fully_available);
        assert_eq!(status.percent_complete, 100.0);
    }

    #[test]
    fn test_enrich_status_partial_album() {
        let status = enrich_status(true, Some(&stats(12, 6, 50.0)));
        assert!(!status.fully_available);
        assert_eq!(status.percent_complete, 50.0);
        assert_eq!(status.track_file_count, 6);
    }

    #[test]
    fn test_cover_preferred_over_other_types() {
        let images = vec![
            dto::ImageResource {
                cover_type: "banner".to_string(),
                remote_url: Some("https://img.example/banner.jpg".to_string()),
                ..Default::default()
            },
            dto::ImageResource {
                cover_type: "Cover".to_string(),
                remote_url: Some("https://img.example/cover.jpg".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(
            resolve_cover_url(&images).as_deref(),
            Some("https://img.example/cover.jpg")
        );
    }

    #[test]
    fn test_cover_falls_back_to_first_image_and_local_url() {
        let images = vec![dto::ImageResource {
            cover_type: "banner".to_string(),
            url: Some("/mediacover/banner.jpg".to_string()),
            ..Default::default()
        }];
        assert_eq!(
            resolve_cover_url(&images).as_deref(),
            Some("/mediacover/banner.jpg")
        );
        assert_eq!(resolve_cover_url(&[]), None);
    }

    #[test]
    fn test_album_lookup_id_zero_means_not_in_library() {
        let resource = dto::AlbumResource {
            id: Some(0),
            foreign_album_id: "rg-1".to_string(),
            statistics: Some(stats(10, 10, 100.0)),
            ..Default::default()
        };
        let album = album_from_resource(resource);
        assert_eq!(album.id, None);
        assert!(!album.status.in_library);
        // 100% statistics on a record the library doesn't own is not "available"
        assert!(!album.status.fully_available);
    }
}
