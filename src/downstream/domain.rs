//! Internal domain models for the downstream library service.
//!
//! These types are OUR types - they don't change when the Lidarr API changes.
//! Wire responses (`dto.rs`) get converted into these via `adapter.rs`.

use std::time::Duration;

use serde::Serialize;

use super::dto;

/// An artist as known to the downstream library service.
#[derive(Debug, Clone)]
pub struct Artist {
    /// Library-assigned id. `None` until the artist has been created.
    pub id: Option<i64>,
    /// Stable catalog id (MusicBrainz artist id). Join key to the upstream catalog.
    pub foreign_artist_id: String,
    /// Display name
    pub name: String,
    /// Storage location assigned by the library
    pub root_folder: Option<String>,
    /// Whether the library tracks this artist for acquisition
    pub monitored: bool,
}

/// An album, either a catalog lookup result or a library record.
///
/// An album is "in the library" only once it carries an `id`; before that it
/// exists purely as a request.
#[derive(Debug, Clone)]
pub struct Album {
    /// Library-assigned id. `None` until the library knows the album.
    pub id: Option<i64>,
    /// Stable catalog id (MusicBrainz release-group id)
    pub foreign_album_id: String,
    /// Album title
    pub title: String,
    /// Library id of the owning artist
    pub artist_id: Option<i64>,
    /// Release date as reported by the catalog
    pub release_date: Option<String>,
    /// Whether the library tracks this album for acquisition
    pub monitored: bool,
    /// Computed availability status
    pub status: AlbumStatus,
    /// Resolved artwork URL, if any
    pub cover_url: Option<String>,
    /// The raw wire record. Kept so full-object updates round-trip fields
    /// this crate does not model.
    pub(crate) resource: dto::AlbumResource,
}

impl Album {
    /// Check whether this album carries the given external id.
    ///
    /// Catalog variants report the release-group id under two different
    /// field names, so both are checked.
    pub fn matches_external_id(&self, external_id: &str) -> bool {
        self.foreign_album_id == external_id
            || self.resource.release_group_id.as_deref() == Some(external_id)
    }

    /// The owning artist as embedded in a catalog lookup result, shaped as
    /// creation input. `None` for library records, which don't embed it.
    pub fn artist_info(&self) -> Option<NewArtist> {
        self.resource.artist.as_deref().map(|a| NewArtist {
            foreign_artist_id: a.foreign_artist_id.clone(),
            name: a.artist_name.clone(),
        })
    }
}

/// Computed availability of an album within the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AlbumStatus {
    /// The library has a record for this album
    pub in_library: bool,
    /// Every track has been acquired (`percent_complete == 100`)
    pub fully_available: bool,
    /// Acquired tracks as a percentage, 0..=100
    pub percent_complete: f64,
    /// Total tracks the catalog knows about
    pub track_count: u32,
    /// Tracks the library has on disk
    pub track_file_count: u32,
}

/// The minimum an artist-creation call needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
    pub foreign_artist_id: String,
    pub name: String,
}

/// The immutable input driving one orchestration run.
///
/// Echoed verbatim into every audit record so an outcome can always be
/// traced back to the request that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct AdditionRequest {
    /// External id of the album the user asked for
    pub foreign_album_id: String,
    /// Album title, for humans reading the audit trail
    pub title: String,
    /// Artist name, for humans reading the audit trail
    pub artist_name: String,
    /// Per-request root folder override; library default applies when `None`
    pub root_folder: Option<String>,
}

/// How long and how often the convergence wait polls the discography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingPolicy {
    /// Sleep between attempts
    pub interval: Duration,
    /// Give up after this many discography fetches
    pub max_attempts: u32,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polling_policy() {
        let policy = PollingPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 30);
    }

    #[test]
    fn test_matches_external_id_on_either_field() {
        let resource = dto::AlbumResource {
            foreign_album_id: "rg-primary".to_string(),
            release_group_id: Some("rg-alternate".to_string()),
            ..Default::default()
        };
        let album = super::super::adapter::album_from_resource(resource);

        assert!(album.matches_external_id("rg-primary"));
        assert!(album.matches_external_id("rg-alternate"));
        assert!(!album.matches_external_id("rg-other"));
    }

    #[test]
    fn test_addition_request_serializes_for_audit() {
        let request = AdditionRequest {
            foreign_album_id: "rg-1".to_string(),
            title: "OK Computer".to_string(),
            artist_name: "Radiohead".to_string(),
            root_folder: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["foreign_album_id"], "rg-1");
        assert_eq!(value["title"], "OK Computer");
    }
}
