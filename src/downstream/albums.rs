//! Album operations against the downstream library service.
//!
//! Failure semantics follow one rule, documented per method: status reads
//! degrade (a broken status query must never be the reason an orchestration
//! run aborts), writes propagate (a failed write must never be mistaken for
//! success).

use std::collections::HashMap;

use super::adapter;
use super::domain::Album;
use super::dto;
use super::transport::{DownstreamError, Transport};

/// Scheme prefix the lookup endpoint understands for external ids.
const LOOKUP_SCHEME: &str = "lidarr";

/// Client for the album endpoints.
#[derive(Debug, Clone)]
pub struct AlbumClient {
    transport: Transport,
}

impl AlbumClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Look up an album in the catalog by its external id.
    ///
    /// When the top match is already in the library, the full record is
    /// fetched so statistics are current. Detail-fetch failures degrade to
    /// the partial lookup result with `fully_available` forced off, rather
    /// than propagating - best-effort enrichment. Returns `None` when the
    /// catalog has no match at all.
    pub async fn lookup_by_mbid(&self, mbid: &str) -> Result<Option<Album>, DownstreamError> {
        let term = format!("{LOOKUP_SCHEME}:{mbid}");
        let candidates: Vec<dto::AlbumResource> = self
            .transport
            .get("album/lookup", &[("term", term)])
            .await?;

        let Some(top) = candidates.into_iter().next() else {
            return Ok(None);
        };
        let mut album = adapter::album_from_resource(top);

        if let Some(id) = album.id {
            let detail = self.get_by_id(id).await;
            apply_detail(&mut album, detail);
        }
        Ok(Some(album))
    }

    /// Fetch one album by its library id. 404 means `None`; every other
    /// failure propagates.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Album>, DownstreamError> {
        match self
            .transport
            .get::<dto::AlbumResource>(&format!("album/{id}"), &[])
            .await
        {
            Ok(resource) => Ok(Some(adapter::album_from_resource(resource))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find an album in the library's own listing by external id.
    ///
    /// Pure status query: any failure degrades to `None`.
    pub async fn find_in_library(&self, mbid: &str) -> Option<Album> {
        match self
            .transport
            .get::<Vec<dto::AlbumResource>>("album", &[("foreignAlbumId", mbid.to_string())])
            .await
        {
            Ok(list) => list.into_iter().next().map(adapter::album_from_resource),
            Err(e) => {
                tracing::warn!(error = %e, mbid, "library album query failed");
                None
            }
        }
    }

    /// Persist a monitoring-flag change via a full-object update.
    ///
    /// The caller is responsible for not invoking this when the flag is
    /// already at the desired state. Write failures propagate.
    pub async fn update_monitoring(
        &self,
        album: &mut Album,
        monitored: bool,
    ) -> Result<(), DownstreamError> {
        let Some(id) = album.id else {
            return Err(DownstreamError::InvalidRequest(format!(
                "album \"{}\" is not in the library, cannot update monitoring",
                album.title
            )));
        };

        album.monitored = monitored;
        album.resource.monitored = monitored;

        let updated: dto::AlbumResource = self
            .transport
            .put(&format!("album/{id}"), &album.resource)
            .await?;
        *album = adapter::album_from_resource(updated);
        Ok(())
    }

    /// Queue an acquisition search for the given albums.
    ///
    /// Returns whether the command was accepted; failures are logged here
    /// and never abort the broader workflow.
    pub async fn trigger_search(&self, album_ids: &[i64]) -> bool {
        let body = dto::CommandBody::album_search(album_ids);
        match self
            .transport
            .post::<dto::CommandResource, _>("command", &body)
            .await
        {
            Ok(command) => {
                tracing::info!(?album_ids, command_id = ?command.id, "album search queued");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, ?album_ids, "failed to queue album search");
                false
            }
        }
    }

    /// List an artist's current discography.
    pub async fn get_by_artist_id(&self, artist_id: i64) -> Result<Vec<Album>, DownstreamError> {
        let list: Vec<dto::AlbumResource> = self
            .transport
            .get("album", &[("artistId", artist_id.to_string())])
            .await?;
        Ok(list.into_iter().map(adapter::album_from_resource).collect())
    }

    /// Locate one album in an artist's discography by external id.
    pub async fn find_in_discography(
        &self,
        artist_id: i64,
        external_id: &str,
    ) -> Result<Option<Album>, DownstreamError> {
        let albums = self.get_by_artist_id(artist_id).await?;
        Ok(albums
            .into_iter()
            .find(|album| album.matches_external_id(external_id)))
    }

    /// Bulk-load an artist's discography keyed by external id, artwork
    /// resolved. Entries without an external id are skipped.
    pub async fn get_all_with_cover_art(
        &self,
        artist_id: i64,
    ) -> Result<HashMap<String, Album>, DownstreamError> {
        let albums = self.get_by_artist_id(artist_id).await?;
        Ok(albums
            .into_iter()
            .filter(|album| !album.foreign_album_id.is_empty())
            .map(|album| (album.foreign_album_id.clone(), album))
            .collect())
    }
}

/// Merge a detail-fetch result into a partial lookup record.
///
/// A successful fetch replaces the record wholesale. Any failure leaves the
/// partial record in place with `fully_available` forced off: enrichment is
/// best-effort, never the reason a lookup fails.
fn apply_detail(album: &mut Album, detail: Result<Option<Album>, DownstreamError>) {
    match detail {
        Ok(Some(full)) => *album = full,
        Ok(None) => {
            // Library forgot the album between lookup and detail
            album.status.fully_available = false;
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                album_id = ?album.id,
                "detail fetch failed, returning partial lookup result"
            );
            album.status.fully_available = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(percent: f64) -> Album {
        adapter::album_from_resource(dto::AlbumResource {
            id: Some(10),
            title: "Lateralus".to_string(),
            foreign_album_id: "rg-1".to_string(),
            statistics: Some(dto::StatisticsResource {
                track_count: 10,
                track_file_count: 10,
                percent_of_tracks: percent,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_apply_detail_replaces_on_success() {
        let mut album = partial(0.0);
        apply_detail(&mut album, Ok(Some(partial(100.0))));
        assert!(album.status.fully_available);
        assert_eq!(album.status.percent_complete, 100.0);
    }

    #[test]
    fn test_apply_detail_degrades_on_error() {
        let mut album = partial(100.0);
        assert!(album.status.fully_available);

        apply_detail(
            &mut album,
            Err(DownstreamError::Network("connection reset".to_string())),
        );

        // Partial record survives, but is never reported as fully acquired
        assert_eq!(album.title, "Lateralus");
        assert_eq!(album.id, Some(10));
        assert!(!album.status.fully_available);
    }

    #[test]
    fn test_apply_detail_degrades_when_record_vanishes() {
        let mut album = partial(100.0);
        apply_detail(&mut album, Ok(None));
        assert!(!album.status.fully_available);
    }

    #[test]
    fn test_lookup_term_scheme() {
        // The lookup endpoint only resolves external ids behind this scheme.
        assert_eq!(format!("{LOOKUP_SCHEME}:rg-1"), "lidarr:rg-1");
    }

    #[tokio::test]
    async fn test_update_monitoring_rejects_album_without_id() {
        let transport = Transport::new("http://lidarr.local", "key").unwrap();
        let client = AlbumClient::new(transport);
        let mut album = adapter::album_from_resource(dto::AlbumResource {
            title: "Lateralus".to_string(),
            foreign_album_id: "rg-1".to_string(),
            ..Default::default()
        });

        let err = client.update_monitoring(&mut album, true).await.unwrap_err();
        assert!(matches!(err, DownstreamError::InvalidRequest(_)));
        assert!(err.to_string().contains("Lateralus"));
    }
}
