//! Trait seams over the downstream service clients.
//!
//! The orchestrator only talks to these traits, so tests can substitute
//! call-recording fakes and drive every terminal branch without a live
//! service. Production code uses the real clients, which implement them by
//! delegation.

use async_trait::async_trait;

use super::albums::AlbumClient;
use super::artists::ArtistClient;
use super::domain::{Album, Artist, NewArtist};
use super::transport::DownstreamError;

/// The album operations the orchestrator needs.
#[async_trait]
pub trait AlbumOps: Send + Sync {
    /// Locate an album in an artist's discography by external id.
    async fn find_in_discography(
        &self,
        artist_id: i64,
        external_id: &str,
    ) -> Result<Option<Album>, DownstreamError>;

    /// Persist a monitoring-flag change. Write failures propagate.
    async fn update_monitoring(
        &self,
        album: &mut Album,
        monitored: bool,
    ) -> Result<(), DownstreamError>;

    /// Queue an acquisition search; `false` on failure, never an error.
    async fn trigger_search(&self, album_ids: &[i64]) -> bool;
}

/// The artist operations the orchestrator needs.
#[async_trait]
pub trait ArtistOps: Send + Sync {
    /// Create an artist. Write failures propagate.
    async fn add(
        &self,
        info: &NewArtist,
        root_folder_override: Option<&str>,
    ) -> Result<Artist, DownstreamError>;

    /// Queue a metadata refresh; `false` on failure, never an error.
    async fn trigger_refresh(&self, artist_ids: &[i64]) -> bool;

    /// Bounded convergence wait for one album to appear in a discography.
    async fn wait_for_album_refresh(&self, artist_id: i64, external_id: &str) -> Option<Album>;
}

#[async_trait]
impl AlbumOps for AlbumClient {
    async fn find_in_discography(
        &self,
        artist_id: i64,
        external_id: &str,
    ) -> Result<Option<Album>, DownstreamError> {
        AlbumClient::find_in_discography(self, artist_id, external_id).await
    }

    async fn update_monitoring(
        &self,
        album: &mut Album,
        monitored: bool,
    ) -> Result<(), DownstreamError> {
        AlbumClient::update_monitoring(self, album, monitored).await
    }

    async fn trigger_search(&self, album_ids: &[i64]) -> bool {
        AlbumClient::trigger_search(self, album_ids).await
    }
}

#[async_trait]
impl ArtistOps for ArtistClient {
    async fn add(
        &self,
        info: &NewArtist,
        root_folder_override: Option<&str>,
    ) -> Result<Artist, DownstreamError> {
        ArtistClient::add(self, info, root_folder_override).await
    }

    async fn trigger_refresh(&self, artist_ids: &[i64]) -> bool {
        ArtistClient::trigger_refresh(self, artist_ids).await
    }

    async fn wait_for_album_refresh(&self, artist_id: i64, external_id: &str) -> Option<Album> {
        ArtistClient::wait_for_album_refresh(self, artist_id, external_id).await
    }
}
