//! Artist operations against the downstream library service.
//!
//! Home of the convergence wait: artist creation and metadata refresh are
//! fire-and-forget on the service side, and the only way to observe a newly
//! refreshed discography is to poll it. [`poll_for_album`] is the bounded
//! loop that trades latency for that simplicity.

use std::future::Future;

use super::albums::AlbumClient;
use super::adapter;
use super::domain::{Album, Artist, NewArtist, PollingPolicy};
use super::dto;
use super::transport::{DownstreamError, REFRESH_TIMEOUT, Transport};

/// Library-wide defaults applied when creating an artist.
#[derive(Debug, Clone)]
pub struct AddDefaults {
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    pub root_folder: String,
}

/// Client for the artist endpoints.
#[derive(Debug, Clone)]
pub struct ArtistClient {
    transport: Transport,
    albums: AlbumClient,
    defaults: AddDefaults,
    policy: PollingPolicy,
}

impl ArtistClient {
    pub fn new(transport: Transport, defaults: AddDefaults, policy: PollingPolicy) -> Self {
        let albums = AlbumClient::new(transport.clone());
        Self {
            transport,
            albums,
            defaults,
            policy,
        }
    }

    /// List every artist the library knows.
    pub async fn get_all(&self) -> Result<Vec<Artist>, DownstreamError> {
        let list: Vec<dto::ArtistResource> = self.transport.get("artist", &[]).await?;
        Ok(list.into_iter().map(adapter::artist_from_resource).collect())
    }

    /// Find an artist by external id.
    pub async fn find_by_mbid(&self, mbid: &str) -> Result<Option<Artist>, DownstreamError> {
        let artists = self.get_all().await?;
        Ok(artists.into_iter().find(|a| a.foreign_artist_id == mbid))
    }

    /// Fetch one artist by library id. 404 means `None`.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Artist>, DownstreamError> {
        match self
            .transport
            .get::<dto::ArtistResource>(&format!("artist/{id}"), &[])
            .await
        {
            Ok(resource) => Ok(Some(adapter::artist_from_resource(resource))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Best-effort read of an artist's root folder; any failure is `None`.
    pub async fn get_root_folder(&self, id: i64) -> Option<String> {
        match self.get_by_id(id).await {
            Ok(Some(artist)) => artist.root_folder,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, artist_id = id, "root folder query failed");
                None
            }
        }
    }

    /// Fallback match by name when no external id is available: trimmed,
    /// case-insensitive, exact first, then substring either way.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Artist>, DownstreamError> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        let artists = self.get_all().await?;
        let exact = artists
            .iter()
            .find(|a| a.name.trim().to_lowercase() == needle)
            .cloned();
        if exact.is_some() {
            return Ok(exact);
        }
        Ok(artists.into_iter().find(|a| {
            let candidate = a.name.trim().to_lowercase();
            candidate.contains(&needle) || needle.contains(&candidate)
        }))
    }

    /// Create an artist in the library.
    ///
    /// Monitoring for new items is explicitly "none": only the specifically
    /// requested album gets monitored later, so adding an artist never
    /// floods the library with their whole catalog. Write failures
    /// propagate.
    pub async fn add(
        &self,
        info: &NewArtist,
        root_folder_override: Option<&str>,
    ) -> Result<Artist, DownstreamError> {
        let root_folder = root_folder_override
            .unwrap_or(&self.defaults.root_folder)
            .to_string();
        let body = dto::AddArtistRequest {
            foreign_artist_id: info.foreign_artist_id.clone(),
            artist_name: info.name.clone(),
            quality_profile_id: self.defaults.quality_profile_id,
            metadata_profile_id: self.defaults.metadata_profile_id,
            root_folder_path: root_folder,
            monitored: true,
            monitor_new_items: "none".to_string(),
            add_options: dto::AddArtistOptions {
                monitor: "none".to_string(),
                search_for_missing_albums: false,
            },
        };

        let created: dto::ArtistResource = self.transport.post("artist", &body).await?;
        let artist = adapter::artist_from_resource(created);
        tracing::info!(
            artist = %artist.name,
            artist_id = ?artist.id,
            "artist created in library"
        );
        Ok(artist)
    }

    /// Queue a metadata refresh for the given artists.
    ///
    /// Refresh commands are slower than ordinary calls, so this uses the
    /// extended deadline. Returns whether the command was accepted; never
    /// propagates.
    pub async fn trigger_refresh(&self, artist_ids: &[i64]) -> bool {
        let body = dto::CommandBody::refresh_artist(artist_ids);
        match self
            .transport
            .post_with_timeout::<dto::CommandResource, _>("command", &body, REFRESH_TIMEOUT)
            .await
        {
            Ok(command) => {
                tracing::info!(?artist_ids, command_id = ?command.id, "artist refresh queued");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, ?artist_ids, "failed to queue artist refresh");
                false
            }
        }
    }

    /// Wait for a specific album to appear in a freshly refreshed
    /// discography.
    ///
    /// Bounded poll per the configured policy; early attempts routinely see
    /// an empty or partial discography, and per-attempt fetch failures
    /// simply count as "not there yet". Exhaustion is a normal `None`
    /// return, never an error.
    pub async fn wait_for_album_refresh(
        &self,
        artist_id: i64,
        external_id: &str,
    ) -> Option<Album> {
        poll_for_album(&self.policy, |attempt| {
            let albums = &self.albums;
            async move {
                match albums.find_in_discography(artist_id, external_id).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            attempt,
                            artist_id,
                            "discography fetch failed during refresh wait"
                        );
                        None
                    }
                }
            }
        })
        .await
    }
}

/// The convergence loop, factored out so tests can drive it with a scripted
/// fetch instead of a live service.
///
/// Fetches up to `max_attempts` times, sleeping `interval` between attempts
/// but not after the last one, and short-circuits on the first hit.
pub(crate) async fn poll_for_album<F, Fut>(policy: &PollingPolicy, mut fetch: F) -> Option<Album>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<Album>>,
{
    for attempt in 1..=policy.max_attempts {
        if let Some(album) = fetch(attempt).await {
            tracing::debug!(attempt, album = %album.title, "target album appeared in discography");
            return Some(album);
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    tracing::debug!(
        attempts = policy.max_attempts,
        "target album never appeared in discography"
    );
    None
}
