//! Library synchronization orchestrator.
//!
//! Takes one "user wants album X by artist Y" request and drives the
//! downstream service to a terminal state: artist present, album visible in
//! the discography, monitoring on, acquisition search queued. Two entry
//! paths - the artist already exists, or must be created - reconverge on a
//! shared finishing routine, and every terminal branch leaves an audit
//! record.
//!
//! The service's add/refresh operations are fire-and-forget, so both paths
//! may fall into the bounded convergence wait before they can finish. The
//! wait exhausting is a modeled terminal ("not found"), not an error.
//!
//! One run is a single sequential chain of awaits; concurrency only exists
//! across runs, and the service's own uniqueness handling is the backstop
//! for two runs racing to create the same artist.

use serde::Serialize;

use crate::audit::{AlbumAuditRecord, ArtistAuditRecord, AuditSink};
use crate::downstream::{
    AdditionRequest, Album, AlbumOps, Artist, ArtistOps, DownstreamError, NewArtist,
};

/// Synthetic error recorded when the convergence wait exhausts.
const NOT_FOUND_ERROR: &str = "album not found in discography after refresh";

/// Structured result of one orchestration run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub artist_id: Option<i64>,
    pub album_id: Option<i64>,
    pub title: String,
    pub artist: String,
    /// Human-readable status, suitable to show the requesting user
    pub message: String,
    pub monitored: bool,
    pub search_triggered: bool,
    pub percent_complete: f64,
}

/// Workflow engine composing album and artist operations.
pub struct Orchestrator<A, R, S> {
    albums: A,
    artists: R,
    audit: S,
}

impl<A: AlbumOps, R: ArtistOps, S: AuditSink> Orchestrator<A, R, S> {
    pub fn new(albums: A, artists: R, audit: S) -> Self {
        Self {
            albums,
            artists,
            audit,
        }
    }

    /// Path A: ensure the album is present for an artist the library
    /// already has.
    ///
    /// Checks the current discography first; only when the album is absent
    /// does it queue a refresh and enter the convergence wait.
    pub async fn handle_existing_artist(
        &self,
        artist: &Artist,
        external_id: &str,
        request: &AdditionRequest,
    ) -> Result<SyncReport, DownstreamError> {
        let artist_id = artist.id.ok_or_else(|| {
            DownstreamError::InvalidRequest(format!(
                "artist \"{}\" has no library id",
                artist.name
            ))
        })?;

        // Status read: a failure here degrades to "absent" and the refresh
        // path takes over.
        let present = match self.albums.find_in_discography(artist_id, external_id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, artist = %artist.name, "discography read failed");
                None
            }
        };

        let album = match present {
            Some(album) => Some(album),
            None => {
                if !self.artists.trigger_refresh(&[artist_id]).await {
                    tracing::warn!(artist = %artist.name, "refresh rejected, polling anyway");
                }
                self.artists
                    .wait_for_album_refresh(artist_id, external_id)
                    .await
            }
        };

        match album {
            Some(album) => self.monitor_and_search_album(album, artist, request).await,
            None => Ok(self.album_not_found(artist, request).await),
        }
    }

    /// Path B: create the artist, then ensure the album is present.
    ///
    /// Artist creation is a durable side effect: its success is audited
    /// immediately, before anything that may still go wrong with the album.
    /// If a later write fails, an album failure record is logged and the
    /// error still propagates.
    pub async fn handle_new_artist(
        &self,
        info: &NewArtist,
        external_id: &str,
        request: &AdditionRequest,
    ) -> Result<SyncReport, DownstreamError> {
        let artist = match self
            .artists
            .add(info, request.root_folder.as_deref())
            .await
        {
            Ok(artist) => artist,
            Err(e) => {
                self.audit
                    .record_artist(ArtistAuditRecord::failure(
                        &info.name,
                        &info.foreign_artist_id,
                        request,
                        e.to_string(),
                    ))
                    .await;
                return Err(e);
            }
        };

        self.audit
            .record_artist(ArtistAuditRecord::success(&artist, request))
            .await;

        let artist_id = artist.id.ok_or_else(|| {
            DownstreamError::Parse(format!(
                "library returned created artist \"{}\" without an id",
                artist.name
            ))
        })?;

        if !self.artists.trigger_refresh(&[artist_id]).await {
            tracing::warn!(artist = %artist.name, "refresh rejected, polling anyway");
        }

        match self
            .artists
            .wait_for_album_refresh(artist_id, external_id)
            .await
        {
            Some(album) => match self.monitor_and_search_album(album, &artist, request).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    // The artist exists and was audited; make sure the
                    // album side of the trail is complete too.
                    self.audit
                        .record_album(AlbumAuditRecord::failure(&artist, request, e.to_string()))
                        .await;
                    Err(e)
                }
            },
            None => Ok(self.album_not_found(&artist, request).await),
        }
    }

    /// Shared finish: enable monitoring if needed, search if incomplete,
    /// audit the final state.
    ///
    /// Idempotent for an album that is already monitored and fully
    /// acquired: zero writes, one success record.
    async fn monitor_and_search_album(
        &self,
        mut album: Album,
        artist: &Artist,
        request: &AdditionRequest,
    ) -> Result<SyncReport, DownstreamError> {
        if !album.monitored {
            self.albums.update_monitoring(&mut album, true).await?;
        }

        let mut search_triggered = false;
        if album.status.percent_complete < 100.0 {
            if let Some(album_id) = album.id {
                search_triggered = self.albums.trigger_search(&[album_id]).await;
                if !search_triggered {
                    tracing::warn!(album = %album.title, "search trigger rejected");
                }
            }
        }

        let message = if search_triggered {
            format!("\"{}\" added, acquisition search triggered", album.title)
        } else if album.status.fully_available {
            format!("\"{}\" is already complete in the library", album.title)
        } else {
            format!("\"{}\" added successfully", album.title)
        };

        self.audit
            .record_album(AlbumAuditRecord::success(
                &album,
                artist,
                search_triggered,
                request,
            ))
            .await;

        Ok(SyncReport {
            success: true,
            artist_id: artist.id,
            album_id: album.id,
            title: album.title.clone(),
            artist: artist.name.clone(),
            message,
            monitored: album.monitored,
            search_triggered,
            percent_complete: album.status.percent_complete,
        })
    }

    /// Failure terminal: the album never materialized in the discography.
    ///
    /// The workflow has no further automatic recourse, so the message is
    /// user-facing guidance rather than a raw error.
    async fn album_not_found(&self, artist: &Artist, request: &AdditionRequest) -> SyncReport {
        self.audit
            .record_album(AlbumAuditRecord::failure(artist, request, NOT_FOUND_ERROR))
            .await;

        let message = format!(
            "Album \"{}\" was not found in {}'s discography after a metadata refresh. \
             Common causes: the release is missing from the upstream catalog, its \
             metadata does not match this release group, or it is a compilation / \
             various-artists release credited to another artist. Consider adding the \
             album manually in the library service.",
            request.title, artist.name
        );

        SyncReport {
            success: false,
            artist_id: artist.id,
            album_id: None,
            title: request.title.clone(),
            artist: artist.name.clone(),
            message,
            monitored: false,
            search_triggered: false,
            percent_complete: 0.0,
        }
    }
}
