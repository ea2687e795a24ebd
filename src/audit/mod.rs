//! Audit trail for orchestration outcomes.
//!
//! The orchestrator reports every terminal branch - success or failure -
//! through the two-method [`AuditSink`] contract. Each record carries the
//! entity attributes at terminal time plus the original request, serialized
//! verbatim, so an outcome can always be traced back to what the user asked
//! for. Persistence is someone else's job; this crate ships a sink that
//! emits structured `tracing` events.

use async_trait::async_trait;
use serde::Serialize;

use crate::downstream::{AdditionRequest, Album, Artist};

/// How one orchestration run ended, attached to every audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub success: bool,
    /// Human-readable failure cause; `None` on success
    pub error: Option<String>,
    /// The driving request, serialized verbatim
    pub request: serde_json::Value,
    /// RFC 3339 timestamp of the terminal branch
    pub recorded_at: String,
}

impl AuditOutcome {
    pub fn success(request: &AdditionRequest) -> Self {
        Self::build(request, true, None)
    }

    pub fn failure(request: &AdditionRequest, error: impl Into<String>) -> Self {
        Self::build(request, false, Some(error.into()))
    }

    fn build(request: &AdditionRequest, success: bool, error: Option<String>) -> Self {
        Self {
            success,
            error,
            request: serde_json::to_value(request).unwrap_or(serde_json::Value::Null),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Album-level outcome record.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumAuditRecord {
    pub title: String,
    pub external_id: String,
    pub artist_name: String,
    pub album_id: Option<i64>,
    pub monitored: bool,
    pub search_triggered: bool,
    pub percent_complete: f64,
    pub outcome: AuditOutcome,
}

impl AlbumAuditRecord {
    /// Success record carrying the album's final state.
    pub fn success(
        album: &Album,
        artist: &Artist,
        search_triggered: bool,
        request: &AdditionRequest,
    ) -> Self {
        Self {
            title: album.title.clone(),
            external_id: album.foreign_album_id.clone(),
            artist_name: artist.name.clone(),
            album_id: album.id,
            monitored: album.monitored,
            search_triggered,
            percent_complete: album.status.percent_complete,
            outcome: AuditOutcome::success(request),
        }
    }

    /// Failure record for an album that never reached the library.
    pub fn failure(artist: &Artist, request: &AdditionRequest, error: impl Into<String>) -> Self {
        Self {
            title: request.title.clone(),
            external_id: request.foreign_album_id.clone(),
            artist_name: artist.name.clone(),
            album_id: None,
            monitored: false,
            search_triggered: false,
            percent_complete: 0.0,
            outcome: AuditOutcome::failure(request, error),
        }
    }
}

/// Artist-level outcome record.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistAuditRecord {
    pub name: String,
    pub external_id: String,
    pub artist_id: Option<i64>,
    pub root_folder: Option<String>,
    pub outcome: AuditOutcome,
}

impl ArtistAuditRecord {
    pub fn success(artist: &Artist, request: &AdditionRequest) -> Self {
        Self {
            name: artist.name.clone(),
            external_id: artist.foreign_artist_id.clone(),
            artist_id: artist.id,
            root_folder: artist.root_folder.clone(),
            outcome: AuditOutcome::success(request),
        }
    }

    pub fn failure(name: &str, external_id: &str, request: &AdditionRequest, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            external_id: external_id.to_string(),
            artist_id: None,
            root_folder: None,
            outcome: AuditOutcome::failure(request, error),
        }
    }
}

/// Narrow contract the orchestrator records outcomes through.
///
/// Sinks must not fail the workflow: a sink that persists handles its own
/// errors internally.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_album(&self, record: AlbumAuditRecord);
    async fn record_artist(&self, record: ArtistAuditRecord);
}

/// Sink that emits structured `tracing` events under the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record_album(&self, record: AlbumAuditRecord) {
        let snapshot = serde_json::to_string(&record).unwrap_or_default();
        if record.outcome.success {
            tracing::info!(
                target: "audit",
                album = %record.title,
                artist = %record.artist_name,
                monitored = record.monitored,
                search_triggered = record.search_triggered,
                percent_complete = record.percent_complete,
                %snapshot,
                "album outcome recorded"
            );
        } else {
            tracing::warn!(
                target: "audit",
                album = %record.title,
                artist = %record.artist_name,
                error = record.outcome.error.as_deref().unwrap_or("unknown"),
                %snapshot,
                "album outcome recorded"
            );
        }
    }

    async fn record_artist(&self, record: ArtistAuditRecord) {
        let snapshot = serde_json::to_string(&record).unwrap_or_default();
        if record.outcome.success {
            tracing::info!(
                target: "audit",
                artist = %record.name,
                artist_id = ?record.artist_id,
                %snapshot,
                "artist outcome recorded"
            );
        } else {
            tracing::warn!(
                target: "audit",
                artist = %record.name,
                error = record.outcome.error.as_deref().unwrap_or("unknown"),
                %snapshot,
                "artist outcome recorded"
            );
        }
    }
}

/// In-memory sink preserving record order, for tests.
#[cfg(test)]
pub mod mocks {
    use std::sync::Mutex;

    use super::*;

    /// One recorded audit call, in arrival order.
    #[derive(Debug, Clone)]
    pub enum AuditEvent {
        Album(AlbumAuditRecord),
        Artist(ArtistAuditRecord),
    }

    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<AuditEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<AuditEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn record_album(&self, record: AlbumAuditRecord) {
            self.events.lock().unwrap().push(AuditEvent::Album(record));
        }

        async fn record_artist(&self, record: ArtistAuditRecord) {
            self.events.lock().unwrap().push(AuditEvent::Artist(record));
        }
    }
}
