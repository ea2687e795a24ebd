//! Client layer for the downstream library service (Lidarr).
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types that represent our
//!   view of artists and albums
//! - **Wire DTOs** (`dto.rs`) - Exact API response shapes, round-trippable
//!   for full-object updates
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models and owns
//!   the pure status computation
//! - **Transport** (`transport.rs`) - Authenticated HTTP with deadlines,
//!   typed errors and credential redaction
//! - **Albums / Artists** (`albums.rs`, `artists.rs`) - Domain operations,
//!   including the convergence wait for refreshed discographies
//! - **Traits** (`traits.rs`) - Seams the orchestrator depends on, mockable
//!   in tests
//!
//! Failure semantics are part of each operation's contract: status reads
//! degrade to `None`/`false`, writes propagate `DownstreamError`.

pub mod adapter;
pub mod albums;
pub mod artists;
pub mod domain;
pub mod dto;
pub mod traits;
pub mod transport;

pub use albums::AlbumClient;
pub use artists::{AddDefaults, ArtistClient};
pub use domain::{AdditionRequest, Album, AlbumStatus, Artist, NewArtist, PollingPolicy};
pub use traits::{AlbumOps, ArtistOps};
pub use transport::{Auth, DownstreamError, RequestOptions, Transport, redact_api_key};
