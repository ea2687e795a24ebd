//! Wire shapes for the Lidarr v1 API.
//!
//! These structs mirror the JSON the service actually sends, camelCase and
//! all. Every resource carries a flattened `extra` map so that records can
//! be PUT back unchanged: Lidarr's update endpoints want the full object,
//! including fields this crate has no reason to model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Album record as returned by `album`, `album/{id}` and `album/lookup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumResource {
    /// Library id; lookup results report `0` or omit it entirely
    pub id: Option<i64>,
    pub title: String,
    pub foreign_album_id: String,
    /// Alternate external-id field used by some catalog variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_group_id: Option<String>,
    pub artist_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub monitored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsResource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageResource>,
    /// Lookup results embed the owning artist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Box<ArtistResource>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acquisition statistics nested inside album records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsResource {
    pub track_count: u32,
    pub track_file_count: u32,
    pub percent_of_tracks: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Artwork reference nested inside album and artist records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageResource {
    pub cover_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Artist record as returned by `artist` and `artist/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistResource {
    pub id: Option<i64>,
    pub artist_name: String,
    pub foreign_artist_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
    pub monitored: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST artist`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddArtistRequest {
    pub foreign_artist_id: String,
    pub artist_name: String,
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    pub root_folder_path: String,
    pub monitored: bool,
    /// "none" so that adding an artist never floods the library with
    /// monitoring for the whole back catalog
    pub monitor_new_items: String,
    pub add_options: AddArtistOptions,
}

/// `addOptions` payload of `POST artist`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddArtistOptions {
    pub monitor: String,
    pub search_for_missing_albums: bool,
}

/// Body for `POST command`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_ids: Option<Vec<i64>>,
}

impl CommandBody {
    /// Fire-and-forget acquisition search for the given albums.
    pub fn album_search(album_ids: &[i64]) -> Self {
        Self {
            name: "AlbumSearch".to_string(),
            album_ids: Some(album_ids.to_vec()),
            artist_ids: None,
        }
    }

    /// Fire-and-forget metadata refresh for the given artists.
    pub fn refresh_artist(artist_ids: &[i64]) -> Self {
        Self {
            name: "RefreshArtist".to_string(),
            album_ids: None,
            artist_ids: Some(artist_ids.to_vec()),
        }
    }
}

/// The slice of a command response we care about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandResource {
    pub id: Option<i64>,
    pub status: Option<String>,
}
