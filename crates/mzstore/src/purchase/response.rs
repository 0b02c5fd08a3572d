//! Wire models for the buy endpoint.

use serde::Deserialize;

/// Decoded buy response body (a property list).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseResponse {
    #[serde(default, rename = "songList")]
    pub song_list: Vec<SongItem>,

    #[serde(default)]
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metrics {
    #[serde(default, rename = "dialogId")]
    pub dialog_id: String,

    #[serde(default, rename = "mtRequestId")]
    pub mt_request_id: String,
}

/// One downloadable artifact. The protocol always yields exactly one per
/// buy; anything else is rejected upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongItem {
    #[serde(default, rename = "songId")]
    pub song_id: i64,

    #[serde(default, rename = "URL")]
    pub url: String,

    #[serde(default, rename = "downloadKey")]
    pub download_key: String,

    #[serde(default)]
    pub sinfs: Vec<Sinf>,

    #[serde(default, rename = "purchaseDate")]
    pub purchase_date: String,

    #[serde(default, rename = "download-id")]
    pub download_id: String,

    #[serde(default)]
    pub metadata: SongMetadata,
}

/// DRM blob bound to the artifact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sinf {
    #[serde(default)]
    pub id: i64,

    #[serde(default, rename = "sinf")]
    pub data: serde_bytes::ByteBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongMetadata {
    #[serde(default, rename = "bundleDisplayName")]
    pub bundle_display_name: String,

    #[serde(default, rename = "softwareVersionBundleId")]
    pub bundle_id: String,

    /// Legacy field the bundle id occasionally arrives in instead.
    #[serde(default)]
    pub q: String,

    #[serde(default, rename = "artistId")]
    pub artist_id: i64,

    #[serde(default, rename = "artistName")]
    pub artist_name: String,

    #[serde(default, rename = "bundleShortVersionString")]
    pub bundle_short_version: String,

    #[serde(default, rename = "bundleVersion")]
    pub bundle_version: String,

    #[serde(default)]
    pub copyright: String,

    #[serde(default)]
    pub genre: String,

    #[serde(default, rename = "genreId")]
    pub genre_id: i64,

    #[serde(default, rename = "itemId")]
    pub item_id: i64,

    #[serde(default, rename = "itemName")]
    pub item_name: String,

    #[serde(default, rename = "playlistName")]
    pub playlist_name: String,

    #[serde(default)]
    pub rating: ContentRating,

    #[serde(default, rename = "releaseDate")]
    pub release_date: String,

    #[serde(default, rename = "softwareIcon57x57URL")]
    pub icon_url: String,

    #[serde(default, rename = "softwareSupportedDeviceIds")]
    pub supported_device_ids: Vec<i64>,

    #[serde(default, rename = "softwareVersionExternalIdentifier")]
    pub external_version_id: i64,

    #[serde(default, rename = "softwareVersionExternalIdentifiers")]
    pub external_version_ids: Vec<i64>,

    #[serde(default, rename = "vendorId")]
    pub vendor_id: i64,

    #[serde(default, rename = "drmVersionNumber")]
    pub drm_version: i64,

    #[serde(default, rename = "versionRestrictions")]
    pub version_restrictions: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRating {
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub rank: i64,

    #[serde(default)]
    pub system: String,
}

impl SongMetadata {
    /// The bundle id may arrive in the primary field or the legacy `q`
    /// field; the primary one wins when both are present.
    pub fn resolve_bundle_id(&self) -> Option<&str> {
        if !self.bundle_id.is_empty() {
            Some(&self.bundle_id)
        } else if !self.q.is_empty() {
            Some(&self.q)
        } else {
            None
        }
    }
}
