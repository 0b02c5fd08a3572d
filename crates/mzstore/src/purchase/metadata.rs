//! Metadata manifest generation.
//!
//! Installers expect a property-list manifest alongside the artifact,
//! stitched together from the buy response's catalog metadata plus the
//! purchasing account and storefront.

use plist::{Dictionary, Value};

use super::response::SongItem;

/// What to do when the manifest fails to encode.
///
/// `Lenient` substitutes an empty manifest and logs a warning; `Strict`
/// fails the purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataMode {
    #[default]
    Lenient,
    Strict,
}

/// Build the manifest for a purchased artifact.
pub(crate) fn generate_manifest(
    song: &SongItem,
    bundle_id: &str,
    account_id: &str,
    store_id: u32,
    storefront_header: &str,
) -> Result<Vec<u8>, plist::Error> {
    let meta = &song.metadata;
    let mut dict = Dictionary::new();

    let mut capabilities = Dictionary::new();
    capabilities.insert("armv7".to_string(), Value::Boolean(true));
    dict.insert(
        "UIRequiredDeviceCapabilities".to_string(),
        Value::Dictionary(capabilities),
    );

    put_string(&mut dict, "appleId", account_id);
    put_integer(&mut dict, "artistId", meta.artist_id);
    put_string(&mut dict, "artistName", &meta.artist_name);
    put_string(&mut dict, "bundleDisplayName", &meta.bundle_display_name);
    put_string(&mut dict, "bundleShortVersionString", &meta.bundle_short_version);
    put_string(&mut dict, "bundleVersion", &meta.bundle_version);

    let mut account_info = Dictionary::new();
    put_string(&mut account_info, "AccountStoreFront", storefront_header);
    put_string(&mut account_info, "AppleID", account_id);
    let mut download_info = Dictionary::new();
    download_info.insert("accountInfo".to_string(), Value::Dictionary(account_info));
    put_string(&mut download_info, "purchaseDate", &song.purchase_date);
    dict.insert(
        "com.apple.iTunesStore.downloadInfo".to_string(),
        Value::Dictionary(download_info),
    );

    put_string(&mut dict, "copyright", &meta.copyright);
    put_integer(&mut dict, "drmVersionNumber", meta.drm_version);
    put_string(&mut dict, "fileExtension", ".app");
    dict.insert("gameCenterEnabled".to_string(), Value::Boolean(false));
    dict.insert("gameCenterEverEnabled".to_string(), Value::Boolean(false));
    put_string(&mut dict, "genre", &meta.genre);
    put_integer(&mut dict, "genreId", meta.genre_id);
    put_integer(&mut dict, "itemId", meta.item_id);
    put_string(&mut dict, "itemName", &meta.item_name);
    put_string(&mut dict, "kind", "software");
    put_string(&mut dict, "playlistName", &meta.playlist_name);
    put_string(&mut dict, "product-type", "ios-app");
    put_string(&mut dict, "purchaseDate", &song.purchase_date);

    let mut rating = Dictionary::new();
    put_string(&mut rating, "content", &meta.rating.content);
    put_string(&mut rating, "label", &meta.rating.label);
    put_integer(&mut rating, "rank", meta.rating.rank);
    put_string(&mut rating, "system", &meta.rating.system);
    dict.insert("rating".to_string(), Value::Dictionary(rating));

    put_string(&mut dict, "releaseDate", &meta.release_date);
    put_integer(&mut dict, "s", i64::from(store_id));
    put_string(&mut dict, "softwareIcon57x57URL", &meta.icon_url);
    dict.insert("softwareIconNeedsShine".to_string(), Value::Boolean(true));
    put_integer_array(&mut dict, "softwareSupportedDeviceIds", &meta.supported_device_ids);
    put_string(&mut dict, "softwareVersionBundleId", bundle_id);
    put_integer(&mut dict, "softwareVersionExternalIdentifier", meta.external_version_id);
    put_integer_array(
        &mut dict,
        "softwareVersionExternalIdentifiers",
        &meta.external_version_ids,
    );
    put_integer(&mut dict, "vendorId", meta.vendor_id);
    put_integer(&mut dict, "versionRestrictions", meta.version_restrictions);

    let mut buf = Vec::new();
    Value::Dictionary(dict).to_writer_xml(&mut buf)?;

    Ok(buf)
}

fn put_string(dict: &mut Dictionary, key: &str, value: &str) {
    dict.insert(key.to_string(), Value::String(value.to_string()));
}

fn put_integer(dict: &mut Dictionary, key: &str, value: i64) {
    dict.insert(key.to_string(), Value::Integer(value.into()));
}

fn put_integer_array(dict: &mut Dictionary, key: &str, values: &[i64]) {
    let array = values
        .iter()
        .map(|value| Value::Integer((*value).into()))
        .collect();
    dict.insert(key.to_string(), Value::Array(array));
}
