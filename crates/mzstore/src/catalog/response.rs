//! Wire models for the catalog and chart endpoints (JSON).

use std::collections::HashMap;

use serde::Deserialize;

/// One catalog item as the lookup endpoint projects it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub bundle_id: String,
    pub name: String,
    pub artist_name: String,
    pub artist_id: String,
    pub user_rating: UserRating,
    pub offers: Vec<Offer>,
    pub device_families: Vec<String>,
    pub genres: Vec<GenreRef>,
    pub release_date: String,
    pub artwork: Artwork,
    #[serde(rename = "minimumOSVersion")]
    pub minimum_os_version: String,
    pub file_size_by_device: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRating {
    pub value: f64,
    pub rating_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Offer {
    pub price: f64,
    pub price_formatted: String,
    pub buy_params: String,
    pub version: OfferVersion,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferVersion {
    pub display: String,
    pub external_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Asset {
    pub flavor: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenreRef {
    pub genre_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artwork {
    pub url: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupResponse {
    pub results: HashMap<String, CatalogItem>,
}

/// Segmented chart page: an ordered item-id list plus inlined lockup
/// results for a prefix of it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartResponse {
    pub page_data: ChartPageData,
    pub store_platform_data: StorePlatformData,
    pub properties: ChartProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartPageData {
    pub segmented_control: SegmentedControl,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SegmentedControl {
    pub selected_index: usize,
    pub segments: Vec<ChartSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartSegment {
    pub page_data: SegmentPageData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SegmentPageData {
    pub selected_chart: SelectedChart,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectedChart {
    pub adam_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorePlatformData {
    pub lockup: Lockup,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Lockup {
    pub results: HashMap<String, CatalogItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChartProperties {
    #[serde(rename = "di6-top-charts-page-num-ids-per-chart")]
    pub ids_per_chart: usize,
}

/// Flat paginated chart page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagedChartResponse {
    pub content_data: Vec<PagedChartItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagedChartItem {
    pub id: String,
    pub user_rating: String,
    pub button_text: String,
    pub buy_data: PagedBuyData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagedBuyData {
    pub bundle_id: String,
    pub version_id: String,
    pub action_params: String,
}

/// One position in a popularity chart, as the client reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntry {
    pub item_id: String,
    pub bundle_id: String,
    pub position: usize,
    pub rating: f64,
    pub price: f64,
    pub currency_label: String,
    pub version_id: i64,
    pub version: String,
}
