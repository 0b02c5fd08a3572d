//! Catalog lookup and popularity charts.
//!
//! These are plain JSON endpoints, unauthenticated but region-scoped. The
//! segmented chart endpoint returns the full ordered item-id list while
//! inlining details for only a prefix of it, so the rest is backfilled
//! through the batch lookup endpoint.

mod currency;
mod error;
mod response;

pub use currency::currency_label;
pub use error::CatalogError;
pub use response::{
    Artwork, Asset, CatalogItem, ChartEntry, GenreRef, LookupResponse, Offer, OfferVersion,
    UserRating,
};

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use reqwest::{Method, Request, StatusCode};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::device::{USER_AGENT_CHART, USER_AGENT_CHART_PAGED};
use crate::store::Region;
use crate::transport::{Endpoints, Transport, read_body};

use response::{ChartResponse, PagedChartResponse};

/// Batch size for backfilling chart items through the lookup endpoint.
const LOOKUP_BATCH: usize = 50;

/// Which popularity chart to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Chart {
    #[default]
    TopFree,
    TopPaid,
    TopGrossing,
    TabletTopFree,
    TabletTopPaid,
    TabletTopGrossing,
}

impl Chart {
    fn pop_id(self) -> &'static str {
        match self {
            Chart::TopFree => "27",
            Chart::TopPaid => "30",
            Chart::TopGrossing => "38",
            Chart::TabletTopFree => "44",
            Chart::TabletTopPaid => "47",
            Chart::TabletTopGrossing => "46",
        }
    }
}

/// Read-side client for the catalog and chart endpoints.
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
    region: Region,
    endpoints: Endpoints,
}

impl CatalogClient {
    pub fn new(transport: Arc<dyn Transport>, region: Region, endpoints: Endpoints) -> Self {
        Self {
            transport,
            region,
            endpoints,
        }
    }

    /// Batch lookup by catalog item id.
    pub async fn lookup_by_item_id(
        &self,
        item_ids: &[String],
    ) -> Result<HashMap<String, CatalogItem>, CatalogError> {
        self.lookup("id", item_ids).await
    }

    /// Batch lookup by bundle id.
    pub async fn lookup_by_bundle_id(
        &self,
        bundle_ids: &[String],
    ) -> Result<HashMap<String, CatalogItem>, CatalogError> {
        self.lookup("bundleId", bundle_ids).await
    }

    async fn lookup(
        &self,
        key: &str,
        ids: &[String],
    ) -> Result<HashMap<String, CatalogItem>, CatalogError> {
        let mut url = self.endpoints.lookup_url()?;
        url.query_pairs_mut()
            .append_pair("version", "2")
            .append_pair(key, &ids.join(","))
            .append_pair("p", "mdm-lockup")
            .append_pair("caller", "MDM")
            .append_pair("platform", "itunes")
            .append_pair("cc", self.region.region_code())
            .append_pair("l", "en_us");

        let request = Request::new(Method::GET, url);
        let response = self.execute_ok(request).await?;
        let body = read_body(response).await?;

        let decoded: LookupResponse = serde_json::from_slice(&body)?;
        if decoded.results.is_empty() {
            return Err(CatalogError::NoResultsFound {
                ids: ids.join(","),
            });
        }

        Ok(decoded.results)
    }

    /// Read a window of the segmented chart, backfilling items the page did
    /// not inline.
    ///
    /// `from` is 1-based; a `limit` of 0 uses the server-advertised page
    /// size. `age_band` narrows the chart to a kids age band when set.
    pub async fn top_chart(
        &self,
        genre_id: &str,
        chart: Chart,
        age_band: Option<&str>,
        from: usize,
        limit: usize,
    ) -> Result<Vec<ChartEntry>, CatalogError> {
        let from = from.max(1);

        let mut url = self.endpoints.chart_url()?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(band) = age_band {
                query.append_pair("ageBandId", band);
            }
            query
                .append_pair("genreId", genre_id)
                .append_pair("popId", chart.pop_id())
                .append_pair("cc", self.region.region_code())
                .append_pair("l", "en");
        }

        let mut request = Request::new(Method::GET, url);
        request
            .headers_mut()
            .insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT_CHART));

        let response = self.execute_ok(request).await?;
        let body = read_body(response).await?;
        let page: ChartResponse = serde_json::from_slice(&body)?;

        let control = &page.page_data.segmented_control;
        let segment = control.segments.get(control.selected_index).ok_or_else(|| {
            CatalogError::UnexpectedShape {
                reason: format!(
                    "selected segment {} out of range ({} segments)",
                    control.selected_index,
                    control.segments.len()
                ),
            }
        })?;
        let ids = &segment.page_data.selected_chart.adam_ids;

        let limit = if limit == 0 {
            page.properties.ids_per_chart
        } else {
            limit
        };
        let start = (from - 1).min(ids.len());
        let end = start.saturating_add(limit).min(ids.len());
        let window = &ids[start..end];

        let mut results = page.store_platform_data.lockup.results;

        // Backfill entries the chart page did not inline, in lookup batches.
        let missing: Vec<String> = window
            .iter()
            .filter(|id| !results.contains_key(id.as_str()))
            .cloned()
            .collect();
        debug!(
            total = window.len(),
            missing = missing.len(),
            "chart window resolved"
        );
        for batch in missing.chunks(LOOKUP_BATCH) {
            let fetched = self.lookup_by_item_id(batch).await?;
            results.extend(fetched);
        }

        let mut entries = Vec::with_capacity(window.len());
        for (offset, id) in window.iter().enumerate() {
            let Some(item) = results.get(id) else {
                warn!(item_id = %id, "chart item missing after backfill, skipping");
                continue;
            };
            entries.push(chart_entry(id, item, from + offset));
        }

        Ok(entries)
    }

    /// Read one page of the flat paginated chart.
    ///
    /// `page` is 0-based; positions are `page * page_size + index + 1`.
    pub async fn top_chart_page(
        &self,
        genre_id: &str,
        chart: Chart,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ChartEntry>, CatalogError> {
        let mut url = self.endpoints.chart_paged_url()?;
        url.query_pairs_mut()
            .append_pair("genreId", genre_id)
            .append_pair("popId", chart.pop_id())
            .append_pair("pageNumbers", &page.to_string())
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("cc", self.region.region_code());

        let mut request = Request::new(Method::GET, url);
        request.headers_mut().insert(
            header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT_CHART_PAGED),
        );

        let response = self.execute_ok(request).await?;
        let body = read_body(response).await?;

        let pages: Vec<PagedChartResponse> = serde_json::from_slice(&body)?;
        if pages.len() != 1 {
            return Err(CatalogError::UnexpectedShape {
                reason: format!("expected a single page object, got {}", pages.len()),
            });
        }

        let entries = pages[0]
            .content_data
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let rating = item.user_rating.parse().unwrap_or(0.0);

                // The buy parameters carry the price in thousandths.
                let raw_price: i64 = form_urlencoded::parse(item.buy_data.action_params.as_bytes())
                    .find(|(key, _)| key == "price")
                    .and_then(|(_, value)| value.parse().ok())
                    .unwrap_or(0);

                let version_id = item.buy_data.version_id.parse().unwrap_or(0);

                ChartEntry {
                    item_id: item.id.clone(),
                    bundle_id: item.buy_data.bundle_id.clone(),
                    position: page * page_size + index + 1,
                    rating,
                    price: raw_price as f64 / 1000.0,
                    currency_label: currency_label(raw_price as f64, &item.button_text),
                    version_id,
                    version: String::new(),
                }
            })
            .collect();

        Ok(entries)
    }

    async fn execute_ok(&self, request: Request) -> Result<reqwest::Response, CatalogError> {
        let url = request.url().to_string();
        let response = self.transport.execute(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CatalogError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn chart_entry(item_id: &str, item: &CatalogItem, position: usize) -> ChartEntry {
    let (price, currency, version_id, version) = match item.offers.first() {
        Some(offer) => (
            offer.price,
            currency_label(offer.price, &offer.price_formatted),
            offer.version.external_id,
            offer.version.display.clone(),
        ),
        None => (0.0, String::new(), 0, String::new()),
    };

    ChartEntry {
        item_id: item_id.to_string(),
        bundle_id: item.bundle_id.clone(),
        position,
        rating: item.user_rating.value,
        price,
        currency_label: currency,
        version_id,
        version,
    }
}
