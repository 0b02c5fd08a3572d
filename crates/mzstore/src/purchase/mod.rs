//! Purchase flow: buy, confirm, extract, assemble.
//!
//! A purchase is four strictly ordered steps. The buy request commits the
//! transaction and returns the artifact descriptor material; its outcome has
//! to be classified before anything else (the backend signals "you own a
//! superseded version, use the re-download flow" through a dialog id rather
//! than a status code). The confirm round trip tells the backend the
//! download is being taken and runs even when later extraction fails the
//! purchase. Extraction then demands exactly one DRM blob and a resolvable
//! bundle id before the descriptor is assembled.

mod descriptor;
mod error;
mod metadata;
mod response;

pub use descriptor::DownloadDescriptor;
pub use error::{PurchaseError, PurchaseStep};
pub use metadata::MetadataMode;
pub use response::{ContentRating, Metrics, PurchaseResponse, Sinf, SongItem, SongMetadata};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use plist::{Dictionary, Value};
use reqwest::header::{self, HeaderValue};
use reqwest::{Method, Request, StatusCode};
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::device::{Device, USER_AGENT_DOWNLOAD};
use crate::store::{DEVICE_CODE_TABLET, Region};
use crate::transport::{
    CONTENT_TYPE_PLIST, Endpoints, HEADER_DSID, HEADER_STORE_FRONT, HEADER_TIME_ZONE,
    HEADER_TOKEN, Transport, read_body,
};

/// Dialog id the backend answers with when the account owns a superseded
/// version and the re-download flow (a different certificate) is required.
const REDOWNLOAD_DIALOG_ID: &str =
    "MZCommerceSoftware.OwnsSupersededMinorSoftwareApplicationForUpdate";

/// Pricing mode for a standard purchase.
const PRICING_PARAMETER_BUY: &str = "STDQ";

/// Fixed identifiers the legacy desktop client stamps on buy requests.
const MT_CLIENT_ID: &str = "3z30dhYIz29Wz4gvz9AEz1NIUDKelm";
const MT_REQUEST_ID: &str = "3z30dhYIz29Wz4gvz9AEz1NIUDKelmzJ4H6DIUSz1HZC";
const MT_PAGE_ID: &str = "1140828062";
const MT_PREV_PAGE: &str = "Genre_134583";
const REQUEST_UUID: &str = "353F3F00-9D87-5BB1-9055-B7761CCD57AA";

/// Fixed timezone offset (seconds east of UTC) stamped on buy requests.
const TIME_ZONE_OFFSET: &str = "10800";

/// Drives the purchase flow for one region.
pub struct PurchaseClient {
    transport: Arc<dyn Transport>,
    region: Region,
    device: Device,
    endpoints: Endpoints,
    metadata_mode: MetadataMode,
}

impl PurchaseClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        region: Region,
        device: Device,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            transport,
            region,
            device,
            endpoints,
            metadata_mode: MetadataMode::default(),
        }
    }

    /// Override the metadata manifest failure behavior.
    pub fn with_metadata_mode(mut self, mode: MetadataMode) -> Self {
        self.metadata_mode = mode;
        self
    }

    /// Purchase an item version, yielding its download descriptor.
    pub async fn purchase(
        &self,
        credentials: &Credentials,
        item_id: &str,
        version_id: i64,
    ) -> Result<DownloadDescriptor, PurchaseError> {
        if !credentials.can_purchase() {
            return Err(PurchaseError::CredentialsDoNotSupportPurchasing);
        }

        let buy = self.buy(credentials, item_id, version_id).await?;

        if buy.metrics.dialog_id == REDOWNLOAD_DIALOG_ID {
            return Err(PurchaseError::ApplicationRequiresRedownload {
                item_id: item_id.to_string(),
            });
        }

        let song = match buy.song_list.len() {
            0 => {
                return Err(PurchaseError::DownloadUrlNotFound {
                    item_id: item_id.to_string(),
                });
            }
            1 => &buy.song_list[0],
            count => {
                return Err(PurchaseError::MultipleDownloadUrls {
                    item_id: item_id.to_string(),
                    count,
                });
            }
        };

        // The backend expects the confirmation regardless of whether the
        // artifact material parses.
        self.confirm_download(credentials, item_id, &song.download_id)
            .await?;

        let sinf = match song.sinfs.len() {
            0 => {
                return Err(PurchaseError::NoSinfFound {
                    item_id: item_id.to_string(),
                });
            }
            1 => song.sinfs[0].data.trim_ascii(),
            count => {
                return Err(PurchaseError::MultipleSinfs {
                    item_id: item_id.to_string(),
                    count,
                });
            }
        };
        if sinf.is_empty() {
            return Err(PurchaseError::SinfEmpty {
                item_id: item_id.to_string(),
            });
        }

        let bundle_id = song.metadata.resolve_bundle_id().ok_or_else(|| {
            PurchaseError::BundleIdNotFound {
                item_id: item_id.to_string(),
            }
        })?;

        let manifest = self.build_manifest(song, bundle_id, credentials, item_id)?;

        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), USER_AGENT_DOWNLOAD.to_string());
        headers.insert(
            "Cookie".to_string(),
            format!("downloadKey={}", song.download_key),
        );
        headers.insert(
            "X-Apple-Store-Front".to_string(),
            self.region.storefront_header(DEVICE_CODE_TABLET),
        );
        headers.insert(
            "X-Dsid".to_string(),
            credentials.numeric_account_id().to_string(),
        );

        debug!(item_id, bundle_id, "purchase complete");

        Ok(DownloadDescriptor {
            bundle_id: bundle_id.to_string(),
            url: song.url.clone(),
            download_key: song.download_key.clone(),
            download_id: song.download_id.clone(),
            sinf: BASE64.encode(sinf),
            metadata: BASE64.encode(&manifest),
            version_id: song.metadata.external_version_id,
            file_size: 0,
            headers,
        })
    }

    async fn buy(
        &self,
        credentials: &Credentials,
        item_id: &str,
        version_id: i64,
    ) -> Result<PurchaseResponse, PurchaseError> {
        let mut url = self.endpoints.buy_url(self.region.pod_number())?;
        url.query_pairs_mut()
            .append_pair("xToken", credentials.session_token());

        let body = self.buy_body(credentials, item_id, version_id)?;

        let mut request = Request::new(Method::POST, url);
        let headers = request.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_PLIST),
        );
        headers.insert(
            header::REFERER,
            header_value("referer", &format!("http://itunes.apple.com/app/id{item_id}"))?,
        );
        headers.insert(
            header::USER_AGENT,
            header_value("user-agent", self.device.user_agent())?,
        );
        headers.insert(
            HEADER_STORE_FRONT,
            header_value(
                HEADER_STORE_FRONT,
                &self.region.storefront_header(DEVICE_CODE_TABLET),
            )?,
        );
        headers.insert(HEADER_TIME_ZONE, HeaderValue::from_static(TIME_ZONE_OFFSET));
        headers.insert(
            HEADER_DSID,
            header_value(HEADER_DSID, credentials.numeric_account_id())?,
        );
        headers.insert(
            HEADER_TOKEN,
            header_value(HEADER_TOKEN, credentials.session_token())?,
        );
        *request.body_mut() = Some(body.into());

        let response = self.transport.execute(request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(PurchaseError::UnexpectedStatus {
                step: PurchaseStep::Buy,
                item_id: item_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = read_body(response).await?;

        Ok(plist::from_bytes(&body)?)
    }

    fn buy_body(
        &self,
        credentials: &Credentials,
        item_id: &str,
        version_id: i64,
    ) -> Result<Vec<u8>, PurchaseError> {
        // The certificate is held as base64; provisioned values often carry
        // line breaks, which the decoder rejects.
        let compact: String = credentials
            .purchase_certificate()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let certificate = BASE64
            .decode(compact)
            .map_err(PurchaseError::InvalidPurchaseCertificate)?;

        let event_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut dict = Dictionary::new();
        put_string(&mut dict, "appExtVrsId", &version_id.to_string());
        put_string(&mut dict, "guid", self.device.guid());
        dict.insert("kbsync".to_string(), Value::Data(certificate));
        put_string(&mut dict, "machineName", self.device.machine_name());
        put_string(&mut dict, "mtApp", "com.apple.iTunes");
        put_string(&mut dict, "mtClientId", MT_CLIENT_ID);
        put_string(&mut dict, "mtEventTime", &event_time.to_string());
        put_string(&mut dict, "mtPageContext", "App Store");
        put_string(&mut dict, "mtPageId", MT_PAGE_ID);
        put_string(&mut dict, "mtPageType", "Software");
        put_string(&mut dict, "mtPrevPage", MT_PREV_PAGE);
        put_string(&mut dict, "mtRequestId", MT_REQUEST_ID);
        put_string(&mut dict, "mtTopic", "xp_its_main");
        put_string(&mut dict, "needDiv", "0");
        put_string(&mut dict, "pg", "default");
        put_string(&mut dict, "price", "0");
        put_string(&mut dict, "pricingParameters", PRICING_PARAMETER_BUY);
        put_string(&mut dict, "rebuy", "false");
        put_string(&mut dict, "productType", "C");
        put_string(&mut dict, "salableAdamId", item_id);
        put_string(&mut dict, "uuid", REQUEST_UUID);

        let mut buf = Vec::new();
        Value::Dictionary(dict).to_writer_xml(&mut buf)?;

        Ok(buf)
    }

    async fn confirm_download(
        &self,
        credentials: &Credentials,
        item_id: &str,
        download_id: &str,
    ) -> Result<(), PurchaseError> {
        let mut url = self
            .endpoints
            .confirm_download_url(self.region.pod_number())?;
        url.query_pairs_mut()
            .append_pair("download-id", download_id)
            .append_pair("guid", self.device.guid());

        let mut request = Request::new(Method::GET, url);
        let headers = request.headers_mut();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT_DOWNLOAD),
        );
        headers.insert(
            HEADER_STORE_FRONT,
            header_value(
                HEADER_STORE_FRONT,
                &self.region.storefront_header(DEVICE_CODE_TABLET),
            )?,
        );
        headers.insert(
            HEADER_DSID,
            header_value(HEADER_DSID, credentials.numeric_account_id())?,
        );
        headers.insert(
            HEADER_TOKEN,
            header_value(HEADER_TOKEN, credentials.session_token())?,
        );

        let response = self.transport.execute(request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(PurchaseError::UnexpectedStatus {
                step: PurchaseStep::ConfirmDownload,
                item_id: item_id.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(item_id, download_id, "download confirmed");

        Ok(())
    }

    fn build_manifest(
        &self,
        song: &SongItem,
        bundle_id: &str,
        credentials: &Credentials,
        item_id: &str,
    ) -> Result<Vec<u8>, PurchaseError> {
        let result = metadata::generate_manifest(
            song,
            bundle_id,
            credentials.account_id(),
            self.region.store_id(),
            &self.region.storefront_header(DEVICE_CODE_TABLET),
        );

        match result {
            Ok(manifest) => Ok(manifest),
            Err(source) => match self.metadata_mode {
                MetadataMode::Strict => Err(PurchaseError::MetadataEncode {
                    item_id: item_id.to_string(),
                    source,
                }),
                MetadataMode::Lenient => {
                    warn!(
                        item_id,
                        error = %source,
                        "metadata manifest encoding failed, substituting an empty manifest"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }
}

fn put_string(dict: &mut Dictionary, key: &str, value: &str) {
    dict.insert(key.to_string(), Value::String(value.to_string()));
}

fn header_value(
    name: &'static str,
    value: &str,
) -> Result<HeaderValue, PurchaseError> {
    HeaderValue::from_str(value).map_err(|source| PurchaseError::InvalidHeader { name, source })
}
