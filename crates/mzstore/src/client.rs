//! Top-level client facade.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::{AuthClient, AuthError};
use crate::catalog::{CatalogClient, CatalogError, CatalogItem, Chart, ChartEntry};
use crate::credentials::{Credentials, CredentialsError};
use crate::device::Device;
use crate::purchase::{DownloadDescriptor, MetadataMode, PurchaseClient, PurchaseError};
use crate::store::{Registry, StoreError};
use crate::transport::{Endpoints, HttpTransport, Transport, TransportError};

/// Errors from client construction.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("a device identity is required")]
    MissingDevice,

    #[error("an account id or pre-built credentials are required")]
    MissingAccount,
}

/// Storefront client for one market and one account.
///
/// Owns the credentials for its lifetime: [`Client::authenticate`] swaps in
/// the fresh value the auth flow returns (keeping any purchase certificate
/// already attached), and [`Client::purchase`] reads it. Serialize
/// `authenticate` calls yourself if you share a client: concurrent purchases
/// are fine, concurrent logins are not.
pub struct Client {
    auth: AuthClient,
    purchase: PurchaseClient,
    catalog: CatalogClient,
    credentials: Credentials,
}

impl Client {
    pub fn builder(region_code: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            region_code: region_code.into(),
            account_id: None,
            credentials: None,
            device: None,
            transport: None,
            endpoints: Endpoints::default(),
            metadata_mode: MetadataMode::default(),
        }
    }

    /// The credentials the client currently holds.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Attach the out-of-band purchase certificate.
    pub fn set_purchase_certificate(&mut self, certificate: impl Into<String>) {
        self.credentials = self
            .credentials
            .clone()
            .with_purchase_certificate(certificate);
    }

    /// Authenticate the held account and replace the held credentials.
    ///
    /// The purchase certificate carried by the previous credentials (if any)
    /// is re-attached to the new session.
    pub async fn authenticate(&mut self, password: &str) -> Result<&Credentials, AuthError> {
        let fresh = self
            .auth
            .authenticate(self.credentials.account_id(), password)
            .await?;

        let certificate = self.credentials.purchase_certificate().to_string();
        self.credentials = if certificate.is_empty() {
            fresh
        } else {
            fresh.with_purchase_certificate(certificate)
        };

        Ok(&self.credentials)
    }

    /// Purchase an item version with the held credentials.
    pub async fn purchase(
        &self,
        item_id: &str,
        version_id: i64,
    ) -> Result<DownloadDescriptor, PurchaseError> {
        self.purchase
            .purchase(&self.credentials, item_id, version_id)
            .await
    }

    pub async fn lookup_by_item_id(
        &self,
        item_ids: &[String],
    ) -> Result<HashMap<String, CatalogItem>, CatalogError> {
        self.catalog.lookup_by_item_id(item_ids).await
    }

    pub async fn lookup_by_bundle_id(
        &self,
        bundle_ids: &[String],
    ) -> Result<HashMap<String, CatalogItem>, CatalogError> {
        self.catalog.lookup_by_bundle_id(bundle_ids).await
    }

    pub async fn top_chart(
        &self,
        genre_id: &str,
        chart: Chart,
        age_band: Option<&str>,
        from: usize,
        limit: usize,
    ) -> Result<Vec<ChartEntry>, CatalogError> {
        self.catalog
            .top_chart(genre_id, chart, age_band, from, limit)
            .await
    }

    pub async fn top_chart_page(
        &self,
        genre_id: &str,
        chart: Chart,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ChartEntry>, CatalogError> {
        self.catalog
            .top_chart_page(genre_id, chart, page, page_size)
            .await
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    region_code: String,
    account_id: Option<String>,
    credentials: Option<Credentials>,
    device: Option<Device>,
    transport: Option<Arc<dyn Transport>>,
    endpoints: Endpoints,
    metadata_mode: MetadataMode,
}

impl ClientBuilder {
    /// Account to operate as (starts unauthenticated).
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Pre-built credentials, e.g. from a previously established session.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Swap the transport (retry/logging/mock wrappers go here).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the endpoint set (tests point this at a mock server).
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn metadata_mode(mut self, mode: MetadataMode) -> Self {
        self.metadata_mode = mode;
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let region = Registry::new().get(&self.region_code)?;

        let credentials = match (self.credentials, self.account_id) {
            (Some(credentials), _) => credentials,
            (None, Some(account_id)) => Credentials::new(account_id)?,
            (None, None) => return Err(ClientError::MissingAccount),
        };

        let device = self.device.ok_or(ClientError::MissingDevice)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let auth = AuthClient::new(
            Arc::clone(&transport),
            region.clone(),
            device.clone(),
            self.endpoints.clone(),
        );
        let purchase = PurchaseClient::new(
            Arc::clone(&transport),
            region.clone(),
            device,
            self.endpoints.clone(),
        )
        .with_metadata_mode(self.metadata_mode);
        let catalog = CatalogClient::new(transport, region, self.endpoints);

        Ok(Client {
            auth,
            purchase,
            catalog,
            credentials,
        })
    }
}
