//! Storefront Protocol Client
//!
//! Client for the private HTTP/binary-plist protocol of a mobile
//! application storefront backend: catalog lookup, popularity charts,
//! account authentication, and the purchase flow that yields a signed
//! download descriptor (URL, DRM blob, metadata manifest and the headers
//! the artifact host requires).
//!
//! The session-bound endpoints are load-balanced across numbered backend
//! pods; the authentication flow resolves pod redirects itself and absorbs
//! the backend's one known spurious-rejection quirk. Responses are legacy
//! property lists, decoded with the `plist` crate.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mzstore::{Client, Device};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::builder("us")
//!     .account_id("user@example.com")
//!     .device(Device::desktop("9801A7A4ED7B", "hyperion")?)
//!     .build()?;
//!
//! client.authenticate("secret").await?;
//! client.set_purchase_certificate(std::env::var("STORE_CERTIFICATE")?);
//!
//! let descriptor = client.purchase("1118882627", 822467210).await?;
//! println!("{} -> {}", descriptor.bundle_id, descriptor.url);
//! # Ok(())
//! # }
//! ```
//!
//! Each `authenticate` call returns a fresh credentials value; the client
//! facade owns the copy it uses for purchases. Cancellation is cooperative:
//! dropping any in-flight future aborts its request at the transport.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod credentials;
pub mod device;
pub mod purchase;
pub mod store;
pub mod transport;

// Re-export commonly used types for convenience
pub use auth::{AuthClient, AuthError, AuthResponse, extract_pod};
pub use catalog::{
    CatalogClient, CatalogError, CatalogItem, Chart, ChartEntry, currency_label,
};
pub use client::{Client, ClientBuilder, ClientError};
pub use credentials::{Credentials, CredentialsError};
pub use device::{
    Device, DeviceError, USER_AGENT_CHART, USER_AGENT_CHART_PAGED, USER_AGENT_DESKTOP,
    USER_AGENT_DOWNLOAD,
};
pub use purchase::{
    DownloadDescriptor, MetadataMode, PurchaseClient, PurchaseError, PurchaseStep,
};
pub use store::{DEVICE_CODE_PHONE, DEVICE_CODE_TABLET, Region, Registry, StoreError};
pub use transport::{Endpoints, HttpTransport, Transport, TransportError};
