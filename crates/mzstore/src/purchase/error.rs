use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

/// Which purchase round trip an unexpected status came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStep {
    Buy,
    ConfirmDownload,
}

impl fmt::Display for PurchaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseStep::Buy => write!(f, "buy"),
            PurchaseStep::ConfirmDownload => write!(f, "confirm-download"),
        }
    }
}

/// Errors from the purchase flow. All are terminal for the call; any retry
/// policy beyond that is the caller's.
#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("credentials do not support purchasing")]
    CredentialsDoNotSupportPurchasing,

    #[error("{step} request for item '{item_id}' returned unexpected status {status}")]
    UnexpectedStatus {
        step: PurchaseStep,
        item_id: String,
        status: u16,
    },

    #[error(
        "item '{item_id}' requires the re-download flow, which needs a \
         different purchase certificate"
    )]
    ApplicationRequiresRedownload { item_id: String },

    #[error("download URL not found in buy response for item '{item_id}'")]
    DownloadUrlNotFound { item_id: String },

    #[error("buy response for item '{item_id}' contains {count} download URLs")]
    MultipleDownloadUrls { item_id: String, count: usize },

    #[error("no SINF found for item '{item_id}'")]
    NoSinfFound { item_id: String },

    #[error("buy response for item '{item_id}' contains {count} SINFs")]
    MultipleSinfs { item_id: String, count: usize },

    #[error("SINF is empty for item '{item_id}'")]
    SinfEmpty { item_id: String },

    #[error("bundle id not found in buy response for item '{item_id}'")]
    BundleIdNotFound { item_id: String },

    #[error("purchase certificate is not valid base64")]
    InvalidPurchaseCertificate(#[source] base64::DecodeError),

    #[error("failed to encode metadata manifest for item '{item_id}'")]
    MetadataEncode {
        item_id: String,
        #[source]
        source: plist::Error,
    },

    #[error("invalid value for header '{name}'")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("invalid purchase endpoint")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("property-list codec failure")]
    Plist(#[from] plist::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
