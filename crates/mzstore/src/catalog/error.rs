use thiserror::Error;

use crate::transport::TransportError;

/// Errors from the catalog and chart endpoints.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request to '{url}' returned unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("no results found for ids: {ids}")]
    NoResultsFound { ids: String },

    #[error("chart response has an unexpected shape: {reason}")]
    UnexpectedShape { reason: String },

    #[error("invalid catalog endpoint")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to decode catalog response")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
