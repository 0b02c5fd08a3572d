use thiserror::Error;

use crate::credentials::CredentialsError;
use crate::transport::TransportError;

/// Errors from the authentication flow. All are terminal for the call; the
/// only retries are the two the flow performs itself (pod hops and the one
/// spurious-failure attempt).
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("account id cannot be empty")]
    EmptyAccountId,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("login for '{account_id}' returned unexpected status {status}")]
    UnexpectedStatus { account_id: String, status: u16 },

    #[error("authentication failed for '{account_id}': {message}")]
    AuthenticationFailed {
        account_id: String,
        code: Option<String>,
        message: String,
    },

    #[error("password token not found in login response for '{account_id}'")]
    PasswordTokenNotFound { account_id: String },

    #[error("numeric account id not found in login response for '{account_id}'")]
    DsidNotFound { account_id: String },

    #[error("invalid value for header '{name}'")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("invalid login endpoint")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to decode login response")]
    Decode(#[from] plist::Error),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
