//! Session credentials for a storefront account.

use thiserror::Error;

/// Errors from [`Credentials`] construction.
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("account id cannot be empty")]
    EmptyAccountId,

    #[error("session token cannot be empty")]
    EmptySessionToken,

    #[error("numeric account id cannot be empty")]
    EmptyNumericAccountId,
}

/// Credentials for one storefront account.
///
/// A value starts out unauthenticated (account id only). The authentication
/// flow produces a fresh value carrying the session token and numeric account
/// id; the purchase certificate is provisioned out of band and attached by
/// the caller. The session lives only as long as this value does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    account_id: String,
    session_token: String,
    numeric_account_id: String,
    purchase_certificate: String,
}

impl Credentials {
    /// Create unauthenticated credentials for an account.
    pub fn new(account_id: impl Into<String>) -> Result<Self, CredentialsError> {
        let account_id = account_id.into();
        if account_id.is_empty() {
            return Err(CredentialsError::EmptyAccountId);
        }

        Ok(Self {
            account_id,
            session_token: String::new(),
            numeric_account_id: String::new(),
            purchase_certificate: String::new(),
        })
    }

    /// Create credentials from a previously established session.
    pub fn with_session(
        account_id: impl Into<String>,
        session_token: impl Into<String>,
        numeric_account_id: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let mut credentials = Self::new(account_id)?;

        let session_token = session_token.into();
        if session_token.is_empty() {
            return Err(CredentialsError::EmptySessionToken);
        }

        let numeric_account_id = numeric_account_id.into();
        if numeric_account_id.is_empty() {
            return Err(CredentialsError::EmptyNumericAccountId);
        }

        credentials.session_token = session_token;
        credentials.numeric_account_id = numeric_account_id;

        Ok(credentials)
    }

    /// Attach the base64 purchase certificate required to buy artifacts.
    pub fn with_purchase_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.purchase_certificate = certificate.into();
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn numeric_account_id(&self) -> &str {
        &self.numeric_account_id
    }

    pub fn purchase_certificate(&self) -> &str {
        &self.purchase_certificate
    }

    /// A session token and numeric account id are both present.
    pub fn is_authenticated(&self) -> bool {
        !self.session_token.is_empty() && !self.numeric_account_id.is_empty()
    }

    /// Authenticated and holding a purchase certificate.
    pub fn can_purchase(&self) -> bool {
        self.is_authenticated() && !self.purchase_certificate.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_credentials_are_unauthenticated() {
        let credentials = Credentials::new("user@example.com").unwrap();
        assert!(!credentials.is_authenticated());
        assert!(!credentials.can_purchase());
    }

    #[test]
    fn session_credentials_are_authenticated() {
        let credentials = Credentials::with_session("user@example.com", "tok", "123").unwrap();
        assert!(credentials.is_authenticated());
        assert_eq!(credentials.session_token(), "tok");
        assert_eq!(credentials.numeric_account_id(), "123");
    }

    #[test]
    fn certificate_is_required_to_purchase() {
        // Authenticated but certificate-less credentials must not purchase.
        let credentials = Credentials::with_session("user@example.com", "tok", "123").unwrap();
        assert!(!credentials.can_purchase());

        let credentials = credentials.with_purchase_certificate("a2JzeW5j");
        assert!(credentials.can_purchase());
    }

    #[test]
    fn certificate_alone_is_not_enough() {
        let credentials = Credentials::new("user@example.com")
            .unwrap()
            .with_purchase_certificate("a2JzeW5j");
        assert!(!credentials.can_purchase());
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(matches!(
            Credentials::new(""),
            Err(CredentialsError::EmptyAccountId)
        ));
        assert!(matches!(
            Credentials::with_session("user@example.com", "", "123"),
            Err(CredentialsError::EmptySessionToken)
        ));
        assert!(matches!(
            Credentials::with_session("user@example.com", "tok", ""),
            Err(CredentialsError::EmptyNumericAccountId)
        ));
    }
}
