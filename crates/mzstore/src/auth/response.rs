//! Wire model for the login endpoint.

use serde::Deserialize;

/// Decoded login response body (a property list).
///
/// Failure responses carry `failureType`/`customerMessage` instead of the
/// session fields; the balance fields ride along on success and are kept for
/// wire fidelity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default, rename = "passwordToken")]
    pub password_token: String,

    #[serde(default, rename = "dsPersonId")]
    pub ds_person_id: String,

    #[serde(default, rename = "failureType")]
    pub failure_type: String,

    #[serde(default, rename = "customerMessage")]
    pub customer_message: String,

    #[serde(default, rename = "creditBalance")]
    pub credit_balance: String,

    #[serde(default, rename = "freeSongBalance")]
    pub free_song_balance: String,
}

impl AuthResponse {
    /// The backend failure code, if the response carries one.
    pub fn failure_code(&self) -> Option<&str> {
        if self.failure_type.is_empty() {
            None
        } else {
            Some(&self.failure_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_success_body() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict>
<key>passwordToken</key><string>tok</string>
<key>dsPersonId</key><string>123</string>
<key>creditBalance</key><string>0</string>
</dict></plist>"#;

        let decoded: AuthResponse = plist::from_bytes(body.as_bytes()).unwrap();
        assert_eq!(decoded.password_token, "tok");
        assert_eq!(decoded.ds_person_id, "123");
        assert_eq!(decoded.failure_code(), None);
    }

    #[test]
    fn decodes_a_failure_body() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict>
<key>failureType</key><string>-5000</string>
<key>customerMessage</key><string>Your account information was entered incorrectly.</string>
</dict></plist>"#;

        let decoded: AuthResponse = plist::from_bytes(body.as_bytes()).unwrap();
        assert_eq!(decoded.failure_code(), Some("-5000"));
        assert!(decoded.password_token.is_empty());
    }
}
