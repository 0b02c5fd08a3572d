//! Login handshake against a region's backend pod.
//!
//! Two backend quirks shape this flow. Session-bound operations are
//! load-balanced across numbered pods, and a login that lands on the wrong
//! one is answered with a 302 pointing at the right pod rather than being
//! proxied. The flow follows those hops itself, re-sending the login with
//! the same attempt counter. Separately, the first attempt against the right
//! pod is sometimes rejected with failure code `-5000` even when the
//! credentials are valid; that exact case is retried once with the attempt
//! counter bumped to 2, and any further rejection is taken at face value.

mod error;
mod pod;
mod response;

pub use error::AuthError;
pub use pod::extract_pod;
pub use response::AuthResponse;

use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use reqwest::{Method, Request, StatusCode};
use tracing::{debug, warn};
use url::{Url, form_urlencoded};

use crate::credentials::Credentials;
use crate::device::Device;
use crate::store::{DEVICE_CODE_TABLET, Region};
use crate::transport::{
    CONTENT_TYPE_FORM, Endpoints, HEADER_STORE_FRONT, Transport, read_body,
};

/// Pod hops the flow follows before giving up.
const MAX_POD_HOPS: u32 = 4;

/// Failure code the backend sometimes returns for a valid first attempt.
const SPURIOUS_FAILURE_CODE: &str = "-5000";

/// The spurious rejection is only recognized on attempt 1; attempt 2 takes
/// the code at face value.
fn is_spurious_first_attempt(code: &str, attempt: u32) -> bool {
    code == SPURIOUS_FAILURE_CODE && attempt == 1
}

/// Drives the login handshake for one region.
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    region: Region,
    device: Device,
    endpoints: Endpoints,
}

impl AuthClient {
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
        }
    }

    /// Authenticate an account, producing fresh session credentials.
    ///
    /// The returned value is new; the caller decides whether to replace the
    /// credentials it holds.
    pub async fn authenticate(
        &self,
        account_id: &str,
        password: &str,
    ) -> Result<Credentials, AuthError> {
        if account_id.is_empty() {
            return Err(AuthError::EmptyAccountId);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let mut pod = self.region.pod_number();
        let mut attempt = 1u32;
        let mut hops = 0u32;

        loop {
            let request = self.login_request(account_id, password, pod, attempt)?;
            let response = self.transport.execute(request).await?;
            let status = response.status();

            if status == StatusCode::FOUND {
                hops += 1;
                if hops > MAX_POD_HOPS {
                    return Err(AuthError::AuthenticationFailed {
                        account_id: account_id.to_string(),
                        code: None,
                        message: format!(
                            "pod redirect budget exhausted after {MAX_POD_HOPS} hops"
                        ),
                    });
                }

                let next = redirect_target(&response)
                    .map(|target| extract_pod(&target, pod))
                    .unwrap_or(pod);
                debug!(from = pod, to = next, hop = hops, "login redirected to another pod");
                pod = next;
                continue;
            }

            if status != StatusCode::OK {
                return Err(AuthError::UnexpectedStatus {
                    account_id: account_id.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = read_body(response).await?;
            let auth: AuthResponse = plist::from_bytes(&body)?;

            if let Some(code) = auth.failure_code() {
                if is_spurious_first_attempt(code, attempt) {
                    warn!(account_id, "first login attempt spuriously rejected, retrying once");
                    attempt = 2;
                    continue;
                }

                let message = if auth.customer_message.is_empty() {
                    format!("backend rejected login with failure code {code}")
                } else {
                    auth.customer_message.clone()
                };

                return Err(AuthError::AuthenticationFailed {
                    account_id: account_id.to_string(),
                    code: Some(code.to_string()),
                    message,
                });
            }

            if auth.password_token.is_empty() {
                return Err(AuthError::PasswordTokenNotFound {
                    account_id: account_id.to_string(),
                });
            }
            if auth.ds_person_id.is_empty() {
                return Err(AuthError::DsidNotFound {
                    account_id: account_id.to_string(),
                });
            }

            debug!(account_id, pod, "authenticated");

            return Ok(Credentials::with_session(
                account_id,
                auth.password_token,
                auth.ds_person_id,
            )?);
        }
    }

    fn login_request(
        &self,
        account_id: &str,
        password: &str,
        pod: u32,
        attempt: u32,
    ) -> Result<Request, AuthError> {
        let mut url = self.endpoints.login_url(pod)?;
        ensure_pod_params(&mut url, pod);

        let mut body = form_urlencoded::Serializer::new(String::new());
        body.append_pair("appleId", account_id)
            .append_pair("password", password)
            .append_pair("guid", self.device.guid())
            .append_pair("machineName", self.device.machine_name())
            .append_pair("attempt", &attempt.to_string())
            .append_pair("createSession", "true")
            .append_pair("why", "signIn")
            .append_pair("rmp", "0");
        let body = body.finish();

        let mut request = Request::new(Method::POST, url);
        let headers = request.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(self.device.user_agent()).map_err(|source| {
                AuthError::InvalidHeader {
                    name: "user-agent",
                    source,
                }
            })?,
        );
        headers.insert(
            HEADER_STORE_FRONT,
            HeaderValue::from_str(&self.region.storefront_header(DEVICE_CODE_TABLET)).map_err(
                |source| AuthError::InvalidHeader {
                    name: HEADER_STORE_FRONT,
                    source,
                },
            )?,
        );
        *request.body_mut() = Some(body.into());

        Ok(request)
    }
}

/// Add the `Pod`/`PRH` routing parameters unless the endpoint already
/// carries them.
fn ensure_pod_params(url: &mut Url, pod: u32) {
    let has_pod = url.query_pairs().any(|(key, _)| key == "Pod");
    let has_prh = url.query_pairs().any(|(key, _)| key == "PRH");
    let pod_value = pod.to_string();

    let mut pairs = url.query_pairs_mut();
    if !has_pod {
        pairs.append_pair("Pod", &pod_value);
    }
    if !has_prh {
        pairs.append_pair("PRH", &pod_value);
    }
}

fn redirect_target(response: &reqwest::Response) -> Option<Url> {
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    response.url().join(location).ok()
}
