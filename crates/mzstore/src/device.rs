//! Device identity attached to every session-bound storefront request.

use thiserror::Error;

/// User agent the segmented chart endpoint expects.
pub const USER_AGENT_CHART: &str =
    "AppStore/2.0 iOS/9.0 model/iPhone6,1 hwp/s5l8960x build/13A344 (6; dt:89)";

/// User agent the paginated chart endpoint expects.
pub const USER_AGENT_CHART_PAGED: &str = "iTunes-iPad/5.1.1 (64GB; dt:28)";

/// User agent the confirm-download and artifact endpoints expect.
pub const USER_AGENT_DOWNLOAD: &str =
    "itunesstored/1.0 iOS/9.0 model/iPhone6,1 hwp/s5l8960x build/13A344 (6; dt:89)";

/// Legacy desktop client user agent accepted by the login and buy endpoints.
pub const USER_AGENT_DESKTOP: &str = "iTunes/10.6 (Windows; Microsoft Windows 7 x64 \
     Ultimate Edition Service Pack 1 (Build 7601)) AppleWebKit/534.54.16";

/// Errors from [`Device`] construction.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device GUID cannot be empty")]
    EmptyGuid,

    #[error("machine name cannot be empty")]
    EmptyMachineName,

    #[error("user agent cannot be empty")]
    EmptyUserAgent,
}

/// Identifier triple the backend associates with an installation.
///
/// Immutable once built; the GUID is the installation identity the backend
/// binds sessions and download confirmations to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    guid: String,
    machine_name: String,
    user_agent: String,
}

impl Device {
    /// Create a device identity. All three components must be non-empty.
    pub fn new(
        guid: impl Into<String>,
        machine_name: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Result<Self, DeviceError> {
        let guid = guid.into();
        let machine_name = machine_name.into();
        let user_agent = user_agent.into();

        if guid.is_empty() {
            return Err(DeviceError::EmptyGuid);
        }
        if machine_name.is_empty() {
            return Err(DeviceError::EmptyMachineName);
        }
        if user_agent.is_empty() {
            return Err(DeviceError::EmptyUserAgent);
        }

        Ok(Self {
            guid,
            machine_name,
            user_agent,
        })
    }

    /// Device identity presenting as the legacy desktop client.
    pub fn desktop(
        guid: impl Into<String>,
        machine_name: impl Into<String>,
    ) -> Result<Self, DeviceError> {
        Self::new(guid, machine_name, USER_AGENT_DESKTOP)
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
