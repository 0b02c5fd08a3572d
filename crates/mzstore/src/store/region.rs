use thiserror::Error;

/// Device code for phone-class storefront headers.
pub const DEVICE_CODE_PHONE: u32 = 29;

/// Device code for tablet-class storefront headers; the session-bound
/// endpoints are driven with this one.
pub const DEVICE_CODE_TABLET: u32 = 32;

/// Errors from region construction and registry lookups.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("region code cannot be empty")]
    EmptyRegionCode,

    #[error("store id must be positive")]
    InvalidStoreId,

    #[error("pod number must be positive")]
    InvalidPodNumber,

    #[error("unsupported region: '{0}'")]
    UnsupportedRegion(String),
}

/// One market's storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    region_code: String,
    store_id: u32,
    pod_number: u32,
}

impl Region {
    /// Create a region. The code is trimmed and lowercased; store id and pod
    /// number must be positive.
    pub fn new(region_code: &str, store_id: u32, pod_number: u32) -> Result<Self, StoreError> {
        let region_code = region_code.trim().to_ascii_lowercase();
        if region_code.is_empty() {
            return Err(StoreError::EmptyRegionCode);
        }
        if store_id == 0 {
            return Err(StoreError::InvalidStoreId);
        }
        if pod_number == 0 {
            return Err(StoreError::InvalidPodNumber);
        }

        Ok(Self {
            region_code,
            store_id,
            pod_number,
        })
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    pub fn store_id(&self) -> u32 {
        self.store_id
    }

    pub fn pod_number(&self) -> u32 {
        self.pod_number
    }

    /// Storefront header value for the given device code.
    pub fn storefront_header(&self, device_code: u32) -> String {
        format!("{},{}", self.store_id, device_code)
    }
}
