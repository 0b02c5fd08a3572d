use std::collections::HashMap;

use super::region::{Region, StoreError};

/// `(region code, store id, backend pod number)` per supported market.
const REGION_TABLE: &[(&str, u32, u32)] = &[
    ("us", 143441, 36),
    ("ru", 143469, 45),
    ("gb", 143444, 71),
    ("ca", 143455, 71),
    ("fr", 143442, 71),
    ("hk", 143463, 71),
    ("br", 143503, 36),
    ("de", 143443, 36),
    ("jp", 143462, 36),
    ("id", 143476, 28),
    ("kr", 143466, 55),
    ("au", 143460, 55),
    ("in", 143467, 12),
    ("it", 143450, 12),
    ("my", 143473, 55),
    ("mx", 143468, 36),
    ("nl", 143452, 38),
    ("nz", 143461, 42),
    ("sg", 143464, 42),
    ("es", 143454, 40),
    ("za", 143472, 50),
    ("tw", 143470, 70),
    ("th", 143475, 36),
    ("ae", 143481, 36),
    ("vn", 143471, 18),
    ("cn", 143465, 33),
    ("pt", 143453, 39),
    ("tr", 143480, 39),
    ("ar", 143505, 11),
];

/// Read-only registry of supported markets, built once at client
/// construction and passed around by reference.
#[derive(Debug, Clone)]
pub struct Registry {
    regions: HashMap<&'static str, Region>,
}

impl Registry {
    pub fn new() -> Self {
        let mut regions = HashMap::with_capacity(REGION_TABLE.len());
        for &(code, store_id, pod_number) in REGION_TABLE {
            if let Ok(region) = Region::new(code, store_id, pod_number) {
                regions.insert(code, region);
            }
        }

        Self { regions }
    }

    /// Look up a market by region code (case- and whitespace-insensitive).
    pub fn get(&self, region_code: &str) -> Result<Region, StoreError> {
        let normalized = region_code.trim().to_ascii_lowercase();
        self.regions
            .get(normalized.as_str())
            .cloned()
            .ok_or(StoreError::UnsupportedRegion(normalized))
    }

    /// All supported region codes.
    pub fn region_codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.regions.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_all_table_entries() {
        let registry = Registry::new();
        assert_eq!(registry.region_codes().count(), REGION_TABLE.len());
    }

    #[test]
    fn lookup_normalizes_the_code() {
        let registry = Registry::new();
        let region = registry.get(" RU ").unwrap();
        assert_eq!(region.store_id(), 143469);
        assert_eq!(region.pod_number(), 45);
    }

    #[test]
    fn unknown_regions_are_rejected() {
        let registry = Registry::new();
        assert!(matches!(
            registry.get("xx"),
            Err(StoreError::UnsupportedRegion(code)) if code == "xx"
        ));
    }
}
