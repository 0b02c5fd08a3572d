//! Final output of a successful purchase.

use std::collections::HashMap;

/// Everything needed to fetch and assemble the purchased artifact.
///
/// Built once per purchase and handed to the caller; `headers` is the fixed
/// set the artifact host requires on the download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    pub bundle_id: String,
    pub url: String,
    pub download_key: String,
    pub download_id: String,

    /// Base64-encoded DRM blob authorizing installation.
    pub sinf: String,

    /// Base64-encoded metadata manifest to inject into the artifact.
    pub metadata: String,

    pub version_id: i64,

    /// The buy endpoint does not report the artifact size; callers that
    /// probe the artifact can fill this in.
    pub file_size: i64,

    pub headers: HashMap<String, String>,
}

impl DownloadDescriptor {
    pub fn with_file_size(mut self, file_size: i64) -> Self {
        self.file_size = file_size;
        self
    }
}
