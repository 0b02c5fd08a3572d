//! Wire endpoints, templated by backend pod number.

use url::Url;

/// Placeholder substituted with the pod number in session-bound templates.
pub const POD_PLACEHOLDER: &str = "{pod}";

/// Endpoint set the client talks to.
///
/// The session-bound templates (`login`, `buy`, `confirm_download`) carry a
/// [`POD_PLACEHOLDER`]; the catalog endpoints are fixed hosts. Defaults are
/// the production backend; tests point every field at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub login: String,
    pub buy: String,
    pub confirm_download: String,
    pub lookup: String,
    pub chart: String,
    pub chart_paged: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "https://p{pod}-buy.itunes.apple.com/WebObjects/MZFinance.woa/wa/authenticate"
                .to_string(),
            buy: "https://p{pod}-buy.itunes.apple.com/WebObjects/MZBuy.woa/wa/buyProduct"
                .to_string(),
            confirm_download:
                "https://p{pod}-buy.itunes.apple.com/WebObjects/MZFastFinance.woa/wa/songDownloadDone"
                    .to_string(),
            lookup: "https://uclient-api.itunes.apple.com/WebObjects/MZStorePlatform.woa/wa/lookup"
                .to_string(),
            chart: "https://itunes.apple.com/WebObjects/MZStore.woa/wa/viewTop".to_string(),
            chart_paged: "https://itunes.apple.com/WebObjects/MZStore.woa/wa/topChartFragmentData"
                .to_string(),
        }
    }
}

impl Endpoints {
    pub fn login_url(&self, pod: u32) -> Result<Url, url::ParseError> {
        pod_url(&self.login, pod)
    }

    pub fn buy_url(&self, pod: u32) -> Result<Url, url::ParseError> {
        pod_url(&self.buy, pod)
    }

    pub fn confirm_download_url(&self, pod: u32) -> Result<Url, url::ParseError> {
        pod_url(&self.confirm_download, pod)
    }

    pub fn lookup_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.lookup)
    }

    pub fn chart_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.chart)
    }

    pub fn chart_paged_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.chart_paged)
    }
}

fn pod_url(template: &str, pod: u32) -> Result<Url, url::ParseError> {
    Url::parse(&template.replace(POD_PLACEHOLDER, &pod.to_string()))
}
