//! Pod resolution for load-balancer redirects.

use url::Url;

/// Resolve the pod number a login redirect points at.
///
/// Precedence: the `Pod` query parameter, then a `pNN-` hostname prefix,
/// then the pod the redirected request was addressed to.
pub fn extract_pod(redirect_url: &Url, fallback_pod: u32) -> u32 {
    let from_query = redirect_url
        .query_pairs()
        .find(|(key, _)| key == "Pod")
        .and_then(|(_, value)| value.parse().ok());

    if let Some(pod) = from_query {
        return pod;
    }

    if let Some(pod) = redirect_url.host_str().and_then(pod_from_host) {
        return pod;
    }

    fallback_pod
}

fn pod_from_host(host: &str) -> Option<u32> {
    let rest = host.strip_prefix('p')?;
    let digits = &rest[..rest.find('-')?];
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn query_parameter_wins() {
        let target = url("https://p71-buy.example.com/login?Pod=25&PRH=25");
        assert_eq!(extract_pod(&target, 36), 25);
    }

    #[test]
    fn hostname_prefix_is_second() {
        let target = url("https://p71-buy.example.com/login");
        assert_eq!(extract_pod(&target, 36), 71);
    }

    #[test]
    fn falls_back_to_the_current_pod() {
        let target = url("https://buy.example.com/login");
        assert_eq!(extract_pod(&target, 36), 36);

        // A `p`-prefixed host without a numeric run is not a pod host.
        let target = url("https://production.example.com/login");
        assert_eq!(extract_pod(&target, 36), 36);
    }

    #[test]
    fn malformed_query_value_falls_through_to_the_host() {
        let target = url("https://p71-buy.example.com/login?Pod=abc");
        assert_eq!(extract_pod(&target, 36), 71);
    }
}
