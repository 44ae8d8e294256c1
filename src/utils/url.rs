//! URL utilities for consistent URL handling
//!
//! This module provides utilities for normalizing base URLs when constructing
//! API endpoints, and the hostname rewrite the proxy gateway applies when no
//! worker binding is installed.

use reqwest::Url;

/// Normalize a base URL by removing trailing slashes
///
/// This ensures consistent URL construction when appending endpoints,
/// preventing double slashes in the final URLs.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:8788/", "api/chat"),
///     "http://127.0.0.1:8788/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Extract the hostname from a configured worker URL. Accepts a bare hostname
/// as well, so `worker-url` can be set either way.
pub fn worker_hostname(worker_url: &str) -> Option<String> {
    if let Ok(url) = Url::parse(worker_url) {
        if let Some(host) = url.host_str() {
            return Some(host.to_string());
        }
    }
    let bare = worker_url.trim();
    if !bare.is_empty()
        && !bare.contains('/')
        && !bare.contains(':')
        && !bare.contains(char::is_whitespace)
    {
        return Some(bare.to_string());
    }
    None
}

/// Rewrite only the hostname of `inbound`, leaving scheme, port, path, and
/// query untouched. This mirrors the relay contract: the gateway is a pure
/// host-rewriting relay and never touches the rest of the request URL.
pub fn rewrite_hostname(inbound: &Url, hostname: &str) -> Result<Url, String> {
    let mut target = inbound.clone();
    target
        .set_host(Some(hostname))
        .map_err(|e| format!("invalid worker hostname '{hostname}': {e}"))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8788"),
            "http://127.0.0.1:8788"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8788/"),
            "http://127.0.0.1:8788"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8788///"),
            "http://127.0.0.1:8788"
        );
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://127.0.0.1:8788", "api/chat"),
            "http://127.0.0.1:8788/api/chat"
        );
        assert_eq!(
            construct_api_url("http://127.0.0.1:8788/", "/api/chat"),
            "http://127.0.0.1:8788/api/chat"
        );
        assert_eq!(
            construct_api_url("https://worker.test.dev///", "api/hello"),
            "https://worker.test.dev/api/hello"
        );
    }

    #[test]
    fn hostname_is_extracted_from_urls_and_bare_names() {
        assert_eq!(
            worker_hostname("https://ai-worker.example.workers.dev").as_deref(),
            Some("ai-worker.example.workers.dev")
        );
        assert_eq!(
            worker_hostname("https://worker.test.dev/api/").as_deref(),
            Some("worker.test.dev")
        );
        assert_eq!(
            worker_hostname("worker.test.dev").as_deref(),
            Some("worker.test.dev")
        );
        assert_eq!(worker_hostname(""), None);
        assert_eq!(worker_hostname("not a url at all"), None);
    }

    #[test]
    fn rewrite_replaces_only_the_hostname() {
        let inbound = Url::parse("http://pages.example.dev:8788/foo/bar?x=1").unwrap();
        let target = rewrite_hostname(&inbound, "ai-worker.example.workers.dev").unwrap();

        assert_eq!(
            target.as_str(),
            "http://ai-worker.example.workers.dev:8788/foo/bar?x=1"
        );
        assert_eq!(target.scheme(), "http");
        assert_eq!(target.port(), Some(8788));
        assert_eq!(target.path(), "/foo/bar");
        assert_eq!(target.query(), Some("x=1"));
    }

    #[test]
    fn rewrite_preserves_default_ports_and_empty_queries() {
        let inbound = Url::parse("https://pages.example.dev/api/chat").unwrap();
        let target = rewrite_hostname(&inbound, "worker.test.dev").unwrap();
        assert_eq!(target.as_str(), "https://worker.test.dev/api/chat");
        assert_eq!(target.query(), None);
    }
}
