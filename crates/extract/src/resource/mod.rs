// ABOUTME: Resource handling module for fetching product pages over HTTP.
// ABOUTME: Handles SSRF protection, browser-like headers, content-length limits, status mapping, and charset decoding.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};

use bytes::Bytes;
use ipnet::IpNet;
use once_cell::sync::Lazy;
use url::Url;

use crate::error::FetchError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Headers sent with every page request unless overridden.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
];

const OP: &str = "Fetch";

static BLOCKED_NETS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        // RFC1918
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        // loopback, link-local, unspecified
        "127.0.0.0/8",
        "169.254.0.0/16",
        "0.0.0.0/8",
        // carrier-grade NAT
        "100.64.0.0/10",
        "::1/128",
        "::/128",
        // unique local, link-local
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|net| net.parse().unwrap())
    .collect()
});

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using charset hints from the content-type header.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    let addr = match addr {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(*v6)),
        v4 => *v4,
    };
    BLOCKED_NETS.iter().any(|net| net.contains(&addr))
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// Rejects hosts that are, or resolve to, private addresses.
async fn ensure_public_host(target: &Url, url: &str, what: &str) -> Result<(), FetchError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    let blocked = || {
        FetchError::ssrf(
            url,
            OP,
            Some(anyhow::anyhow!("{} is not allowed", what)),
        )
    };

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return if is_private_ip(&ip) { Err(blocked()) } else { Ok(()) };
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        FetchError::fetch(url, OP, Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(blocked());
        }
    }
    Ok(())
}

/// Raised by [`redirect_policy`] when a redirect targets a private address.
#[derive(Debug)]
pub struct BlockedRedirect {
    target: String,
}

impl fmt::Display for BlockedRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redirect to private IP address {} blocked", self.target)
    }
}

impl StdError for BlockedRedirect {}

fn redirect_target_is_private(target: &Url) -> Result<bool, std::io::Error> {
    let Some(host) = target.host_str() else {
        return Ok(false);
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(is_private_ip(&ip));
    }
    // synchronous DNS resolution to avoid async in redirect policy
    let port = target.port_or_known_default().unwrap_or(80);
    let mut addrs = (host, port).to_socket_addrs()?;
    Ok(addrs.any(|sa| is_private_ip(&sa.ip())))
}

/// Redirect policy that follows up to 10 hops and, unless private networks
/// are allowed, refuses hops that land on a private address.
pub fn redirect_policy(allow_private_networks: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= 10 {
            return attempt.error("too many redirects");
        }
        if allow_private_networks {
            return attempt.follow();
        }
        match redirect_target_is_private(attempt.url()) {
            Ok(false) => attempt.follow(),
            Ok(true) => {
                let target = attempt.url().to_string();
                attempt.error(BlockedRedirect { target })
            }
            Err(_) => attempt.error("DNS lookup failed during redirect"),
        }
    })
}

fn is_blocked_redirect(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.is::<BlockedRedirect>() {
            return true;
        }
        source = inner.source();
    }
    false
}

fn request_error(url: &str, err: reqwest::Error, context: &str) -> FetchError {
    if err.is_redirect() && is_blocked_redirect(&err) {
        FetchError::ssrf(url, OP, Some(anyhow::anyhow!("{}: {}", context, err)))
    } else if err.is_timeout() {
        FetchError::timeout(url, OP, Some(anyhow::anyhow!("{}: {}", context, err)))
    } else {
        FetchError::fetch(url, OP, Some(anyhow::anyhow!("{}: {}", context, err)))
    }
}

/// Fetch a page from the given URL.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, FetchError> {
    if url.is_empty() {
        return Err(FetchError::invalid_url(url, OP, None));
    }

    let parsed_url = Url::parse(url).map_err(|e| {
        FetchError::invalid_url(url, OP, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(FetchError::invalid_url(
            url,
            OP,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        ensure_public_host(&parsed_url, url, "private IP address").await?;
    }

    let mut request = client.get(url);
    for (key, value) in DEFAULT_HEADERS {
        let overridden = opts.headers.keys().any(|k| k.eq_ignore_ascii_case(key));
        if !overridden {
            request = request.header(*key, *value);
        }
    }
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| request_error(url, e, "request failed"))?;

    // The redirect target can point somewhere the original host did not.
    if !opts.allow_private_networks {
        let landed = response.url().clone();
        ensure_public_host(&landed, url, "redirect to private IP address").await?;
    }

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "upstream returned non-success status");
        return Err(FetchError::http_status(url, OP, status.as_u16()));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(FetchError::fetch(
                url,
                OP,
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response
        .bytes()
        .await
        .map_err(|e| request_error(url, e, "failed to read body"))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(FetchError::fetch(
            url,
            OP,
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    Ok(FetchResult {
        status: status.as_u16(),
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
