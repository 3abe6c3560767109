// ABOUTME: The main Client struct that fetches product pages and runs the extractor.
// ABOUTME: Provides async extract_url() and extract_html(), with direct or proxied fetching.

use serde::Serialize;
use url::Url;

use crate::error::FetchError;
use crate::extractors::{extract_with, ExtractOptions};
use crate::options::{ClientBuilder, FetchMode, Options};
use crate::product::ExtractedProduct;
use crate::resource::{fetch, redirect_policy, FetchOptions};

#[derive(Serialize)]
struct ProxyRequest<'a> {
    url: &'a str,
}

/// Client for extracting product data from URLs or HTML.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => build_http_client(&opts).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            }),
        };

        Self { opts, http_client }
    }

    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            brand_from_domain: self.opts.brand_from_domain,
        }
    }

    /// Extract product data from a URL.
    ///
    /// The whole operation, fetch included, is bounded by the configured timeout.
    pub async fn extract_url(&self, url: &str) -> Result<ExtractedProduct, FetchError> {
        let url = url.trim();
        validate_url(url, "ExtractURL")?;

        let work = async {
            match &self.opts.fetch_mode {
                FetchMode::Direct => self.extract_direct(url).await,
                FetchMode::Proxy { endpoint } => self.extract_via_proxy(endpoint, url).await,
            }
        };

        match tokio::time::timeout(self.opts.timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(
                url,
                "ExtractURL",
                Some(anyhow::anyhow!(
                    "no response within {}s",
                    self.opts.timeout.as_secs_f64()
                )),
            )),
        }
    }

    /// Extract product data from an HTML string, using `url` to resolve relative links.
    pub async fn extract_html(&self, html: &str, url: &str) -> Result<ExtractedProduct, FetchError> {
        let url = url.trim();
        validate_url(url, "ExtractHTML")?;
        Ok(extract_with(html, url, &self.extract_options()))
    }

    async fn extract_direct(&self, url: &str) -> Result<ExtractedProduct, FetchError> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };

        let fetched = fetch(&self.http_client, url, &fetch_opts).await?;
        let html = fetched.text();
        tracing::debug!(
            url,
            final_url = %fetched.final_url,
            bytes = fetched.body.len(),
            "fetched product page"
        );

        // Relative links resolve against the requested URL, which is what callers key records on.
        Ok(extract_with(&html, url, &self.extract_options()))
    }

    async fn extract_via_proxy(
        &self,
        endpoint: &str,
        url: &str,
    ) -> Result<ExtractedProduct, FetchError> {
        let target = format!("{}/extract", endpoint.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&target)
            .json(&ProxyRequest { url })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::timeout(url, "Proxy", Some(e.into()))
                } else {
                    FetchError::fetch(
                        url,
                        "Proxy",
                        Some(anyhow::anyhow!("request to {} failed: {}", target, e)),
                    )
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, "Proxy", status.as_u16()));
        }

        response.json::<ExtractedProduct>().await.map_err(|e| {
            FetchError::fetch(
                url,
                "Proxy",
                Some(anyhow::anyhow!("invalid extraction response: {}", e)),
            )
        })
    }
}

fn validate_url(url: &str, op: &str) -> Result<Url, FetchError> {
    if url.is_empty() {
        return Err(FetchError::invalid_url(url, op, None));
    }
    let parsed = Url::parse(url).map_err(|e| {
        FetchError::invalid_url(url, op, Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("unsupported scheme {}", other)),
        )),
    }
}

fn build_http_client(opts: &Options) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(redirect_policy(opts.allow_private_networks))
        .user_agent(&opts.user_agent)
        .timeout(opts.timeout)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}
