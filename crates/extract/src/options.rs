// ABOUTME: Configuration options for the product client including FetchMode, Options, and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;

/// Browser User-Agent sent by default; many storefronts serve bots a stripped page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default bound on a single extraction from a URL.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where `extract_url` gets its data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Fetch the page and run the extractor in-process.
    #[default]
    Direct,
    /// Delegate to a remote extraction service: `POST <endpoint>/extract`.
    Proxy { endpoint: String },
}

/// Configuration options for the client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub fetch_mode: FetchMode,
    pub brand_from_domain: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_networks: false,
            http_client: None,
            headers: HashMap::new(),
            fetch_mode: FetchMode::Direct,
            brand_from_domain: false,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the timeout for a whole extraction.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Choose between in-process extraction and a remote extraction service.
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.opts.fetch_mode = mode;
        self
    }

    /// Fall back to a brand derived from the page's host name.
    pub fn brand_from_domain(mut self, enabled: bool) -> Self {
        self.opts.brand_from_domain = enabled;
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
