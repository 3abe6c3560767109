// ABOUTME: Server configuration loaded from environment variables and an optional .env file.
// ABOUTME: Builds the extraction client the routes share.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use closet_extract::options::DEFAULT_USER_AGENT;
use closet_extract::Client;
use dotenvy::dotenv;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fetch_timeout: Duration,
    pub allow_private_networks: bool,
    pub brand_from_domain: bool,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            fetch_timeout: Duration::from_secs(10),
            allow_private_networks: false,
            brand_from_domain: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: match env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a valid number")?,
                Err(_) => defaults.port,
            },
            fetch_timeout: match env::var("FETCH_TIMEOUT_SECS") {
                Ok(secs) => Duration::from_secs(
                    secs.parse()
                        .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => defaults.fetch_timeout,
            },
            allow_private_networks: env_flag("ALLOW_PRIVATE_NETWORKS")?
                .unwrap_or(defaults.allow_private_networks),
            brand_from_domain: env_flag("BRAND_FROM_DOMAIN")?
                .unwrap_or(defaults.brand_from_domain),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn build_client(&self) -> Client {
        Client::builder()
            .timeout(self.fetch_timeout)
            .user_agent(self.user_agent.clone())
            .allow_private_networks(self.allow_private_networks)
            .brand_from_domain(self.brand_from_domain)
            .build()
    }
}

fn env_flag(key: &str) -> Result<Option<bool>> {
    match env::var(key) {
        Ok(value) => parse_flag(&value)
            .map(Some)
            .with_context(|| format!("{} must be true or false, got {:?}", key, value)),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
