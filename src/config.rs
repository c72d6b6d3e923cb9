use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use reqwest::{Client, ClientBuilder};
use crate::error::{AppError, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_FULL_DATA_PREFIX: &str = "news/full/";
const DEFAULT_SUMMARIZED_PREFIX: &str = "news/summarized/";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom S3-compatible endpoint (MinIO, LocalStack). Unset means AWS.
    pub endpoint: Option<String>,
    pub full_data_prefix: String,
    pub summarized_prefix: String,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub feed_url: String,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    /// Per-request deadline for outbound calls. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} is not set", name)))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let feed_url = required("NEWS_RSS_FEED_URL")?;

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: optional("GEMINI_API_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        };

        let storage = StorageConfig {
            bucket: required("S3_BUCKET")?,
            region: optional("AWS_REGION", DEFAULT_REGION),
            endpoint: lookup("S3_ENDPOINT")
                .filter(|value| !value.trim().is_empty())
                .map(|value| value.trim_end_matches('/').to_string()),
            full_data_prefix: optional("S3_FULL_DATA_PREFIX", DEFAULT_FULL_DATA_PREFIX),
            summarized_prefix: optional("S3_SUMMARIZED_PREFIX", DEFAULT_SUMMARIZED_PREFIX),
        };

        // Load server configuration with defaults
        let host = optional("HOST", "127.0.0.1");
        let port = optional("PORT", "3000");
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid HOST address: {}", e)))?;

        let request_timeout = match lookup("HTTP_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(AppError::Config(format!(
                        "Invalid HTTP_TIMEOUT_SECS: expected a positive number of seconds, got {:?}",
                        raw
                    )));
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
            },
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            feed_url,
            gemini,
            storage,
            request_timeout,
        })
    }

    /// Shared outbound client for the feed, article pages and the generative API.
    pub fn http_client(&self) -> Result<Client> {
        build_http_client(self.request_timeout)
    }
}

pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .user_agent(concat!("news-digest/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
