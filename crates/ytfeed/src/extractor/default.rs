use super::error::ExtractorError;
use reqwest::{
    Client,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use std::{sync::Arc, time::Duration};
use tracing::warn;

const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.8,en;q=0.5";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Settings for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    /// Sent as `Accept-Language`; localises titles and descriptions.
    pub accept_language: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            accept_language: None,
        }
    }
}

impl ClientOptions {
    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_accept_language(mut self, accept_language: Option<String>) -> Self {
        self.accept_language = accept_language;
        self
    }
}

pub fn default_client() -> Result<Client, ExtractorError> {
    create_client(ClientOptions::default())
}

pub fn create_client(options: ClientOptions) -> Result<Client, ExtractorError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_platform_verifier()?
        .with_no_client_auth();

    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_UA);

    let accept_language = options
        .accept_language
        .as_deref()
        .unwrap_or(DEFAULT_ACCEPT_LANGUAGE);
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(accept_language) {
        Ok(value) => {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        Err(e) => warn!("Ignoring accept language '{}': {}", accept_language, e),
    }

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls_config)
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(options.timeout);

    if let Some(config) = options.proxy {
        match reqwest::Proxy::all(&config.url) {
            Ok(mut proxy) => {
                if let (Some(username), Some(password)) = (config.username, config.password) {
                    proxy = proxy.basic_auth(&username, &password);
                }
                builder = builder.proxy(proxy);
            }
            Err(e) => {
                warn!("Failed to configure proxy '{}': {}", config.url, e);
            }
        }
    }

    Ok(builder.build()?)
}
