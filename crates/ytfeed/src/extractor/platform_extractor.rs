use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Source of raw page bodies.
///
/// The classifier never sees a failed fetch: whoever holds a fetcher decides
/// what an `Err` means (usually "no page available").
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractorError>;
}

/// HTTP page fetcher with per-platform headers and a cookie store.
///
/// # Example Usage
///
/// ```rust,no_run
/// use ytfeed_parser::extractor::{default_client, platform_extractor::{Extractor, PageFetcher}};
///
/// # async fn run() -> Result<(), ytfeed_parser::extractor::error::ExtractorError> {
/// let mut extractor = Extractor::new("YouTube", default_client()?);
/// extractor.set_cookies_from_string("CONSENT=YES+1; PREF=hl=en");
/// let body = extractor.fetch_text("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    // name of the platform, e.g., "YouTube"
    pub platform_name: String,
    pub client: Client,
    platform_headers: HeaderMap,
    pub cookies: FxHashMap<String, String>,
}

impl Extractor {
    pub fn new<S: Into<String>>(platform_name: S, client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate"),
        );

        Self {
            platform_name: platform_name.into(),
            client,
            platform_headers: default_headers,
            cookies: FxHashMap::default(),
        }
    }

    /// Adds or replaces a header; invalid names or values are dropped with a warning.
    pub fn add_header<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        let (key, value) = (key.as_ref(), value.as_ref());
        match (HeaderName::from_str(key), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.platform_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", key, value),
        }
    }

    pub fn add_cookie<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Set cookies from a cookie string (format: "name1=value1; name2=value2").
    pub fn set_cookies_from_string(&mut self, cookie_string: &str) {
        for cookie in cookie_string.split(';') {
            let cookie = cookie.trim();
            if let Some((name, value)) = cookie.split_once('=') {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    fn build_cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut pairs = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>();
        pairs.sort();

        Some(pairs.join("; "))
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request with the platform headers and stored cookies.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .headers(self.platform_headers.clone());

        if let Some(value) = self
            .build_cookie_header()
            .and_then(|header| HeaderValue::from_str(&header).ok())
        {
            debug!("Adding cookies to request: {:?}", value);
            builder = builder.header(reqwest::header::COOKIE, value);
        }

        builder
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

#[async_trait]
impl PageFetcher for Extractor {
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractorError> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        debug!("{} fetched {} ({})", self.platform_name, url, status);
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_string_parsing() {
        let mut extractor = Extractor::new("YouTube", Client::new());
        extractor.set_cookies_from_string("CONSENT=YES+1; PREF = hl=en ;broken");

        assert_eq!(extractor.get_cookie("CONSENT").map(String::as_str), Some("YES+1"));
        assert_eq!(extractor.get_cookie("PREF").map(String::as_str), Some("hl=en"));
        assert!(extractor.get_cookie("broken").is_none());
        assert_eq!(
            extractor.build_cookie_header().as_deref(),
            Some("CONSENT=YES+1; PREF=hl=en")
        );
    }

    #[test]
    fn test_invalid_header_is_ignored() {
        let mut extractor = Extractor::new("YouTube", Client::new());
        extractor.add_header("bad header", "x");
        extractor.add_header("Referer", "https://www.youtube.com/");

        let headers = extractor.get_platform_headers();
        assert!(headers.get("bad header").is_none());
        assert_eq!(
            headers.get(reqwest::header::REFERER).unwrap(),
            "https://www.youtube.com/"
        );
    }
}
