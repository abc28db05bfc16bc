use reqwest::Client;

use super::{CachedResponse, OfflineError};

/// HTTP request timeout in seconds.
/// Keeps a hung fetch from hanging the intercepted request indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How a response relates to the application origin, mirroring the
/// browser response-type distinction. Opaque responses (cross-origin,
/// no CORS grant) must never be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response
    Basic,
    /// Cross-origin response with a CORS grant
    Cors,
    /// Cross-origin response without a CORS grant
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub url: String,
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Only HTTP 200 basic/cors responses may populate the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && !matches!(self.kind, ResponseKind::Opaque)
    }

    pub fn into_cached(self) -> CachedResponse {
        CachedResponse {
            url: self.url,
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

/// Resource fetcher behind the cache pipeline. Production code uses
/// `HttpNetwork`; tests inject a fake with a call counter.
pub trait Network {
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<FetchedResponse, OfflineError>> + Send;
}

/// reqwest-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
    origin: String,
}

impl HttpNetwork {
    pub fn new(origin: String) -> Result<Self, OfflineError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, origin })
    }

    fn classify(&self, url: &str, has_cors_grant: bool) -> ResponseKind {
        if url.starts_with(&self.origin) {
            ResponseKind::Basic
        } else if has_cors_grant {
            ResponseKind::Cors
        } else {
            ResponseKind::Opaque
        }
    }
}

impl Network for HttpNetwork {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, OfflineError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let has_cors_grant = response
            .headers()
            .contains_key("access-control-allow-origin");
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let kind = self.classify(url, has_cors_grant);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResponse {
            url: url.to_string(),
            status,
            kind,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(status: u16, kind: ResponseKind) -> FetchedResponse {
        FetchedResponse {
            url: "https://fleet.example/app.js".to_string(),
            status,
            kind,
            content_type: None,
            body: Vec::new(),
        }
    }

    #[test]
    fn test_cacheable_rules() {
        assert!(fetched(200, ResponseKind::Basic).is_cacheable());
        assert!(fetched(200, ResponseKind::Cors).is_cacheable());
        assert!(!fetched(200, ResponseKind::Opaque).is_cacheable());
        assert!(!fetched(404, ResponseKind::Basic).is_cacheable());
        assert!(!fetched(301, ResponseKind::Cors).is_cacheable());
    }

    #[test]
    fn test_classify_by_origin_and_cors() {
        let network = HttpNetwork::new("https://fleet.example".to_string()).unwrap();
        assert_eq!(
            network.classify("https://fleet.example/index.html", false),
            ResponseKind::Basic
        );
        assert_eq!(
            network.classify("https://cdn.tailwindcss.com", true),
            ResponseKind::Cors
        );
        assert_eq!(
            network.classify("https://elsewhere.example/x", false),
            ResponseKind::Opaque
        );
    }
}
