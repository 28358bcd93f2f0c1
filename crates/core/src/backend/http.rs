use crate::backend::error::BackendHttpError;
use crate::backend::{OptionsBackend, ANALYZE_ARTICLE_PATH, MULTI_SNAPSHOT_PATH};
use crate::config::Settings;
use crate::domain::news::{AnalyzeArticleRequest, ArticleAnalysis, NewsList};
use crate::domain::options::{ExpirationList, OptionsSnapshot, Side};
use crate::domain::snapshot::{MultiSnapshotRequest, SymbolSnapshot};
use anyhow::{anyhow, Context, Result};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsSection {
    News,
    PressReleases,
}

impl NewsSection {
    fn path_segment(self) -> &'static str {
        match self {
            NewsSection::News => "news",
            NewsSection::PressReleases => "press-releases",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChainQuery {
    pub ticker: String,
    pub expiration: Option<String>,
    pub side: Side,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// JSON-over-HTTP client for the options/news backend. One request per call,
/// no retries.
#[derive(Debug, Clone)]
pub struct HttpOptionsBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpOptionsBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid backend base url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "backend base url must be hierarchical (got {base_url})"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build backend http client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("backend base url cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        req: RequestBuilder,
    ) -> Result<T> {
        tracing::debug!(endpoint, "backend request");

        let res = req
            .send()
            .await
            .with_context(|| format!("backend request to {endpoint} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {endpoint} response body"))?;

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "backend returned non-success status");
            return Err(BackendHttpError {
                endpoint,
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to decode {endpoint} response: {text}"))
    }

    pub async fn health(&self) -> Result<()> {
        let url = self.url(&["health"])?;
        let res: HealthResponse = self.send_json("/health", self.http.get(url)).await?;
        anyhow::ensure!(
            res.status == "ok",
            "backend health status is {:?}",
            res.status
        );
        Ok(())
    }

    pub async fn expirations(&self, ticker: &str) -> Result<ExpirationList> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.url(&["options", "expirations", &ticker])?;
        self.send_json("/options/expirations/{ticker}", self.http.get(url))
            .await
    }

    pub async fn options_chain(&self, query: &ChainQuery) -> Result<OptionsSnapshot> {
        let ticker = normalize_ticker(&query.ticker)?;
        let url = self.url(&["options", "chain", &ticker])?;

        let mut params: Vec<(&str, String)> = vec![
            ("side", query.side.as_str().to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(expiration) = query.expiration.as_deref() {
            params.push(("expiration", expiration.to_string()));
        }

        self.send_json("/options/chain/{ticker}", self.http.get(url).query(&params))
            .await
    }

    pub async fn news(&self, ticker: &str, section: NewsSection, count: u32) -> Result<NewsList> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.url(&[section.path_segment(), &ticker])?;
        let endpoint = match section {
            NewsSection::News => "/news/{ticker}",
            NewsSection::PressReleases => "/press-releases/{ticker}",
        };
        self.send_json(endpoint, self.http.get(url).query(&[("count", count)]))
            .await
    }
}

#[async_trait::async_trait]
impl OptionsBackend for HttpOptionsBackend {
    fn backend_name(&self) -> &'static str {
        "http_json"
    }

    async fn multi_snapshot(&self, req: &MultiSnapshotRequest) -> Result<Vec<SymbolSnapshot>> {
        let url = self.url(&["options", "multi-snapshot"])?;
        self.send_json(MULTI_SNAPSHOT_PATH, self.http.post(url).json(req))
            .await
    }

    async fn analyze_article(&self, req: &AnalyzeArticleRequest) -> Result<ArticleAnalysis> {
        let url = self.url(&["news", "analyze-article"])?;
        self.send_json(ANALYZE_ARTICLE_PATH, self.http.post(url).json(req))
            .await
    }
}

fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    anyhow::ensure!(!ticker.is_empty(), "ticker must be non-empty");
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> HttpOptionsBackend {
        HttpOptionsBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_multi_snapshot_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/options/multi-snapshot"))
            .and(body_json(json!({
                "tickers": ["AAPL", "NVDA"],
                "expiration": null,
                "side": "both",
                "limit": 20,
                "news_count": 3,
                "include_press_releases": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"ticker": "AAPL", "options": null, "news": [], "pressReleases": [], "error": null},
                {"ticker": "NVDA", "options": null, "news": [], "pressReleases": [], "error": "boom"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let req = MultiSnapshotRequest::try_new(
            vec!["AAPL".to_string(), "NVDA".to_string()],
            None,
            Side::Both,
            20,
            3,
            true,
        )
        .unwrap();

        let out = backend(&server).multi_snapshot(&req).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/news/analyze-article"))
            .respond_with(
                ResponseTemplate::new(502)
                    .set_body_string("{\"detail\":\"Failed to fetch article: timeout\"}"),
            )
            .mount(&server)
            .await;

        let req = AnalyzeArticleRequest::try_new("AAPL", "https://example.com/a").unwrap();
        let err = backend(&server).analyze_article(&req).await.unwrap_err();

        let http_err = err.downcast_ref::<BackendHttpError>().unwrap();
        assert_eq!(http_err.status, 502);
        assert!(http_err.body.contains("Failed to fetch article"));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/options/multi-snapshot"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let req =
            MultiSnapshotRequest::try_new(vec!["AAPL".to_string()], None, Side::Both, 5, 0, false)
                .unwrap();
        let err = backend(&server).multi_snapshot(&req).await.unwrap_err();
        assert!(err.downcast_ref::<BackendHttpError>().is_none());
        assert!(format!("{err:#}").contains("failed to decode"));
    }

    #[tokio::test]
    async fn fetches_chain_with_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/options/chain/MSFT"))
            .and(query_param("side", "calls"))
            .and(query_param("limit", "10"))
            .and(query_param("expiration", "2025-02-21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ticker": "MSFT",
                "expiration": "2025-02-21",
                "underlying_price": 410.2,
                "calls": [{"contractSymbol": "MSFT250221C00400000", "strike": 400.0, "lastPrice": 15.3, "volume": 120.0, "openInterest": 900.0, "inTheMoney": true}]
            })))
            .mount(&server)
            .await;

        let chain = backend(&server)
            .options_chain(&ChainQuery {
                ticker: "msft".to_string(),
                expiration: Some("2025-02-21".to_string()),
                side: Side::Calls,
                limit: 10,
            })
            .await
            .unwrap();

        assert_eq!(chain.calls.len(), 1);
        assert_eq!(chain.calls[0].open_interest, Some(900));
        assert!(chain.puts.is_empty());
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/options/expirations/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ticker": "AAPL",
                "expirations": ["2025-01-17", "2025-01-24"]
            })))
            .mount(&server)
            .await;

        let backend =
            HttpOptionsBackend::new(&format!("{}/api/", server.uri()), Duration::from_secs(5))
                .unwrap();
        let list = backend.expirations("aapl").await.unwrap();
        assert_eq!(list.expirations.len(), 2);
    }

    #[tokio::test]
    async fn fetches_press_releases_and_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/press-releases/TSLA"))
            .and(query_param("count", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ticker": "TSLA",
                "items": [{"title": "Q4 deliveries", "publisher": "Business Wire", "relativeTime": "3h ago", "link": "https://example.com/pr"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let list = backend.news("TSLA", NewsSection::PressReleases, 2).await.unwrap();
        assert_eq!(list.items[0].publisher.as_deref(), Some("Business Wire"));
        backend.health().await.unwrap();
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpOptionsBackend::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpOptionsBackend::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
    }
}
