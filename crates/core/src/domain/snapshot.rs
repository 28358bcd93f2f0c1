use crate::domain::news::NewsItem;
use crate::domain::options::{OptionsSnapshot, Side};
use crate::domain::rating::{AiRating, Rating};
use anyhow::ensure;
use serde::{Deserialize, Serialize};

pub const MAX_CHAIN_LIMIT: u32 = 200;
pub const MAX_NEWS_COUNT: u32 = 10;

/// Everything the backend returned for one ticker of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSnapshot {
    pub ticker: String,
    /// `None` when the backend could not retrieve the chain.
    pub options: Option<OptionsSnapshot>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub press_releases: Vec<NewsItem>,
    pub error: Option<String>,
    pub rating: Option<Rating>,
    pub ai_rating: Option<AiRating>,
}

/// Body of `POST /options/multi-snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSnapshotRequest {
    pub tickers: Vec<String>,
    pub expiration: Option<String>,
    pub side: Side,
    pub limit: u32,
    pub news_count: u32,
    pub include_press_releases: bool,
}

impl MultiSnapshotRequest {
    pub fn try_new(
        tickers: Vec<String>,
        expiration: Option<String>,
        side: Side,
        limit: u32,
        news_count: u32,
        include_press_releases: bool,
    ) -> anyhow::Result<Self> {
        ensure!(!tickers.is_empty(), "at least one ticker is required");
        ensure!(
            tickers.iter().all(|t| !t.trim().is_empty()),
            "tickers must be non-empty"
        );
        ensure!(
            (1..=MAX_CHAIN_LIMIT).contains(&limit),
            "limit must be 1..={MAX_CHAIN_LIMIT} (got {limit})"
        );
        ensure!(
            news_count <= MAX_NEWS_COUNT,
            "news count must be 0..={MAX_NEWS_COUNT} (got {news_count})"
        );

        let expiration = expiration
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            tickers,
            expiration,
            side,
            limit,
            news_count,
            include_press_releases,
        })
    }
}
