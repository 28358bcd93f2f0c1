use crate::domain::rating::LabelTone;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub publisher: Option<String>,
    /// Human label scraped next to the headline, e.g. "7h ago".
    pub relative_time: Option<String>,
    /// Identifies the item within a list.
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsList {
    pub ticker: String,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Bullish,
    Bearish,
    Neutral,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::Bullish => "Bullish",
            Impact::Bearish => "Bearish",
            Impact::Neutral => "Neutral",
        }
    }

    pub fn tone(self) -> LabelTone {
        match self {
            Impact::Bullish => LabelTone::Positive,
            Impact::Bearish => LabelTone::Negative,
            Impact::Neutral => LabelTone::Neutral,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleImpactRow {
    pub factor: String,
    pub impact: Impact,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub url: String,
    pub ticker: Option<String>,
    pub overall: Impact,
    pub score: f64,
    #[serde(default)]
    pub rows: Vec<ArticleImpactRow>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeArticleRequest {
    pub ticker: String,
    pub url: String,
}

impl AnalyzeArticleRequest {
    pub fn try_new(ticker: &str, url: &str) -> anyhow::Result<Self> {
        let ticker = ticker.trim().to_uppercase();
        let url = url.trim().to_string();
        anyhow::ensure!(!ticker.is_empty(), "ticker must be non-empty");
        anyhow::ensure!(!url.is_empty(), "article url must be non-empty");
        Ok(Self { ticker, url })
    }
}
