use crate::domain::news::NewsItem;
use crate::domain::rating::RatingLabel;
use crate::domain::snapshot::SymbolSnapshot;
use crate::metrics::ChainMetrics;
use crate::news::freshness::FreshnessPolicy;
use anyhow::bail;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub ticker: String,
    pub underlying_price: Option<f64>,
    pub expiration: Option<String>,
    /// `None` when the backend returned no chain for this ticker.
    pub metrics: Option<ChainMetrics>,
    pub volume: Option<f64>,
    pub earnings_date: Option<NaiveDate>,
    pub fresh_news: usize,
    pub ai_label: Option<RatingLabel>,
    pub ai_score: Option<f64>,
    pub error: Option<String>,
    pub note: Option<String>,
}

impl SummaryRow {
    pub fn from_snapshot(snapshot: &SymbolSnapshot) -> Self {
        let options = snapshot.options.as_ref();
        let fresh_news = FreshnessPolicy::Recent24h.apply(&snapshot.news).len()
            + FreshnessPolicy::Recent24h.apply(&snapshot.press_releases).len();

        Self {
            ticker: snapshot.ticker.clone(),
            underlying_price: options.and_then(|o| o.underlying_price),
            expiration: options.and_then(|o| o.expiration.clone()),
            metrics: options.map(|o| ChainMetrics::compute(Some(o))),
            volume: options.and_then(|o| o.volume),
            earnings_date: options.and_then(|o| o.earnings_day()),
            fresh_news,
            ai_label: snapshot.ai_rating.as_ref().map(|r| r.label),
            ai_score: snapshot.ai_rating.as_ref().map(|r| r.score),
            error: snapshot.error.clone(),
            note: options.and_then(|o| o.note.clone()),
        }
    }

    pub fn earnings_in_days(&self, today: NaiveDate) -> Option<i64> {
        self.earnings_date
            .map(|d| d.signed_duration_since(today).num_days())
    }

    fn sort_value(&self, key: SortKey) -> Option<f64> {
        let m = self.metrics.as_ref();
        match key {
            SortKey::Ticker => None,
            SortKey::Price => self.underlying_price,
            SortKey::CallVolume => m.map(|m| m.calls.volume as f64),
            SortKey::PutVolume => m.map(|m| m.puts.volume as f64),
            SortKey::CallOpenInterest => m.map(|m| m.calls.open_interest as f64),
            SortKey::PutOpenInterest => m.map(|m| m.puts.open_interest as f64),
            SortKey::PutCallRatio => m.and_then(|m| m.put_call_ratio),
            SortKey::VolumeDelta => m.and_then(|m| m.volume_delta_3m),
            SortKey::AiScore => self.ai_score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Ticker,
    Price,
    CallVolume,
    PutVolume,
    CallOpenInterest,
    PutOpenInterest,
    PutCallRatio,
    /// Volume vs. the 3-month average.
    VolumeDelta,
    AiScore,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "ticker" => SortKey::Ticker,
            "price" => SortKey::Price,
            "call-volume" => SortKey::CallVolume,
            "put-volume" => SortKey::PutVolume,
            "call-oi" => SortKey::CallOpenInterest,
            "put-oi" => SortKey::PutOpenInterest,
            "pcr" => SortKey::PutCallRatio,
            "vol-delta" => SortKey::VolumeDelta,
            "ai" => SortKey::AiScore,
            other => bail!("unknown sort key {other:?}"),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Sorts table rows in place. Rows with no value for `key` go last in
/// either direction; ties fall back to ticker order.
pub fn sort_rows(rows: &mut [SummaryRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let primary = if key == SortKey::Ticker {
            direction.apply(a.ticker.cmp(&b.ticker))
        } else {
            match (a.sort_value(key), b.sort_value(key)) {
                (Some(x), Some(y)) => direction.apply(x.total_cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        };
        primary.then_with(|| a.ticker.cmp(&b.ticker))
    });
}

/// Article picker for the news-impact tab of one ticker.
#[derive(Debug, Clone)]
pub struct NewsImpactView<'a> {
    pub ticker: &'a str,
    pub articles: Vec<&'a NewsItem>,
    pub selected: Option<&'a NewsItem>,
}

impl<'a> NewsImpactView<'a> {
    /// News first, then press releases; duplicate links keep the first item.
    pub fn build(
        snapshot: &'a SymbolSnapshot,
        policy: FreshnessPolicy,
        selected_link: Option<&str>,
    ) -> Self {
        let mut articles: Vec<&NewsItem> = Vec::new();
        for item in policy
            .apply(&snapshot.news)
            .into_iter()
            .chain(policy.apply(&snapshot.press_releases))
        {
            if articles.iter().any(|a| a.link == item.link) {
                continue;
            }
            articles.push(item);
        }

        let selected =
            selected_link.and_then(|link| articles.iter().copied().find(|a| a.link == link));

        Self {
            ticker: &snapshot.ticker,
            articles,
            selected,
        }
    }
}
