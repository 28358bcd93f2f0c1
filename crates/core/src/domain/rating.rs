use crate::domain::news::Impact;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display tone shared by rating labels and impact tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelTone {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    Avoid,
}

impl RatingLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RatingLabel::StrongBuy => "Strong Buy",
            RatingLabel::Buy => "Buy",
            RatingLabel::Neutral => "Neutral",
            RatingLabel::Sell => "Sell",
            RatingLabel::Avoid => "Avoid",
        }
    }

    pub fn tone(self) -> LabelTone {
        match self {
            RatingLabel::StrongBuy => LabelTone::StrongPositive,
            RatingLabel::Buy => LabelTone::Positive,
            RatingLabel::Neutral => LabelTone::Neutral,
            RatingLabel::Sell => LabelTone::Negative,
            RatingLabel::Avoid => LabelTone::StrongNegative,
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule-based rating computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub label: RatingLabel,
    pub total: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub options: f64,
    #[serde(default)]
    pub news: f64,
    pub ratios: Option<RatingRatios>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRatios {
    pub volume_ratio: Option<f64>,
    pub put_call_ratio: Option<f64>,
    pub pct_change: Option<f64>,
    pub gap_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRating {
    pub label: RatingLabel,
    #[serde(rename = "numeric", alias = "score")]
    pub score: f64,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub factors: Vec<AiFactor>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFactor {
    pub name: String,
    pub impact: Impact,
    pub score: f64,
    pub reason: String,
}
