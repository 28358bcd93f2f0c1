//! Derived chain metrics shown in the summary table.
//!
//! Everything here is a pure function of its inputs.

use crate::domain::options::{OptionContract, OptionsSnapshot};
use serde::Serialize;
use std::fmt;

/// Put/call ratios strictly below this read as call-heavy.
pub const BULLISH_PCR_BELOW: f64 = 0.7;
/// Put/call ratios strictly above this read as put-heavy.
pub const BEARISH_PCR_ABOVE: f64 = 1.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContractTotals {
    pub volume: u64,
    pub open_interest: u64,
}

/// Sums traded volume and open interest, counting absent values as zero.
pub fn totals(contracts: &[OptionContract]) -> ContractTotals {
    contracts
        .iter()
        .fold(ContractTotals::default(), |acc, c| ContractTotals {
            volume: acc.volume.saturating_add(c.volume.unwrap_or(0)),
            open_interest: acc
                .open_interest
                .saturating_add(c.open_interest.unwrap_or(0)),
        })
}

/// Put open interest over call open interest; `None` when there is no call
/// open interest to divide by.
pub fn put_call_ratio(calls: ContractTotals, puts: ContractTotals) -> Option<f64> {
    if calls.open_interest == 0 {
        return None;
    }
    Some(puts.open_interest as f64 / calls.open_interest as f64)
}

pub fn volume_delta_percent(current: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    let (current, baseline) = (current?, baseline?);
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PcrSentiment {
    /// Call-heavy positioning.
    Bullish,
    Neutral,
    /// Put-heavy positioning.
    Bearish,
}

impl PcrSentiment {
    pub fn classify(ratio: f64) -> Self {
        if ratio < BULLISH_PCR_BELOW {
            PcrSentiment::Bullish
        } else if ratio > BEARISH_PCR_ABOVE {
            PcrSentiment::Bearish
        } else {
            PcrSentiment::Neutral
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            PcrSentiment::Bullish => "bullish/call-heavy",
            PcrSentiment::Neutral => "neutral",
            PcrSentiment::Bearish => "bearish/put-heavy",
        }
    }
}

impl fmt::Display for PcrSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Chain-level aggregates for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChainMetrics {
    pub calls: ContractTotals,
    pub puts: ContractTotals,
    pub put_call_ratio: Option<f64>,
    pub sentiment: Option<PcrSentiment>,
    pub volume_delta_10d: Option<f64>,
    pub volume_delta_3m: Option<f64>,
}

impl ChainMetrics {
    /// An absent chain yields zero totals and no ratios.
    pub fn compute(options: Option<&OptionsSnapshot>) -> Self {
        let calls = options.map(|o| totals(&o.calls)).unwrap_or_default();
        let puts = options.map(|o| totals(&o.puts)).unwrap_or_default();
        let pcr = put_call_ratio(calls, puts);

        let volume = options.and_then(|o| o.volume);
        Self {
            calls,
            puts,
            put_call_ratio: pcr,
            sentiment: pcr.map(PcrSentiment::classify),
            volume_delta_10d: volume_delta_percent(volume, options.and_then(|o| o.avg_volume_10d)),
            volume_delta_3m: volume_delta_percent(volume, options.and_then(|o| o.avg_volume_3m)),
        }
    }
}
