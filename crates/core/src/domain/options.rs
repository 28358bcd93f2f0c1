use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side(s) of the chain the backend should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Calls,
    Puts,
    #[default]
    Both,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Calls => "calls",
            Side::Puts => "puts",
            Side::Both => "both",
        }
    }

    pub fn includes_calls(self) -> bool {
        matches!(self, Side::Calls | Side::Both)
    }

    pub fn includes_puts(self) -> bool {
        matches!(self, Side::Puts | Side::Both)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calls" | "call" => Ok(Side::Calls),
            "puts" | "put" => Ok(Side::Puts),
            "both" => Ok(Side::Both),
            other => bail!("side must be one of calls, puts, both (got {other:?})"),
        }
    }
}

/// A single row of an options chain as returned by the backend.
///
/// The backend sanitises every numeric column to a float (NaN and inf become
/// null), so counts arrive as `120.0` and are decoded leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    #[serde(default)]
    pub contract_symbol: String,
    pub strike: f64,
    #[serde(default, deserialize_with = "finite_or_zero")]
    pub last_price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub volume: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open_interest: Option<u64>,
    /// Fraction, not percent (0.35 == 35%).
    pub implied_volatility: Option<f64>,
    #[serde(default)]
    pub in_the_money: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsSnapshot {
    pub ticker: String,
    pub expiration: Option<String>,
    pub underlying_price: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume_10d: Option<f64>,
    pub avg_volume_3m: Option<f64>,
    pub earnings_date: Option<String>,
    #[serde(default)]
    pub calls: Vec<OptionContract>,
    #[serde(default)]
    pub puts: Vec<OptionContract>,
    pub note: Option<String>,
}

impl OptionsSnapshot {
    /// Calendar date of the next earnings release, if the backend sent a
    /// parseable ISO-8601 value (date or datetime).
    pub fn earnings_day(&self) -> Option<NaiveDate> {
        let raw = self.earnings_date.as_deref()?.trim();
        let date_part = raw.get(..10)?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationList {
    pub ticker: String,
    #[serde(default)]
    pub expirations: Vec<String>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64))
}

fn finite_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|v| v.is_finite()).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_float_counts_from_backend() {
        let v = json!({
            "contractSymbol": "AAPL250117C00200000",
            "strike": 200.0,
            "lastPrice": 4.15,
            "bid": 4.1,
            "ask": 4.2,
            "volume": 1532.0,
            "openInterest": 8710.0,
            "impliedVolatility": 0.2871,
            "inTheMoney": false
        });

        let c: OptionContract = serde_json::from_value(v).unwrap();
        assert_eq!(c.volume, Some(1532));
        assert_eq!(c.open_interest, Some(8710));
        assert_eq!(c.implied_volatility, Some(0.2871));
        assert!(!c.in_the_money);
    }

    #[test]
    fn null_and_missing_counts_are_absent() {
        let v = json!({
            "contractSymbol": "NVDA250117P00100000",
            "strike": 100.0,
            "lastPrice": null,
            "volume": null
        });

        let c: OptionContract = serde_json::from_value(v).unwrap();
        assert_eq!(c.volume, None);
        assert_eq!(c.open_interest, None);
        assert_eq!(c.last_price, 0.0);
        assert_eq!(c.bid, None);
    }

    #[test]
    fn negative_count_is_treated_as_unknown() {
        let v = json!({"strike": 10.0, "lastPrice": 1.0, "volume": -5.0, "openInterest": 3});
        let c: OptionContract = serde_json::from_value(v).unwrap();
        assert_eq!(c.volume, None);
        assert_eq!(c.open_interest, Some(3));
    }

    #[test]
    fn snapshot_without_requested_side_has_empty_chain() {
        let v = json!({
            "ticker": "AAPL",
            "expiration": "2025-01-17",
            "underlying_price": 227.5,
            "volume": 41000000.0,
            "avg_volume_10d": 50000000.0,
            "avg_volume_3m": null,
            "earnings_date": "2025-01-30T16:30:00-05:00",
            "calls": []
        });

        let s: OptionsSnapshot = serde_json::from_value(v).unwrap();
        assert!(s.puts.is_empty());
        assert_eq!(s.avg_volume_3m, None);
        assert_eq!(s.earnings_day(), NaiveDate::from_ymd_opt(2025, 1, 30));
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("PUTS".parse::<Side>().unwrap(), Side::Puts);
        assert_eq!(" both ".parse::<Side>().unwrap(), Side::Both);
        assert!("straddle".parse::<Side>().is_err());
        assert_eq!(serde_json::to_value(Side::Calls).unwrap(), json!("calls"));
    }
}
