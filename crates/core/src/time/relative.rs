use regex::Regex;
use std::sync::OnceLock;

const JUST_NOW: &str = "just now";

// Calendar approximations: a month is 30 days and a year 365 days.
const HOURS_PER_DAY: f64 = 24.0;
const HOURS_PER_WEEK: f64 = 7.0 * HOURS_PER_DAY;
const HOURS_PER_MONTH: f64 = 30.0 * HOURS_PER_DAY;
const HOURS_PER_YEAR: f64 = 365.0 * HOURS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl RelativeUnit {
    /// Classifies a lowercase unit word ("m", "hrs", "weeks", "mo", ...).
    ///
    /// Minutes are checked first so a bare "m" is always minutes; months need
    /// at least "mo".
    pub fn classify(unit: &str) -> Option<Self> {
        if unit.contains("min") || unit == "m" {
            Some(RelativeUnit::Minutes)
        } else if unit.contains("hour") || unit.contains("hr") || unit == "h" {
            Some(RelativeUnit::Hours)
        } else if unit.contains("day") || unit == "d" {
            Some(RelativeUnit::Days)
        } else if unit.contains("week") || unit.starts_with('w') {
            Some(RelativeUnit::Weeks)
        } else if unit.contains("month") || unit.starts_with("mo") {
            Some(RelativeUnit::Months)
        } else if unit.contains("year") || unit.starts_with('y') {
            Some(RelativeUnit::Years)
        } else {
            None
        }
    }

    pub fn hours_per_unit(self) -> f64 {
        match self {
            RelativeUnit::Minutes => 1.0 / 60.0,
            RelativeUnit::Hours => 1.0,
            RelativeUnit::Days => HOURS_PER_DAY,
            RelativeUnit::Weeks => HOURS_PER_WEEK,
            RelativeUnit::Months => HOURS_PER_MONTH,
            RelativeUnit::Years => HOURS_PER_YEAR,
        }
    }
}

fn amount_unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*([a-z]+)").expect("static regex is valid"))
}

/// Converts a scraped relative-time label ("23m ago", "2d ago", "3 weeks ago",
/// "just now") into an age in hours. Returns `None` when nothing recognizable
/// is found.
pub fn relative_time_to_hours(label: Option<&str>) -> Option<f64> {
    let label = label?.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }

    if label.contains(JUST_NOW) {
        return Some(0.0);
    }

    let caps = amount_unit_re().captures(&label)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = RelativeUnit::classify(caps.get(2)?.as_str())?;

    Some(value * unit.hours_per_unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(s: &str) -> Option<f64> {
        relative_time_to_hours(Some(s))
    }

    #[test]
    fn parses_common_yahoo_labels() {
        assert_eq!(hours("just now"), Some(0.0));
        assert_eq!(hours("Just now"), Some(0.0));
        assert_eq!(hours("7h ago"), Some(7.0));
        assert_eq!(hours("2d ago"), Some(48.0));
        assert_eq!(hours("3 weeks ago"), Some(504.0));
        assert_eq!(hours("2mo ago"), Some(1440.0));
        assert_eq!(hours("1 year ago"), Some(8760.0));
        assert_eq!(hours("5 hrs ago"), Some(5.0));
    }

    #[test]
    fn minutes_are_fractional_hours() {
        let h = hours("23m ago").unwrap();
        assert!((h - 23.0 / 60.0).abs() < 1e-9);
        assert!((h - 0.383).abs() < 1e-3);

        let h = hours("45 minutes ago").unwrap();
        assert!((h - 0.75).abs() < 1e-9);
    }

    #[test]
    fn bare_m_is_minutes_not_months() {
        assert_eq!(RelativeUnit::classify("m"), Some(RelativeUnit::Minutes));
        assert_eq!(RelativeUnit::classify("mo"), Some(RelativeUnit::Months));
        assert_eq!(RelativeUnit::classify("mos"), Some(RelativeUnit::Months));
        assert_eq!(RelativeUnit::classify("months"), Some(RelativeUnit::Months));
        assert_eq!(RelativeUnit::classify("mins"), Some(RelativeUnit::Minutes));
    }

    #[test]
    fn unparseable_labels() {
        assert_eq!(relative_time_to_hours(None), None);
        assert_eq!(hours(""), None);
        assert_eq!(hours("   "), None);
        assert_eq!(hours("soon"), None);
        assert_eq!(hours("yesterday"), None);
        assert_eq!(hours("12 parsecs ago"), None);
    }

    #[test]
    fn uses_first_amount_in_label() {
        assert_eq!(hours("Reuters • 3h ago, updated 1h ago"), Some(3.0));
    }
}
