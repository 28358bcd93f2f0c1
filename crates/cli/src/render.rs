use chrono::NaiveDate;
use crossterm::style::Stylize;
use optdash_core::dashboard::summary::{NewsImpactView, SummaryRow};
use optdash_core::domain::news::{ArticleAnalysis, NewsItem};
use optdash_core::domain::options::{OptionContract, OptionsSnapshot, Side};
use optdash_core::domain::rating::LabelTone;
use optdash_core::domain::snapshot::SymbolSnapshot;
use optdash_core::metrics::{ChainMetrics, PcrSentiment};
use optdash_core::news::freshness::FreshnessPolicy;
use optdash_core::time::relative::relative_time_to_hours;
use std::fmt::Write as _;

const NO_DATA: &str = "—";
const CARD_CONTRACTS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn tone(&self, text: &str, tone: LabelTone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            LabelTone::StrongPositive => text.green().bold().to_string(),
            LabelTone::Positive => text.green().to_string(),
            LabelTone::Neutral => text.yellow().to_string(),
            LabelTone::Negative => text.red().to_string(),
            LabelTone::StrongNegative => text.red().bold().to_string(),
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

fn sentiment_tone(s: PcrSentiment) -> LabelTone {
    match s {
        PcrSentiment::Bullish => LabelTone::Positive,
        PcrSentiment::Neutral => LabelTone::Neutral,
        PcrSentiment::Bearish => LabelTone::Negative,
    }
}

fn delta_tone(delta: f64) -> LabelTone {
    if delta > 0.0 {
        LabelTone::Positive
    } else if delta < 0.0 {
        LabelTone::Negative
    } else {
        LabelTone::Neutral
    }
}

pub fn fmt_price(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn fmt_count(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_opt_count(v: Option<u64>) -> String {
    v.map(fmt_count).unwrap_or_else(|| NO_DATA.to_string())
}

fn fmt_volume(v: Option<f64>) -> String {
    v.filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| fmt_count(v.round() as u64))
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn fmt_delta(v: Option<f64>) -> String {
    v.map(|v| format!("{v:+.1}%"))
        .unwrap_or_else(|| NO_DATA.to_string())
}

fn fmt_age(label: Option<&str>) -> String {
    match (label, relative_time_to_hours(label)) {
        (Some(label), Some(_)) => label.to_string(),
        (Some(label), None) => format!("{label} (age unknown)"),
        (None, _) => "age unknown".to_string(),
    }
}

pub fn summary_table(rows: &[SummaryRow], today: NaiveDate, p: Painter) -> String {
    let mut out = String::new();
    let header = format!(
        "{:<8} {:>9} {:<11} {:>10} {:>10} {:>10} {:>10} {:>6} {:<19} {:>8} {:>8} {:>9} {:>5} {:<11}",
        "TICKER", "PRICE", "EXPIRY", "CALL VOL", "PUT VOL", "CALL OI", "PUT OI", "P/C",
        "SENTIMENT", "VOL/10D", "VOL/3M", "EARNINGS", "NEWS", "AI",
    );
    writeln!(out, "{}", p.heading(&header)).ok();

    if rows.is_empty() {
        writeln!(out, "{}", p.dim("no tickers loaded")).ok();
        return out;
    }

    for row in rows {
        let mut line = format!(
            "{:<8} {:>9} {:<11}",
            row.ticker,
            fmt_price(row.underlying_price),
            row.expiration.as_deref().unwrap_or(NO_DATA),
        );

        match row.metrics.as_ref() {
            Some(m) => line.push_str(&metrics_cells(m, p)),
            None => {
                write!(
                    line,
                    " {:>10} {:>10} {:>10} {:>10} {:>6} {:<19} {:>8} {:>8}",
                    NO_DATA, NO_DATA, NO_DATA, NO_DATA, NO_DATA, "no options data", NO_DATA, NO_DATA
                ).ok();
            }
        }

        let earnings = match row.earnings_in_days(today) {
            Some(days) if days >= 0 => format!("in {days}d"),
            Some(days) => format!("{}d ago", -days),
            None => NO_DATA.to_string(),
        };
        write!(line, " {:>9} {:>5} ", earnings, row.fresh_news).ok();

        match row.ai_label {
            Some(label) => line.push_str(&p.tone(&format!("{:<11}", label.as_str()), label.tone())),
            None => line.push_str(&format!("{NO_DATA:<11}")),
        }

        writeln!(out, "{}", line.trim_end()).ok();

        if let Some(err) = row.error.as_deref() {
            writeln!(out, "         {}", p.error(&format!("! {err}"))).ok();
        }
        if let Some(note) = row.note.as_deref() {
            writeln!(out, "         {}", p.dim(note)).ok();
        }
    }

    out
}

fn metrics_cells(m: &ChainMetrics, p: Painter) -> String {
    let ratio = m
        .put_call_ratio
        .map(|r| format!("{r:.2}"))
        .unwrap_or_else(|| NO_DATA.to_string());
    let sentiment = match m.sentiment {
        Some(s) => p.tone(&format!("{:<19}", s.describe()), sentiment_tone(s)),
        None => format!("{NO_DATA:<19}"),
    };
    let delta = |d: Option<f64>| match d {
        Some(v) => p.tone(&format!("{:>8}", fmt_delta(Some(v))), delta_tone(v)),
        None => format!("{NO_DATA:>8}"),
    };

    format!(
        " {:>10} {:>10} {:>10} {:>10} {:>6} {} {} {}",
        fmt_count(m.calls.volume),
        fmt_count(m.puts.volume),
        fmt_count(m.calls.open_interest),
        fmt_count(m.puts.open_interest),
        ratio,
        sentiment,
        delta(m.volume_delta_10d),
        delta(m.volume_delta_3m),
    )
}

fn contract_lines(out: &mut String, title: &str, contracts: &[OptionContract], p: Painter) {
    writeln!(out, "  {}", p.heading(title)).ok();
    if contracts.is_empty() {
        writeln!(out, "    {}", p.dim("no contracts")).ok();
        return;
    }
    writeln!(
        out,
        "    {:<22} {:>8} {:>8} {:>8} {:>8} {:>9} {:>9} {:>7} {}",
        "CONTRACT", "STRIKE", "LAST", "BID", "ASK", "VOLUME", "OI", "IV", "ITM"
    ).ok();
    for c in contracts.iter().take(CARD_CONTRACTS) {
        let iv = c
            .implied_volatility
            .map(|iv| format!("{:.1}%", iv * 100.0))
            .unwrap_or_else(|| NO_DATA.to_string());
        writeln!(
            out,
            "    {:<22} {:>8.2} {:>8.2} {:>8} {:>8} {:>9} {:>9} {:>7} {}",
            c.contract_symbol,
            c.strike,
            c.last_price,
            fmt_price(c.bid),
            fmt_price(c.ask),
            fmt_opt_count(c.volume),
            fmt_opt_count(c.open_interest),
            iv,
            if c.in_the_money { "yes" } else { "no" },
        ).ok();
    }
    if contracts.len() > CARD_CONTRACTS {
        writeln!(
            out,
            "    {}",
            p.dim(&format!("… {} more", contracts.len() - CARD_CONTRACTS))
        ).ok();
    }
}

/// Chain header plus the contract tables for the requested `side`.
pub fn chain(snapshot: &OptionsSnapshot, side: Side, p: Painter) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{}  price {}  expiry {}",
        p.heading(&snapshot.ticker),
        fmt_price(snapshot.underlying_price),
        snapshot.expiration.as_deref().unwrap_or(NO_DATA),
    ).ok();
    writeln!(
        out,
        "  volume {}  avg 10d {}  avg 3m {}",
        fmt_volume(snapshot.volume),
        fmt_volume(snapshot.avg_volume_10d),
        fmt_volume(snapshot.avg_volume_3m),
    ).ok();
    if let Some(note) = snapshot.note.as_deref() {
        writeln!(out, "  {}", p.dim(note)).ok();
    }
    if side.includes_calls() {
        contract_lines(&mut out, "Calls", &snapshot.calls, p);
    }
    if side.includes_puts() {
        contract_lines(&mut out, "Puts", &snapshot.puts, p);
    }
    out
}

fn news_lines(out: &mut String, title: &str, items: &[&NewsItem], p: Painter) {
    writeln!(out, "  {}", p.heading(title)).ok();
    if items.is_empty() {
        writeln!(out, "    {}", p.dim("no items")).ok();
        return;
    }
    for item in items {
        writeln!(
            out,
            "    • {} — {} · {}",
            item.title,
            item.publisher.as_deref().unwrap_or("unknown publisher"),
            fmt_age(item.relative_time.as_deref()),
        ).ok();
        if !item.link.is_empty() {
            writeln!(out, "      {}", p.dim(&item.link)).ok();
        }
    }
}

pub fn news(ticker: &str, items: &[&NewsItem], p: Painter) -> String {
    let mut out = String::new();
    news_lines(&mut out, &format!("{ticker} news"), items, p);
    out
}

/// Detail card for one ticker. Cards list every news item with its age.
pub fn detail_card(snapshot: &SymbolSnapshot, p: Painter) -> String {
    let mut out = String::new();
    writeln!(out, "{}", p.heading(&format!("── {} ──", snapshot.ticker))).ok();

    if let Some(err) = snapshot.error.as_deref() {
        writeln!(out, "  {}", p.error(&format!("! {err}"))).ok();
    }

    match snapshot.options.as_ref() {
        Some(options) => {
            for line in chain(options, Side::Both, p).lines().skip(1) {
                writeln!(out, "{line}").ok();
            }
        }
        None => {
            writeln!(out, "  {}", p.dim("no options data")).ok();
        }
    }

    if let Some(ai) = snapshot.ai_rating.as_ref() {
        writeln!(
            out,
            "  {} {} ({:+.2}, {})",
            p.heading("AI rating:"),
            p.tone(ai.label.as_str(), ai.label.tone()),
            ai.score,
            if ai.timeframe.is_empty() { NO_DATA } else { ai.timeframe.as_str() },
        ).ok();
        if !ai.summary.is_empty() {
            writeln!(out, "    {}", ai.summary).ok();
        }
        for f in &ai.factors {
            writeln!(
                out,
                "    {:<14} {} {:+} {}",
                f.name,
                p.tone(&format!("{:<8}", f.impact.as_str()), f.impact.tone()),
                f.score,
                f.reason,
            ).ok();
        }
    } else if let Some(r) = snapshot.rating.as_ref() {
        writeln!(
            out,
            "  {} {} (total {:+.2}: volume {:+}, price {:+}, options {:+}, news {:+})",
            p.heading("Rating:"),
            p.tone(r.label.as_str(), r.label.tone()),
            r.total,
            r.volume,
            r.price,
            r.options,
            r.news,
        ).ok();
    }

    let all = FreshnessPolicy::All;
    news_lines(&mut out, "News", &all.apply(&snapshot.news), p);
    news_lines(&mut out, "Press releases", &all.apply(&snapshot.press_releases), p);
    out
}

pub fn news_impact(view: &NewsImpactView<'_>, p: Painter) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{}",
        p.heading(&format!("{} — articles from the last 24h", view.ticker))
    ).ok();
    if view.articles.is_empty() {
        writeln!(out, "  {}", p.dim("no recent articles")).ok();
        return out;
    }
    for (i, a) in view.articles.iter().enumerate() {
        let marker = match view.selected {
            Some(sel) if sel.link == a.link => ">",
            _ => " ",
        };
        writeln!(
            out,
            "{marker} {:>2}. {} · {}",
            i + 1,
            a.title,
            fmt_age(a.relative_time.as_deref()),
        ).ok();
    }
    out
}

pub fn analysis(a: &ArticleAnalysis, p: Painter) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} {} (score {:+})",
        p.heading("Overall:"),
        p.tone(a.overall.as_str(), a.overall.tone()),
        a.score,
    ).ok();
    writeln!(out, "  {}", p.dim(&a.url)).ok();
    if let Some(summary) = a.summary.as_deref() {
        writeln!(out, "  {summary}").ok();
    }
    if a.rows.is_empty() {
        writeln!(out, "  {}", p.dim("no factors returned")).ok();
    }
    for row in &a.rows {
        writeln!(
            out,
            "  {:<20} {} {}",
            row.factor,
            p.tone(&format!("{:<8}", row.impact.as_str()), row.impact.tone()),
            row.reason,
        ).ok();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use optdash_core::domain::news::{ArticleImpactRow, Impact};

    const PLAIN: Painter = Painter { color: false };

    fn failed(ticker: &str) -> SymbolSnapshot {
        SymbolSnapshot {
            ticker: ticker.to_string(),
            options: None,
            news: vec![],
            press_releases: vec![],
            error: Some("No options data for ZZZZ".to_string()),
            rating: None,
            ai_rating: None,
        }
    }

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1_000), "1,000");
        assert_eq!(fmt_count(41_250_300), "41,250,300");
    }

    #[test]
    fn formats_signed_deltas() {
        assert_eq!(fmt_delta(Some(12.34)), "+12.3%");
        assert_eq!(fmt_delta(Some(-5.0)), "-5.0%");
        assert_eq!(fmt_delta(None), NO_DATA);
    }

    #[test]
    fn table_shows_placeholders_and_inline_errors() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let rows = vec![SummaryRow::from_snapshot(&failed("ZZZZ"))];
        let out = summary_table(&rows, today, PLAIN);
        assert!(out.contains("ZZZZ"));
        assert!(out.contains("no options data"));
        assert!(out.contains("! No options data for ZZZZ"));
    }

    #[test]
    fn empty_table_says_so() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert!(summary_table(&[], today, PLAIN).contains("no tickers loaded"));
    }

    #[test]
    fn card_renders_missing_sections() {
        let out = detail_card(&failed("ZZZZ"), PLAIN);
        assert!(out.contains("no options data"));
        assert!(out.contains("no items"));
    }

    #[test]
    fn analysis_lists_rows() {
        let a = ArticleAnalysis {
            url: "https://example.com/a".to_string(),
            ticker: Some("AAPL".to_string()),
            overall: Impact::Bullish,
            score: 2.0,
            rows: vec![ArticleImpactRow {
                factor: "Guidance".to_string(),
                impact: Impact::Bullish,
                reason: "Raised FY outlook".to_string(),
            }],
            summary: None,
        };
        let out = analysis(&a, PLAIN);
        assert!(out.contains("Overall: Bullish (score +2)"));
        assert!(out.contains("Raised FY outlook"));
    }

    #[test]
    fn chain_shows_only_requested_side() {
        let snap = OptionsSnapshot {
            ticker: "AAPL".to_string(),
            expiration: Some("2025-01-17".to_string()),
            underlying_price: Some(190.0),
            volume: None,
            avg_volume_10d: None,
            avg_volume_3m: None,
            earnings_date: None,
            calls: vec![],
            puts: vec![],
            note: None,
        };

        let out = chain(&snap, Side::Puts, PLAIN);
        assert!(!out.contains("Calls"));
        assert!(out.contains("Puts"));

        let out = chain(&snap, Side::Calls, PLAIN);
        assert!(out.contains("Calls"));
        assert!(!out.contains("Puts"));

        let out = chain(&snap, Side::Both, PLAIN);
        assert!(out.contains("Calls") && out.contains("Puts"));
    }
}
