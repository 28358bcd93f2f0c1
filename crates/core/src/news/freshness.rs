use crate::domain::news::NewsItem;
use crate::time::relative::relative_time_to_hours;

pub const FRESH_WINDOW_HOURS: f64 = 24.0;

/// How a news list is narrowed before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FreshnessPolicy {
    /// Keep items at most 24h old; unparseable ages are dropped.
    #[default]
    Recent24h,
    /// Keep everything in backend order.
    All,
}

impl FreshnessPolicy {
    pub fn apply<'a>(self, items: &'a [NewsItem]) -> Vec<&'a NewsItem> {
        match self {
            FreshnessPolicy::Recent24h => filter_fresh(items),
            FreshnessPolicy::All => items.iter().collect(),
        }
    }
}

pub fn is_fresh(item: &NewsItem) -> bool {
    relative_time_to_hours(item.relative_time.as_deref())
        .is_some_and(|age| age <= FRESH_WINDOW_HOURS)
}

/// Items no older than [`FRESH_WINDOW_HOURS`], in their original order.
pub fn filter_fresh(items: &[NewsItem]) -> Vec<&NewsItem> {
    items.iter().filter(|item| is_fresh(item)).collect()
}
