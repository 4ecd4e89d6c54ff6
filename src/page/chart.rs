use crate::github::ContributorStats;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub additions: u64,
    pub deletions: u64,
}

/// Weekly additions/deletions of the first contributor entry. The cached file
/// holds a single entry once the author filter has been applied.
pub fn chart_series(stats: &[ContributorStats]) -> Vec<ChartPoint> {
    let Some(contributor) = stats.first() else {
        return vec![];
    };
    contributor
        .weeks
        .iter()
        .map(|week| ChartPoint {
            label: week_label(week.week),
            additions: week.additions,
            deletions: week.deletions,
        })
        .collect()
}

pub fn week_label(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(datetime) => datetime.format("%-m/%-d/%Y").to_string(),
        None => timestamp.to_string(),
    }
}
