// Day x hour occupancy bucketing over history heartbeats. Pure logic;
// the DB query stays in device_repo.

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::HEARTBEAT_FORMAT;

/// Trailing window for the distribution view, in days back from today.
pub const DISTRIBUTION_WINDOW_DAYS: i64 = 30;

/// Distribution payload. The date axis is dense (every day in the window,
/// today first); hours within a day are sparse, absent means zero.
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub dates: Vec<String>,
    pub hours: Vec<String>,
    pub device_logs: BTreeMap<String, BTreeMap<String, i64>>,
}

/// All 24 hour labels, "00" through "23".
pub fn hour_labels() -> Vec<String> {
    (0..24).map(|h| format!("{:02}", h)).collect()
}

/// The dense date axis: today back through today - 30 days, as YYYYMMDD.
pub fn window_dates(today: chrono::NaiveDate) -> Vec<String> {
    (0..=DISTRIBUTION_WINDOW_DAYS)
        .map(|i| (today - Duration::days(i)).format("%Y%m%d").to_string())
        .collect()
}

/// Buckets heartbeat timestamps into (day, hour) counts. Unparsable
/// timestamps are skipped.
pub fn build_distribution(today: chrono::NaiveDate, heartbeat_times: &[String]) -> Distribution {
    let mut device_logs: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();

    for raw in heartbeat_times {
        let Ok(ts) = NaiveDateTime::parse_from_str(raw, HEARTBEAT_FORMAT) else {
            tracing::debug!(heartbeat_time = %raw, "skipping unparsable heartbeat");
            continue;
        };
        let day = format!("{:04}{:02}{:02}", ts.year(), ts.month(), ts.day());
        let hour = ts.format("%H").to_string();
        *device_logs.entry(day).or_default().entry(hour).or_insert(0) += 1;
    }

    Distribution {
        dates: window_dates(today),
        hours: hour_labels(),
        device_logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn n_entries_in_one_hour_bucket() {
        let times: Vec<String> = (0..5)
            .map(|i| format!("2026-08-28 14:0{}:00", i))
            .collect();
        let dist = build_distribution(day(2026, 8, 28), &times);

        let hours = &dist.device_logs["20260828"];
        assert_eq!(hours["14"], 5);
        // Sparse hour axis: only the populated hour appears, and its sum is
        // the day total.
        assert_eq!(hours.len(), 1);
        assert_eq!(hours.values().sum::<i64>(), 5);
    }

    #[test]
    fn date_axis_is_dense_31_days_today_first() {
        let dist = build_distribution(day(2026, 8, 28), &[]);
        assert_eq!(dist.dates.len(), 31);
        assert_eq!(dist.dates[0], "20260828");
        assert_eq!(dist.dates[30], "20260729");
        assert!(dist.device_logs.is_empty());
    }

    #[test]
    fn hour_axis_lists_all_24() {
        let dist = build_distribution(day(2026, 8, 28), &[]);
        assert_eq!(dist.hours.len(), 24);
        assert_eq!(dist.hours[0], "00");
        assert_eq!(dist.hours[23], "23");
    }

    #[test]
    fn entries_spread_across_hours_and_days() {
        let times = vec![
            "2026-08-28 09:15:00".to_string(),
            "2026-08-28 09:45:00".to_string(),
            "2026-08-28 17:00:00".to_string(),
            "2026-08-27 23:59:59".to_string(),
        ];
        let dist = build_distribution(day(2026, 8, 28), &times);
        assert_eq!(dist.device_logs["20260828"]["09"], 2);
        assert_eq!(dist.device_logs["20260828"]["17"], 1);
        assert_eq!(dist.device_logs["20260827"]["23"], 1);
        assert_eq!(
            dist.device_logs["20260828"].values().sum::<i64>(),
            3
        );
    }

    #[test]
    fn unparsable_timestamps_are_skipped() {
        let times = vec!["garbage".to_string(), "2026-08-28 10:00:00".to_string()];
        let dist = build_distribution(day(2026, 8, 28), &times);
        assert_eq!(dist.device_logs["20260828"]["10"], 1);
        assert_eq!(dist.device_logs.len(), 1);
    }
}
