use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::EtlError;

/// Disclosure date a daily run on `today` collects: Monday looks back to the
/// previous Friday, every other day to yesterday.
pub fn target_date(today: NaiveDate) -> NaiveDate {
    if today.weekday() == Weekday::Mon {
        today - Duration::days(3)
    } else {
        today - Duration::days(1)
    }
}

pub fn target_date_now() -> NaiveDate {
    target_date(Local::now().date_naive())
}

/// Accepts `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, EtlError> {
    let raw = raw.trim();
    let format = if raw.contains('-') { "%Y-%m-%d" } else { "%Y%m%d" };
    NaiveDate::parse_from_str(raw, format)
        .map_err(|error| EtlError::Validation(format!("invalid date '{raw}': {error}")))
}

/// Every day from `start` through `end`, inclusive.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn hive_partition(date: NaiveDate) -> String {
    format!("dt={}", date.format("%Y-%m-%d"))
}

pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{dates_between, hive_partition, parse_date_arg, target_date};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn monday_targets_previous_friday() {
        assert_eq!(target_date(date(2025, 1, 13)), date(2025, 1, 10));
    }

    #[test]
    fn other_days_target_yesterday() {
        assert_eq!(target_date(date(2025, 1, 14)), date(2025, 1, 13));
        assert_eq!(target_date(date(2025, 1, 19)), date(2025, 1, 18));
        assert_eq!(target_date(date(2025, 3, 1)), date(2025, 2, 28));
    }

    #[test]
    fn parses_both_date_spellings() {
        assert_eq!(parse_date_arg("20250115").expect("compact"), date(2025, 1, 15));
        assert_eq!(parse_date_arg("2025-01-15").expect("dashed"), date(2025, 1, 15));
        let err = parse_date_arg("15/01/2025").expect_err("slashes are rejected");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn date_range_is_inclusive() {
        let days = dates_between(date(2025, 1, 30), date(2025, 2, 2));
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], date(2025, 2, 2));
        assert!(dates_between(date(2025, 2, 2), date(2025, 1, 30)).is_empty());
    }

    #[test]
    fn formats_hive_partition() {
        assert_eq!(hive_partition(date(2025, 1, 5)), "dt=2025-01-05");
    }
}
