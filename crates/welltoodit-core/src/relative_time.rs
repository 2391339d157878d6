//! Human-readable "last saved" label.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Label shown when nothing has been saved yet.
pub const NEVER: &str = "Never";

/// Render the time since `last` as seen at `now`, with calendar dates in
/// the local timezone.
pub fn format_last_save(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    format_last_save_with(last, now, |t| t.with_timezone(&Local).date_naive())
}

/// Like [`format_last_save`], with an explicit conversion to a calendar date.
pub fn format_last_save_with(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    to_date: impl Fn(DateTime<Utc>) -> NaiveDate,
) -> String {
    let Some(last) = last else {
        return NEVER.to_string();
    };

    // A save "in the future" (clock skew) reads as just now.
    let minutes = (now - last).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        to_date(last).format("%-m/%-d/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn base() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn label(ago: TimeDelta) -> String {
        format_last_save_with(Some(base() - ago), base(), |t| t.date_naive())
    }

    #[test]
    fn test_never() {
        assert_eq!(format_last_save(None, base()), "Never");
    }

    #[test]
    fn test_just_now() {
        assert_eq!(label(TimeDelta::zero()), "Just now");
        assert_eq!(label(TimeDelta::seconds(59)), "Just now");
        assert_eq!(label(TimeDelta::seconds(-30)), "Just now");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(label(TimeDelta::seconds(60)), "1m ago");
        assert_eq!(label(TimeDelta::minutes(59) + TimeDelta::seconds(59)), "59m ago");
    }

    #[test]
    fn test_hours() {
        assert_eq!(label(TimeDelta::minutes(60)), "1h ago");
        assert_eq!(label(TimeDelta::minutes(1439)), "23h ago");
    }

    #[test]
    fn test_date_after_a_day() {
        assert_eq!(label(TimeDelta::days(1)), "10/18/2026");
        assert_eq!(label(TimeDelta::days(280)), "1/12/2026");
    }
}
