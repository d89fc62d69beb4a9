// Remaining-time labels for due dates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Priority;

/// Language used for user-facing labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl FromStr for Locale {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vi" => Ok(Locale::Vi),
            "en" => Ok(Locale::En),
            other => Err(eyre::eyre!("Unsupported locale: {} (expected vi or en)", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Vi => write!(f, "vi"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl Locale {
    pub fn priority_label(self, priority: Priority) -> &'static str {
        match (self, priority) {
            (Locale::Vi, Priority::High) => "Ưu tiên cao",
            (Locale::Vi, Priority::Medium) => "Ưu tiên trung bình",
            (Locale::Vi, Priority::Low) => "Ưu tiên thấp",
            (Locale::En, Priority::High) => "High priority",
            (Locale::En, Priority::Medium) => "Medium priority",
            (Locale::En, Priority::Low) => "Low priority",
        }
    }
}

/// Time left until a due date, in the coarsest unit whose count is still small
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Expired,
    Seconds(i64),
    Minutes(i64),
    Hours(i64),
    /// No upper unit: a year away is still counted in days
    Days(i64),
}

impl Remaining {
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if target <= now {
            return Remaining::Expired;
        }
        let delta_ms = (target - now).num_milliseconds();

        let seconds = delta_ms / 1000;
        let minutes = seconds / 60;
        let hours = minutes / 60;
        let days = hours / 24;

        if seconds < 60 {
            Remaining::Seconds(seconds)
        } else if minutes < 60 {
            Remaining::Minutes(minutes)
        } else if hours < 24 {
            Remaining::Hours(hours)
        } else {
            Remaining::Days(days)
        }
    }

    pub fn is_expired(self) -> bool {
        self == Remaining::Expired
    }

    pub fn render(self, locale: Locale) -> String {
        match locale {
            Locale::Vi => match self {
                Remaining::Expired => "Hết thời hạn".to_string(),
                Remaining::Seconds(n) => format!("Còn {} giây", n),
                Remaining::Minutes(n) => format!("Còn {} phút", n),
                Remaining::Hours(n) => format!("Còn {} giờ", n),
                Remaining::Days(n) => format!("Còn {} ngày", n),
            },
            Locale::En => match self {
                Remaining::Expired => "Expired".to_string(),
                Remaining::Seconds(n) => format!("{} {} left", n, plural(n, "second")),
                Remaining::Minutes(n) => format!("{} {} left", n, plural(n, "minute")),
                Remaining::Hours(n) => format!("{} {} left", n, plural(n, "hour")),
                Remaining::Days(n) => format!("{} {} left", n, plural(n, "day")),
            },
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 { unit.to_string() } else { format!("{}s", unit) }
}

/// Label for the time left until `target`, evaluated against `now`
pub fn remaining_time(target: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    Remaining::between(target, now).render(locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_expired() {
        assert_eq!(remaining_time(now() - Duration::seconds(1), now(), Locale::Vi), "Hết thời hạn");
        assert_eq!(Remaining::between(now(), now()), Remaining::Expired);
    }

    #[test]
    fn test_seconds() {
        assert_eq!(remaining_time(now() + Duration::seconds(30), now(), Locale::Vi), "Còn 30 giây");
        // Sub-second deltas floor to zero seconds but are not expired
        assert_eq!(Remaining::between(now() + Duration::milliseconds(400), now()), Remaining::Seconds(0));
        assert_eq!(Remaining::between(now() + Duration::microseconds(500), now()), Remaining::Seconds(0));
    }

    #[test]
    fn test_minutes() {
        assert_eq!(remaining_time(now() + Duration::seconds(90), now(), Locale::Vi), "Còn 1 phút");
        assert_eq!(Remaining::between(now() + Duration::seconds(3599), now()), Remaining::Minutes(59));
    }

    #[test]
    fn test_hours() {
        assert_eq!(remaining_time(now() + Duration::hours(2), now(), Locale::Vi), "Còn 2 giờ");
        assert_eq!(Remaining::between(now() + Duration::hours(24) - Duration::seconds(1), now()), Remaining::Hours(23));
    }

    #[test]
    fn test_days_without_upper_unit() {
        assert_eq!(remaining_time(now() + Duration::days(3), now(), Locale::Vi), "Còn 3 ngày");
        assert_eq!(Remaining::between(now() + Duration::days(800), now()), Remaining::Days(800));
    }

    #[test]
    fn test_english_rendering() {
        assert_eq!(Remaining::Minutes(1).render(Locale::En), "1 minute left");
        assert_eq!(Remaining::Days(3).render(Locale::En), "3 days left");
        assert_eq!(Remaining::Expired.render(Locale::En), "Expired");
    }

    #[test]
    fn test_locale_parse_and_labels() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::Vi.priority_label(Priority::High), "Ưu tiên cao");
        assert_eq!(Locale::En.priority_label(Priority::Low), "Low priority");
    }
}
