// Parsing user-entered due dates

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use eyre::{Result, eyre};

/// Parse a due date.
///
/// Accepts RFC 3339 (`2026-10-20T09:00:00Z`), local `DD-MM-YYYY HH:MM`,
/// local `DD-MM-YYYY` (midnight), or an offset from `now` such as `+90m`.
pub fn parse_due(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Some(offset) = input.strip_prefix('+') {
        let delta = parse_offset(offset)?;
        return now
            .checked_add_signed(delta)
            .ok_or_else(|| eyre!("Offset out of range: +{}", offset));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%d-%m-%Y %H:%M") {
        return local_to_utc(naive);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%d-%m-%Y") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| eyre!("Invalid date: {}", input))?;
        return local_to_utc(midnight);
    }

    Err(eyre!(
        "Unrecognized due date: {} (use RFC 3339, DD-MM-YYYY [HH:MM] or +<n><s|m|h|d>)",
        input
    ))
}

fn parse_offset(offset: &str) -> Result<TimeDelta> {
    let split = offset
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| eyre!("Offset needs a unit: +{}", offset))?;
    let (count, unit) = offset.split_at(split);
    let count: i64 = count.parse().map_err(|_| eyre!("Invalid offset: +{}", offset))?;

    let delta = match unit {
        "s" => TimeDelta::try_seconds(count),
        "m" => TimeDelta::try_minutes(count),
        "h" => TimeDelta::try_hours(count),
        "d" => TimeDelta::try_days(count),
        other => return Err(eyre!("Unknown offset unit: {} (use s, m, h or d)", other)),
    };
    delta.ok_or_else(|| eyre!("Offset out of range: +{}", offset))
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| eyre!("Local time does not exist: {}", naive))
}
