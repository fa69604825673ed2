use std::sync::LazyLock;

use chrono::Duration;
use regex::Regex;

use crate::error::AppError;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*([a-z]+)").expect("valid duration regex"));

const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_MONTH: i64 = 30;

/// Parse a human readable age such as `12h`, `7d` or `1m` (30 days).
///
/// An empty string means "no age cutoff" and yields a zero duration.
/// Only the first letter of the unit is significant, so `7days` is 7 days.
pub fn parse_duration(s: &str) -> Result<Duration, AppError> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Ok(Duration::zero());
    }

    let caps = DURATION_RE
        .captures(&s)
        .ok_or_else(|| AppError::InvalidDuration(s.clone()))?;

    let n: i64 = caps[1]
        .parse()
        .map_err(|_| AppError::InvalidDuration(s.clone()))?;
    let unit = &caps[2];

    let hours = match &unit[..1] {
        "h" => Some(n),
        "d" => n.checked_mul(HOURS_PER_DAY),
        "m" => n.checked_mul(HOURS_PER_DAY * DAYS_PER_MONTH),
        _ => return Err(AppError::UnsupportedDurationUnit(unit.to_string())),
    };

    hours
        .and_then(Duration::try_hours)
        .ok_or_else(|| AppError::InvalidDuration(s.clone()))
}
