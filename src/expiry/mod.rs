// Expiry classification and display
use crate::error::{Result, SsoError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt::Display;

const CRITICAL_THRESHOLD_SECS: i64 = 30 * 60;
const WARNING_THRESHOLD_SECS: i64 = 2 * 60 * 60;

const COLOR_RED: &str = "red";
const COLOR_YELLOW: &str = "yellow";
const COLOR_GREEN: &str = "#7ED321";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Expired,
    Critical,
    Warning,
    Active,
}

impl ExpiryStatus {
    pub fn from_remaining(remaining: Duration) -> Self {
        if remaining <= Duration::zero() {
            ExpiryStatus::Expired
        } else if remaining < Duration::seconds(CRITICAL_THRESHOLD_SECS) {
            ExpiryStatus::Critical
        } else if remaining < Duration::seconds(WARNING_THRESHOLD_SECS) {
            ExpiryStatus::Warning
        } else {
            ExpiryStatus::Active
        }
    }

    /// Title color; Expired and Critical share red
    pub fn color(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired | ExpiryStatus::Critical => COLOR_RED,
            ExpiryStatus::Warning => COLOR_YELLOW,
            ExpiryStatus::Active => COLOR_GREEN,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::Critical => "critical",
            ExpiryStatus::Warning => "warning",
            ExpiryStatus::Active => "active",
        }
    }
}

/// Remaining validity of a token at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub remaining: Duration,
    pub status: ExpiryStatus,
}

impl Classification {
    /// Whole seconds remaining, truncated toward zero; negative once expired
    pub fn seconds_remaining(&self) -> i64 {
        self.remaining.num_seconds()
    }

    pub fn time_remaining(&self) -> String {
        format_time_remaining(self.seconds_remaining())
    }

    pub fn is_expired(&self) -> bool {
        self.status == ExpiryStatus::Expired
    }
}

/// Parse the `expiresAt` value of a cached token
///
/// Accepts RFC 3339 (`Z` or `+HH:MM`) and the compact `+HHMM` offset. A
/// timestamp without an offset is rejected.
pub fn parse_expiry(raw: &serde_json::Value) -> Result<DateTime<Utc>> {
    let text = raw
        .as_str()
        .ok_or_else(|| SsoError::TimestampUnparsable(raw.to_string()))?;

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| SsoError::TimestampUnparsable(text.to_string()))
}

pub fn classify(expires_at: &DateTime<Utc>, now: &DateTime<Utc>) -> Classification {
    let remaining = *expires_at - *now;
    Classification {
        remaining,
        status: ExpiryStatus::from_remaining(remaining),
    }
}

/// Hours if at least one hour is left, otherwise minutes. Never both.
pub fn format_time_remaining(seconds: i64) -> String {
    if seconds <= 0 {
        return "Expired".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Format an instant in the given zone, e.g. `Jan 05, 2025 14:30`
pub fn format_expiry<Tz>(expires_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    expires_at
        .with_timezone(tz)
        .format("%b %d, %Y %H:%M")
        .to_string()
}
