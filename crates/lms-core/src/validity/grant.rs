//! Grant records and expiry derivation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Naive layouts the backend has been seen to emit; read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Why a grant cannot produce an expiry instant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidityError {
    #[error("unparseable grant timestamp {0:?}")]
    ParseFailure(String),
    #[error("invalid validity duration: {0} days")]
    InvalidDuration(f64),
}

/// Time-limited access as stored by the backend on a course, batch or
/// user-course record. Either field may be missing until data has loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidityGrant {
    /// Moment validity was last set or renewed.
    #[serde(rename = "updated_date", default)]
    pub granted_at: Option<String>,
    /// Days the grant stays active from `granted_at`; may be fractional.
    #[serde(rename = "validity", default)]
    pub validity_days: Option<f64>,
}

impl ValidityGrant {
    pub fn new(granted_at: impl Into<String>, validity_days: f64) -> Self {
        Self {
            granted_at: Some(granted_at.into()),
            validity_days: Some(validity_days),
        }
    }

    /// Grant stamped at `granted_at` in RFC 3339 form.
    pub fn at(granted_at: DateTime<Utc>, validity_days: f64) -> Self {
        Self::new(granted_at.to_rfc3339(), validity_days)
    }

    /// Both inputs present.
    pub fn is_defined(&self) -> bool {
        self.granted_at.is_some() && self.validity_days.is_some()
    }

    /// `granted_at + validity_days`, or `Ok(None)` while either input is missing.
    ///
    /// Negative or non-finite day counts are rejected so callers can treat the
    /// grant as expired. Durations too large to represent saturate at
    /// `DateTime::<Utc>::MAX_UTC`.
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, ValidityError> {
        let (Some(raw), Some(days)) = (self.granted_at.as_deref(), self.validity_days) else {
            return Ok(None);
        };
        let granted = parse_timestamp(raw)?;
        if !days.is_finite() || days < 0.0 {
            return Err(ValidityError::InvalidDuration(days));
        }
        // Expiries past chrono's range clamp to the latest representable instant.
        let millis = (days * MILLIS_PER_DAY).round();
        let expires_at = if millis >= i64::MAX as f64 {
            DateTime::<Utc>::MAX_UTC
        } else {
            TimeDelta::try_milliseconds(millis as i64)
                .and_then(|delta| granted.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        };
        Ok(Some(expires_at))
    }
}

/// Parse a grant timestamp: RFC 3339 first, then naive date-times and bare
/// dates (taken as UTC midnight).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidityError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidityError::ParseFailure(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let t = parse_timestamp("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_and_date_only_as_utc() {
        let t = parse_timestamp("2024-03-01T12:30:15.250").unwrap();
        assert_eq!(t.timestamp_millis() % 1000, 250);
        let t = parse_timestamp("2024-03-01 12:30:15").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 15).unwrap());
        let d = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_parse_failure() {
        assert_eq!(
            parse_timestamp("next tuesday"),
            Err(ValidityError::ParseFailure("next tuesday".to_string()))
        );
    }

    #[test]
    fn expires_at_adds_fractional_days() {
        let g = ValidityGrant::new("2024-01-01T00:00:00Z", 1.5);
        let exp = g.expires_at().unwrap().unwrap();
        assert_eq!(exp, Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap());
    }

    #[test]
    fn undefined_inputs_have_no_expiry() {
        assert_eq!(ValidityGrant::default().expires_at(), Ok(None));
        let partial = ValidityGrant {
            granted_at: Some("2024-01-01T00:00:00Z".into()),
            validity_days: None,
        };
        assert!(!partial.is_defined());
        assert_eq!(partial.expires_at(), Ok(None));
    }

    #[test]
    fn negative_and_nan_days_rejected() {
        let g = ValidityGrant::new("2024-01-01T00:00:00Z", -3.0);
        assert_eq!(g.expires_at(), Err(ValidityError::InvalidDuration(-3.0)));
        let g = ValidityGrant::new("2024-01-01T00:00:00Z", f64::NAN);
        assert!(matches!(g.expires_at(), Err(ValidityError::InvalidDuration(_))));
        let g = ValidityGrant::new("2024-01-01T00:00:00Z", f64::INFINITY);
        assert!(g.expires_at().is_err());
    }

    #[test]
    fn unrepresentable_expiry_saturates() {
        for days in [99_999_999.0, 1e12, 1e300] {
            let g = ValidityGrant::new("2024-01-01T00:00:00Z", days);
            assert_eq!(g.expires_at(), Ok(Some(DateTime::<Utc>::MAX_UTC)), "{days} days");
        }
    }

    #[test]
    fn deserializes_backend_field_names() {
        let g: ValidityGrant =
            serde_json::from_str(r#"{"updated_date":"2024-05-01T08:00:00Z","validity":30}"#)
                .unwrap();
        assert_eq!(g.granted_at.as_deref(), Some("2024-05-01T08:00:00Z"));
        assert_eq!(g.validity_days, Some(30.0));
        let empty: ValidityGrant = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_defined());
    }
}
