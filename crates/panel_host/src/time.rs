//! Clock helpers that work on both wasm32 and native targets.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Converts unix milliseconds to a UTC instant, clamping out-of-range values to the epoch.
pub fn datetime_from_unix_ms(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

/// Current instant; reads `Date.now()` on wasm32.
pub fn utc_now() -> DateTime<Utc> {
    datetime_from_unix_ms(unix_time_ms_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_ms_converts_to_utc() {
        assert_eq!(
            datetime_from_unix_ms(1_704_067_200_000).to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(datetime_from_unix_ms(u64::MAX).timestamp(), 0);
    }

    #[test]
    fn clock_is_past_2024() {
        assert!(utc_now().timestamp() > 1_704_067_200);
    }
}
