//! Keepa timestamp conversion.
//!
//! Keepa encodes times as minutes since its own epoch. Milliseconds
//! since the Unix epoch are `(keepa_minutes + 21564000) * 60000`;
//! a value of `0` means "unknown".

use chrono::{DateTime, Utc};

/// Offset between the Keepa minute epoch and the Unix epoch, in minutes.
const KEEPA_EPOCH_OFFSET_MINUTES: i64 = 21_564_000;

/// Convert a Keepa minute timestamp to UTC. `0` maps to `None`.
pub fn keepa_minutes_to_utc(keepa_minutes: i64) -> Option<DateTime<Utc>> {
    if keepa_minutes == 0 {
        return None;
    }
    let millis = (keepa_minutes + KEEPA_EPOCH_OFFSET_MINUTES) * 60_000;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_unknown() {
        assert!(keepa_minutes_to_utc(0).is_none());
    }

    #[test]
    fn test_known_conversion() {
        // (5_000_000 + 21_564_000) minutes = 1_593_840_000 seconds
        let ts = keepa_minutes_to_utc(5_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_593_840_000);
        assert_eq!(ts.to_rfc3339(), "2020-07-04T05:20:00+00:00");
    }

    #[test]
    fn test_minute_resolution() {
        let a = keepa_minutes_to_utc(5_000_000).unwrap();
        let b = keepa_minutes_to_utc(5_000_001).unwrap();
        assert_eq!((b - a).num_seconds(), 60);
    }
}
