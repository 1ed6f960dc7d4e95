//! Parsing of user-typed seek positions.

use std::time::Duration;

use crate::error::PlayerError;

/// Parse `input` as a playback position.
///
/// Accepts plain seconds (`"42"`, `"12.5"`), `MM:SS` and `HH:MM:SS`. A
/// negative number of seconds means the start of the track.
pub fn parse_position(input: &str) -> Result<Duration, PlayerError> {
    let invalid = || PlayerError::InvalidSeekFormat(input.to_string());
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    if !s.contains(':') {
        let secs: f64 = s.parse().map_err(|_| invalid())?;
        if !secs.is_finite() {
            return Err(invalid());
        }
        return Duration::try_from_secs_f64(secs.max(0.0)).map_err(|_| invalid());
    }

    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => ("0", *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
    // `MM` may run past 59 only when there is no hour field.
    if parts.len() == 3 && minutes >= 60 {
        return Err(invalid());
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(invalid());
    }

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .ok_or_else(invalid)?;
    Duration::from_secs(whole)
        .checked_add(Duration::from_secs_f64(seconds))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_seconds() {
        assert_eq!(parse_position("42").unwrap(), Duration::from_secs(42));
        assert_eq!(parse_position(" 12.5 ").unwrap(), Duration::from_millis(12_500));
    }

    #[test]
    fn negative_seconds_clamp_to_start() {
        assert_eq!(parse_position("-3").unwrap(), Duration::ZERO);
    }

    #[test]
    fn clock_forms() {
        assert_eq!(parse_position("1:05").unwrap(), Duration::from_secs(65));
        assert_eq!(parse_position("75:00").unwrap(), Duration::from_secs(4500));
        assert_eq!(parse_position("1:02:03").unwrap(), Duration::from_secs(3723));
    }

    #[test]
    fn rejects_out_of_range_magnitudes() {
        for bad in [
            "1e30",
            "1e300",
            "18446744073709551615:00:00",
            "18446744073709551615:00",
            "5124095576030432:00:00",
        ] {
            assert!(
                matches!(parse_position(bad), Err(PlayerError::InvalidSeekFormat(ref s)) if s == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn large_but_representable_positions() {
        let secs = parse_position("1e15").unwrap();
        assert_eq!(secs, Duration::from_secs(1_000_000_000_000_000));
        assert_eq!(
            parse_position("1000000:00:00").unwrap(),
            Duration::from_secs(3_600_000_000)
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "1:2:3:4", "1:75", "1:60:00", "-1:00", "1:", "NaN", "inf"] {
            assert!(
                matches!(parse_position(bad), Err(PlayerError::InvalidSeekFormat(ref s)) if s == bad),
                "{bad:?} should be rejected"
            );
        }
    }
}
