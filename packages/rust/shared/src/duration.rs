//! Restricted ISO-8601 duration parsing.
//!
//! Accepts `P[nD][T[nH][nM][nS]]` only; weeks, months and years are rejected. Used
//! wherever a recency window or interval string comes in from a caller
//! (`inLast`, `repeatInterval`, polling cadence).

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{Result, SourceBridgeError};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Matches `P(nD)?(T(nH)?(nM)?(nS)?)?`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("duration regex")
});

/// Parse a duration string into milliseconds.
///
/// Absent components count as zero, so `"P"` and `"PT"` parse to `0`.
/// The whole input must match: surrounding whitespace is an error, so
/// callers holding user text trim it first.
pub fn parse_millis(input: &str) -> Result<u64> {
    let caps = DURATION_RE
        .captures(input)
        .ok_or_else(|| format_error(input))?;

    let component = |idx: usize, unit: u64| -> Result<u64> {
        match caps.get(idx) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map(|n| n.saturating_mul(unit))
                .map_err(|_| format_error(input)),
            None => Ok(0),
        }
    };

    Ok(component(1, MS_PER_DAY)?
        .saturating_add(component(2, MS_PER_HOUR)?)
        .saturating_add(component(3, MS_PER_MINUTE)?)
        .saturating_add(component(4, MS_PER_SECOND)?))
}

/// Parse a duration string into a [`std::time::Duration`].
pub fn parse(input: &str) -> Result<Duration> {
    parse_millis(input).map(Duration::from_millis)
}

/// Render milliseconds back into canonical `P..DT..H..M..S` form.
///
/// Sub-second remainders are dropped. Zero renders as `PT0S`.
pub fn format_millis(ms: u64) -> String {
    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    if out == "P" {
        out.push_str("T0S");
    }
    out
}

fn format_error(input: &str) -> SourceBridgeError {
    SourceBridgeError::validation(format!(
        "invalid duration '{input}': expected ISO-8601 form P[nD][T[nH][nM][nS]], e.g. PT1H or P7D"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_components() {
        assert_eq!(parse_millis("PT1H").unwrap(), 3_600_000);
        assert_eq!(parse_millis("P1D").unwrap(), 86_400_000);
        assert_eq!(parse_millis("PT15M").unwrap(), 900_000);
        assert_eq!(parse_millis("P7D").unwrap(), 604_800_000);
        assert_eq!(parse_millis("PT30S").unwrap(), 30_000);
    }

    #[test]
    fn parses_combined_components() {
        assert_eq!(parse_millis("P1DT2H30M").unwrap(), 95_400_000);
        assert_eq!(parse_millis("PT1H1M1S").unwrap(), 3_661_000);
    }

    #[test]
    fn empty_durations_are_zero() {
        assert_eq!(parse_millis("P").unwrap(), 0);
        assert_eq!(parse_millis("PT").unwrap(), 0);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["bogus", "", "1H", "P1W", "P1Y", "P1M", "PT1.5H", "p1d", "PT1H2D"] {
            let err = parse_millis(bad).unwrap_err();
            assert!(
                matches!(err, SourceBridgeError::Validation { .. }),
                "{bad} should be a validation error"
            );
        }
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        for bad in [" PT1H ", "PT1H\n", "\tP1D", "P1D T1H"] {
            assert!(parse_millis(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn parse_is_pure() {
        let first = parse_millis("P2DT3H").unwrap();
        for _ in 0..10 {
            assert_eq!(parse_millis("P2DT3H").unwrap(), first);
        }
    }

    #[test]
    fn std_duration_matches_millis() {
        assert_eq!(parse("PT15M").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn format_is_canonical() {
        assert_eq!(format_millis(95_400_000), "P1DT2H30M");
        assert_eq!(format_millis(3_600_000), "PT1H");
        assert_eq!(format_millis(0), "PT0S");
        assert_eq!(format_millis(604_800_000), "P7D");
    }
}
