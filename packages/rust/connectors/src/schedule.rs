//! Recurring-schedule policy for feed requests.

use sourcebridge_shared::{RecurrenceType, Result, SchedulePolicy, SourceBridgeError, duration};

/// Interval used when the caller asks for recurrence without one.
pub const DEFAULT_REPEAT_INTERVAL: &str = "PT15M";

/// Shortest recurrence the platform accepts, in milliseconds (5 minutes).
pub const MIN_REPEAT_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Build the schedule policy for a feed request.
///
/// Non-recurring requests get no policy, whatever `repeat_interval` holds.
/// Recurring requests fall back to [`DEFAULT_REPEAT_INTERVAL`] and are
/// rejected below [`MIN_REPEAT_INTERVAL_MS`].
pub fn schedule_policy(
    recurring: bool,
    repeat_interval: Option<&str>,
) -> Result<Option<SchedulePolicy>> {
    if !recurring {
        return Ok(None);
    }

    let interval = repeat_interval
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REPEAT_INTERVAL);

    let millis = duration::parse_millis(interval)?;
    if millis < MIN_REPEAT_INTERVAL_MS {
        return Err(SourceBridgeError::validation(format!(
            "repeatInterval '{interval}' is below the minimum of {}",
            duration::format_millis(MIN_REPEAT_INTERVAL_MS)
        )));
    }

    Ok(Some(SchedulePolicy {
        recurrence_type: RecurrenceType::Repeat,
        repeat_interval: interval.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_recurring_ignores_interval() {
        assert_eq!(schedule_policy(false, None).unwrap(), None);
        assert_eq!(schedule_policy(false, Some("PT1M")).unwrap(), None);
        assert_eq!(schedule_policy(false, Some("garbage")).unwrap(), None);
    }

    #[test]
    fn recurring_defaults_to_fifteen_minutes() {
        let policy = schedule_policy(true, None).unwrap().unwrap();
        assert_eq!(policy.recurrence_type, RecurrenceType::Repeat);
        assert_eq!(policy.repeat_interval, "PT15M");
    }

    #[test]
    fn recurring_keeps_caller_interval() {
        let policy = schedule_policy(true, Some("P1D")).unwrap().unwrap();
        assert_eq!(policy.repeat_interval, "P1D");
    }

    #[test]
    fn floor_is_inclusive() {
        assert!(schedule_policy(true, Some("PT5M")).unwrap().is_some());
        assert!(schedule_policy(true, Some("PT300S")).unwrap().is_some());
    }

    #[test]
    fn below_floor_is_rejected() {
        let err = schedule_policy(true, Some("PT4M59S")).unwrap_err();
        assert!(matches!(err, SourceBridgeError::Validation { .. }));
        assert!(err.to_string().contains("PT5M"));

        assert!(schedule_policy(true, Some("PT")).is_err());
    }

    #[test]
    fn malformed_interval_is_rejected() {
        assert!(schedule_policy(true, Some("15 minutes")).is_err());
    }
}
