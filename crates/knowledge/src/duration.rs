//! Korean duration rendering.

use crate::error::FormatterError;

/// Render whole seconds as `"{m}분"`, `"{m}분 {s}초"` or `"{s}초"`.
///
/// Minutes are never folded into hours; 90 minutes is `"90분"`.
pub fn format_duration(seconds: u32) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;

    match (minutes, rest) {
        (0, s) => format!("{s}초"),
        (m, 0) => format!("{m}분"),
        (m, s) => format!("{m}분 {s}초"),
    }
}

/// Render whole minutes, as used by the ancillary team datasets.
pub fn format_minutes(minutes: u32) -> String {
    format_duration(minutes.saturating_mul(60))
}

/// Convert a computed duration to whole seconds.
///
/// Negative, NaN, infinite and out-of-range values are errors, never clamped.
pub fn whole_seconds(value: f64) -> Result<u32, FormatterError> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(FormatterError::InvalidDuration { value });
    }
    Ok(value.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_seconds() {
        assert_eq!(format_duration(0), "0초");
    }

    #[test]
    fn under_a_minute_is_seconds_only() {
        assert_eq!(format_duration(45), "45초");
        assert_eq!(format_duration(59), "59초");
    }

    #[test]
    fn whole_minutes_drop_seconds() {
        assert_eq!(format_duration(60), "1분");
        assert_eq!(format_duration(1200), "20분");
        assert_eq!(format_duration(5400), "90분");
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_duration(90), "1분 30초");
        assert_eq!(format_duration(770), "12분 50초");
    }

    #[test]
    fn minutes_helper() {
        assert_eq!(format_minutes(30), "30분");
        assert_eq!(format_minutes(0), "0초");
    }

    #[test]
    fn whole_seconds_rejects_bad_values() {
        assert_eq!(whole_seconds(120.0), Ok(120));
        assert!(whole_seconds(-10.0).is_err());
        assert!(whole_seconds(f64::NAN).is_err());
        assert!(whole_seconds(f64::INFINITY).is_err());
        assert!(whole_seconds(1e12).is_err());
    }
}
