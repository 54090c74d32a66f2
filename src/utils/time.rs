use std::time::Duration;

/// This is the standard way of displaying an elapsed duration in tasktimer: `HH:MM:SS`.
/// Hours are padded to two digits but are not capped, fractions of a second are truncated.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Serializes [Duration] as whole milliseconds.
pub mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::format_elapsed;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "01:01:01");
    }

    #[test]
    fn truncates_sub_second_part() {
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59");
        assert_eq!(format_elapsed(Duration::from_millis(900)), "00:00:00");
    }

    #[test]
    fn hours_are_unbounded() {
        assert_eq!(format_elapsed(Duration::from_secs(100 * 3600 + 5)), "100:00:05");
    }
}
