use crate::clock::ClockTime;
use crate::error::ParseError;

/// Largest offset that still fits the `0:MM:SS.mmm` clock an armed timer uses.
pub const MAX_OFFSET_MS: u64 = 60 * 60 * 1_000 - 1;

/// Parse the last `/`-separated segment of an offsets field as milliseconds.
pub fn last_offset_ms(offsets: &str) -> Result<u64, ParseError> {
    // split always yields at least one item
    let segment = offsets.rsplit('/').next().unwrap_or_default();

    segment
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::NotAnInteger {
            segment: segment.to_string(),
        })
}

/// Turn an offsets field into the duration the countdown arms with.
///
/// The value is split into whole minutes, seconds and milliseconds; hours are
/// never set, so values of an hour or more are rejected.
pub fn parse_offsets(offsets: &str) -> Result<ClockTime, ParseError> {
    let value = last_offset_ms(offsets)?;
    if value > MAX_OFFSET_MS {
        return Err(ParseError::OutOfRange { value });
    }

    let minutes = value / 60_000;
    let remainder = value % 60_000;
    let seconds = remainder / 1_000;
    let millis = remainder % 1_000;

    Ok(ClockTime::from_parts(0, minutes, seconds, millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn takes_last_segment() {
        assert_eq!(last_offset_ms("100/200/1500"), Ok(1500));
        assert_eq!(last_offset_ms("42"), Ok(42));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(last_offset_ms("100 / 2500 "), Ok(2500));
    }

    #[test]
    fn rejects_non_integers() {
        assert_matches!(
            last_offset_ms("abc"),
            Err(ParseError::NotAnInteger { ref segment }) if segment == "abc"
        );
        assert_matches!(last_offset_ms(""), Err(ParseError::NotAnInteger { .. }));
        assert_matches!(last_offset_ms("100/"), Err(ParseError::NotAnInteger { .. }));
        assert_matches!(last_offset_ms("-5"), Err(ParseError::NotAnInteger { .. }));
        assert_matches!(last_offset_ms("1.5"), Err(ParseError::NotAnInteger { .. }));
    }

    #[test]
    fn earlier_segments_are_ignored() {
        assert_eq!(last_offset_ms("junk/300"), Ok(300));
    }

    #[test]
    fn converts_to_minutes_seconds_millis() {
        let t = parse_offsets("125250").unwrap();
        assert_eq!(t.hours(), 0);
        assert_eq!(t.minutes(), 2);
        assert_eq!(t.seconds(), 5);
        assert_eq!(t.millis(), 250);
    }

    #[test]
    fn hour_or_more_is_out_of_range() {
        assert!(parse_offsets(&MAX_OFFSET_MS.to_string()).is_ok());
        assert_matches!(
            parse_offsets("3600000"),
            Err(ParseError::OutOfRange { value: 3_600_000 })
        );
    }
}
