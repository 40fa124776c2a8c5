use std::fmt;

const MS_PER_SEC: u64 = 1_000;
const MS_PER_MIN: u64 = 60 * MS_PER_SEC;
const MS_PER_HOUR: u64 = 60 * MS_PER_MIN;

/// A time-of-day style duration with millisecond resolution.
///
/// Stored as a millisecond count; the hour/minute/second/millisecond accessors
/// decompose it the way a wall clock would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct ClockTime {
    ms: u64,
}

impl ClockTime {
    pub const ZERO: ClockTime = ClockTime { ms: 0 };

    pub fn from_millis(ms: u64) -> Self {
        Self { ms }
    }

    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Self {
        Self {
            ms: hours * MS_PER_HOUR + minutes * MS_PER_MIN + seconds * MS_PER_SEC + millis,
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.ms
    }

    pub fn is_zero(&self) -> bool {
        self.ms == 0
    }

    pub fn hours(&self) -> u64 {
        self.ms / MS_PER_HOUR
    }

    pub fn minutes(&self) -> u64 {
        (self.ms % MS_PER_HOUR) / MS_PER_MIN
    }

    pub fn seconds(&self) -> u64 {
        (self.ms % MS_PER_MIN) / MS_PER_SEC
    }

    pub fn millis(&self) -> u64 {
        self.ms % MS_PER_SEC
    }

    /// One millisecond less, saturating at zero.
    pub fn decrement(&mut self) {
        self.ms = self.ms.saturating_sub(1);
    }
}

/// Label text for a countdown value.
///
/// Sub-hour values render as `"<total seconds>.<millis>"`; anything with an
/// hour component falls back to `HH:MM:SS`.
pub fn format_clock(t: ClockTime) -> String {
    let (hours, minutes, seconds, millis) = (t.hours(), t.minutes(), t.seconds(), t.millis());

    if hours == 0 && minutes < 60 {
        format!("{}.{:03}", minutes * 60 + seconds, millis)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(*self))
    }
}
