//! Temperature display strings such as `"92-93°C"` or `"94°C"`

use crate::types::TempRange;

/// A parsed temperature string: a lower value and an optional upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempSpec {
    pub low: i32,
    pub high: Option<i32>,
}

impl TempSpec {
    /// First run of digits, optionally followed by `-` and a second run.
    pub fn parse(raw: &str) -> Option<TempSpec> {
        let start = raw.find(|c: char| c.is_ascii_digit())?;
        let rest = &raw[start..];
        let low_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let low = rest[..low_len].parse().ok()?;

        let high = rest[low_len..].strip_prefix('-').and_then(|tail| {
            let len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
            tail[..len].parse().ok()
        });

        Some(TempSpec { low, high })
    }

    pub fn shifted(self, delta: i32) -> TempSpec {
        TempSpec {
            low: self.low.saturating_add(delta),
            high: self.high.map(|h| h.saturating_add(delta)),
        }
    }
}

impl std::fmt::Display for TempSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.high {
            Some(high) => write!(f, "{}-{}°C", self.low, high),
            None => write!(f, "{}°C", self.low),
        }
    }
}

impl From<TempRange> for TempSpec {
    fn from(range: TempRange) -> Self {
        TempSpec {
            low: range.min,
            high: Some(range.max),
        }
    }
}

/// Shift both ends of a temperature string. `None` when nothing parses.
pub fn shift_temperature(raw: &str, delta: i32) -> Option<String> {
    TempSpec::parse(raw).map(|spec| spec.shifted(delta).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_and_single() {
        assert_eq!(TempSpec::parse("92-93°C"), Some(TempSpec { low: 92, high: Some(93) }));
        assert_eq!(TempSpec::parse("94°C"), Some(TempSpec { low: 94, high: None }));
        assert_eq!(TempSpec::parse("about 90 - 91"), Some(TempSpec { low: 90, high: None }));
        assert_eq!(TempSpec::parse("hot"), None);
    }

    #[test]
    fn test_shift() {
        assert_eq!(shift_temperature("92-93°C", -2).as_deref(), Some("90-91°C"));
        assert_eq!(shift_temperature("94°C", 1).as_deref(), Some("95°C"));
        assert_eq!(shift_temperature("", 1), None);
    }

    #[test]
    fn test_shift_saturates_at_bounds() {
        let spec = TempSpec::parse("2147483647°C").unwrap();
        assert_eq!(spec.shifted(1), TempSpec { low: i32::MAX, high: None });
        assert_eq!(
            shift_temperature("2147483646-2147483647°C", 5).as_deref(),
            Some("2147483647-2147483647°C")
        );
    }

    #[test]
    fn test_from_range() {
        assert_eq!(TempSpec::from(TempRange::new(91, 92)).to_string(), "91-92°C");
    }
}
