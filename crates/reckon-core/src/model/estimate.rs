use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A time estimate as a days/hours/minutes triple.
///
/// Fields are unsigned, so negative estimates are unrepresentable. The
/// normalized form keeps `minutes < 60` and `hours < 24`; raw sums may
/// exceed those bounds until [`crate::rollup::normalize`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Estimate {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl Estimate {
    /// Build an estimate from its three components.
    #[must_use]
    pub const fn new(days: u32, hours: u32, minutes: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Returns `true` if all three fields are zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }

    /// Returns `true` if minutes and hours are within their carry bounds.
    #[must_use]
    pub const fn is_normalized(self) -> bool {
        self.minutes < 60 && self.hours < 24
    }

    /// Total duration expressed in minutes.
    ///
    /// Widened to `u64` so the largest representable triple cannot overflow.
    #[must_use]
    pub const fn total_minutes(self) -> u64 {
        self.days as u64 * 24 * 60 + self.hours as u64 * 60 + self.minutes as u64
    }
}

/// Renders the compact token form: non-zero fields in `d`, `h`, `m` order
/// with no separators (`1d3h20m`, `2d5m`), or the literal `0m` when every
/// field is zero.
impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0m");
        }
        if self.days > 0 {
            write!(f, "{}d", self.days)?;
        }
        if self.hours > 0 {
            write!(f, "{}h", self.hours)?;
        }
        if self.minutes > 0 {
            write!(f, "{}m", self.minutes)?;
        }
        Ok(())
    }
}

/// Error returned when parsing an estimate token from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEstimateError {
    #[error("empty estimate token")]
    Empty,
    #[error("invalid character '{0}' in estimate token")]
    InvalidChar(char),
    #[error("unit '{0}' has no leading number")]
    MissingNumber(char),
    #[error("trailing number without a unit letter")]
    MissingUnit,
    #[error("unit '{0}' repeated or out of d/h/m order")]
    UnitOrder(char),
    #[error("field value out of range")]
    Overflow,
}

/// Parses the token grammar emitted by [`Display`]: one to three
/// `<number><unit>` pairs with units in strict `d`, `h`, `m` order.
impl FromStr for Estimate {
    type Err = ParseEstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseEstimateError::Empty);
        }

        let mut estimate = Self::default();
        // Index into the unit order; a unit may only appear after all
        // earlier units have been passed.
        let mut next_unit = 0usize;
        let mut number: Option<u32> = None;

        for ch in s.chars() {
            if let Some(digit) = ch.to_digit(10) {
                let acc = number.unwrap_or(0);
                number = Some(
                    acc.checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or(ParseEstimateError::Overflow)?,
                );
                continue;
            }

            let slot = match ch {
                'd' => 0,
                'h' => 1,
                'm' => 2,
                other => return Err(ParseEstimateError::InvalidChar(other)),
            };
            if slot < next_unit {
                return Err(ParseEstimateError::UnitOrder(ch));
            }
            let value = number.take().ok_or(ParseEstimateError::MissingNumber(ch))?;
            match ch {
                'd' => estimate.days = value,
                'h' => estimate.hours = value,
                _ => estimate.minutes = value,
            }
            next_unit = slot + 1;
        }

        if number.is_some() {
            return Err(ParseEstimateError::MissingUnit);
        }
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::{Estimate, ParseEstimateError};
    use std::str::FromStr;

    #[test]
    fn token_omits_zero_fields() {
        assert_eq!(Estimate::new(1, 3, 20).to_string(), "1d3h20m");
        assert_eq!(Estimate::new(0, 0, 45).to_string(), "45m");
        assert_eq!(Estimate::new(2, 0, 0).to_string(), "2d");
        assert_eq!(Estimate::new(2, 0, 5).to_string(), "2d5m");
    }

    #[test]
    fn zero_estimate_renders_as_zero_minutes() {
        assert_eq!(Estimate::default().to_string(), "0m");
    }

    #[test]
    fn parse_accepts_display_output() {
        for est in [
            Estimate::default(),
            Estimate::new(1, 3, 20),
            Estimate::new(0, 0, 45),
            Estimate::new(2, 0, 0),
            Estimate::new(2, 0, 5),
            Estimate::new(0, 23, 59),
        ] {
            let reparsed = Estimate::from_str(&est.to_string()).unwrap();
            assert_eq!(est, reparsed);
        }
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert_eq!(Estimate::from_str(""), Err(ParseEstimateError::Empty));
        assert_eq!(
            Estimate::from_str("3x"),
            Err(ParseEstimateError::InvalidChar('x'))
        );
        assert_eq!(
            Estimate::from_str("d"),
            Err(ParseEstimateError::MissingNumber('d'))
        );
        assert_eq!(Estimate::from_str("15"), Err(ParseEstimateError::MissingUnit));
        assert_eq!(
            Estimate::from_str("20m1d"),
            Err(ParseEstimateError::UnitOrder('d'))
        );
        assert_eq!(
            Estimate::from_str("1d2d"),
            Err(ParseEstimateError::UnitOrder('d'))
        );
    }

    #[test]
    fn total_minutes_is_exact() {
        assert_eq!(Estimate::new(1, 2, 3).total_minutes(), 1563);
        assert_eq!(
            Estimate::new(u32::MAX, u32::MAX, u32::MAX).total_minutes(),
            u64::from(u32::MAX) * 1440 + u64::from(u32::MAX) * 60 + u64::from(u32::MAX)
        );
    }

    #[test]
    fn json_roundtrips_and_fills_missing_fields() {
        let est = Estimate::new(0, 2, 15);
        let json = serde_json::to_string(&est).unwrap();
        assert_eq!(json, r#"{"days":0,"hours":2,"minutes":15}"#);
        assert_eq!(serde_json::from_str::<Estimate>(&json).unwrap(), est);

        let partial: Estimate = serde_json::from_str(r#"{"minutes":45}"#).unwrap();
        assert_eq!(partial, Estimate::new(0, 0, 45));
    }
}
