//! Decimal parsing and formatting rules.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rounding rule applied when scaling a parsed decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    /// Round half away from zero (the "schoolbook" rule).
    HalfUp,
    /// Round half toward zero.
    HalfDown,
    /// Round half to the nearest even digit (banker's rounding).
    HalfEven,
    /// Always round away from zero.
    Up,
    /// Always round toward zero (truncate).
    Down,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceiling,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
        }
    }
}

/// Parse/format rules for decimal fields: fixed output scale, optional total
/// precision cap, a rounding rule, and optional inclusive bounds.
///
/// Parsing scales and rounds the value, then range-checks; exceeding the
/// precision cap or the bounds fails. Formatting always re-scales to the
/// configured scale, so `format(parse(x))` has a stable number of fraction
/// digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalSpec {
    scale: u32,
    max_precision: Option<u32>,
    rounding: Rounding,
    min: Option<Decimal>,
    max: Option<Decimal>,
    allow_blank: bool,
}

impl DecimalSpec {
    /// A spec with the given output scale, HALF_UP rounding, no precision cap,
    /// no bounds, blanks allowed.
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            max_precision: None,
            rounding: Rounding::HalfUp,
            min: None,
            max: None,
            allow_blank: true,
        }
    }

    /// Cap the total number of digits (integer + fraction) after scaling.
    pub fn with_max_precision(mut self, precision: u32) -> Self {
        self.max_precision = Some(precision);
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Inclusive lower bound.
    pub fn with_min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn with_max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }

    /// Whether a blank raw value is accepted (parses to null).
    pub fn with_allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Parse a raw cell. `Ok(None)` means a permitted blank.
    pub fn parse(&self, raw: &str) -> Result<Option<Decimal>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return if self.allow_blank {
                Ok(None)
            } else {
                Err("blank value not allowed".to_string())
            };
        }

        let parsed = Decimal::from_str(trimmed).map_err(|e| e.to_string())?;
        let mut scaled = parsed.round_dp_with_strategy(self.scale, self.rounding.strategy());
        scaled.rescale(self.scale);

        if let Some(precision) = self.max_precision {
            if digit_count(&scaled) > precision {
                return Err(format!(
                    "value {scaled} exceeds maximum precision {precision}"
                ));
            }
        }
        if let Some(min) = self.min {
            if scaled < min {
                return Err(format!("value {scaled} is below minimum {min}"));
            }
        }
        if let Some(max) = self.max {
            if scaled > max {
                return Err(format!("value {scaled} is above maximum {max}"));
            }
        }
        Ok(Some(scaled))
    }

    /// Format a value at the configured scale. `None` formats as the empty
    /// string whatever `allow_blank` says.
    pub fn format(&self, value: Option<&Decimal>) -> String {
        match value {
            Some(v) => {
                let mut scaled = v.round_dp_with_strategy(self.scale, self.rounding.strategy());
                scaled.rescale(self.scale);
                scaled.to_string()
            }
            None => String::new(),
        }
    }
}

impl Default for DecimalSpec {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Total digits of the scaled value (integer digits + scale).
fn digit_count(value: &Decimal) -> u32 {
    let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
    // A mantissa shorter than the scale still occupies `scale` fraction digits
    // (e.g. 0.05 at scale 2 has mantissa "5").
    digits.max(value.scale())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn half_up_rounding_at_scale_two() {
        let spec = DecimalSpec::new(2);
        assert_eq!(spec.parse("1.234").unwrap(), Some(d("1.23")));
        assert_eq!(spec.parse("1.235").unwrap(), Some(d("1.24")));
    }

    #[test]
    fn format_rescales_and_formats_null_as_empty() {
        let spec = DecimalSpec::new(2).with_allow_blank(false);
        assert_eq!(spec.format(Some(&d("7"))), "7.00");
        // Null formats to "" regardless of allow_blank; only parse enforces it.
        assert_eq!(spec.format(None), "");
        assert!(spec.parse(" ").is_err());
    }

    #[test]
    fn precision_and_bounds_are_enforced() {
        let spec = DecimalSpec::new(2).with_max_precision(4);
        assert_eq!(spec.parse("12.34").unwrap(), Some(d("12.34")));
        assert!(spec.parse("123.45").unwrap_err().contains("precision"));

        let spec = DecimalSpec::new(2).with_min(d("0.00")).with_max(d("100.00"));
        assert!(spec.parse("-0.01").is_err());
        assert!(spec.parse("100.01").is_err());
        assert_eq!(spec.parse("100.00").unwrap(), Some(d("100.00")));
    }
}
