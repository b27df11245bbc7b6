//! Date/time parsing and formatting rules.
//!
//! A [`DateTimeSpec`] holds an ordered list of acceptable formats (named
//! presets and/or explicit chrono patterns). Parsing tries them in order and
//! coerces whatever temporal shape matched into a canonical
//! [`NaiveDateTime`]; formatting always uses the *first* configured format,
//! so round-trip output is canonical rather than input-preserving.
//! [`DateSpec`] and [`TimeSpec`] are thin date-only / time-only projections.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Named, locale-agnostic format presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTimePreset {
    /// `2025-11-09`
    IsoLocalDate,
    /// `2025-11-09T14:30:00` (fractional seconds accepted)
    IsoLocalDateTime,
    /// RFC 3339 with offset, e.g. `2025-11-09T14:30:00+01:00`
    IsoOffsetDateTime,
    /// `14:30:00` (fractional seconds accepted)
    IsoLocalTime,
    /// `Sun, 09 Nov 2025 14:30:00 GMT`
    Rfc1123,
    /// Day-month-year, `31/12/2025`
    EuDmy,
    /// Month-day-year, `12/31/2025`
    UsMdy,
    /// Year-month-day with `-`, `/`, or `.` separators
    FlexibleYmd,
}

/// One entry in a spec's ordered format list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTimeFormat {
    /// A named preset.
    Preset(DateTimePreset),
    /// An explicit chrono strftime pattern.
    Pattern(String),
}

/// What to do when a format matches only part of a date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPartPolicy {
    /// Date-only input gets midnight; time-only input gets 1970-01-01.
    Defaults,
    /// Reject input that does not carry both a date and a time.
    RequireFull,
}

/// The temporal shape a single format attempt produced.
enum Parsed {
    Full(NaiveDateTime),
    DateOnly(NaiveDate),
    TimeOnly(NaiveTime),
}

/// Parse/format rules for date-time fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeSpec {
    formats: Vec<DateTimeFormat>,
    missing: MissingPartPolicy,
}

impl Default for DateTimeSpec {
    fn default() -> Self {
        Self::new(vec![
            DateTimeFormat::Preset(DateTimePreset::IsoLocalDateTime),
            DateTimeFormat::Preset(DateTimePreset::IsoOffsetDateTime),
            DateTimeFormat::Preset(DateTimePreset::IsoLocalDate),
        ])
    }
}

impl DateTimeSpec {
    /// A spec trying `formats` in order, with [`MissingPartPolicy::Defaults`].
    pub fn new(formats: Vec<DateTimeFormat>) -> Self {
        Self {
            formats,
            missing: MissingPartPolicy::Defaults,
        }
    }

    /// Convenience constructor from presets only.
    pub fn from_presets(presets: &[DateTimePreset]) -> Self {
        Self::new(presets.iter().copied().map(DateTimeFormat::Preset).collect())
    }

    pub fn with_missing_part_policy(mut self, missing: MissingPartPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Parse a raw cell by trying each format in order. `Ok(None)` is a blank.
    pub fn parse(&self, raw: &str) -> Result<Option<NaiveDateTime>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if self.formats.is_empty() {
            return Err("no date/time formats configured".to_string());
        }

        for format in &self.formats {
            if let Some(parsed) = try_format(format, trimmed) {
                return self.coerce(parsed).map(Some);
            }
        }
        Err(format!("'{trimmed}' matches none of the configured formats"))
    }

    /// Format a value with the first configured format.
    pub fn format(&self, value: &NaiveDateTime) -> Result<String, String> {
        let first = self
            .formats
            .first()
            .ok_or_else(|| "no date/time formats configured".to_string())?;
        Ok(format_with(first, value))
    }

    fn coerce(&self, parsed: Parsed) -> Result<NaiveDateTime, String> {
        match (parsed, self.missing) {
            (Parsed::Full(dt), _) => Ok(dt),
            (Parsed::DateOnly(d), MissingPartPolicy::Defaults) => {
                Ok(d.and_time(NaiveTime::MIN))
            }
            (Parsed::TimeOnly(t), MissingPartPolicy::Defaults) => {
                // Fixed epoch date for time-only input.
                Ok(NaiveDate::from_ymd_opt(1970, 1, 1)
                    .expect("epoch date is valid")
                    .and_time(t))
            }
            (Parsed::DateOnly(_), MissingPartPolicy::RequireFull) => {
                Err("date-only input rejected (a full date-time is required)".to_string())
            }
            (Parsed::TimeOnly(_), MissingPartPolicy::RequireFull) => {
                Err("time-only input rejected (a full date-time is required)".to_string())
            }
        }
    }
}

fn try_format(format: &DateTimeFormat, text: &str) -> Option<Parsed> {
    match format {
        DateTimeFormat::Preset(preset) => try_preset(*preset, text),
        DateTimeFormat::Pattern(pattern) => try_pattern(pattern, text),
    }
}

fn try_preset(preset: DateTimePreset, text: &str) -> Option<Parsed> {
    match preset {
        DateTimePreset::IsoLocalDate => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Parsed::DateOnly),
        DateTimePreset::IsoLocalDateTime => {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(Parsed::Full)
        }
        DateTimePreset::IsoOffsetDateTime => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| Parsed::Full(dt.naive_local())),
        DateTimePreset::IsoLocalTime => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .ok()
            .map(Parsed::TimeOnly),
        DateTimePreset::Rfc1123 => DateTime::parse_from_rfc2822(text)
            .ok()
            .map(|dt| Parsed::Full(dt.naive_local())),
        DateTimePreset::EuDmy => NaiveDate::parse_from_str(text, "%d/%m/%Y")
            .ok()
            .map(Parsed::DateOnly),
        DateTimePreset::UsMdy => NaiveDate::parse_from_str(text, "%m/%d/%Y")
            .ok()
            .map(Parsed::DateOnly),
        DateTimePreset::FlexibleYmd => ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
            .iter()
            .find_map(|p| NaiveDate::parse_from_str(text, p).ok())
            .map(Parsed::DateOnly),
    }
}

fn try_pattern(pattern: &str, text: &str) -> Option<Parsed> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Some(Parsed::Full(dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, pattern) {
        return Some(Parsed::DateOnly(d));
    }
    if let Ok(t) = NaiveTime::parse_from_str(text, pattern) {
        return Some(Parsed::TimeOnly(t));
    }
    None
}

fn format_with(format: &DateTimeFormat, value: &NaiveDateTime) -> String {
    match format {
        DateTimeFormat::Preset(DateTimePreset::IsoLocalDate) => {
            value.format("%Y-%m-%d").to_string()
        }
        DateTimeFormat::Preset(DateTimePreset::IsoLocalDateTime) => {
            value.format("%Y-%m-%dT%H:%M:%S").to_string()
        }
        DateTimeFormat::Preset(DateTimePreset::IsoOffsetDateTime) => {
            // Naive values carry no offset; canonical output is UTC-suffixed.
            value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
        }
        DateTimeFormat::Preset(DateTimePreset::IsoLocalTime) => {
            value.format("%H:%M:%S").to_string()
        }
        DateTimeFormat::Preset(DateTimePreset::Rfc1123) => {
            value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
        }
        DateTimeFormat::Preset(DateTimePreset::EuDmy) => value.format("%d/%m/%Y").to_string(),
        DateTimeFormat::Preset(DateTimePreset::UsMdy) => value.format("%m/%d/%Y").to_string(),
        DateTimeFormat::Preset(DateTimePreset::FlexibleYmd) => {
            value.format("%Y-%m-%d").to_string()
        }
        DateTimeFormat::Pattern(pattern) => value.format(pattern).to_string(),
    }
}

/// Date-only projection over a [`DateTimeSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    inner: DateTimeSpec,
}

impl Default for DateSpec {
    fn default() -> Self {
        Self::new(DateTimeSpec::from_presets(&[
            DateTimePreset::IsoLocalDate,
            DateTimePreset::FlexibleYmd,
        ]))
    }
}

impl DateSpec {
    pub fn new(inner: DateTimeSpec) -> Self {
        Self { inner }
    }

    pub fn parse(&self, raw: &str) -> Result<Option<NaiveDate>, String> {
        Ok(self.inner.parse(raw)?.map(|dt| dt.date()))
    }

    pub fn format(&self, value: &NaiveDate) -> Result<String, String> {
        self.inner.format(&value.and_time(NaiveTime::MIN))
    }
}

/// Time-only projection over a [`DateTimeSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpec {
    inner: DateTimeSpec,
}

impl Default for TimeSpec {
    fn default() -> Self {
        Self::new(DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalTime]))
    }
}

impl TimeSpec {
    pub fn new(inner: DateTimeSpec) -> Self {
        Self { inner }
    }

    pub fn parse(&self, raw: &str) -> Result<Option<NaiveTime>, String> {
        Ok(self.inner.parse(raw)?.map(|dt| dt.time()))
    }

    pub fn format(&self, value: &NaiveTime) -> Result<String, String> {
        let anchor = NaiveDate::from_ymd_opt(1970, 1, 1)
            .expect("epoch date is valid")
            .and_time(*value);
        self.inner.format(&anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_tried_in_order() {
        let spec =
            DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalDate, DateTimePreset::EuDmy]);
        let iso = spec.parse("2025-11-09").unwrap().unwrap();
        assert_eq!(iso.date(), NaiveDate::from_ymd_opt(2025, 11, 9).unwrap());
        let eu = spec.parse("31/12/2025").unwrap().unwrap();
        assert_eq!(eu.date(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn require_full_rejects_partial_input() {
        let spec = DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalDate])
            .with_missing_part_policy(MissingPartPolicy::RequireFull);
        assert!(spec.parse("2025-11-09").is_err());

        let spec = DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalDateTime])
            .with_missing_part_policy(MissingPartPolicy::RequireFull);
        assert!(spec.parse("2025-11-09T08:00:00").unwrap().is_some());
    }

    #[test]
    fn time_only_defaults_to_epoch_date() {
        let spec = DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalTime]);
        let dt = spec.parse("14:30:00").unwrap().unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn formatting_uses_the_first_configured_format() {
        let spec =
            DateTimeSpec::from_presets(&[DateTimePreset::EuDmy, DateTimePreset::IsoLocalDate]);
        // Input matched the second preset; output still uses the first.
        let dt = spec.parse("2025-11-09").unwrap().unwrap();
        assert_eq!(spec.format(&dt).unwrap(), "09/11/2025");
    }
}
