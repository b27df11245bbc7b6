use chrono::{NaiveDate, NaiveTime};
use csv_dialects::value::{
    DateSpec, DateTimePreset, DateTimeSpec, DecimalSpec, FieldType, MissingPartPolicy, Rounding,
    TimeSpec, TypedField, Value,
};
use csv_dialects::{CsvConfig, CsvReader, Dialect};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn every_kind_parses_blank_to_null_and_formats_null_to_empty() {
    let kinds = [
        FieldType::Str,
        FieldType::Int,
        FieldType::Long,
        FieldType::Double,
        FieldType::Decimal(DecimalSpec::new(2)),
        FieldType::Boolean,
        FieldType::Date(DateSpec::default()),
        FieldType::DateTime(DateTimeSpec::default()),
        FieldType::Time(TimeSpec::default()),
    ];
    for kind in kinds {
        assert_eq!(kind.parse("").unwrap(), Value::Null, "{}", kind.name());
        assert_eq!(kind.format(&Value::Null).unwrap(), "", "{}", kind.name());
    }
}

#[test]
fn int_and_long_overflow_is_an_error() {
    assert!(FieldType::Int.parse("2147483648").is_err());
    assert_eq!(
        FieldType::Long.parse("2147483648").unwrap(),
        Value::Long(2_147_483_648)
    );
    assert!(FieldType::Long.parse("9223372036854775808").is_err());
}

#[test]
fn boolean_recognizes_the_truthy_set_and_never_errors() {
    for raw in ["true", "True", "TRUE", "1", "y", "Y", "yes", "YES"] {
        assert_eq!(FieldType::Boolean.parse(raw).unwrap(), Value::Bool(true));
    }
    for raw in ["false", "0", "no", "n", "maybe", "2"] {
        assert_eq!(FieldType::Boolean.parse(raw).unwrap(), Value::Bool(false));
    }
}

#[test]
fn decimal_spec_rounds_half_up_at_scale_two() {
    let kind = FieldType::Decimal(DecimalSpec::new(2));
    assert_eq!(kind.parse("1.234").unwrap(), Value::Decimal(dec("1.23")));
    assert_eq!(kind.parse("1.235").unwrap(), Value::Decimal(dec("1.24")));
}

#[test]
fn decimal_spec_enforces_precision_and_bounds() {
    let spec = DecimalSpec::new(2)
        .with_max_precision(5)
        .with_min(dec("0"))
        .with_max(dec("999.99"));
    let kind = FieldType::Decimal(spec);

    assert_eq!(kind.parse("999.99").unwrap(), Value::Decimal(dec("999.99")));
    assert!(kind.parse("1000.00").is_err());
    assert!(kind.parse("-1").is_err());
}

#[test]
fn decimal_rounding_strategies_differ_at_the_midpoint() {
    let half_even = DecimalSpec::new(1).with_rounding(Rounding::HalfEven);
    assert_eq!(half_even.parse("0.25").unwrap(), Some(dec("0.2")));
    assert_eq!(half_even.parse("0.35").unwrap(), Some(dec("0.4")));

    let down = DecimalSpec::new(1).with_rounding(Rounding::Down);
    assert_eq!(down.parse("0.29").unwrap(), Some(dec("0.2")));
}

#[test]
fn decimal_format_rescales_to_the_configured_scale() {
    let kind = FieldType::Decimal(DecimalSpec::new(3));
    assert_eq!(kind.format(&Value::Decimal(dec("5"))).unwrap(), "5.000");
}

#[test]
fn datetime_presets_are_tried_in_order() {
    let spec = DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalDate, DateTimePreset::EuDmy]);
    let kind = FieldType::DateTime(spec);

    let iso = kind.parse("2025-11-09").unwrap();
    assert_eq!(
        iso,
        Value::DateTime(
            NaiveDate::from_ymd_opt(2025, 11, 9)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        )
    );
    let eu = kind.parse("31/12/2025").unwrap();
    assert_eq!(
        eu,
        Value::DateTime(
            NaiveDate::from_ymd_opt(2025, 12, 31)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        )
    );
}

#[test]
fn datetime_require_full_rejects_date_only_input() {
    let spec = DateTimeSpec::from_presets(&[DateTimePreset::IsoLocalDate])
        .with_missing_part_policy(MissingPartPolicy::RequireFull);
    assert!(FieldType::DateTime(spec).parse("2025-11-09").is_err());
}

#[test]
fn datetime_formats_with_the_first_configured_format() {
    let spec = DateTimeSpec::from_presets(&[
        DateTimePreset::IsoLocalDateTime,
        DateTimePreset::EuDmy,
    ]);
    let kind = FieldType::DateTime(spec);
    // Input matched the second format; output still uses the first.
    let value = kind.parse("09/11/2025").unwrap();
    assert_eq!(kind.format(&value).unwrap(), "2025-11-09T00:00:00");
}

#[test]
fn explicit_patterns_work_alongside_presets() {
    let spec = DateTimeSpec::new(vec![
        csv_dialects::value::DateTimeFormat::Pattern("%Y%m%d %H%M%S".to_string()),
    ]);
    let kind = FieldType::DateTime(spec);
    let value = kind.parse("20251109 143000").unwrap();
    assert_eq!(kind.format(&value).unwrap(), "20251109 143000");
}

#[test]
fn date_and_time_specs_project_their_parts() {
    let date = FieldType::Date(DateSpec::default());
    assert_eq!(
        date.parse("2025-11-09").unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2025, 11, 9).unwrap())
    );
    // FlexibleYmd fallback accepts slash and dot separators.
    assert_eq!(
        date.parse("2025/11/09").unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2025, 11, 9).unwrap())
    );

    let time = FieldType::Time(TimeSpec::default());
    assert_eq!(
        time.parse("14:30:00").unwrap(),
        Value::Time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
    );
}

#[test]
fn rfc1123_preset_parses_and_formats() {
    let spec = DateTimeSpec::from_presets(&[DateTimePreset::Rfc1123]);
    let kind = FieldType::DateTime(spec);
    let value = kind.parse("Sun, 09 Nov 2025 14:30:00 GMT").unwrap();
    assert_eq!(
        kind.format(&value).unwrap(),
        "Sun, 09 Nov 2025 14:30:00 GMT"
    );
}

#[test]
fn typed_fields_over_a_parsed_row() {
    let input = "id,price,active\n7,19.995,yes\nx,oops,whatever\n";
    let mut reader = CsvReader::from_str(input, CsvConfig::new(Dialect::rfc4180()));
    let rows = reader.read_all().unwrap();

    let kinds = [
        FieldType::Int,
        FieldType::Decimal(DecimalSpec::new(2)),
        FieldType::Boolean,
    ];

    let good: Vec<TypedField> = rows[0]
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            TypedField::parse(
                i,
                rows[0].headers().name(i).unwrap(),
                v.as_deref().unwrap_or(""),
                kinds[i].clone(),
            )
        })
        .collect();
    assert!(good.iter().all(TypedField::is_valid));
    assert_eq!(good[0].value, Some(Value::Int(7)));
    assert_eq!(good[1].value, Some(Value::Decimal(dec("20.00"))));
    assert_eq!(good[2].value, Some(Value::Bool(true)));

    let bad = TypedField::parse(0, "id", "x", FieldType::Int);
    assert!(!bad.is_valid());
    assert_eq!(bad.errors.len(), 1);
    // Bad values do not abort anything; boolean junk is still just false.
    let whatever = TypedField::parse(2, "active", "whatever", FieldType::Boolean);
    assert!(whatever.is_valid());
    assert_eq!(whatever.value, Some(Value::Bool(false)));
}
