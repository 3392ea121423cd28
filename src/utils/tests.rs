use super::*;

#[test]
fn test_format_number_comma() {
    let options = NumberFormatOptions {
        use_comma: true,
        use_human: false,
        locale: "en".to_string(),
        decimal_places: 2,
    };

    assert_eq!(format_number(1000u64, &options), "1,000");
    assert_eq!(format_number(1000000u64, &options), "1,000,000");
    assert_eq!(format_number(123usize, &options), "123");
}

#[test]
fn test_format_number_comma_locale() {
    let options = NumberFormatOptions {
        use_comma: true,
        locale: "de".to_string(),
        ..NumberFormatOptions::default()
    };

    assert_eq!(format_number(1234567u64, &options), "1.234.567");
}

#[test]
fn test_format_number_human() {
    let options = NumberFormatOptions {
        use_comma: false,
        use_human: true,
        locale: "en".to_string(),
        decimal_places: 1,
    };

    assert_eq!(format_number(100u64, &options), "100");
    assert_eq!(format_number(1500u64, &options), "1.5k");
    assert_eq!(format_number(1_500_000u64, &options), "1.5m");
    assert_eq!(format_number(1_500_000_000u64, &options), "1.5b");
    assert_eq!(format_number(1_500_000_000_000u64, &options), "1.5t");
}

#[test]
fn test_format_number_plain() {
    let options = NumberFormatOptions::default();

    assert_eq!(format_number(1000u32, &options), "1000");
}

#[test]
fn test_format_decimal_and_percent() {
    let options = NumberFormatOptions {
        decimal_places: 1,
        ..NumberFormatOptions::default()
    };

    assert_eq!(format_decimal(3.6666, &options), "3.7");
    assert_eq!(format_decimal(2.0, &NumberFormatOptions::default()), "2.00");
    assert_eq!(format_percent(66.666), "66.7%");
    assert_eq!(format_percent(0.0), "0.0%");
}

#[test]
fn test_format_period_for_display() {
    assert_eq!(format_period_for_display("2023-01-15"), "1/15/2023");
    assert_eq!(format_period_for_display("2024-11"), "11/2024");
    assert_eq!(format_period_for_display("invalid"), "invalid");
}
