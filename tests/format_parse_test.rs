use small_datetime::core::format;
use small_datetime::{
    patterns, CalendarDate, ClockTime, DateTimeError, DateTimeFormatter, LocalDateTime,
    OffsetTimestamp, UtcOffset, ZoneId, ZonedTimestamp,
};

#[test]
fn test_parse_basic_iso_date() {
    let date = format::parse("20140116", "yyyyMMdd").unwrap();
    assert_eq!(date, CalendarDate::of(2014, 1, 16).unwrap());

    let same = DateTimeFormatter::basic_iso_date().parse_date("20140116").unwrap();
    assert_eq!(same, date);
    assert_eq!(patterns::BASIC_ISO_DATE, "yyyyMMdd");
}

#[test]
fn test_format_with_patterns() {
    let date = CalendarDate::of(2014, 1, 16).unwrap();
    assert_eq!(date.format("dd/MM/yyyy").unwrap(), "16/01/2014");
    assert_eq!(date.format(patterns::BASIC_ISO_DATE).unwrap(), "20140116");
    assert_eq!(date.format("EEE d.M.yy").unwrap(), "Thu 16.1.14");
    assert_eq!(date.format("EEEE").unwrap(), "Thursday");

    let time = ClockTime::of(21, 5, 9).unwrap();
    assert_eq!(time.format("hh:mm a").unwrap(), "09:05 PM");
    assert_eq!(time.format("H'h'mm").unwrap(), "21h05");
}

#[test]
fn test_round_trip_through_same_pattern() {
    let pattern = "yyyy-MM-dd HH:mm:ss";
    let value = LocalDateTime::of(2008, 8, 8, 20, 8).unwrap();
    let text = value.format(pattern).unwrap();
    assert_eq!(text, "2008-08-08 20:08:00");
    assert_eq!(LocalDateTime::parse(&text, pattern).unwrap(), value);
}

#[test]
fn test_every_day_round_trips_through_iso_patterns() {
    let formatters = [DateTimeFormatter::iso_local_date(), DateTimeFormatter::basic_iso_date()];

    let mut dates = Vec::new();
    for year in [2023, 2024] {
        let mut date = CalendarDate::of(year, 1, 1).unwrap();
        while date.year() == year {
            dates.push(date);
            date = date.plus_days(1).unwrap();
        }
    }
    assert_eq!(dates.len(), 365 + 366);

    for (y, m, d) in [(0, 1, 1), (9999, 12, 31), (10000, 1, 1), (-1, 12, 31), (-10000, 6, 15)] {
        dates.push(CalendarDate::of(y, m, d).unwrap());
    }
    dates.push(CalendarDate::from_naive(chrono::NaiveDate::MIN));
    dates.push(CalendarDate::from_naive(chrono::NaiveDate::MAX));

    for formatter in &formatters {
        for date in &dates {
            let text = formatter.format(date).unwrap();
            assert_eq!(
                formatter.parse_date(&text).unwrap(),
                *date,
                "'{}' with '{}'",
                text,
                formatter.pattern()
            );
        }
    }
}

#[test]
fn test_years_outside_four_digits() {
    let big = CalendarDate::of(10000, 3, 4).unwrap();
    assert_eq!(big.format(patterns::ISO_LOCAL_DATE).unwrap(), "+10000-03-04");
    assert_eq!(big.format(patterns::BASIC_ISO_DATE).unwrap(), "+100000304");
    assert_eq!(CalendarDate::parse("+10000-03-04", patterns::ISO_LOCAL_DATE).unwrap(), big);

    let before_zero = CalendarDate::of(-1, 3, 4).unwrap();
    assert_eq!(before_zero.format(patterns::ISO_LOCAL_DATE).unwrap(), "-0001-03-04");
    assert_eq!(CalendarDate::parse("-00010304", patterns::BASIC_ISO_DATE).unwrap(), before_zero);

    // 每個年份只有一種寫法
    for input in ["+9999-03-04", "+09999-03-04", "-0000-03-04", "10000-03-04", "+-0001-03-04"] {
        assert!(
            matches!(
                CalendarDate::parse(input, patterns::ISO_LOCAL_DATE),
                Err(DateTimeError::FormatMismatch { .. })
            ),
            "'{}' should not parse",
            input
        );
    }
}

#[test]
fn test_am_pm_must_agree_with_hour_of_day() {
    let pattern = "yyyy-MM-dd HH:mm:ss a";

    let err = LocalDateTime::parse("2008-08-08 00:00:00 PM", pattern).unwrap_err();
    assert!(matches!(err, DateTimeError::FormatMismatch { .. }), "got {:?}", err);

    let noon = LocalDateTime::parse("2008-08-08 12:00:00 PM", pattern).unwrap();
    assert_eq!(noon.time(), ClockTime::of(12, 0, 0).unwrap());

    let midnight = LocalDateTime::of(2008, 8, 8, 0, 0).unwrap();
    assert_eq!(midnight.format(pattern).unwrap(), "2008-08-08 00:00:00 AM");
}

#[test]
fn test_clock_hour_needs_marker() {
    assert_eq!(
        ClockTime::parse("12:30 AM", "hh:mm a").unwrap(),
        ClockTime::of(0, 30, 0).unwrap()
    );
    assert_eq!(
        ClockTime::parse("07:15 PM", "hh:mm a").unwrap(),
        ClockTime::of(19, 15, 0).unwrap()
    );
    assert!(matches!(
        ClockTime::parse("07:15", "hh:mm"),
        Err(DateTimeError::FormatMismatch { .. })
    ));
    assert!(matches!(
        ClockTime::parse("13:15 PM", "hh:mm a"),
        Err(DateTimeError::InvalidDateComponent { .. })
    ));
}

#[test]
fn test_parse_is_exact_match() {
    let formatter = DateTimeFormatter::of_pattern("yyyy-MM-dd").unwrap();

    for input in ["2014-01-16 ", "2014/01/16", "14-01-16", "2014-1-16", "", "2014-01-1x"] {
        let err = formatter.parse_date(input).unwrap_err();
        assert!(
            matches!(err, DateTimeError::FormatMismatch { .. }),
            "'{}' should not parse, got {:?}",
            input,
            err
        );
    }

    match formatter.parse_date("2014-01-16T00").unwrap_err() {
        DateTimeError::FormatMismatch { reason, .. } => {
            assert!(reason.contains("unparsed text found at index 10"), "{}", reason)
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_well_formed_but_invalid_values() {
    let err = format::parse("20140230", patterns::BASIC_ISO_DATE).unwrap_err();
    assert!(matches!(err, DateTimeError::InvalidDateComponent { .. }), "got {:?}", err);

    let err = ClockTime::parse("24:00:00", patterns::ISO_LOCAL_TIME).unwrap_err();
    assert!(matches!(err, DateTimeError::InvalidDateComponent { .. }), "got {:?}", err);
}

#[test]
fn test_weekday_must_match_date() {
    let pattern = "EEE, yyyy-MM-dd";
    assert!(CalendarDate::parse("Fri, 2008-08-08", pattern).is_ok());
    assert!(matches!(
        CalendarDate::parse("Mon, 2008-08-08", pattern),
        Err(DateTimeError::FormatMismatch { .. })
    ));
}

#[test]
fn test_fraction_of_second() {
    let time = ClockTime::parse("10:15:30.250", "HH:mm:ss.SSS").unwrap();
    assert_eq!(time.nanosecond(), 250_000_000);
    assert_eq!(time.format("HH:mm:ss.SS").unwrap(), "10:15:30.25");
}

#[test]
fn test_unsupported_field_on_format() {
    let date = CalendarDate::of(2024, 1, 1).unwrap();
    match date.format("yyyy-MM-dd HH:mm").unwrap_err() {
        DateTimeError::UnsupportedField { field, pattern } => {
            assert_eq!(field, "time");
            assert_eq!(pattern, "yyyy-MM-dd HH:mm");
        }
        other => panic!("unexpected {:?}", other),
    }

    let local = LocalDateTime::of(2024, 1, 1, 9, 0).unwrap();
    assert!(matches!(
        local.format(patterns::ISO_OFFSET_DATE_TIME),
        Err(DateTimeError::UnsupportedField { .. })
    ));
}

#[test]
fn test_invalid_pattern() {
    assert!(matches!(
        DateTimeFormatter::of_pattern("yyyy-QQ"),
        Err(DateTimeError::InvalidPattern { .. })
    ));
}

#[test]
fn test_offset_and_zone_patterns() {
    let offset = OffsetTimestamp::parse("2018-01-14T19:30:00+05:30", patterns::ISO_OFFSET_DATE_TIME).unwrap();
    assert_eq!(offset.offset(), UtcOffset::of_hours_minutes(5, 30).unwrap());
    assert_eq!(offset.to_instant().to_string(), "2018-01-14T14:00:00Z");

    let zoned = ZonedTimestamp::parse(
        "2024-11-03T01:30:00-05:00[America/New_York]",
        patterns::ISO_ZONED_DATE_TIME,
    )
    .unwrap();
    // 文字中的 offset 決定重疊時段的結果
    assert_eq!(zoned.offset().to_string(), "-05:00");
    assert_eq!(zoned.to_string(), "2024-11-03T01:30:00-05:00[America/New_York]");
    assert_eq!(zoned.format(patterns::ISO_ZONED_DATE_TIME).unwrap(), zoned.to_string());

    let utc = ZonedTimestamp::parse("2024-01-01T00:00:00Z", patterns::ISO_OFFSET_DATE_TIME).unwrap();
    assert_eq!(utc.zone(), ZoneId::utc());
}

#[test]
fn test_parsed_offset_fixes_the_instant() {
    // +05:00 從來不是紐約的 offset：保留文字表示的時刻，再換成紐約時間
    let zoned = ZonedTimestamp::parse(
        "2024-07-01T09:00:00+05:00[America/New_York]",
        patterns::ISO_ZONED_DATE_TIME,
    )
    .unwrap();
    assert_eq!(zoned.to_instant().to_string(), "2024-07-01T04:00:00Z");
    assert_eq!(zoned.to_string(), "2024-07-01T00:00:00-04:00[America/New_York]");

    let in_gap = ZonedTimestamp::parse(
        "2024-03-10T02:30:00-05:00[America/New_York]",
        patterns::ISO_ZONED_DATE_TIME,
    )
    .unwrap();
    assert_eq!(in_gap.to_instant().to_string(), "2024-03-10T07:30:00Z");
    assert_eq!(in_gap.to_string(), "2024-03-10T03:30:00-04:00[America/New_York]");

    let valid = ZonedTimestamp::parse(
        "2024-07-01T09:00:00-04:00[America/New_York]",
        patterns::ISO_ZONED_DATE_TIME,
    )
    .unwrap();
    assert_eq!(valid.local_date_time(), LocalDateTime::of(2024, 7, 1, 9, 0).unwrap());
}

#[test]
fn test_formatter_zone_fills_in_missing_zone() {
    let formatter = DateTimeFormatter::of_pattern("yyyy-MM-dd HH:mm")
        .unwrap()
        .with_zone(ZoneId::of("Asia/Tokyo").unwrap());

    let zoned = formatter.parse_zoned("2024-01-01 09:00").unwrap();
    assert_eq!(zoned.to_instant().to_string(), "2024-01-01T00:00:00Z");

    let text = formatter.format_instant(zoned.to_instant()).unwrap();
    assert_eq!(text, "2024-01-01 09:00");

    let bare = DateTimeFormatter::of_pattern("yyyy-MM-dd HH:mm").unwrap();
    assert!(bare.parse_zoned("2024-01-01 09:00").is_err());
}

#[test]
fn test_formatter_is_shareable() {
    let formatter = std::sync::Arc::new(DateTimeFormatter::iso_local_date());
    let handles: Vec<_> = (1..=4)
        .map(|day| {
            let formatter = formatter.clone();
            std::thread::spawn(move || {
                formatter
                    .parse_date(&format!("2024-01-{:02}", day))
                    .unwrap()
                    .day()
            })
        })
        .collect();
    let days: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(days, vec![1, 2, 3, 4]);
}
