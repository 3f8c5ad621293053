use small_datetime::{
    DateTimeError, Disambiguation, Instant, LocalDateTime, OffsetTimestamp, UtcOffset, ZoneId,
    ZonedTimestamp,
};

fn new_york() -> ZoneId {
    ZoneId::of("America/New_York").unwrap()
}

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> LocalDateTime {
    LocalDateTime::of(y, mo, d, h, mi).unwrap()
}

#[test]
fn test_zoned_timestamp_in_new_york() {
    let winter = ZonedTimestamp::of(local(2024, 1, 15, 9, 0), new_york()).unwrap();
    let summer = ZonedTimestamp::of(local(2024, 7, 15, 9, 0), new_york()).unwrap();

    assert_eq!(winter.offset().to_string(), "-05:00");
    assert_eq!(summer.offset().to_string(), "-04:00");
    assert_eq!(winter.to_string(), "2024-01-15T09:00:00-05:00[America/New_York]");
    assert_eq!(winter.to_instant().to_string(), "2024-01-15T14:00:00Z");
}

#[test]
fn test_gap_is_shifted_forward_by_default() {
    let value = ZonedTimestamp::of(local(2024, 3, 10, 2, 30), new_york()).unwrap();
    assert_eq!(value.local_date_time(), local(2024, 3, 10, 3, 30));
    assert_eq!(value.offset().to_string(), "-04:00");
    assert_eq!(value.to_string(), "2024-03-10T03:30:00-04:00[America/New_York]");
}

#[test]
fn test_gap_fails_under_strict_policy() {
    let err = ZonedTimestamp::of_strict(local(2024, 3, 10, 2, 30), new_york()).unwrap_err();
    match err {
        DateTimeError::ZoneResolution { zone, local, reason } => {
            assert_eq!(zone, "America/New_York");
            assert_eq!(local, "2024-03-10 02:30:00");
            assert!(reason.contains("gap"));
        }
        other => panic!("expected ZoneResolution, got {:?}", other),
    }
}

#[test]
fn test_overlap_keeps_earlier_offset() {
    let value = ZonedTimestamp::of(local(2024, 11, 3, 1, 30), new_york()).unwrap();
    assert_eq!(value.offset().to_string(), "-04:00");
    assert_eq!(value.to_instant().to_string(), "2024-11-03T05:30:00Z");

    let strict = ZonedTimestamp::resolve(local(2024, 11, 3, 1, 30), new_york(), Disambiguation::Strict);
    assert!(matches!(strict, Err(DateTimeError::ZoneResolution { .. })));
}

#[test]
fn test_overlap_honours_preferred_offset() {
    let est = UtcOffset::parse("-05:00").unwrap();
    let value = ZonedTimestamp::of_local(
        local(2024, 11, 3, 1, 30),
        new_york(),
        Some(est),
        Disambiguation::Strict,
    )
    .unwrap();
    assert_eq!(value.offset(), est);

    // 不合法的偏好 offset 會被忽略
    let ist = UtcOffset::parse("+05:30").unwrap();
    let value = ZonedTimestamp::of_local(
        local(2024, 7, 1, 12, 0),
        new_york(),
        Some(ist),
        Disambiguation::Strict,
    )
    .unwrap();
    assert_eq!(value.offset().to_string(), "-04:00");
}

#[test]
fn test_whole_day_gap_in_samoa() {
    let apia = ZoneId::of("Pacific/Apia").unwrap();
    let value = ZonedTimestamp::of(local(2011, 12, 30, 12, 0), apia).unwrap();
    assert_eq!(value.local_date_time(), local(2011, 12, 31, 12, 0));
    assert!(ZonedTimestamp::of_strict(local(2011, 12, 30, 12, 0), apia).is_err());
}

#[test]
fn test_hours_follow_the_time_line_across_fall_back() {
    let first = ZonedTimestamp::of(local(2024, 11, 3, 1, 30), new_york()).unwrap();
    let second = first.plus_hours(1).unwrap();

    // 同樣是 01:30，但 offset 不同
    assert_eq!(second.local_date_time(), first.local_date_time());
    assert_eq!(second.offset().to_string(), "-05:00");
    assert!(second.is_after(&first));
    assert_ne!(first, second);
}

#[test]
fn test_days_keep_wall_clock_across_spring_forward() {
    let before = ZonedTimestamp::of(local(2024, 3, 9, 12, 0), new_york()).unwrap();
    let next_day = before.plus_days(1).unwrap();
    let plus_24h = before.plus_hours(24).unwrap();

    assert_eq!(next_day.local_date_time(), local(2024, 3, 10, 12, 0));
    assert_eq!(plus_24h.local_date_time(), local(2024, 3, 10, 13, 0));
}

#[test]
fn test_offset_timestamp_for_india() {
    let datetime = local(2018, 1, 14, 19, 30);
    let offset = UtcOffset::parse("+05:30").unwrap();
    let value = OffsetTimestamp::of(datetime, offset);

    assert_eq!(value.to_string(), "2018-01-14T19:30:00+05:30");
    assert_eq!(value.offset(), offset);
    assert_eq!(value.local_date_time(), datetime);

    let kolkata = ZonedTimestamp::of(datetime, ZoneId::of("Asia/Kolkata").unwrap()).unwrap();
    assert_eq!(kolkata.offset(), offset);
    assert_eq!(kolkata.to_instant(), value.to_instant());
}

#[test]
fn test_with_zone_same_instant() {
    let india = OffsetTimestamp::of(local(2018, 1, 14, 19, 30), UtcOffset::parse("+05:30").unwrap());
    let in_new_york = india.at_zone_same_instant(new_york());

    assert_eq!(in_new_york.local_date_time(), local(2018, 1, 14, 9, 0));
    assert_eq!(in_new_york.to_instant(), india.to_instant());

    let in_tokyo = in_new_york.with_zone_same_instant(ZoneId::of("Asia/Tokyo").unwrap());
    assert_eq!(in_tokyo.local_date_time(), local(2018, 1, 14, 23, 0));
    assert!(in_tokyo.is_same_instant(&in_new_york));
}

#[test]
fn test_with_zone_same_local() {
    let paris = ZonedTimestamp::of(local(2024, 7, 1, 9, 0), ZoneId::of("Europe/Paris").unwrap()).unwrap();
    let moved = paris.with_zone_same_local(new_york()).unwrap();
    assert_eq!(moved.local_date_time(), paris.local_date_time());
    assert!(moved.is_after(&paris));
}

#[test]
fn test_fixed_offset_zone_display() {
    let zone = ZoneId::of("+05:30").unwrap();
    let value = ZonedTimestamp::of(local(2018, 1, 14, 19, 30), zone).unwrap();
    assert_eq!(value.to_string(), "2018-01-14T19:30:00+05:30");
    assert_eq!(value.to_offset_timestamp().to_string(), value.to_string());
}

#[test]
fn test_instant_at_zone() {
    let instant = Instant::parse("2024-01-01T00:00:00Z").unwrap();
    let tokyo = instant.at_zone(ZoneId::of("Asia/Tokyo").unwrap());
    assert_eq!(tokyo.to_string(), "2024-01-01T09:00:00+09:00[Asia/Tokyo]");
    assert_eq!(tokyo.to_instant(), instant);
}

#[test]
fn test_unknown_zone() {
    let err = ZoneId::of("America/Atlantis").unwrap_err();
    assert!(matches!(err, DateTimeError::UnknownZone { ref zone } if zone == "America/Atlantis"));
    assert!(err.recovery_suggestion().contains("IANA"));
}

#[test]
fn test_values_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ZonedTimestamp>();
    assert_send_sync::<OffsetTimestamp>();
    assert_send_sync::<ZoneId>();

    let value = ZonedTimestamp::of(local(2024, 7, 1, 9, 0), new_york()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || value.plus_hours(i).unwrap().to_instant()))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let instant = handle.join().unwrap();
        assert_eq!(instant.epoch_second() - value.to_instant().epoch_second(), i as i64 * 3600);
    }
}
