use chrono::{Datelike, NaiveDate};
use memorial_core::db::open_db_in_memory;
use memorial_core::{
    compute_anniversaries, AnniversarySort, MemorialRecord, MemorialRepository, MemorialService,
    SqliteFamilyEdgeRepository, SqliteMemorialRepository,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_records() -> Vec<MemorialRecord> {
    vec![
        MemorialRecord::with_id("jan", "January").died_on("1990-01-01"),
        MemorialRecord::with_id("today", "Today").died_on("1990-06-15"),
        MemorialRecord::with_id("soon", "Soon").died_on("1990-06-20T09:00:00Z"),
        MemorialRecord::with_id("soon-newer", "Soon newer").died_on("2015-06-20"),
        MemorialRecord::with_id("undated", "Undated"),
    ]
}

#[test]
fn every_dated_record_gets_one_non_negative_countdown() {
    let today = date(2024, 6, 15);
    let records = sample_records();
    let views = compute_anniversaries(&records, today);

    assert_eq!(views.len(), 4);
    for view in &views {
        assert!(view.days_until >= 0);
        assert!(view.next_anniversary >= today);
        assert_eq!(
            (view.next_anniversary - today).num_days(),
            view.days_until
        );
    }
}

#[test]
fn zero_countdown_iff_month_and_day_match_today() {
    let death = date(1987, 10, 18);
    let records = vec![MemorialRecord::with_id("m", "M").died_on("1987-10-18")];
    let mut today = date(2025, 1, 1);
    while today < date(2026, 1, 1) {
        let view = &compute_anniversaries(&records, today)[0];
        let same_day = today.month() == death.month() && today.day() == death.day();
        assert_eq!(view.days_until == 0, same_day, "today={today}");
        today = today.succ_opt().unwrap();
    }
}

#[test]
fn computation_is_idempotent() {
    let today = date(2024, 6, 15);
    let records = sample_records();
    assert_eq!(
        compute_anniversaries(&records, today),
        compute_anniversaries(&records, today)
    );
}

#[test]
fn service_lists_closest_first_from_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);
    for record in sample_records() {
        repo.create_memorial(&record).unwrap();
    }
    let service = MemorialService::new(repo, SqliteFamilyEdgeRepository::new(&conn));

    let views = service
        .upcoming_anniversaries(date(2024, 6, 15), AnniversarySort::Closest)
        .unwrap();
    let ids: Vec<&str> = views.iter().map(|v| v.record.id.as_str()).collect();
    assert_eq!(ids, vec!["today", "soon-newer", "soon", "jan"]);
    assert_eq!(views[3].days_until, 200);
    assert_eq!(views[3].anniversary_ordinal, 35);
    assert_eq!(views[1].anniversary_ordinal, 9);

    let past = service
        .upcoming_anniversaries(date(2024, 6, 15), AnniversarySort::Past)
        .unwrap();
    assert_eq!(past.last().unwrap().record.id, "soon-newer");
}

#[test]
fn within_window_keeps_only_near_anniversaries() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);
    for record in sample_records() {
        repo.create_memorial(&record).unwrap();
    }
    let service = MemorialService::new(repo, SqliteFamilyEdgeRepository::new(&conn));

    let week = service.anniversaries_within(date(2024, 6, 15), 7).unwrap();
    let ids: Vec<&str> = week.iter().map(|v| v.record.id.as_str()).collect();
    assert_eq!(ids, vec!["today", "soon-newer", "soon"]);

    let same_day = service.anniversaries_within(date(2024, 6, 15), 0).unwrap();
    assert_eq!(same_day.len(), 1);
}

#[test]
fn view_serializes_dates_as_iso_text() {
    let views = compute_anniversaries(&sample_records()[..2], date(2024, 6, 15));
    let json = serde_json::to_value(&views[1]).unwrap();
    assert_eq!(json["next_anniversary"], "2024-06-15");
    assert_eq!(json["death_date"], "1990-06-15");
    assert_eq!(json["days_until"], 0);
    assert_eq!(json["record"]["id"], "today");
}
