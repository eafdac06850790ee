use memorial_core::db::open_db_in_memory;
use memorial_core::{
    MemorialListQuery, MemorialRecord, MemorialRepository, MemorialValidationError, RepoError,
    SqliteMemorialRepository,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);

    let mut record = MemorialRecord::new("Kim Minsu")
        .died_on("2019-11-03")
        .born_on("1941-04-22");
    record.image_url = Some("portraits/kim.jpg".to_string());
    let id = repo.create_memorial(&record).unwrap();

    let loaded = repo.get_memorial(&id).unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn create_rejects_invalid_records_and_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);

    let blank = MemorialRecord::with_id("m-1", " ");
    let err = repo.create_memorial(&blank).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemorialValidationError::BlankName)
    ));

    let record = MemorialRecord::with_id("m-1", "Lee").died_on("2001-01-01");
    repo.create_memorial(&record).unwrap();
    let err = repo.create_memorial(&record).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(id) if id == "m-1"));
}

#[test]
fn names_are_stored_exactly_as_written() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);

    let mut record = MemorialRecord::with_id("padded", "  Yoon Seo  ").died_on("2002-02-02");
    repo.create_memorial(&record).unwrap();
    assert_eq!(repo.get_memorial("padded").unwrap().unwrap(), record);

    record.deceased_name = " Yoon Seoyeon ".to_string();
    repo.update_memorial(&record).unwrap();
    assert_eq!(repo.get_memorial("padded").unwrap().unwrap(), record);
}

#[test]
fn rows_with_unparseable_dates_are_still_readable() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO memorials (id, deceased_name, death_date) VALUES ('legacy', 'Park', 'unknown');",
        [],
    )
    .unwrap();
    let repo = SqliteMemorialRepository::new(&conn);

    let loaded = repo.get_memorial("legacy").unwrap().unwrap();
    assert_eq!(loaded.death_date.as_deref(), Some("unknown"));
    assert_eq!(loaded.parsed_death_date(), None);
}

#[test]
fn update_existing_and_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);

    let mut record = MemorialRecord::with_id("m-1", "Choi").died_on("1999-09-09");
    repo.create_memorial(&record).unwrap();

    record.deceased_name = "Choi Jiwoo".to_string();
    record.death_date = Some("1999-09-10".to_string());
    repo.update_memorial(&record).unwrap();
    let loaded = repo.get_memorial("m-1").unwrap().unwrap();
    assert_eq!(loaded.deceased_name, "Choi Jiwoo");
    assert_eq!(loaded.death_date.as_deref(), Some("1999-09-10"));

    let missing = MemorialRecord::with_id("nope", "Nobody");
    let err = repo.update_memorial(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "nope"));
}

#[test]
fn list_filters_by_name_and_paginates_in_name_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);
    for (id, name) in [("3", "Charlie Han"), ("1", "Alice Han"), ("2", "Bob Yoon")] {
        repo.create_memorial(&MemorialRecord::with_id(id, name))
            .unwrap();
    }

    let all = repo.list_memorials(&MemorialListQuery::default()).unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.deceased_name.as_str()).collect();
    assert_eq!(names, vec!["Alice Han", "Bob Yoon", "Charlie Han"]);

    let hans = repo
        .list_memorials(&MemorialListQuery {
            name_contains: Some("han".to_string()),
            ..MemorialListQuery::default()
        })
        .unwrap();
    assert_eq!(hans.len(), 2);

    let page = repo
        .list_memorials(&MemorialListQuery {
            limit: Some(1),
            offset: 1,
            ..MemorialListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "2");
}

#[test]
fn get_memorials_skips_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);
    repo.create_memorial(&MemorialRecord::with_id("a", "A"))
        .unwrap();
    repo.create_memorial(&MemorialRecord::with_id("b", "B"))
        .unwrap();

    let found = repo
        .get_memorials(&["b".to_string(), "ghost".to_string(), "a".to_string()])
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(repo.get_memorials(&[]).unwrap().is_empty());
}

#[test]
fn delete_removes_row_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemorialRepository::new(&conn);
    repo.create_memorial(&MemorialRecord::with_id("a", "A"))
        .unwrap();

    repo.delete_memorial("a").unwrap();
    assert!(repo.get_memorial("a").unwrap().is_none());
    assert!(matches!(
        repo.delete_memorial("a").unwrap_err(),
        RepoError::NotFound(_)
    ));
}

#[test]
fn record_serialization_uses_snake_case_fields() {
    let record = MemorialRecord::with_id("m-9", "Jung").died_on("2010-05-05");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "m-9");
    assert_eq!(json["deceased_name"], "Jung");
    assert_eq!(json["death_date"], "2010-05-05");
    assert!(json["birth_date"].is_null());
}
