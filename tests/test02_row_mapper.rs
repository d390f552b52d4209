#![cfg(feature = "sqlite")]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sql_rebind::prelude::*;

fn setup(conn: &rusqlite::Connection) -> Result<(), Box<dyn std::error::Error>> {
    conn.execute_batch(
        "CREATE TABLE RESULTSETMAPPERTEST (
            TEST_KEY TEXT,
            INT_VAL INTEGER,
            REAL_VAL REAL,
            BOOLEAN_VAL BOOLEAN,
            CHAR_VAL CHAR(10),
            VARCHAR_VAL VARCHAR(100),
            TEXT_VAL TEXT,
            DATE_VAL DATE,
            TIMESTAMP_VAL TIMESTAMP
        );
        INSERT INTO RESULTSETMAPPERTEST VALUES (
            'test01', 10, 10.5, 1, 'abc       ', 'varabc', 'text',
            '2023-11-05', '2023-11-04 23:15:30'
        );
        INSERT INTO RESULTSETMAPPERTEST VALUES (
            'test02', NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL
        );
        CREATE TABLE RESULTSETMAPPERTEST2 (
            TEST_KEY TEXT,
            NUMERIC_VAL NUMERIC
        );
        INSERT INTO RESULTSETMAPPERTEST2 VALUES ('test01', 10.5);",
    )?;
    Ok(())
}

fn map_one_by_key<T: FromColumns>(
    conn: &rusqlite::Connection,
    sql: &str,
) -> Result<Option<T>, SqlRebindError> {
    let mut stmt = NamedStatement::prepare(conn, sql)?;
    let mut cursor = stmt.execute_query()?;
    map_row(&mut cursor)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

fn timestamp(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    date(y, mo, d).and_hms_opt(h, mi, s).expect("timestamp")
}

#[derive(Debug, Default, PartialEq)]
struct PlainRecord {
    test_key: Option<String>,
    int_val: i64,
    real_val: f64,
    boolean_val: bool,
    char_val: Option<String>,
    varchar_val: Option<String>,
    text_val: Option<String>,
    date_val: Option<NaiveDate>,
    timestamp_val: Option<NaiveDateTime>,
}

impl FromColumns for PlainRecord {
    fn column_bindings() -> Vec<ColumnBinding<Self>> {
        vec![
            ColumnBinding::new("TEST_KEY", FieldSetter::Text(|r, v| r.test_key = v)),
            ColumnBinding::new("INT_VAL", FieldSetter::Int(|r, v| r.int_val = v)),
            ColumnBinding::new("REAL_VAL", FieldSetter::Float(|r, v| r.real_val = v)),
            ColumnBinding::new("BOOLEAN_VAL", FieldSetter::Bool(|r, v| r.boolean_val = v)),
            ColumnBinding::new("CHAR_VAL", FieldSetter::Text(|r, v| r.char_val = v)),
            ColumnBinding::new("VARCHAR_VAL", FieldSetter::Text(|r, v| r.varchar_val = v)),
            ColumnBinding::new("TEXT_VAL", FieldSetter::Text(|r, v| r.text_val = v)),
            ColumnBinding::new("DATE_VAL", FieldSetter::Date(|r, v| r.date_val = v)),
            ColumnBinding::new(
                "TIMESTAMP_VAL",
                FieldSetter::Timestamp(|r, v| r.timestamp_val = v),
            ),
        ]
    }
}

/// Nullable rendition: boxed numerics, trimmed CHAR, and the date column
/// mapped into a datetime field.
#[derive(Debug, Default, PartialEq)]
struct NullableRecord {
    test_key: Option<String>,
    int_val: Option<i64>,
    real_val: Option<f64>,
    boolean_val: Option<bool>,
    char_val: Option<String>,
    date_val: Option<NaiveDateTime>,
    timestamp_val: Option<NaiveDateTime>,
}

impl FromColumns for NullableRecord {
    fn column_bindings() -> Vec<ColumnBinding<Self>> {
        vec![
            ColumnBinding::new("TEST_KEY", FieldSetter::Text(|r, v| r.test_key = v)),
            ColumnBinding::new("INT_VAL", FieldSetter::NullableInt(|r, v| r.int_val = v)),
            ColumnBinding::new("REAL_VAL", FieldSetter::NullableFloat(|r, v| r.real_val = v)),
            ColumnBinding::new(
                "BOOLEAN_VAL",
                FieldSetter::NullableBool(|r, v| r.boolean_val = v),
            ),
            ColumnBinding::new("CHAR_VAL", FieldSetter::Text(|r: &mut Self, v| r.char_val = v)).trim(),
            ColumnBinding::new("DATE_VAL", FieldSetter::Timestamp(|r, v| r.date_val = v)),
            ColumnBinding::new(
                "TIMESTAMP_VAL",
                FieldSetter::Timestamp(|r, v| r.timestamp_val = v),
            ),
        ]
    }
}

#[test]
fn maps_a_full_row_into_plain_fields() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let record: PlainRecord = map_one_by_key(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test01'",
    )?
    .expect("one row");

    assert_eq!(record.test_key.as_deref(), Some("test01"));
    assert_eq!(record.int_val, 10);
    assert_eq!(record.real_val, 10.5);
    assert!(record.boolean_val);
    assert_eq!(record.char_val.as_deref(), Some("abc       "));
    assert_eq!(record.varchar_val.as_deref(), Some("varabc"));
    assert_eq!(record.text_val.as_deref(), Some("text"));
    assert_eq!(record.date_val, Some(date(2023, 11, 5)));
    assert_eq!(record.timestamp_val, Some(timestamp(2023, 11, 4, 23, 15, 30)));
    Ok(())
}

#[test]
fn maps_a_full_row_into_nullable_fields() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let record: NullableRecord = map_one_by_key(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test01'",
    )?
    .expect("one row");

    assert_eq!(record.int_val, Some(10));
    assert_eq!(record.real_val, Some(10.5));
    assert_eq!(record.boolean_val, Some(true));
    // CHAR padding is trimmed when the binding opts in.
    assert_eq!(record.char_val.as_deref(), Some("abc"));
    // A date column read into a datetime field lands at midnight.
    assert_eq!(
        record.date_val,
        Some(date(2023, 11, 5).and_time(NaiveTime::MIN))
    );
    assert_eq!(record.timestamp_val, Some(timestamp(2023, 11, 4, 23, 15, 30)));
    Ok(())
}

#[test]
fn null_columns_leave_plain_fields_at_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let record: PlainRecord = map_one_by_key(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test02'",
    )?
    .expect("one row");

    assert_eq!(record.int_val, 0);
    assert_eq!(record.real_val, 0.0);
    assert!(!record.boolean_val);
    assert_eq!(record.char_val, None);
    assert_eq!(record.varchar_val, None);
    assert_eq!(record.text_val, None);
    assert_eq!(record.date_val, None);
    assert_eq!(record.timestamp_val, None);
    Ok(())
}

#[test]
fn null_columns_map_to_none_in_nullable_fields() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let record: NullableRecord = map_one_by_key(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test02'",
    )?
    .expect("one row");

    assert_eq!(record.int_val, None);
    assert_eq!(record.real_val, None);
    assert_eq!(record.boolean_val, None);
    assert_eq!(record.char_val, None);
    assert_eq!(record.date_val, None);
    assert_eq!(record.timestamp_val, None);
    Ok(())
}

#[test]
fn no_rows_maps_to_none() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let record: Option<PlainRecord> = map_one_by_key(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'testXX'",
    )?;
    assert!(record.is_none());
    Ok(())
}

#[test]
fn multiple_rows_fail_with_the_row_count() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let err = map_one_by_key::<PlainRecord>(&conn, "SELECT * FROM RESULTSETMAPPERTEST")
        .unwrap_err();
    assert_eq!(err.to_string(), "query matched 2 rows, expected at most one");
    Ok(())
}

#[test]
fn map_rows_returns_all_rows_in_cursor_order() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let mut stmt = NamedStatement::prepare(
        &conn,
        "SELECT * FROM RESULTSETMAPPERTEST ORDER BY TEST_KEY",
    )?;
    let mut cursor = stmt.execute_query()?;
    let rows: Vec<PlainRecord> = map_rows(&mut cursor)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].test_key.as_deref(), Some("test01"));
    assert_eq!(rows[1].test_key.as_deref(), Some("test02"));
    Ok(())
}

/// Every field deliberately bound to the wrong shape, one column per test.
#[derive(Debug, Default)]
struct MismatchRecord {
    int_val: f64,
    real_val: i64,
    boolean_val: i64,
    date_val: i64,
    timestamp_val: i64,
}

impl FromColumns for MismatchRecord {
    fn column_bindings() -> Vec<ColumnBinding<Self>> {
        vec![
            ColumnBinding::new("INT_VAL", FieldSetter::Float(|r, v| r.int_val = v)),
            ColumnBinding::new("REAL_VAL", FieldSetter::Int(|r, v| r.real_val = v)),
            ColumnBinding::new("BOOLEAN_VAL", FieldSetter::Int(|r, v| r.boolean_val = v)),
            ColumnBinding::new("DATE_VAL", FieldSetter::Int(|r, v| r.date_val = v)),
            ColumnBinding::new("TIMESTAMP_VAL", FieldSetter::Int(|r, v| r.timestamp_val = v)),
        ]
    }
}

fn mismatch_error(conn: &rusqlite::Connection, column: &str) -> String {
    let sql = format!("SELECT {column} FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test01'");
    map_one_by_key::<MismatchRecord>(conn, &sql)
        .unwrap_err()
        .to_string()
}

#[test]
fn conversion_mismatches_name_source_field_and_column() -> Result<(), Box<dyn std::error::Error>>
{
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    assert_eq!(
        mismatch_error(&conn, "INT_VAL"),
        "unsupported type: cannot convert integer column 'INT_VAL' into f64 field"
    );
    assert_eq!(
        mismatch_error(&conn, "REAL_VAL"),
        "unsupported type: cannot convert real column 'REAL_VAL' into i64 field"
    );
    assert_eq!(
        mismatch_error(&conn, "BOOLEAN_VAL"),
        "unsupported type: cannot convert boolean column 'BOOLEAN_VAL' into i64 field"
    );
    assert_eq!(
        mismatch_error(&conn, "DATE_VAL"),
        "unsupported type: cannot convert date column 'DATE_VAL' into i64 field"
    );
    assert_eq!(
        mismatch_error(&conn, "TIMESTAMP_VAL"),
        "unsupported type: cannot convert timestamp column 'TIMESTAMP_VAL' into i64 field"
    );
    Ok(())
}

#[test]
fn unmapped_columns_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    // CHAR_VAL has no binding in MismatchRecord, so selecting it maps cleanly.
    let record: Option<MismatchRecord> = map_one_by_key(
        &conn,
        "SELECT CHAR_VAL FROM RESULTSETMAPPERTEST WHERE TEST_KEY = 'test01'",
    )?;
    assert!(record.is_some());
    Ok(())
}

#[test]
fn unknown_column_type_names_the_declaration() -> Result<(), Box<dyn std::error::Error>> {
    #[derive(Debug, Default)]
    struct NumericRecord {
        numeric_val: f64,
    }
    impl FromColumns for NumericRecord {
        fn column_bindings() -> Vec<ColumnBinding<Self>> {
            vec![ColumnBinding::new(
                "NUMERIC_VAL",
                FieldSetter::Float(|r, v| r.numeric_val = v),
            )]
        }
    }

    let conn = rusqlite::Connection::open_in_memory()?;
    setup(&conn)?;
    let err = map_one_by_key::<NumericRecord>(
        &conn,
        "SELECT NUMERIC_VAL FROM RESULTSETMAPPERTEST2 WHERE TEST_KEY = 'test01'",
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported type: no conversion for column type NUMERIC"
    );
    Ok(())
}
