use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlite_queue::{DatabaseQueue, DatabaseValue, Migrator, Transaction, Value};

/// A point in time stored as epoch seconds in a REAL column.
///
/// Calendar math is pinned to UTC; the stored primitive carries fractional
/// seconds, reconstructed to nanosecond granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DatabaseDate(DateTime<Utc>);

impl DatabaseValue for DatabaseDate {
    fn to_value(&self) -> Value {
        let seconds =
            self.0.timestamp() as f64 + f64::from(self.0.timestamp_subsec_nanos()) * 1e-9;
        Value::Real(seconds)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(timestamp) => {
                let mut seconds = timestamp.floor();
                let mut nanos = ((timestamp - seconds) * 1e9).round() as u32;
                if nanos >= 1_000_000_000 {
                    seconds += 1.0;
                    nanos = 0;
                }
                DateTime::from_timestamp(seconds as i64, nanos).map(DatabaseDate)
            }
            _ => None,
        }
    }
}

fn setup_queue() -> anyhow::Result<DatabaseQueue> {
    let queue = DatabaseQueue::open_in_memory()?;
    let mut migrator = Migrator::new();
    migrator.register("create_stuffs", |db| {
        db.execute_batch(
            "CREATE TABLE stuffs (id INTEGER PRIMARY KEY, creation_timestamp DOUBLE);",
        )?;
        Ok(())
    })?;
    migrator.migrate(&queue)?;
    Ok(queue)
}

#[tokio::test]
async fn test_custom_date_in_rolled_back_transaction() {
    custom_date_in_rolled_back_transaction_impl().unwrap();
}

fn custom_date_in_rolled_back_transaction_impl() -> anyhow::Result<()> {
    let queue = setup_queue()?;

    queue.in_transaction(|db| {
        let date = DatabaseDate(Utc.with_ymd_and_hms(1973, 9, 18, 0, 0, 0).unwrap());
        db.execute(
            "INSERT INTO stuffs (creation_timestamp) VALUES (?)",
            &[&date],
        )?;

        // Generic row extraction parameterized by the adapter type.
        let row = db
            .fetch_one_row("SELECT creation_timestamp FROM stuffs", &[])?
            .unwrap();
        let read: DatabaseDate = row.value_at(0).unwrap();
        assert_eq!(read.0.year(), 1973);

        // Single-value helper parameterized the same way.
        let read: DatabaseDate = db
            .fetch_one("SELECT creation_timestamp FROM stuffs", &[])?
            .unwrap();
        assert_eq!(read.0.year(), 1973);

        Ok(Transaction::Rollback)
    })?;

    // The insert happened inside a rolled-back transaction.
    let after = queue.fetch_one_row("SELECT creation_timestamp FROM stuffs", &[])?;
    assert!(after.is_none());
    Ok(())
}

#[tokio::test]
async fn test_round_trip_preserves_epoch_seconds() {
    let original = DatabaseDate(DateTime::from_timestamp(117_158_400, 500_000_000).unwrap());
    let primitive = original.to_value();
    let restored = DatabaseDate::from_value(&primitive).unwrap();
    assert_eq!(restored.to_value(), primitive);
    assert_eq!(restored.0, original.0);
}

#[tokio::test]
async fn test_non_real_variants_yield_absence() {
    for value in [
        Value::Null,
        Value::Integer(117_158_400),
        Value::Text("1973-09-18".to_string()),
        Value::Blob(vec![0x19, 0x73]),
    ] {
        assert!(DatabaseDate::from_value(&value).is_none());
    }
}

#[tokio::test]
async fn test_stored_real_is_readable_as_raw_f64() {
    let impl_result: anyhow::Result<()> = (|| {
        let queue = setup_queue()?;
        let date = DatabaseDate(Utc.with_ymd_and_hms(1973, 9, 18, 0, 0, 0).unwrap());
        queue.execute(
            "INSERT INTO stuffs (creation_timestamp) VALUES (?)",
            &[&date],
        )?;
        let raw: f64 = queue
            .fetch_one("SELECT creation_timestamp FROM stuffs", &[])?
            .unwrap();
        assert_eq!(Value::Real(raw), date.to_value());
        Ok(())
    })();
    impl_result.unwrap();
}
