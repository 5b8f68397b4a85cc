use readsms_core::domain::RawMessage;
use readsms_core::ports::{Error, MessageStore, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, OpenFlags, Row};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `sms.type` value of received messages.
pub const INBOX_MESSAGE_TYPE: i64 = 1;

/// Inbox rows in the telephony provider's default inbox order.
const INBOX_QUERY: &str = r#"
    SELECT address, body, date
    FROM sms
    WHERE type = ?1
    ORDER BY date DESC
"#;

/// SQLite implementation of the MessageStore trait, reading an Android
/// telephony database (`mmssms.db`)
pub struct SqliteMessageStore {
    db_path: PathBuf,
}

impl SqliteMessageStore {
    /// Creates a new SqliteMessageStore with the given database path
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Opens the database read-only. The file is never created.
    fn open(&self) -> Result<Connection> {
        // SQLite reports an unreadable file as a generic open failure, so
        // probe it first to tell a refusal apart from a missing store.
        File::open(&self.db_path).map_err(|err| self.probe_error(err))?;

        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| classify(&self.db_path, err))
    }

    fn probe_error(&self, err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::PermissionDenied => {
                Error::PermissionDenied(format!("{}: {}", self.db_path.display(), err))
            }
            _ => Error::SourceUnavailable(format!("{}: {}", self.db_path.display(), err)),
        }
    }
}

/// Maps a SQLite failure onto the store error taxonomy
fn classify(path: &Path, err: rusqlite::Error) -> Error {
    let detail = format!("{}: {}", path.display(), err);
    match err.sqlite_error_code() {
        Some(ErrorCode::PermissionDenied) | Some(ErrorCode::AuthorizationForStatementDenied) => {
            Error::PermissionDenied(detail)
        }
        _ => Error::SourceUnavailable(detail),
    }
}

/// Reads each column independently so a NULL in one never hides the others
fn raw_message(row: &Row) -> rusqlite::Result<RawMessage> {
    Ok(RawMessage::new(
        text_column(row, 0)?,
        text_column(row, 1)?,
        millis_column(row, 2)?,
    ))
}

/// Only NULL is absent; numbers are rendered as text.
fn text_column(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

/// Only NULL is absent. Reals are truncated and unparsable text reads as 0,
/// matching SQLite's integer coercion.
fn millis_column(row: &Row, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(
            std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| text.trim().parse().ok())
                .unwrap_or(0),
        ),
    })
}

impl MessageStore for SqliteMessageStore {
    fn query_inbox(&self) -> Result<Vec<RawMessage>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(INBOX_QUERY)
            .map_err(|err| classify(&self.db_path, err))?;

        let records = stmt
            .query_map([INBOX_MESSAGE_TYPE], raw_message)
            .map_err(|err| classify(&self.db_path, err))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .map_err(|err| classify(&self.db_path, err))?;

        debug!(path = %self.db_path.display(), records = records.len(), "queried sms inbox");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
        CREATE TABLE sms (
            _id INTEGER PRIMARY KEY,
            address TEXT,
            body TEXT,
            date INTEGER,
            type INTEGER
        )
    "#;

    fn create_db(rows: &[(Option<&str>, Option<&str>, Option<i64>, i64)]) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mmssms.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute(SCHEMA, []).unwrap();
        for (address, body, date, kind) in rows {
            conn.execute(
                "INSERT INTO sms (address, body, date, type) VALUES (?1, ?2, ?3, ?4)",
                params![address, body, date, kind],
            )
            .unwrap();
        }
        (dir, path)
    }

    #[test]
    fn test_query_inbox_newest_first() {
        let (_dir, path) = create_db(&[
            (Some("jk"), Some("Hello"), Some(1000), 1),
            (Some("sample"), Some("a b"), Some(2000), 1),
        ]);

        let records = SqliteMessageStore::new(path).query_inbox().unwrap();

        assert_eq!(
            records,
            vec![
                RawMessage::new(Some("sample".into()), Some("a b".into()), Some(2000)),
                RawMessage::new(Some("jk".into()), Some("Hello".into()), Some(1000)),
            ]
        );
    }

    #[test]
    fn test_query_inbox_skips_other_boxes() {
        let (_dir, path) = create_db(&[
            (Some("jk"), Some("received"), Some(1000), 1),
            (Some("jk"), Some("sent"), Some(1500), 2),
            (Some("jk"), Some("draft"), Some(1600), 3),
        ]);

        let records = SqliteMessageStore::new(path).query_inbox().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body.as_deref(), Some("received"));
    }

    #[test]
    fn test_query_inbox_reports_each_null_separately() {
        let (_dir, path) = create_db(&[
            (None, Some("no sender"), Some(3000), 1),
            (Some("jk"), None, Some(2000), 1),
            (Some("jk"), Some("no date"), None, 1),
        ]);

        let records = SqliteMessageStore::new(path).query_inbox().unwrap();

        assert_eq!(
            records,
            vec![
                RawMessage::new(None, Some("no sender".into()), Some(3000)),
                RawMessage::new(Some("jk".into()), None, Some(2000)),
                RawMessage::new(Some("jk".into()), Some("no date".into()), None),
            ]
        );
    }

    #[test]
    fn test_query_inbox_empty_is_ok() {
        let (_dir, path) = create_db(&[(Some("me"), Some("sent"), Some(1), 2)]);
        let records = SqliteMessageStore::new(path).query_inbox().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_database_is_source_unavailable_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let result = SqliteMessageStore::new(&path).query_inbox();

        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_database_without_sms_table_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute("CREATE TABLE contacts (name TEXT)", [])
            .unwrap();

        let result = SqliteMessageStore::new(&path).query_inbox();

        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }

    #[test]
    fn test_non_database_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "this is plainly not a sqlite database, just some text").unwrap();

        let result = SqliteMessageStore::new(&path).query_inbox();

        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }

    #[test]
    fn test_classify_permission_codes() {
        let denied = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_PERM),
            None,
        );
        assert!(matches!(
            classify(Path::new("x.db"), denied),
            Error::PermissionDenied(_)
        ));

        let cant_open = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
            None,
        );
        assert!(matches!(
            classify(Path::new("x.db"), cant_open),
            Error::SourceUnavailable(_)
        ));
    }

    #[test]
    fn test_query_inbox_coerces_mistyped_cells() {
        let (_dir, path) = create_db(&[(Some("jk"), Some("ok"), Some(1000), 1)]);
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO sms (address, body, date, type) VALUES ('x', 'bad date', 'garbage', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO sms (address, body, date, type) VALUES (5551234, 42, 2500.9, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO sms (address, body, date, type) VALUES ('y', 'text date', ' 1500 ', 1)",
            [],
        )
        .unwrap();
        drop(conn);

        let mut records = SqliteMessageStore::new(&path).query_inbox().unwrap();
        records.sort_by_key(|record| record.date);

        assert_eq!(
            records,
            vec![
                RawMessage::new(Some("x".into()), Some("bad date".into()), Some(0)),
                RawMessage::new(Some("jk".into()), Some("ok".into()), Some(1000)),
                RawMessage::new(Some("y".into()), Some("text date".into()), Some(1500)),
                RawMessage::new(Some("5551234".into()), Some("42".into()), Some(2500)),
            ]
        );
    }

    #[test]
    fn test_probe_error_classification() {
        let store = SqliteMessageStore::new("mmssms.db");

        let denied = store.probe_error(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, Error::PermissionDenied(_)));

        let missing = store.probe_error(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, Error::SourceUnavailable(_)));
    }
}
