use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::Serialize;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{Score, SessionKind, SessionRecord, SessionResult};

const HIGH_SCORE_KEY: &str = "game_high_score";

const SELECT_COLUMNS: &str = "id, kind, wpm, accuracy, score, timestamp";

/// Append-only session history plus the game high score
#[derive(Debug)]
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (or create) the database at the default state location
    pub fn open_default() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typemaster_history.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                wpm INTEGER NOT NULL,
                accuracy INTEGER,
                score INTEGER,
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(SessionStore { conn })
    }

    /// Append a finished session, stamped with the current local time
    pub fn save(&self, result: &SessionResult) -> Result<SessionRecord> {
        let timestamp = Local::now();

        self.conn.execute(
            "INSERT INTO sessions (kind, wpm, accuracy, score, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.kind.to_string(),
                result.wpm,
                result.score.accuracy(),
                result.score.points(),
                timestamp.to_rfc3339(),
            ],
        )?;

        Ok(SessionRecord {
            id: self.conn.last_insert_rowid(),
            kind: result.kind,
            wpm: result.wpm,
            score: result.score,
            timestamp,
        })
    }

    /// Every record in insertion order
    pub fn get_all(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM sessions ORDER BY id ASC"))?;

        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(records)
    }

    /// The last `limit` records, still in insertion order
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM (
                SELECT {SELECT_COLUMNS} FROM sessions ORDER BY id DESC LIMIT ?1
            ) ORDER BY id ASC"
        ))?;

        let records = stmt
            .query_map([limit as i64], record_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(records)
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }

    pub fn high_score(&self) -> Result<u32> {
        let value: Option<u32> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [HIGH_SCORE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.unwrap_or(0))
    }

    /// Store `score` as the new best if it beats the current one
    pub fn record_high_score(&self, score: u32) -> Result<bool> {
        if score <= self.high_score()? {
            return Ok(false);
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![HIGH_SCORE_KEY, score],
        )?;

        Ok(true)
    }

    /// Write the whole history as CSV, returning the number of rows written
    pub fn export_csv<W: Write>(&self, writer: W) -> std::result::Result<usize, Box<dyn Error>> {
        let records = self.get_all()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        for record in &records {
            csv_writer.serialize(CsvRow::from(record))?;
        }
        csv_writer.flush()?;

        Ok(records.len())
    }
}

#[derive(Serialize)]
struct CsvRow {
    id: i64,
    kind: String,
    wpm: u32,
    accuracy: Option<u32>,
    score: Option<u32>,
    timestamp: String,
}

impl From<&SessionRecord> for CsvRow {
    fn from(record: &SessionRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind.to_string(),
            wpm: record.wpm,
            accuracy: record.score.accuracy(),
            score: record.score.points(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

fn record_from_row(row: &Row) -> Result<SessionRecord> {
    let kind_str: String = row.get(1)?;
    let kind = SessionKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(1, "kind".to_string(), rusqlite::types::Type::Text)
    })?;

    let accuracy: Option<u32> = row.get(3)?;
    let points: Option<u32> = row.get(4)?;
    let score = match (accuracy, points) {
        (_, Some(points)) if kind.is_game() => Score::Points(points),
        (Some(acc), _) => Score::Accuracy(acc),
        (None, Some(points)) => Score::Points(points),
        (None, None) => Score::Accuracy(0),
    };

    let timestamp_str: String = row.get(5)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                5,
                "timestamp".to_string(),
                rusqlite::types::Type::Text,
            )
        })?
        .with_timezone(&Local);

    Ok(SessionRecord {
        id: row.get(0)?,
        kind,
        wpm: row.get(2)?,
        score,
        timestamp,
    })
}
