use super::backend::RecordBackend;
use crate::error::{DearlyError, Result};
use crate::model::{Card, CardFaces, CardMetadata, CardType, ImageSide};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cards (
        id                      TEXT PRIMARY KEY NOT NULL,
        card_type               TEXT NOT NULL,
        front_image_path        TEXT,
        back_image_path         TEXT,
        inside_left_image_path  TEXT,
        inside_right_image_path TEXT,
        date_scanned            TEXT NOT NULL,
        is_favorite             INTEGER NOT NULL DEFAULT 0,
        sender                  TEXT,
        occasion                TEXT,
        date_received           TEXT,
        notes                   TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_cards_date_scanned ON cards(date_scanned DESC);
";

const SELECT_COLUMNS: &str = "SELECT id, card_type, front_image_path, back_image_path, \
     inside_left_image_path, inside_right_image_path, date_scanned, is_favorite, \
     sender, occasion, date_received, notes FROM cards";

/// SQLite-backed record storage: one `cards` table keyed by the card UUID.
pub struct SqliteBackend {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(DearlyError::Io)?;
            }
        }
        let conn = Connection::open(path)?;
        let backend = Self {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        backend.init_schema()?;
        debug!(path = %path.display(), "opened card database");
        Ok(backend)
    }

    /// A private, throwaway database.
    pub fn open_in_memory() -> Result<Self> {
        let backend = Self {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("db_path", &self.db_path)
            .finish()
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| conversion_error(0, format!("invalid card id {}: {}", id, e)))?;

    let card_type: String = row.get(1)?;
    let card_type = card_type
        .parse::<CardType>()
        .map_err(|e| conversion_error(1, e.to_string()))?;

    let faces = CardFaces::from_paths(
        card_type,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    );
    let date_scanned: DateTime<Utc> = row.get(6)?;
    let is_favorite: bool = row.get(7)?;
    let date_received: Option<NaiveDate> = row.get(10)?;

    let metadata = CardMetadata {
        sender: row.get(8)?,
        occasion: row.get(9)?,
        date_received,
        notes: row.get(11)?,
    };

    let card = Card::with_date_scanned(id, faces, metadata, date_scanned);
    Ok(card.favorited(is_favorite))
}

impl RecordBackend for SqliteBackend {
    fn load_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date_scanned DESC", SELECT_COLUMNS))?;
        let cards = stmt
            .query_map([], row_to_card)?
            .collect::<rusqlite::Result<Vec<Card>>>()?;
        Ok(cards)
    }

    fn load_card(&self, id: &Uuid) -> Result<Option<Card>> {
        let card = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [id.to_string()],
                row_to_card,
            )
            .optional()?;
        Ok(card)
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        let faces = card.faces();
        let inserted = self.conn.execute(
            "INSERT INTO cards (id, card_type, front_image_path, back_image_path,
                inside_left_image_path, inside_right_image_path, date_scanned, is_favorite,
                sender, occasion, date_received, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                card.id().to_string(),
                card.card_type().as_str(),
                faces.path(ImageSide::Front),
                faces.path(ImageSide::Back),
                faces.path(ImageSide::InsideLeft),
                faces.path(ImageSide::InsideRight),
                card.date_scanned(),
                card.is_favorite,
                card.metadata.sender,
                card.metadata.occasion,
                card.metadata.date_received,
                card.metadata.notes,
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(DearlyError::DuplicateCard(card.id()))
            }
            Err(e) => Err(DearlyError::Database(e)),
        }
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE cards
             SET is_favorite = ?1, sender = ?2, occasion = ?3, date_received = ?4, notes = ?5
             WHERE id = ?6",
            params![
                card.is_favorite,
                card.metadata.sender,
                card.metadata.occasion,
                card.metadata.date_received,
                card.metadata.notes,
                card.id().to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(DearlyError::CardNotFound(card.id()));
        }
        Ok(())
    }

    fn delete_card(&self, id: &Uuid) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", [id.to_string()])?;
        Ok(deleted > 0)
    }

    fn card_ids(&self) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare("SELECT id FROM cards")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        raw.iter()
            .map(|s| {
                Uuid::parse_str(s)
                    .map_err(|e| DearlyError::Store(format!("Invalid card id {}: {}", s, e)))
            })
            .collect()
    }
}
