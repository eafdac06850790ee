//! Memorial repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `memorials` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `MemorialRecord::validate()` before SQL mutations.
//! - Read paths return stored date text as-is; unusable dates are left for
//!   derivations to omit.
//! - Listing order is deterministic: `deceased_name ASC, id ASC`.

use crate::db::DbError;
use crate::model::memorial::{MemorialId, MemorialRecord, MemorialValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MEMORIAL_SELECT_SQL: &str = "SELECT
    id,
    deceased_name,
    death_date,
    birth_date,
    image_url
FROM memorials";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by memorial and family edge persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemorialValidationError),
    Db(DbError),
    /// Referenced memorial does not exist.
    NotFound(MemorialId),
    /// Create collided with an existing id.
    AlreadyExists(MemorialId),
    /// A family edge would link a memorial to itself.
    SelfRelation(MemorialId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memorial not found: {id}"),
            Self::AlreadyExists(id) => write!(f, "memorial already exists: {id}"),
            Self::SelfRelation(id) => write!(f, "memorial cannot be related to itself: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memorial data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemorialValidationError> for RepoError {
    fn from(value: MemorialValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing memorials.
#[derive(Debug, Clone, Default)]
pub struct MemorialListQuery {
    /// Case-insensitive substring match on `deceased_name`.
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Storage collaborator for memorial records.
pub trait MemorialRepository {
    fn create_memorial(&self, record: &MemorialRecord) -> RepoResult<MemorialId>;
    fn update_memorial(&self, record: &MemorialRecord) -> RepoResult<()>;
    fn get_memorial(&self, id: &str) -> RepoResult<Option<MemorialRecord>>;
    fn list_memorials(&self, query: &MemorialListQuery) -> RepoResult<Vec<MemorialRecord>>;
    /// Loads the subset of `ids` that exist; unknown ids are skipped.
    fn get_memorials(&self, ids: &[MemorialId]) -> RepoResult<Vec<MemorialRecord>>;
    /// Hard delete. Family edges touching the memorial are removed too.
    fn delete_memorial(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed memorial repository.
pub struct SqliteMemorialRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemorialRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemorialRepository for SqliteMemorialRepository<'_> {
    fn create_memorial(&self, record: &MemorialRecord) -> RepoResult<MemorialId> {
        record.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO memorials (
                id,
                deceased_name,
                death_date,
                birth_date,
                image_url
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO NOTHING;",
            params![
                record.id.as_str(),
                record.deceased_name.as_str(),
                record.death_date.as_deref(),
                record.birth_date.as_deref(),
                record.image_url.as_deref(),
            ],
        )?;

        if inserted == 0 {
            return Err(RepoError::AlreadyExists(record.id.clone()));
        }
        Ok(record.id.clone())
    }

    fn update_memorial(&self, record: &MemorialRecord) -> RepoResult<()> {
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE memorials
             SET
                deceased_name = ?1,
                death_date = ?2,
                birth_date = ?3,
                image_url = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                record.deceased_name.as_str(),
                record.death_date.as_deref(),
                record.birth_date.as_deref(),
                record.image_url.as_deref(),
                record.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id.clone()));
        }
        Ok(())
    }

    fn get_memorial(&self, id: &str) -> RepoResult<Option<MemorialRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMORIAL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memorial_row(row)?));
        }
        Ok(None)
    }

    fn list_memorials(&self, query: &MemorialListQuery) -> RepoResult<Vec<MemorialRecord>> {
        let mut sql = format!("{MEMORIAL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(needle) = query
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            sql.push_str(" AND instr(lower(deceased_name), lower(?)) > 0");
            bind_values.push(Value::Text(needle.to_string()));
        }

        sql.push_str(" ORDER BY deceased_name ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_memorial_row(row)?);
        }
        Ok(records)
    }

    fn get_memorials(&self, ids: &[MemorialId]) -> RepoResult<Vec<MemorialRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORIAL_SELECT_SQL} WHERE id IN ({placeholders}) ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(ids.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_memorial_row(row)?);
        }
        Ok(records)
    }

    fn delete_memorial(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memorials WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_memorial_row(row: &Row<'_>) -> RepoResult<MemorialRecord> {
    let id: String = row.get("id")?;
    if id.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "empty id in memorials.id".to_string(),
        ));
    }

    Ok(MemorialRecord {
        id,
        deceased_name: row.get("deceased_name")?,
        death_date: row.get("death_date")?,
        birth_date: row.get("birth_date")?,
        image_url: row.get("image_url")?,
    })
}
