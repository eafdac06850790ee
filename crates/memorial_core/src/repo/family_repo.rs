//! Family edge repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist directed relation edges between memorials.
//! - Load every edge touching one memorial in insertion order.
//!
//! # Invariants
//! - Both endpoints must exist when an edge is written.
//! - Self-edges are rejected on write.
//! - Re-adding an identical `(source, target, relation)` edge is a no-op.
//! - Stored labels are parsed leniently on read (unknown -> `Other`).

use crate::model::family::{FamilyEdge, RelationLabel};
use crate::repo::memorial_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Storage collaborator for family edges.
pub trait FamilyEdgeRepository {
    /// Stores one edge. Returns `false` when it already existed.
    fn add_edge(&self, edge: &FamilyEdge) -> RepoResult<bool>;
    /// Removes one edge. Returns `false` when nothing matched.
    fn remove_edge(&self, edge: &FamilyEdge) -> RepoResult<bool>;
    /// Edges where `memorial_id` is source or target, oldest first.
    fn list_edges_touching(&self, memorial_id: &str) -> RepoResult<Vec<FamilyEdge>>;
}

/// SQLite-backed family edge repository.
pub struct SqliteFamilyEdgeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFamilyEdgeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_memorial_exists(&self, id: &str) -> RepoResult<()> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM memorials WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        found.ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

impl FamilyEdgeRepository for SqliteFamilyEdgeRepository<'_> {
    fn add_edge(&self, edge: &FamilyEdge) -> RepoResult<bool> {
        if edge.is_self_loop() {
            return Err(RepoError::SelfRelation(edge.source_id.clone()));
        }
        self.ensure_memorial_exists(&edge.source_id)?;
        self.ensure_memorial_exists(&edge.target_id)?;

        let inserted = self.conn.execute(
            "INSERT INTO family_edges (source_id, target_id, relation)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (source_id, target_id, relation) DO NOTHING;",
            params![
                edge.source_id.as_str(),
                edge.target_id.as_str(),
                edge.relation.as_str(),
            ],
        )?;
        Ok(inserted > 0)
    }

    fn remove_edge(&self, edge: &FamilyEdge) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM family_edges
             WHERE source_id = ?1 AND target_id = ?2 AND relation = ?3;",
            params![
                edge.source_id.as_str(),
                edge.target_id.as_str(),
                edge.relation.as_str(),
            ],
        )?;
        Ok(removed > 0)
    }

    fn list_edges_touching(&self, memorial_id: &str) -> RepoResult<Vec<FamilyEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, target_id, relation
             FROM family_edges
             WHERE source_id = ?1 OR target_id = ?1
             ORDER BY edge_id ASC;",
        )?;
        let mut rows = stmt.query([memorial_id])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            let relation: String = row.get("relation")?;
            edges.push(FamilyEdge {
                source_id: row.get("source_id")?,
                target_id: row.get("target_id")?,
                relation: RelationLabel::parse_lenient(&relation),
            });
        }
        Ok(edges)
    }
}
