//! Family relation resolution around one focal memorial.
//!
//! # Responsibility
//! - Turn directed relation edges into roles relative to a focal memorial.
//! - Deduplicate by the other party and group by role for display.
//!
//! # Invariants
//! - Outgoing edges keep their label; incoming edges use the inverse label.
//! - Outgoing edges are processed before incoming ones, each in input order.
//!   When one party is reached more than once the last processed role wins,
//!   while the entry keeps the position of its first appearance.
//! - References to unknown memorials are dropped, never reported as errors.

use crate::model::family::{FamilyEdge, RelationLabel};
use crate::model::memorial::{MemorialId, MemorialRecord};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// One related memorial and its role relative to the focal memorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyEntry {
    pub record: MemorialRecord,
    pub role: RelationLabel,
}

/// Role-grouped family of one memorial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyView {
    pub parent: Vec<FamilyEntry>,
    pub spouse: Vec<FamilyEntry>,
    pub sibling: Vec<FamilyEntry>,
    pub child: Vec<FamilyEntry>,
    pub other: Vec<FamilyEntry>,
}

impl FamilyView {
    /// True when no group has members; callers hide the family section.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member count across all groups.
    pub fn len(&self) -> usize {
        self.parent.len()
            + self.spouse.len()
            + self.sibling.len()
            + self.child.len()
            + self.other.len()
    }

    /// Members holding `role`.
    pub fn group(&self, role: RelationLabel) -> &[FamilyEntry] {
        match role {
            RelationLabel::Parent => &self.parent,
            RelationLabel::Spouse => &self.spouse,
            RelationLabel::Sibling => &self.sibling,
            RelationLabel::Child => &self.child,
            RelationLabel::Other => &self.other,
        }
    }

    /// Non-empty groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = (RelationLabel, &[FamilyEntry])> + '_ {
        RelationLabel::DISPLAY_ORDER
            .into_iter()
            .map(|role| (role, self.group(role)))
            .filter(|(_, entries)| !entries.is_empty())
    }

    fn push(&mut self, entry: FamilyEntry) {
        match entry.role {
            RelationLabel::Parent => self.parent.push(entry),
            RelationLabel::Spouse => self.spouse.push(entry),
            RelationLabel::Sibling => self.sibling.push(entry),
            RelationLabel::Child => self.child.push(entry),
            RelationLabel::Other => self.other.push(entry),
        }
    }
}

/// Resolves the family of `focal_id` from `edges`.
///
/// Edges not touching `focal_id` are ignored, so callers may pass a wider
/// edge list than strictly needed.
pub fn resolve_family(
    focal_id: &str,
    edges: &[FamilyEdge],
    records_by_id: &HashMap<MemorialId, MemorialRecord>,
) -> FamilyView {
    let mut view = FamilyView::default();
    if focal_id.is_empty() || edges.is_empty() || records_by_id.is_empty() {
        return view;
    }

    let outgoing = edges
        .iter()
        .filter(|edge| edge.source_id == focal_id && !edge.is_self_loop())
        .map(|edge| (edge.target_id.as_str(), edge.relation));
    let incoming = edges
        .iter()
        .filter(|edge| edge.target_id == focal_id && !edge.is_self_loop())
        .map(|edge| (edge.source_id.as_str(), edge.relation.inverse()));

    let mut merged: Vec<(&str, RelationLabel)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for (other_id, role) in outgoing.chain(incoming) {
        match slots.get(other_id) {
            Some(&slot) => merged[slot].1 = role,
            None => {
                slots.insert(other_id, merged.len());
                merged.push((other_id, role));
            }
        }
    }

    let mut dangling = 0usize;
    for (other_id, role) in merged {
        let Some(record) = records_by_id.get(other_id) else {
            dangling += 1;
            continue;
        };
        view.push(FamilyEntry {
            record: record.clone(),
            role,
        });
    }

    debug!(
        "event=family_resolve module=family status=ok focal_id={} members={} dangling={}",
        focal_id,
        view.len(),
        dangling
    );
    view
}
