//! Memorial use-case service.
//!
//! # Responsibility
//! - Load records through the storage collaborators and hand them to the
//!   pure anniversary/family derivations.
//! - Provide create and family link entry points for callers.
//!
//! # Invariants
//! - `today` and the focal id are explicit parameters; no ambient state.
//! - Derivations never fail; only storage and validation errors surface.

use crate::model::family::{FamilyEdge, RelationLabel};
use crate::model::memorial::{MemorialId, MemorialRecord};
use crate::repo::family_repo::FamilyEdgeRepository;
use crate::repo::memorial_repo::{MemorialListQuery, MemorialRepository, RepoError};
use crate::service::anniversary::{
    compute_anniversaries, sort_anniversaries, AnniversarySort, AnniversaryView,
};
use crate::service::family::{resolve_family, FamilyView};
use chrono::NaiveDate;
use log::info;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for memorial use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Focal memorial does not exist.
    MemorialNotFound(MemorialId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemorialNotFound(id) => write!(f, "memorial not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MemorialNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::MemorialNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case facade over memorial and family edge storage.
pub struct MemorialService<M: MemorialRepository, F: FamilyEdgeRepository> {
    memorials: M,
    edges: F,
}

impl<M: MemorialRepository, F: FamilyEdgeRepository> MemorialService<M, F> {
    pub fn new(memorials: M, edges: F) -> Self {
        Self { memorials, edges }
    }

    /// Stores a new memorial and returns its id.
    pub fn create_memorial(&self, record: &MemorialRecord) -> ServiceResult<MemorialId> {
        let id = self.memorials.create_memorial(record)?;
        info!("event=memorial_create module=service status=ok memorial_id={id}");
        Ok(id)
    }

    /// Loads one memorial.
    pub fn get_memorial(&self, id: &str) -> ServiceResult<Option<MemorialRecord>> {
        Ok(self.memorials.get_memorial(id)?)
    }

    /// All memorials with a usable death date, ordered by `sort`.
    pub fn upcoming_anniversaries(
        &self,
        today: NaiveDate,
        sort: AnniversarySort,
    ) -> ServiceResult<Vec<AnniversaryView>> {
        let records = self.memorials.list_memorials(&MemorialListQuery::default())?;
        let views = compute_anniversaries(&records, today);
        Ok(sort_anniversaries(views, sort))
    }

    /// Anniversaries falling within `days` days of `today`, soonest first.
    pub fn anniversaries_within(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> ServiceResult<Vec<AnniversaryView>> {
        let mut views = self.upcoming_anniversaries(today, AnniversarySort::Closest)?;
        views.retain(|view| view.days_until <= i64::from(days));
        Ok(views)
    }

    /// Role-grouped family of `focal_id`.
    ///
    /// Returns `MemorialNotFound` when the focal memorial itself is missing;
    /// missing relatives are dropped from the view.
    pub fn family_of(&self, focal_id: &str) -> ServiceResult<FamilyView> {
        if self.memorials.get_memorial(focal_id)?.is_none() {
            return Err(ServiceError::MemorialNotFound(focal_id.to_string()));
        }

        let edges = self.edges.list_edges_touching(focal_id)?;
        let other_ids: Vec<MemorialId> = edges
            .iter()
            .flat_map(|edge| [&edge.source_id, &edge.target_id])
            .filter(|id| id.as_str() != focal_id)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let records_by_id: HashMap<MemorialId, MemorialRecord> = self
            .memorials
            .get_memorials(&other_ids)?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        Ok(resolve_family(focal_id, &edges, &records_by_id))
    }

    /// Records "`target_id` is `relation` of `source_id`".
    ///
    /// Returns `false` when the identical edge already existed.
    pub fn link_family(
        &self,
        source_id: &str,
        target_id: &str,
        relation: RelationLabel,
    ) -> ServiceResult<bool> {
        let edge = FamilyEdge::new(source_id, target_id, relation);
        let created = self.edges.add_edge(&edge)?;
        info!(
            "event=family_link module=service status=ok source_id={} target_id={} relation={} created={}",
            source_id,
            target_id,
            relation.as_str(),
            created
        );
        Ok(created)
    }

    /// Removes one stored edge. Returns `false` when nothing matched.
    pub fn unlink_family(
        &self,
        source_id: &str,
        target_id: &str,
        relation: RelationLabel,
    ) -> ServiceResult<bool> {
        let edge = FamilyEdge::new(source_id, target_id, relation);
        Ok(self.edges.remove_edge(&edge)?)
    }
}
