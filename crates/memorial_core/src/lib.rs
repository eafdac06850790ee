//! Core domain logic for the memorial publishing platform.
//! Anniversary scheduling and family relation resolution live here; the
//! storage backend is reached only through repository traits.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::family::{FamilyEdge, RelationLabel, UnknownRelationLabel};
pub use model::memorial::{
    parse_memorial_date, MemorialId, MemorialRecord, MemorialValidationError,
};
pub use repo::family_repo::{FamilyEdgeRepository, SqliteFamilyEdgeRepository};
pub use repo::memorial_repo::{
    MemorialListQuery, MemorialRepository, RepoError, RepoResult, SqliteMemorialRepository,
};
pub use service::anniversary::{
    compute_anniversaries, next_anniversary, sort_anniversaries, AnniversarySort,
    AnniversaryView, UnknownSortMode,
};
pub use service::family::{resolve_family, FamilyEntry, FamilyView};
pub use service::memorial_service::{MemorialService, ServiceError, ServiceResult};

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
