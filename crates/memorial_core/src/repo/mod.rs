//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage collaborator contracts the services depend on.
//! - Isolate SQLite query details from derivation logic.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod family_repo;
pub mod memorial_repo;
