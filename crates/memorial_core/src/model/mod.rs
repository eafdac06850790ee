//! Memorial domain model.
//!
//! # Responsibility
//! - Define the records fetched from storage (memorials, family edges).
//! - Keep parsing of stored text lenient so derivations can degrade by
//!   omission instead of failing a whole batch.

pub mod family;
pub mod memorial;
