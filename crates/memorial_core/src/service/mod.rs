//! Core derivations and use-case services.
//!
//! # Responsibility
//! - `anniversary` and `family` are pure, synchronous derivations over
//!   records already in memory.
//! - `memorial_service` wires them to the storage collaborators.

pub mod anniversary;
pub mod family;
pub mod memorial_service;
