//! `lingoledger-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! sequence-assigned identifiers, the entity trait and the error taxonomy used by
//! every store and service.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ContractorId, InvoiceId, SequenceId, TaskId};
