//! Contractors domain module.
//!
//! Contractors are the interpreters/translators who perform tasks and bill
//! for them. This crate holds the entity only (no IO, no storage).

pub mod contractor;

pub use contractor::Contractor;
