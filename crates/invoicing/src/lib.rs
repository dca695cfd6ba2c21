//! Invoicing domain module.
//!
//! This crate contains the billing record contractors fill in for a task,
//! in its two states: a re-editable draft and a frozen submitted invoice.
//! Pure deterministic domain logic (no IO, no locking, no storage).

pub mod invoice;

pub use invoice::{DraftRevision, Invoice, InvoiceState, InvoiceStatus};
