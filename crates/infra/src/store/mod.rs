//! Entity stores and invoice repositories.
//!
//! Each store is a single shared resource: writers are serialized behind a
//! write lock so sequence-based id assignment stays race-free, readers share a
//! read lock and never observe a half-applied write. The draft and invoice
//! repositories share one lock (see [`ledger`]) so submission can span both.

pub mod contractors;
pub mod drafts;
pub mod invoices;
pub mod ledger;
pub mod table;
pub mod tasks;

pub use contractors::{ContractorStore, InMemoryContractorStore};
pub use drafts::{DraftRepository, InMemoryDraftRepository};
pub use invoices::{InMemoryInvoiceRepository, InvoiceRepository};
pub use ledger::{InMemoryLedger, InvoiceLedger, LedgerTx};
pub use table::Table;
pub use tasks::{InMemoryTaskStore, TaskStore};
