//! Infrastructure layer: stores, the cross-store ledger, application services
//! and seed loading.

pub mod seed;
pub mod services;
pub mod store;

pub use seed::{SeedData, SeedError, SeedReport};
pub use services::{CreateDraft, DraftService, SubmissionService, UpdateDraft};
pub use store::{
    ContractorStore, DraftRepository, InMemoryContractorStore, InMemoryLedger,
    InMemoryTaskStore, InvoiceLedger, InvoiceRepository, LedgerTx, TaskStore,
};
