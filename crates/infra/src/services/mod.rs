//! Application services (stateless orchestration over the stores).
//!
//! ```text
//! create/update/list/delete draft ──► DraftService ──► ContractorStore, TaskStore (reference checks)
//!                                                  └─► InvoiceLedger (draft repository)
//! submit(draft_id) ──► SubmissionService ──► InvoiceLedger::transaction
//!                                               1. load draft
//!                                               2. reject if the task is already invoiced
//!                                               3. insert frozen invoice
//!                                               4. delete draft
//! ```
//!
//! Services perform no local recovery: every store error is returned unchanged.

pub mod drafts;
pub mod submission;

pub use drafts::{CreateDraft, DraftService, UpdateDraft};
pub use submission::SubmissionService;

use std::sync::Arc;

use lingoledger_contractors::Contractor;
use lingoledger_core::{ContractorId, DomainError, DomainResult, TaskId};
use lingoledger_tasks::Task;

use crate::store::{ContractorStore, TaskStore};

pub(crate) fn resolve_contractor<C: ContractorStore>(
    contractors: &C,
    id: ContractorId,
) -> DomainResult<Arc<Contractor>> {
    contractors
        .find_by_id(id)?
        .ok_or_else(|| DomainError::reference_not_found("contractor", id))
}

pub(crate) fn resolve_task<T: TaskStore>(tasks: &T, id: TaskId) -> DomainResult<Arc<Task>> {
    tasks
        .get(id)?
        .ok_or_else(|| DomainError::reference_not_found("task", id))
}
