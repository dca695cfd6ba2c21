use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lingoledger_core::{ContractorId, DomainError, DomainResult, Entity, InvoiceId, TaskId};
use lingoledger_invoicing::{DraftRevision, Invoice};

use super::{resolve_contractor, resolve_task};
use crate::store::{ContractorStore, DraftRepository, InvoiceLedger, TaskStore};

/// Command: CreateDraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDraft {
    pub contractor_id: ContractorId,
    pub task_id: TaskId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub signature: String,
}

/// Command: UpdateDraft (partial; `None` keeps the current value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDraft {
    pub contractor_id: Option<ContractorId>,
    pub task_id: Option<TaskId>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub signature: Option<String>,
}

/// Create, revise, list and discard draft invoices.
///
/// Every contractor/task id is resolved against its store at call time; the
/// draft itself lives in the ledger's draft repository.
pub struct DraftService<C, T, L> {
    contractors: C,
    tasks: T,
    ledger: L,
}

impl<C, T, L> DraftService<C, T, L>
where
    C: ContractorStore,
    T: TaskStore,
    L: InvoiceLedger,
{
    pub fn new(contractors: C, tasks: T, ledger: L) -> Self {
        Self {
            contractors,
            tasks,
            ledger,
        }
    }

    /// Validate references and invariants, then persist a new draft.
    pub fn create_draft(&self, cmd: CreateDraft) -> DomainResult<InvoiceId> {
        let contractor = resolve_contractor(&self.contractors, cmd.contractor_id)?;
        let task = resolve_task(&self.tasks, cmd.task_id)?;

        let draft = Invoice::draft(
            contractor,
            task,
            cmd.start_time,
            cmd.end_time,
            cmd.signature,
            Utc::now(),
        )?;
        let draft_id = self.ledger.drafts().save(draft)?;

        tracing::info!(
            draft_id = %draft_id,
            contractor_id = %cmd.contractor_id,
            task_id = %cmd.task_id,
            "draft created"
        );
        Ok(draft_id)
    }

    /// Apply the provided fields to a draft and persist it.
    ///
    /// References are only re-resolved when the supplied id differs from the
    /// current one. A rejected update leaves the stored draft untouched.
    pub fn update_draft(&self, draft_id: InvoiceId, cmd: UpdateDraft) -> DomainResult<Invoice> {
        let updated = self.ledger.transaction(|tx| {
            let mut draft = tx
                .draft(draft_id)
                .ok_or(DomainError::DraftNotFound(draft_id))?;

            let mut revision = DraftRevision {
                start_time: cmd.start_time,
                end_time: cmd.end_time,
                signature: cmd.signature,
                ..DraftRevision::default()
            };
            if let Some(contractor_id) = cmd.contractor_id {
                if draft.contractor().id() != Some(contractor_id) {
                    revision.contractor = Some(resolve_contractor(&self.contractors, contractor_id)?);
                }
            }
            if let Some(task_id) = cmd.task_id {
                if draft.task().id() != Some(task_id) {
                    revision.task = Some(resolve_task(&self.tasks, task_id)?);
                }
            }

            draft.revise(revision, Utc::now())?;
            tx.save_draft(draft.clone())?;
            Ok(draft)
        })?;

        tracing::info!(draft_id = %draft_id, "draft updated");
        Ok(updated)
    }

    /// All drafts of an existing contractor.
    pub fn list_drafts(&self, contractor_id: ContractorId) -> DomainResult<Vec<Invoice>> {
        let contractor = resolve_contractor(&self.contractors, contractor_id)?;
        self.ledger.drafts().list_by_contractor(&contractor)
    }

    pub fn get_draft(&self, draft_id: InvoiceId) -> DomainResult<Invoice> {
        self.ledger
            .drafts()
            .get(draft_id)?
            .ok_or(DomainError::DraftNotFound(draft_id))
    }

    /// Discard a draft; fails with `NotFound` when it does not exist.
    pub fn delete_draft(&self, draft_id: InvoiceId) -> DomainResult<()> {
        self.ledger.transaction(|tx| tx.delete_draft(draft_id))?;
        tracing::info!(draft_id = %draft_id, "draft deleted");
        Ok(())
    }
}
