use chrono::Utc;

use lingoledger_core::{DomainError, DomainResult, Entity, InvoiceId};

use crate::store::InvoiceLedger;

/// Promotes drafts into submitted invoices.
///
/// Per draft: `DRAFT -> SUBMITTED` (terminal), or rejected and still `DRAFT`.
/// At most one submitted invoice may exist per task.
pub struct SubmissionService<L> {
    ledger: L,
}

impl<L> SubmissionService<L>
where
    L: InvoiceLedger,
{
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Submit a draft and return the new invoice id.
    ///
    /// The duplicate check, the insert and the draft deletion run in one ledger
    /// transaction; on any failure no invoice is inserted and the draft stays.
    pub fn submit(&self, draft_id: InvoiceId) -> DomainResult<InvoiceId> {
        let result = self.ledger.transaction(|tx| {
            let draft = tx
                .draft(draft_id)
                .ok_or(DomainError::DraftNotFound(draft_id))?;

            if let Some(existing) = tx.invoice_for_task(draft.task()) {
                if let Some(existing_id) = existing.id() {
                    return Err(DomainError::DuplicateInvoice(existing_id));
                }
            }

            let invoice = draft.into_submitted(Utc::now())?;
            let invoice_id = tx.save_invoice(invoice)?;
            tx.delete_draft(draft_id)?;
            Ok(invoice_id)
        });

        match &result {
            Ok(invoice_id) => {
                tracing::info!(draft_id = %draft_id, invoice_id = %invoice_id, "invoice submitted")
            }
            Err(err) => tracing::warn!(draft_id = %draft_id, error = %err, "submission rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone};
    use lingoledger_contractors::Contractor;
    use lingoledger_core::{ContractorId, TaskId};
    use lingoledger_invoicing::{Invoice, InvoiceStatus};
    use lingoledger_tasks::Task;

    use crate::store::{DraftRepository, InMemoryLedger, InvoiceRepository};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn task(id: u64) -> Arc<Task> {
        Arc::new(Task::new("Office", "English", "Spanish", at(9)).with_id(TaskId::new(id)))
    }

    fn draft(task: Arc<Task>, signature: &str) -> Invoice {
        let contractor = Arc::new(Contractor::with_id(ContractorId::new(0), "Alice"));
        Invoice::draft(contractor, task, at(8), at(9), signature, at(10)).unwrap()
    }

    #[test]
    fn submit_moves_draft_into_invoice_store() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = SubmissionService::new(ledger.clone());
        let t = task(0);
        let draft_id = ledger.drafts().save(draft(t.clone(), "sig")).unwrap();

        let invoice_id = service.submit(draft_id).unwrap();
        assert_eq!(invoice_id, InvoiceId::new(0));

        assert_eq!(ledger.drafts().get(draft_id).unwrap(), None);
        let invoice = ledger.invoices().get_by_task(&t).unwrap().unwrap();
        assert_eq!(invoice.id(), Some(invoice_id));
        assert_eq!(invoice.status(), InvoiceStatus::Submitted);
        assert_eq!(invoice.signature(), "sig");
    }

    #[test]
    fn missing_draft_is_draft_not_found() {
        let service = SubmissionService::new(InMemoryLedger::new());
        assert_eq!(
            service.submit(InvoiceId::new(4)).unwrap_err(),
            DomainError::DraftNotFound(InvoiceId::new(4))
        );
    }

    #[test]
    fn second_draft_for_same_task_is_rejected_and_kept() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = SubmissionService::new(ledger.clone());
        let t = task(0);
        let first = ledger.drafts().save(draft(t.clone(), "first")).unwrap();
        let second = ledger.drafts().save(draft(t.clone(), "second")).unwrap();

        let invoice_id = service.submit(first).unwrap();
        let err = service.submit(second).unwrap_err();
        assert_eq!(err, DomainError::DuplicateInvoice(invoice_id));

        let kept = ledger.drafts().get(second).unwrap().unwrap();
        assert_eq!(kept.signature(), "second");
        assert_eq!(ledger.invoices().list().unwrap().len(), 1);
    }

    #[test]
    fn drafts_for_distinct_tasks_both_submit() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = SubmissionService::new(ledger.clone());
        let a = ledger.drafts().save(draft(task(0), "a")).unwrap();
        let b = ledger.drafts().save(draft(task(1), "b")).unwrap();

        assert_eq!(service.submit(a).unwrap(), InvoiceId::new(0));
        assert_eq!(service.submit(b).unwrap(), InvoiceId::new(1));
        assert_eq!(service.submit(a).unwrap_err(), DomainError::DraftNotFound(a));
    }
}
