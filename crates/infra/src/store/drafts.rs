use std::sync::Arc;

use lingoledger_contractors::Contractor;
use lingoledger_core::{DomainResult, InvoiceId};
use lingoledger_invoicing::Invoice;

use super::ledger::{self, SharedTables};

/// Store of in-progress drafts. The only mutable store in the system.
pub trait DraftRepository: Send + Sync {
    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>>;
    /// Insert when the draft has no id, otherwise overwrite the row at its id.
    fn save(&self, draft: Invoice) -> DomainResult<InvoiceId>;
    /// Drafts whose contractor id equals the given contractor's id.
    fn list_by_contractor(&self, contractor: &Contractor) -> DomainResult<Vec<Invoice>>;
    /// Fails with `NotFound` when no draft exists at `id`.
    fn delete(&self, id: InvoiceId) -> DomainResult<()>;
}

impl<S> DraftRepository for Arc<S>
where
    S: DraftRepository + ?Sized,
{
    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        (**self).get(id)
    }

    fn save(&self, draft: Invoice) -> DomainResult<InvoiceId> {
        (**self).save(draft)
    }

    fn list_by_contractor(&self, contractor: &Contractor) -> DomainResult<Vec<Invoice>> {
        (**self).list_by_contractor(contractor)
    }

    fn delete(&self, id: InvoiceId) -> DomainResult<()> {
        (**self).delete(id)
    }
}

/// Draft view over the in-memory ledger tables.
#[derive(Debug, Clone)]
pub struct InMemoryDraftRepository {
    tables: SharedTables,
}

impl InMemoryDraftRepository {
    pub(crate) fn shared(tables: SharedTables) -> Self {
        Self { tables }
    }
}

impl DraftRepository for InMemoryDraftRepository {
    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        Ok(ledger::read(&self.tables)?.draft(id))
    }

    fn save(&self, draft: Invoice) -> DomainResult<InvoiceId> {
        let (id, previous) = ledger::write(&self.tables)?.save_draft(draft)?;
        tracing::debug!(draft_id = %id, replaced = previous.is_some(), "draft saved");
        Ok(id)
    }

    fn list_by_contractor(&self, contractor: &Contractor) -> DomainResult<Vec<Invoice>> {
        Ok(ledger::read(&self.tables)?.drafts_for(contractor))
    }

    fn delete(&self, id: InvoiceId) -> DomainResult<()> {
        ledger::write(&self.tables)?.delete_draft(id)?;
        tracing::debug!(draft_id = %id, "draft deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryLedger, InvoiceLedger};
    use chrono::{DateTime, TimeZone, Utc};
    use lingoledger_core::{ContractorId, DomainError, Entity, TaskId};
    use lingoledger_invoicing::DraftRevision;
    use lingoledger_tasks::Task;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn contractor(id: u64, name: &str) -> Arc<Contractor> {
        Arc::new(Contractor::with_id(ContractorId::new(id), name))
    }

    fn draft_for(contractor: Arc<Contractor>) -> Invoice {
        let task = Arc::new(Task::new("Office", "English", "Spanish", at(9)).with_id(TaskId::new(0)));
        Invoice::draft(contractor, task, at(8), at(9), "sig", at(12)).unwrap()
    }

    #[test]
    fn save_assigns_sequence_then_updates_in_place() {
        let ledger = InMemoryLedger::new();
        let drafts = ledger.drafts();
        let alice = contractor(0, "Alice");

        let first = drafts.save(draft_for(alice.clone())).unwrap();
        let second = drafts.save(draft_for(alice.clone())).unwrap();
        assert_eq!((first, second), (InvoiceId::new(0), InvoiceId::new(1)));

        let mut edited = drafts.get(first).unwrap().unwrap();
        edited
            .revise(
                DraftRevision {
                    signature: Some("edited".to_string()),
                    ..DraftRevision::default()
                },
                at(13),
            )
            .unwrap();
        assert_eq!(drafts.save(edited).unwrap(), first);

        let stored = drafts.get(first).unwrap().unwrap();
        assert_eq!(stored.signature(), "edited");
        assert_eq!(drafts.list_by_contractor(&alice).unwrap().len(), 2);
    }

    #[test]
    fn list_filters_by_contractor_id() {
        let ledger = InMemoryLedger::new();
        let drafts = ledger.drafts();
        let alice = contractor(0, "Alice");
        let bob = contractor(1, "Bob");

        drafts.save(draft_for(alice.clone())).unwrap();
        drafts.save(draft_for(bob.clone())).unwrap();
        drafts.save(draft_for(alice.clone())).unwrap();

        let listed = drafts.list_by_contractor(&alice).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|d| d.contractor().id() == alice.id()));
        assert!(
            drafts
                .list_by_contractor(&contractor(9, "Nobody"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn save_after_max_id_fails_and_keeps_existing_draft() {
        let ledger = InMemoryLedger::new();
        let drafts = ledger.drafts();
        let alice = contractor(0, "Alice");

        let mut last = draft_for(alice.clone());
        last.assign_id(InvoiceId::new(u64::MAX));
        assert_eq!(drafts.save(last).unwrap(), InvoiceId::new(u64::MAX));

        let err = drafts.save(draft_for(alice.clone())).unwrap_err();
        assert_eq!(err, DomainError::storage("id sequence exhausted"));
        assert_eq!(drafts.list_by_contractor(&alice).unwrap().len(), 1);
        assert!(drafts.get(InvoiceId::new(u64::MAX)).unwrap().is_some());
    }

    #[test]
    fn delete_missing_draft_is_not_found() {
        let ledger = InMemoryLedger::new();
        let err = ledger.drafts().delete(InvoiceId::new(3)).unwrap_err();
        assert_eq!(err, DomainError::not_found("draft", 3u64));
    }

    #[test]
    fn delete_does_not_free_the_id() {
        let ledger = InMemoryLedger::new();
        let drafts = ledger.drafts();
        let alice = contractor(0, "Alice");

        let a = drafts.save(draft_for(alice.clone())).unwrap();
        let b = drafts.save(draft_for(alice.clone())).unwrap();
        drafts.delete(a).unwrap();

        let c = drafts.save(draft_for(alice.clone())).unwrap();
        assert_eq!(c, InvoiceId::new(2));
        assert_eq!(drafts.get(a).unwrap(), None);
        assert!(drafts.get(b).unwrap().is_some());
    }

    #[test]
    fn submitted_invoices_are_not_accepted_as_drafts() {
        let ledger = InMemoryLedger::new();
        let submitted = draft_for(contractor(0, "Alice"))
            .into_submitted(at(14))
            .unwrap();
        let err = ledger.drafts().save(submitted).unwrap_err();
        assert_eq!(err, DomainError::SubmittedInvoiceImmutable);
    }
}
