//! Draft + submitted invoice tables behind one lock.
//!
//! Submission reads the draft store, checks the invoice store, inserts an
//! invoice and deletes the draft. Those steps must look atomic to every other
//! caller, so both repositories are views over a single [`LedgerTables`] and
//! multi-step work runs inside [`InvoiceLedger::transaction`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lingoledger_contractors::Contractor;
use lingoledger_core::{DomainError, DomainResult, Entity, InvoiceId};
use lingoledger_invoicing::Invoice;
use lingoledger_tasks::Task;

use super::drafts::{DraftRepository, InMemoryDraftRepository};
use super::invoices::{InMemoryInvoiceRepository, InvoiceRepository};
use super::table::Table;

/// Operations available inside a ledger transaction.
pub trait LedgerTx {
    fn draft(&self, id: InvoiceId) -> Option<Invoice>;
    /// Insert (no id) or overwrite (id) a draft.
    fn save_draft(&mut self, draft: Invoice) -> DomainResult<InvoiceId>;
    fn delete_draft(&mut self, id: InvoiceId) -> DomainResult<()>;
    fn invoice_for_task(&self, task: &Task) -> Option<Invoice>;
    /// Insert a fresh submitted invoice.
    fn save_invoice(&mut self, invoice: Invoice) -> DomainResult<InvoiceId>;
}

/// Owner of the draft and submitted-invoice repositories.
pub trait InvoiceLedger: Send + Sync {
    type Drafts: DraftRepository;
    type Invoices: InvoiceRepository;

    fn drafts(&self) -> &Self::Drafts;

    fn invoices(&self) -> &Self::Invoices;

    /// Run `f` with exclusive access to both repositories.
    ///
    /// If `f` returns an error every effect it made is undone, including id
    /// sequence advances.
    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut dyn LedgerTx) -> DomainResult<T>;
}

impl<S> InvoiceLedger for Arc<S>
where
    S: InvoiceLedger,
{
    type Drafts = S::Drafts;
    type Invoices = S::Invoices;

    fn drafts(&self) -> &Self::Drafts {
        (**self).drafts()
    }

    fn invoices(&self) -> &Self::Invoices {
        (**self).invoices()
    }

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut dyn LedgerTx) -> DomainResult<T>,
    {
        (**self).transaction(f)
    }
}

/// Raw storage shared by the in-memory draft and invoice repositories.
#[derive(Debug, Default)]
pub struct LedgerTables {
    drafts: Table<InvoiceId, Invoice>,
    invoices: Table<InvoiceId, Invoice>,
}

pub(crate) type SharedTables = Arc<RwLock<LedgerTables>>;

pub(crate) fn read(tables: &SharedTables) -> DomainResult<RwLockReadGuard<'_, LedgerTables>> {
    tables.read().map_err(|_| DomainError::poisoned())
}

pub(crate) fn write(tables: &SharedTables) -> DomainResult<RwLockWriteGuard<'_, LedgerTables>> {
    tables.write().map_err(|_| DomainError::poisoned())
}

impl LedgerTables {
    pub(crate) fn draft(&self, id: InvoiceId) -> Option<Invoice> {
        self.drafts.get(&id).cloned()
    }

    /// Returns the assigned id and the row it replaced, if any.
    pub(crate) fn save_draft(
        &mut self,
        mut draft: Invoice,
    ) -> DomainResult<(InvoiceId, Option<Invoice>)> {
        if !draft.is_draft() {
            return Err(DomainError::SubmittedInvoiceImmutable);
        }
        draft.validate()?;

        let id = self.drafts.allocate(draft.id())?;
        draft.assign_id(id);
        let previous = self.drafts.put(id, draft);
        Ok((id, previous))
    }

    pub(crate) fn delete_draft(&mut self, id: InvoiceId) -> DomainResult<Invoice> {
        self.drafts
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("draft", id))
    }

    pub(crate) fn drafts_for(&self, contractor: &Contractor) -> Vec<Invoice> {
        self.drafts
            .values()
            .filter(|d| d.belongs_to(contractor))
            .cloned()
            .collect()
    }

    pub(crate) fn invoice(&self, id: InvoiceId) -> Option<Invoice> {
        self.invoices.get(&id).cloned()
    }

    pub(crate) fn invoice_for_task(&self, task: &Task) -> Option<Invoice> {
        self.invoices
            .values()
            .find(|i| i.references_task(task))
            .cloned()
    }

    pub(crate) fn all_invoices(&self) -> Vec<Invoice> {
        self.invoices.values().cloned().collect()
    }

    pub(crate) fn save_invoice(&mut self, mut invoice: Invoice) -> DomainResult<InvoiceId> {
        if let Some(id) = invoice.id() {
            return Err(DomainError::UnexpectedId(id));
        }
        if invoice.is_draft() {
            return Err(DomainError::invalid_invoice(
                "drafts must be submitted before they are stored as invoices",
            ));
        }
        invoice.validate()?;
        if let Some(existing) = self.invoice_for_task(invoice.task()) {
            if let Some(existing_id) = existing.id() {
                return Err(DomainError::DuplicateInvoice(existing_id));
            }
        }

        let id = self.invoices.allocate(None)?;
        invoice.assign_id(id);
        self.invoices.put(id, invoice);
        Ok(id)
    }
}

enum Undo {
    Draft {
        id: InvoiceId,
        previous: Option<Invoice>,
    },
    Invoice(InvoiceId),
}

/// Transaction over locked tables with an undo journal.
struct InMemoryTx<'a> {
    tables: &'a mut LedgerTables,
    draft_sequence: Option<u64>,
    invoice_sequence: Option<u64>,
    undo: Vec<Undo>,
}

impl<'a> InMemoryTx<'a> {
    fn begin(tables: &'a mut LedgerTables) -> Self {
        let draft_sequence = tables.drafts.sequence();
        let invoice_sequence = tables.invoices.sequence();
        Self {
            tables,
            draft_sequence,
            invoice_sequence,
            undo: Vec::new(),
        }
    }

    fn rollback(self) {
        let InMemoryTx {
            tables,
            draft_sequence,
            invoice_sequence,
            undo,
        } = self;

        for step in undo.into_iter().rev() {
            match step {
                Undo::Draft {
                    id,
                    previous: Some(previous),
                } => {
                    tables.drafts.put(id, previous);
                }
                Undo::Draft { id, previous: None } => {
                    tables.drafts.remove(&id);
                }
                Undo::Invoice(id) => {
                    tables.invoices.remove(&id);
                }
            }
        }
        tables.drafts.rewind(draft_sequence);
        tables.invoices.rewind(invoice_sequence);
    }
}

impl LedgerTx for InMemoryTx<'_> {
    fn draft(&self, id: InvoiceId) -> Option<Invoice> {
        self.tables.draft(id)
    }

    fn save_draft(&mut self, draft: Invoice) -> DomainResult<InvoiceId> {
        let (id, previous) = self.tables.save_draft(draft)?;
        self.undo.push(Undo::Draft { id, previous });
        Ok(id)
    }

    fn delete_draft(&mut self, id: InvoiceId) -> DomainResult<()> {
        let removed = self.tables.delete_draft(id)?;
        self.undo.push(Undo::Draft {
            id,
            previous: Some(removed),
        });
        Ok(())
    }

    fn invoice_for_task(&self, task: &Task) -> Option<Invoice> {
        self.tables.invoice_for_task(task)
    }

    fn save_invoice(&mut self, invoice: Invoice) -> DomainResult<InvoiceId> {
        let id = self.tables.save_invoice(invoice)?;
        self.undo.push(Undo::Invoice(id));
        Ok(id)
    }
}

/// In-memory ledger: both repositories share one `RwLock`.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    tables: SharedTables,
    drafts: InMemoryDraftRepository,
    invoices: InMemoryInvoiceRepository,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        let tables: SharedTables = Arc::new(RwLock::new(LedgerTables::default()));
        Self {
            drafts: InMemoryDraftRepository::shared(tables.clone()),
            invoices: InMemoryInvoiceRepository::shared(tables.clone()),
            tables,
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceLedger for InMemoryLedger {
    type Drafts = InMemoryDraftRepository;
    type Invoices = InMemoryInvoiceRepository;

    fn drafts(&self) -> &Self::Drafts {
        &self.drafts
    }

    fn invoices(&self) -> &Self::Invoices {
        &self.invoices
    }

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut dyn LedgerTx) -> DomainResult<T>,
    {
        let mut tables = write(&self.tables)?;
        let mut tx = InMemoryTx::begin(&mut tables);
        match f(&mut tx) {
            Ok(value) => Ok(value),
            Err(err) => {
                tx.rollback();
                Err(err)
            }
        }
    }
}
