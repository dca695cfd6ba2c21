use std::sync::Arc;

use lingoledger_core::{DomainError, DomainResult, InvoiceId};
use lingoledger_invoicing::Invoice;
use lingoledger_tasks::Task;

use super::ledger::{self, SharedTables};

/// Append-only store of submitted invoices.
pub trait InvoiceRepository: Send + Sync {
    /// Insert a fresh submitted invoice.
    ///
    /// Fails with `UnexpectedId` if the invoice already carries an id, and with
    /// `DuplicateInvoice` if an invoice for the same task is already stored.
    fn save(&self, invoice: Invoice) -> DomainResult<InvoiceId>;
    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>>;
    /// The invoice billing `task` (identity or id equality), if any.
    fn get_by_task(&self, task: &Task) -> DomainResult<Option<Invoice>>;
    fn list(&self) -> DomainResult<Vec<Invoice>>;

    /// Submitted invoices can never be edited.
    fn update(&self, _invoice: Invoice) -> DomainResult<()> {
        Err(DomainError::SubmittedInvoiceImmutable)
    }

    /// Submitted invoices can never be removed.
    fn delete(&self, _id: InvoiceId) -> DomainResult<()> {
        Err(DomainError::SubmittedInvoiceImmutable)
    }
}

impl<S> InvoiceRepository for Arc<S>
where
    S: InvoiceRepository + ?Sized,
{
    fn save(&self, invoice: Invoice) -> DomainResult<InvoiceId> {
        (**self).save(invoice)
    }

    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        (**self).get(id)
    }

    fn get_by_task(&self, task: &Task) -> DomainResult<Option<Invoice>> {
        (**self).get_by_task(task)
    }

    fn list(&self) -> DomainResult<Vec<Invoice>> {
        (**self).list()
    }

    fn update(&self, invoice: Invoice) -> DomainResult<()> {
        (**self).update(invoice)
    }

    fn delete(&self, id: InvoiceId) -> DomainResult<()> {
        (**self).delete(id)
    }
}

/// Submitted-invoice view over the in-memory ledger tables.
#[derive(Debug, Clone)]
pub struct InMemoryInvoiceRepository {
    tables: SharedTables,
}

impl InMemoryInvoiceRepository {
    pub(crate) fn shared(tables: SharedTables) -> Self {
        Self { tables }
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn save(&self, invoice: Invoice) -> DomainResult<InvoiceId> {
        let id = ledger::write(&self.tables)?.save_invoice(invoice)?;
        tracing::debug!(invoice_id = %id, "invoice stored");
        Ok(id)
    }

    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        Ok(ledger::read(&self.tables)?.invoice(id))
    }

    fn get_by_task(&self, task: &Task) -> DomainResult<Option<Invoice>> {
        Ok(ledger::read(&self.tables)?.invoice_for_task(task))
    }

    fn list(&self) -> DomainResult<Vec<Invoice>> {
        Ok(ledger::read(&self.tables)?.all_invoices())
    }
}
