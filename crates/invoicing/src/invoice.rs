use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lingoledger_contractors::Contractor;
use lingoledger_core::{DomainError, DomainResult, Entity, InvoiceId};
use lingoledger_tasks::Task;

/// Invoice status lifecycle: `Draft -> Submitted` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Submitted,
}

/// State tag carried by every invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InvoiceState {
    /// Mutable working copy; `last_saved` is refreshed on every accepted revision.
    Draft { last_saved: DateTime<Utc> },
    /// Frozen billing record.
    Submitted { submitted_at: DateTime<Utc> },
}

/// Billing record for a task performed by a contractor.
///
/// The contractor and task are shared references to store-owned entities;
/// an invoice never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: Option<InvoiceId>,
    contractor: Arc<Contractor>,
    task: Arc<Task>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    signature: String,
    state: InvoiceState,
}

/// Partial update of a draft. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRevision {
    pub contractor: Option<Arc<Contractor>>,
    pub task: Option<Arc<Task>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub signature: Option<String>,
}

impl Invoice {
    /// Create a validated draft pending insertion.
    pub fn draft(
        contractor: Arc<Contractor>,
        task: Arc<Task>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        signature: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let invoice = Self {
            id: None,
            contractor,
            task,
            start_time,
            end_time,
            signature: signature.into(),
            state: InvoiceState::Draft { last_saved: now },
        };
        invoice.validate()?;
        Ok(invoice)
    }

    /// Invariants: signature non-empty after trimming; `start_time < end_time`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.signature.trim().is_empty() {
            return Err(DomainError::invalid_invoice("signature is required"));
        }
        if self.start_time >= self.end_time {
            return Err(DomainError::invalid_invoice(
                "start time must be before end time",
            ));
        }
        Ok(())
    }

    pub fn contractor(&self) -> &Arc<Contractor> {
        &self.contractor
    }

    pub fn task(&self) -> &Arc<Task> {
        &self.task
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn state(&self) -> InvoiceState {
        self.state
    }

    pub fn status(&self) -> InvoiceStatus {
        match self.state {
            InvoiceState::Draft { .. } => InvoiceStatus::Draft,
            InvoiceState::Submitted { .. } => InvoiceStatus::Submitted,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status() == InvoiceStatus::Draft
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        match self.state {
            InvoiceState::Draft { last_saved } => Some(last_saved),
            InvoiceState::Submitted { .. } => None,
        }
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            InvoiceState::Submitted { submitted_at } => Some(submitted_at),
            InvoiceState::Draft { .. } => None,
        }
    }

    /// Whether this invoice bills the given task (same allocation or same id).
    pub fn references_task(&self, task: &Task) -> bool {
        core::ptr::eq(Arc::as_ptr(&self.task), task) || self.task.same_task(task)
    }

    /// Whether this invoice belongs to the given contractor (id equality).
    pub fn belongs_to(&self, contractor: &Contractor) -> bool {
        self.contractor.id() == contractor.id()
    }

    /// Apply a partial revision to a draft.
    ///
    /// All-or-nothing: the revised record is validated before it replaces
    /// `self`, so a rejected revision leaves the draft exactly as it was.
    pub fn revise(&mut self, revision: DraftRevision, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_draft() {
            return Err(DomainError::SubmittedInvoiceImmutable);
        }

        let mut next = self.clone();
        if let Some(contractor) = revision.contractor {
            next.contractor = contractor;
        }
        if let Some(task) = revision.task {
            next.task = task;
        }
        if let Some(start_time) = revision.start_time {
            next.start_time = start_time;
        }
        if let Some(end_time) = revision.end_time {
            next.end_time = end_time;
        }
        if let Some(signature) = revision.signature {
            next.signature = signature;
        }
        next.validate()?;

        next.state = InvoiceState::Draft { last_saved: now };
        *self = next;
        Ok(())
    }

    /// Promote a draft into a frozen invoice ready for a fresh insert.
    ///
    /// The draft id is dropped (submitted invoices get their own sequence) and
    /// the invariants are checked one last time.
    pub fn into_submitted(self, now: DateTime<Utc>) -> DomainResult<Invoice> {
        if !self.is_draft() {
            return Err(DomainError::SubmittedInvoiceImmutable);
        }
        self.validate()?;
        Ok(Invoice {
            id: None,
            state: InvoiceState::Submitted { submitted_at: now },
            ..self
        })
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = Some(id);
    }
}
