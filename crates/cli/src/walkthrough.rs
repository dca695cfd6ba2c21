//! Billing walkthrough: draft, revise, submit, verify.

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use lingoledger_core::{DomainError, Entity, InvoiceId};
use lingoledger_infra::{
    ContractorStore, CreateDraft, DraftService, InvoiceLedger, InvoiceRepository,
    SubmissionService, TaskStore, UpdateDraft,
};
use lingoledger_invoicing::Invoice;

/// Outcome printed by the binary.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub draft_id: InvoiceId,
    pub rejected_draft: String,
    pub invoice: Invoice,
    pub open_drafts: usize,
}

fn at(day: u32, hour: u32) -> anyhow::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .ok_or_else(|| anyhow!("invalid walkthrough timestamp"))
}

pub fn run<C, T, L>(
    contractors: &C,
    tasks: &T,
    ledger: &L,
    drafts: &DraftService<C, T, L>,
    submissions: &SubmissionService<L>,
) -> anyhow::Result<Summary>
where
    C: ContractorStore,
    T: TaskStore,
    L: InvoiceLedger,
{
    let alice = contractors
        .find_by_name("Alice")?
        .context("seed data has no contractor named Alice")?;
    let alice_id = alice.id().context("stored contractor without id")?;
    let office = tasks
        .find_by_attributes("Office", "English", "Spanish")?
        .into_iter()
        .next()
        .context("seed data has no Office English->Spanish task")?;
    let office_id = office.id().context("stored task without id")?;

    let draft_id = drafts.create_draft(CreateDraft {
        contractor_id: alice_id,
        task_id: office_id,
        start_time: at(10, 8)?,
        end_time: at(10, 9)?,
        signature: "signature1".to_string(),
    })?;

    let rejected_draft = match drafts.create_draft(CreateDraft {
        contractor_id: alice_id,
        task_id: office_id,
        start_time: at(10, 23)?,
        end_time: at(10, 1)?,
        signature: "signature2".to_string(),
    }) {
        Err(err @ DomainError::InvalidInvoice(_)) => err.to_string(),
        Err(err) => return Err(err).context("unexpected failure for reversed draft window"),
        Ok(id) => bail!("draft {id} with end before start was accepted"),
    };

    for draft in drafts.list_drafts(alice_id)? {
        tracing::info!(
            task_id = ?draft.task().id(),
            last_saved = ?draft.last_saved(),
            "open draft"
        );
    }

    drafts.update_draft(
        draft_id,
        UpdateDraft {
            signature: Some("new-signature".to_string()),
            ..UpdateDraft::default()
        },
    )?;

    submissions.submit(draft_id)?;

    let open_drafts = drafts.list_drafts(alice_id)?.len();
    if open_drafts != 0 {
        bail!("submitted draft {draft_id} is still open");
    }

    let invoice = ledger
        .invoices()
        .get_by_task(&office)?
        .context("no invoice stored for the submitted task")?;

    Ok(Summary {
        draft_id,
        rejected_draft,
        invoice,
        open_drafts,
    })
}
