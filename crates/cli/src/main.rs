mod config;
mod walkthrough;

use std::sync::Arc;

use anyhow::Context;

use lingoledger_infra::{
    DraftService, InMemoryContractorStore, InMemoryLedger, InMemoryTaskStore, SeedData,
    SubmissionService,
};

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    lingoledger_observability::init_with(config.log_format);

    let contractors = Arc::new(InMemoryContractorStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let ledger = Arc::new(InMemoryLedger::new());

    let seed = match &config.seed_file {
        Some(path) => SeedData::from_file(path)
            .with_context(|| format!("loading seed file {}", path.display()))?,
        None => SeedData::builtin().context("loading built-in seed")?,
    };
    seed.apply(&contractors, &tasks)
        .context("applying seed data")?;

    let drafts = DraftService::new(contractors.clone(), tasks.clone(), ledger.clone());
    let submissions = SubmissionService::new(ledger.clone());

    let summary = walkthrough::run(&contractors, &tasks, &ledger, &drafts, &submissions)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
