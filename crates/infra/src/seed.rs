//! Reference data loading (contractors and tasks).
//!
//! Seed documents are JSON. Every record goes through the store `add`
//! operation, so name uniqueness and id rules apply exactly as for callers.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lingoledger_contractors::Contractor;
use lingoledger_core::DomainError;
use lingoledger_tasks::Task;

use crate::store::{ContractorStore, TaskStore};

/// Contractors and tasks used when no seed file is configured.
const BUILTIN_SEED: &str = r#"{
  "contractors": [
    { "name": "Alice" },
    { "name": "Bob" }
  ],
  "tasks": [
    {
      "location": "Office",
      "source_language": "English",
      "target_language": "Spanish",
      "start_time": "2025-03-01T09:00:00Z"
    },
    {
      "location": "Remote",
      "source_language": "French",
      "target_language": "English",
      "start_time": "2025-03-10T09:00:00Z"
    }
  ]
}"#;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed record rejected: {0}")]
    Rejected(#[from] DomainError),
}

/// Seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub contractors: Vec<Contractor>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Counts of inserted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub contractors: usize,
    pub tasks: usize,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Insert every record; stops at the first rejected one.
    pub fn apply<C, T>(self, contractors: &C, tasks: &T) -> Result<SeedReport, SeedError>
    where
        C: ContractorStore,
        T: TaskStore,
    {
        let report = SeedReport {
            contractors: self.contractors.len(),
            tasks: self.tasks.len(),
        };
        for contractor in self.contractors {
            contractors.add(contractor)?;
        }
        for task in self.tasks {
            tasks.add(task)?;
        }

        tracing::info!(
            contractors = report.contractors,
            tasks = report.tasks,
            "seed data loaded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingoledger_core::{ContractorId, Entity, TaskId};

    use crate::store::{InMemoryContractorStore, InMemoryTaskStore};

    #[test]
    fn builtin_seed_loads_walkthrough_data() {
        let contractors = InMemoryContractorStore::new();
        let tasks = InMemoryTaskStore::new();

        let report = SeedData::builtin().unwrap().apply(&contractors, &tasks).unwrap();
        assert_eq!(report, SeedReport { contractors: 2, tasks: 2 });

        let alice = contractors.find_by_name("alice").unwrap().unwrap();
        assert_eq!(alice.id(), Some(ContractorId::new(0)));
        let office = tasks.get(TaskId::new(0)).unwrap().unwrap();
        assert_eq!(office.location(), "Office");
        assert_eq!(office.start_time().to_rfc3339(), "2025-03-01T09:00:00+00:00");
    }

    #[test]
    fn explicit_ids_are_honoured() {
        let seed = SeedData::from_json(
            r#"{ "contractors": [{ "id": 5, "name": "John Doe" }, { "name": "Jane" }] }"#,
        )
        .unwrap();
        let contractors = InMemoryContractorStore::new();
        seed.apply(&contractors, &InMemoryTaskStore::new()).unwrap();

        let jane = contractors.find_by_name("jane").unwrap().unwrap();
        assert_eq!(jane.id(), Some(ContractorId::new(6)));
    }

    #[test]
    fn duplicate_names_in_seed_are_rejected() {
        let seed = SeedData::from_json(
            r#"{ "contractors": [{ "name": "Alice" }, { "name": "ALICE" }] }"#,
        )
        .unwrap();
        let err = seed
            .apply(&InMemoryContractorStore::new(), &InMemoryTaskStore::new())
            .unwrap_err();
        match err {
            SeedError::Rejected(DomainError::DuplicateName(name)) => assert_eq!(name, "ALICE"),
            other => panic!("Expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = SeedData::from_json(r#"{ "tasks": [{ "location": "Office" }] }"#).unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }
}
