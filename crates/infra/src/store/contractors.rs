use std::sync::{Arc, RwLock};

use lingoledger_contractors::Contractor;
use lingoledger_core::{ContractorId, DomainError, DomainResult, Entity};

use super::table::Table;

/// Contractor lookup and registration.
pub trait ContractorStore: Send + Sync {
    /// Insert a contractor, assigning the next id when it has none.
    ///
    /// Fails with `DuplicateName` when a contractor with the same name
    /// (case-insensitive) exists, and `DuplicateId` when a pre-assigned id is taken.
    fn add(&self, contractor: Contractor) -> DomainResult<Arc<Contractor>>;
    fn find_by_id(&self, id: ContractorId) -> DomainResult<Option<Arc<Contractor>>>;
    /// Case-insensitive exact name match.
    fn find_by_name(&self, name: &str) -> DomainResult<Option<Arc<Contractor>>>;
    fn list(&self) -> DomainResult<Vec<Arc<Contractor>>>;
}

impl<S> ContractorStore for Arc<S>
where
    S: ContractorStore + ?Sized,
{
    fn add(&self, contractor: Contractor) -> DomainResult<Arc<Contractor>> {
        (**self).add(contractor)
    }

    fn find_by_id(&self, id: ContractorId) -> DomainResult<Option<Arc<Contractor>>> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> DomainResult<Option<Arc<Contractor>>> {
        (**self).find_by_name(name)
    }

    fn list(&self) -> DomainResult<Vec<Arc<Contractor>>> {
        (**self).list()
    }
}

/// In-memory contractor store.
#[derive(Debug, Default)]
pub struct InMemoryContractorStore {
    inner: RwLock<Table<ContractorId, Arc<Contractor>>>,
}

impl InMemoryContractorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContractorStore for InMemoryContractorStore {
    fn add(&self, mut contractor: Contractor) -> DomainResult<Arc<Contractor>> {
        let mut table = self.inner.write().map_err(|_| DomainError::poisoned())?;

        if table.values().any(|c| c.has_name(contractor.name())) {
            return Err(DomainError::DuplicateName(contractor.name().to_string()));
        }
        if let Some(id) = contractor.id() {
            if table.contains(&id) {
                return Err(DomainError::duplicate_id("contractor", id));
            }
        }

        let id = table.allocate(contractor.id())?;
        contractor.assign_id(id);
        let contractor = Arc::new(contractor);
        table.put(id, contractor.clone());

        tracing::debug!(contractor_id = %id, "contractor added");
        Ok(contractor)
    }

    fn find_by_id(&self, id: ContractorId) -> DomainResult<Option<Arc<Contractor>>> {
        let table = self.inner.read().map_err(|_| DomainError::poisoned())?;
        Ok(table.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> DomainResult<Option<Arc<Contractor>>> {
        let table = self.inner.read().map_err(|_| DomainError::poisoned())?;
        Ok(table.values().find(|c| c.has_name(name)).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Arc<Contractor>>> {
        let table = self.inner.read().map_err(|_| DomainError::poisoned())?;
        Ok(table.values().cloned().collect())
    }
}
