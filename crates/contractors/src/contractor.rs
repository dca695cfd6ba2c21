use serde::{Deserialize, Serialize};

use lingoledger_core::{ContractorId, Entity};

/// Entity: Contractor.
///
/// Identity is the id; the name is a display attribute that must be unique
/// (case-insensitively) within a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contractor {
    id: Option<ContractorId>,
    name: String,
}

impl Contractor {
    /// A contractor pending insertion; the store assigns the id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// A contractor with a pre-assigned id.
    pub fn with_id(id: ContractorId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name comparison used for lookup and uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Entity for Contractor {
    type Id = ContractorId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = Some(id);
    }
}
