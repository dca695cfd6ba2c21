//! Strongly-typed identifiers used across the domain.
//!
//! Every store hands out ids from its own sequence, so ids are plain `u64`
//! newtypes rather than globally unique values.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a contractor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractorId(u64);

/// Identifier of an interpretation task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

/// Identifier of an invoice row (draft store and submitted store each keep their own sequence).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(u64);

/// Identifier drawn from a store's insertion sequence.
pub trait SequenceId: Copy + Ord + core::hash::Hash + core::fmt::Debug {
    fn from_sequence(n: u64) -> Self;

    fn sequence(&self) -> u64;
}

macro_rules! impl_sequence_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(n: u64) -> Self {
                Self(n)
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl SequenceId for $t {
            fn from_sequence(n: u64) -> Self {
                Self(n)
            }

            fn sequence(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let n = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(n))
            }
        }
    };
}

impl_sequence_newtype!(ContractorId, "ContractorId");
impl_sequence_newtype!(TaskId, "TaskId");
impl_sequence_newtype!(InvoiceId, "InvoiceId");
