//! Entity trait: identity + continuity across state changes.

use crate::id::SequenceId;

/// Entity marker + minimal interface.
///
/// Entities are created without an id (pending insertion) or with a
/// pre-assigned one; the owning store fills the id in on insert.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: SequenceId;

    /// Returns the entity identifier, `None` while pending insertion.
    fn id(&self) -> Option<Self::Id>;

    /// Store-side id assignment.
    fn assign_id(&mut self, id: Self::Id);
}
