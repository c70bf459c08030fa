//! Entities: records whose identity outlives edits to their attributes.

/// A record addressed by a stable identifier.
///
/// Two values with the same id are the same entity, whatever their
/// attributes say; stores match on this when replacing a record.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Display;

    fn id(&self) -> Self::Id;

    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
