//! Result of an atomic insert-if-absent.

/// Whether a conditional insert stored the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored.
    Inserted,
    /// A record with the same unique key already existed; nothing changed.
    AlreadyExists,
}

impl InsertOutcome {
    /// True when the record was stored.
    pub fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}
