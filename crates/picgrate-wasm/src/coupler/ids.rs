//! Identifier sources for naming generated layout cells.

/// Supplies identifiers for cell names.
pub trait IdSource {
    /// Returns the next identifier. Successive calls must not repeat.
    fn next_id(&mut self) -> String;
}

/// Counts upward from a starting value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a counter whose first identifier is `start`.
    pub const fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        format!("{id:08x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_ids_001_sequential_ids_are_distinct() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "00000000");
        assert_eq!(ids.next_id(), "00000001");
    }

    #[test]
    fn ut_ids_002_starting_value() {
        let mut ids = SequentialIds::starting_at(255);
        assert_eq!(ids.next_id(), "000000ff");
    }
}
