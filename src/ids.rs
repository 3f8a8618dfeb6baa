//! Sources of unique identifiers.
//!
//! Anything that needs randomness takes a `&mut dyn IdSource` so that tests can supply a
//! deterministic sequence instead of real random UUIDs.

use uuid::Uuid;

/// Produces UUIDs on demand.
pub trait IdSource {
    /// Returns the next UUID from this source.
    fn next_uuid(&mut self) -> Uuid;
}

/// Draws random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// A deterministic source whose UUIDs count upward from `seed`.
///
/// The counter occupies the most significant 32 bits, so the first 8 hex digits of each UUID
/// are the counter value. `SequentialIds::new(0xA)` yields `0000000a-...`, then `0000000b-...`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn new(seed: u32) -> Self {
        Self { next: seed }
    }
}

impl IdSource for SequentialIds {
    fn next_uuid(&mut self) -> Uuid {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        Uuid::from_u128(u128::from(value) << 96)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_count_up() {
        let mut ids = SequentialIds::new(0xabc);
        assert_eq!(
            ids.next_uuid().to_string(),
            "00000abc-0000-0000-0000-000000000000"
        );
        assert_eq!(
            ids.next_uuid().to_string(),
            "00000abd-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_random_ids_differ() {
        let mut ids = RandomIds;
        assert_ne!(ids.next_uuid(), ids.next_uuid());
    }
}
