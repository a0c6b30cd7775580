/// Source of record identifiers. Injected so record creation stays
/// deterministic under test.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, used by the binary.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic counter starting at `start`.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct SequentialIds {
    next: u64,
}

#[allow(dead_code)]
impl SequentialIds {
    pub fn starting_at(start: u64) -> Self {
        SequentialIds { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_id(), "7");
        assert_eq!(ids.next_id(), "8");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
