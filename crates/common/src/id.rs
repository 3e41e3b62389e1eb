//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;

/// Length of a short question identifier.
pub const QUESTION_ID_LEN: usize = 8;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a short question ID: 8 random lowercase ASCII letters.
    ///
    /// The space is 26^8 ≈ 2 * 10^11 values, so collisions are rare but
    /// possible; callers must check the store and retry (bounded).
    #[must_use]
    pub fn generate_question_id(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..QUESTION_ID_LEN)
            .map(|_| rng.gen_range(b'a'..=b'z') as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_question_id() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate_question_id();

        assert_eq!(id.len(), QUESTION_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_lowercase()));
    }
}
