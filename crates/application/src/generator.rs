//! Random identifiers for unique payloads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length used by [`IdentifierGenerator::generate`].
pub const DEFAULT_IDENTIFIER_LENGTH: usize = 8;

/// Produces lowercase ASCII identifiers so repeated runs submit distinct data.
///
/// Not cryptographically secure. Seed it for reproducible runs.
#[derive(Debug, Clone)]
pub struct IdentifierGenerator {
    rng: StdRng,
}

impl IdentifierGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a seeded generator when `seed` is set, an OS-seeded one otherwise.
    #[must_use]
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::seeded)
    }

    /// Returns `length` characters drawn uniformly from `a..=z`.
    pub fn generate_identifier(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(self.rng.random_range(b'a'..=b'z')))
            .collect()
    }

    /// Returns an identifier of the default length.
    pub fn generate(&mut self) -> String {
        self.generate_identifier(DEFAULT_IDENTIFIER_LENGTH)
    }
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_length_and_alphabet() {
        let mut generator = IdentifierGenerator::from_os_rng();
        for length in [0, 1, 8, 64] {
            let id = generator.generate_identifier(length);
            assert_eq!(id.len(), length);
            assert!(id.bytes().all(|b| b.is_ascii_lowercase()), "{id}");
        }
    }

    #[test]
    fn test_default_length() {
        let mut generator = IdentifierGenerator::default();
        assert_eq!(generator.generate().len(), DEFAULT_IDENTIFIER_LENGTH);
    }

    #[test]
    fn test_consecutive_identifiers_differ() {
        let mut generator = IdentifierGenerator::from_os_rng();
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = IdentifierGenerator::seeded(42);
        let mut b = IdentifierGenerator::with_optional_seed(Some(42));
        assert_eq!(a.generate(), b.generate());
        assert_eq!(a.generate_identifier(20), b.generate_identifier(20));
    }
}
