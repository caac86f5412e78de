//! Random phrase generation.
//!
//! Produces the verification phrase that callers persist server-side and
//! later compare against user input.

use rand::Rng;

/// Characters a phrase is drawn from. Excludes `0`, `1`, `i`, `l` and `o`,
/// which are easy to misread on a rendered image.
const CHARSET: &[u8] = b"27893456qwertzupasdfghjkyxcvbnm";

/// Shortest phrase the generator will produce.
pub const MIN_PHRASE_LENGTH: usize = 4;

/// Generates a phrase of exactly `length` characters from [`CHARSET`],
/// sampled uniformly with replacement from the thread-local generator.
///
/// The phrase is **not** cryptographically unpredictable; it is a
/// human-verification challenge, not a secret. Callers who need stronger
/// guarantees should supply their own source via [`random_phrase_with`].
#[must_use]
pub fn random_phrase(length: usize) -> String {
    random_phrase_with(&mut rand::rng(), length)
}

/// Same as [`random_phrase`] but with an injectable random source, so tests
/// can pass a seeded generator and hardened deployments a CSPRNG.
pub fn random_phrase_with<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_phrase_has_requested_length() {
        for length in [MIN_PHRASE_LENGTH, 5, 8, 32] {
            assert_eq!(random_phrase(length).len(), length);
        }
    }

    #[test]
    fn test_phrase_chars_come_from_charset() {
        let phrase = random_phrase(64);
        for ch in phrase.bytes() {
            assert!(CHARSET.contains(&ch), "unexpected character {}", ch as char);
        }
    }

    #[test]
    fn test_charset_excludes_ambiguous_chars() {
        for ch in b"01ilo" {
            assert!(!CHARSET.contains(ch));
        }
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let a = random_phrase_with(&mut StdRng::seed_from_u64(42), 10);
        let b = random_phrase_with(&mut StdRng::seed_from_u64(42), 10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }
}
