//! Unique identifiers for questions and answer options.
//!
//! Three strategies are tried in order: the platform UUID generator, a
//! version-4 UUID assembled from secure random bytes, and a non-standard
//! `id-…` string built from hashed state and the clock. Generation never
//! fails; it only degrades.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Strategy that produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdTier {
    PlatformUuid,
    SecureBytes,
    Fallback,
}

#[derive(Debug, Error)]
pub enum IdError {
    #[error("secure random source unavailable: {0}")]
    Entropy(String),
}

/// Randomness available to the generator.
pub trait EntropySource {
    /// A ready-made version-4 UUID, if the platform provides one.
    fn uuid(&mut self) -> Option<Uuid>;

    /// Fill `buf` with cryptographically secure random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), IdError>;
}

/// Operating system randomness through `getrandom`.
#[derive(Debug, Clone, Copy)]
pub struct OsEntropy {
    available: bool,
}

impl OsEntropy {
    /// Probe the OS generator once.
    pub fn new() -> Self {
        let mut probe = [0u8; 1];
        Self {
            available: getrandom::getrandom(&mut probe).is_ok(),
        }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for OsEntropy {
    fn uuid(&mut self) -> Option<Uuid> {
        // new_v4 panics without an OS generator, so only call it after the probe
        self.available.then(Uuid::new_v4)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), IdError> {
        getrandom::getrandom(buf).map_err(|err| IdError::Entropy(err.to_string()))
    }
}

/// Identifier generator over an [`EntropySource`].
#[derive(Debug)]
pub struct IdGenerator<E = OsEntropy> {
    entropy: E,
    counter: u64,
}

impl IdGenerator<OsEntropy> {
    pub fn new() -> Self {
        Self::with_source(OsEntropy::new())
    }
}

impl Default for IdGenerator<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntropySource> IdGenerator<E> {
    pub const fn with_source(entropy: E) -> Self {
        Self {
            entropy,
            counter: 0,
        }
    }

    /// Produce a new identifier.
    pub fn generate(&mut self) -> String {
        self.generate_with_tier().0
    }

    /// Produce a new identifier and report which strategy made it.
    pub fn generate_with_tier(&mut self) -> (String, IdTier) {
        self.counter = self.counter.wrapping_add(1);

        if let Some(uuid) = self.entropy.uuid() {
            return (uuid.hyphenated().to_string(), IdTier::PlatformUuid);
        }

        let mut bytes = [0u8; 16];
        match self.entropy.fill(&mut bytes) {
            Ok(()) => (uuid_from_random_bytes(bytes), IdTier::SecureBytes),
            Err(err) => {
                debug!(%err, "falling back to non-standard identifier");
                (self.fallback_id(), IdTier::Fallback)
            }
        }
    }

    fn fallback_id(&self) -> String {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(self.counter);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        hasher.write_u128(millis);
        format!("id-{}{}", to_base36(u128::from(hasher.finish())), to_base36(millis))
    }
}

/// Format 16 random bytes as an RFC 4122 version-4 UUID.
fn uuid_from_random_bytes(mut bytes: [u8; 16]) -> String {
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes).hyphenated().to_string()
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// No platform UUID, fixed byte pattern.
    struct FixedBytes(u8);

    impl EntropySource for FixedBytes {
        fn uuid(&mut self) -> Option<Uuid> {
            None
        }

        fn fill(&mut self, buf: &mut [u8]) -> Result<(), IdError> {
            buf.fill(self.0);
            Ok(())
        }
    }

    /// No platform UUID, OS random bytes.
    struct OsBytesOnly;

    impl EntropySource for OsBytesOnly {
        fn uuid(&mut self) -> Option<Uuid> {
            None
        }

        fn fill(&mut self, buf: &mut [u8]) -> Result<(), IdError> {
            getrandom::getrandom(buf).map_err(|err| IdError::Entropy(err.to_string()))
        }
    }

    struct NoEntropy;

    impl EntropySource for NoEntropy {
        fn uuid(&mut self) -> Option<Uuid> {
            None
        }

        fn fill(&mut self, _buf: &mut [u8]) -> Result<(), IdError> {
            Err(IdError::Entropy("disabled".to_string()))
        }
    }

    fn is_v4(id: &str) -> bool {
        let bytes = id.as_bytes();
        id.len() == 36
            && [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-')
            && bytes[14] == b'4'
            && matches!(bytes[19], b'8' | b'9' | b'a' | b'b')
            && id.chars().all(|c| c == '-' || c.is_ascii_digit() || c.is_ascii_lowercase())
    }

    #[test]
    fn test_os_generator_ids_are_distinct_v4() {
        let mut ids = IdGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = ids.generate();
            assert!(is_v4(&id), "not a v4 uuid: {id}");
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_secure_bytes_ids_are_distinct_v4() {
        let mut ids = IdGenerator::with_source(OsBytesOnly);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let (id, tier) = ids.generate_with_tier();
            assert_eq!(tier, IdTier::SecureBytes);
            assert!(is_v4(&id), "not a v4 uuid: {id}");
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_secure_bytes_tier_forces_version_and_variant() {
        let mut ids = IdGenerator::with_source(FixedBytes(0xff));
        let (id, tier) = ids.generate_with_tier();
        assert_eq!(tier, IdTier::SecureBytes);
        assert_eq!(id, "ffffffff-ffff-4fff-bfff-ffffffffffff");

        let mut zeros = IdGenerator::with_source(FixedBytes(0));
        assert_eq!(zeros.generate(), "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn test_fallback_tier_prefix_and_uniqueness() {
        let mut ids = IdGenerator::with_source(NoEntropy);
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let (id, tier) = ids.generate_with_tier();
            assert_eq!(tier, IdTier::Fallback);
            assert!(id.starts_with("id-"));
            assert!(id[3..].chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
