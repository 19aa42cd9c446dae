//! # Owner Hash Binding
//!
//! `owner = SHA-256(tag ‖ le32(sequence) ‖ secret)`
//!
//! - `tag` is the ASCII string `main-index:pk:` zero-padded to 32 bytes.
//! - `le32(sequence)` is the sequence as a 32-byte little-endian integer.
//! - `secret` is exactly 32 bytes.

use sha2::{Digest, Sha256};
use shared_types::{Hash, IndexError, SECRET_KEY_LEN, ZERO_HASH};
use subtle::{Choice, ConstantTimeEq};

/// Domain separation tag for owner hashes.
pub const OWNER_DOMAIN_TAG: &[u8] = b"main-index:pk:";

fn padded_tag() -> [u8; 32] {
    let mut tag = [0u8; 32];
    tag[..OWNER_DOMAIN_TAG.len()].copy_from_slice(OWNER_DOMAIN_TAG);
    tag
}

fn sequence_word(sequence: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[..8].copy_from_slice(&sequence.to_le_bytes());
    word
}

/// Derive the owner hash for `secret` in epoch `sequence`.
///
/// Pure and deterministic. Fails with `InvalidKeyLength` unless the secret is
/// exactly 32 bytes.
pub fn derive_owner_hash(secret: &[u8], sequence: u64) -> Result<Hash, IndexError> {
    if secret.len() != SECRET_KEY_LEN {
        return Err(IndexError::InvalidKeyLength {
            expected: SECRET_KEY_LEN,
            got: secret.len(),
        });
    }

    let mut hasher = Sha256::new();
    hasher.update(padded_tag());
    hasher.update(sequence_word(sequence));
    hasher.update(secret);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Ok(hash)
}

/// Constant-time comparison of a stored owner against a derived hash.
///
/// A zero owner (uninitialized contract) never matches.
pub fn owner_matches(stored: &Hash, derived: &Hash) -> bool {
    let is_zero: Choice = stored[..].ct_eq(&ZERO_HASH[..]);
    let equal: Choice = stored[..].ct_eq(&derived[..]);
    bool::from(equal & !is_zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_derive_rejects_short_key() {
        let err = derive_owner_hash(&[7u8; 16], 1).unwrap_err();
        assert_eq!(
            err,
            IndexError::InvalidKeyLength {
                expected: 32,
                got: 16
            }
        );
    }

    #[test]
    fn test_derive_rejects_long_key() {
        assert!(derive_owner_hash(&[7u8; 33], 1).is_err());
    }

    #[test]
    fn test_sequence_is_bound() {
        let secret = [0xABu8; 32];
        let h1 = derive_owner_hash(&secret, 1).unwrap();
        let h2 = derive_owner_hash(&secret, 2).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_zero_owner_never_matches() {
        assert!(!owner_matches(&ZERO_HASH, &ZERO_HASH));
    }

    #[test]
    fn test_owner_matches() {
        let h = derive_owner_hash(&[1u8; 32], 5).unwrap();
        assert!(owner_matches(&h, &h));
        let other = derive_owner_hash(&[2u8; 32], 5).unwrap();
        assert!(!owner_matches(&h, &other));
    }

    proptest! {
        #[test]
        fn prop_derive_is_deterministic(secret in any::<[u8; 32]>(), sequence in any::<u64>()) {
            let a = derive_owner_hash(&secret, sequence).unwrap();
            let b = derive_owner_hash(&secret, sequence).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_distinct_secrets_distinct_owners(
            a in any::<[u8; 32]>(),
            b in any::<[u8; 32]>(),
            sequence in 1u64..1_000_000,
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(
                derive_owner_hash(&a, sequence).unwrap(),
                derive_owner_hash(&b, sequence).unwrap()
            );
        }
    }
}
