//! Confirmation key generation and comparison.
//!
//! Keys are short human-typeable secrets delivered out of band. They are drawn
//! from an alphabet without look-alike characters (`0/O`, `1/I/L`).

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Fixed MAC key used only to equalize comparison timing.
const COMPARISON_KEY: &[u8] = b"confirmation-key-comparison";

/// Generates a random confirmation key of `length` characters.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Compares a stored key with a supplied one in constant time.
///
/// Both values are reduced to fixed-length MACs so neither the position of the
/// first differing byte nor a length mismatch shows up in timing.
pub fn keys_match(stored: &str, supplied: &str) -> bool {
    if stored.is_empty() {
        return false;
    }

    let expected = mac_of(stored).finalize().into_bytes();
    mac_of(supplied).verify_slice(&expected).is_ok()
}

fn mac_of(value: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(COMPARISON_KEY).expect("HMAC accepts any key length");
    mac.update(value.as_bytes());
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_alphabet() {
        let key = generate(12);
        assert_eq!(key.len(), 12);
        assert!(key.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(generate(16), generate(16));
    }

    #[test]
    fn test_keys_match_exact() {
        assert!(keys_match("XQ9", "XQ9"));
    }

    #[test]
    fn test_keys_do_not_match() {
        assert!(!keys_match("XQ9", "WRONG"));
        assert!(!keys_match("XQ9", "xq9"));
        assert!(!keys_match("XQ9", "XQ9 "));
    }

    #[test]
    fn test_empty_stored_key_never_matches() {
        assert!(!keys_match("", ""));
    }
}
