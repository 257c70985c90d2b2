//! PBKDF2-HMAC-SHA256 key derivation for the quantum protocol.

use aes_gcm::{Aes256Gcm, Key, KeyInit};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::types::AES_KEY_LENGTH;

/// A 256-bit key derived from a PIN. The raw bytes never leave this type;
/// the only thing it can do is key an AES-256-GCM cipher.
pub struct DerivedKey(Zeroizing<[u8; AES_KEY_LENGTH]>);

impl DerivedKey {
    pub fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]))
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive the AES key for `pin` and `salt`.
///
/// # Arguments
/// * `pin` - PIN text, used as UTF-8 bytes
/// * `salt` - Per-frame random salt
/// * `iterations` - PBKDF2 rounds (the protocol uses 100 000). Zero is
///   treated as one; the 100 000 floor is enforced where a codec is built
///   ([`crate::codec::QuantumCodec::new`]), not here.
pub fn derive_key(pin: &str, salt: &[u8], iterations: u32) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt, iterations.max(1), &mut key[..]);
    DerivedKey(key)
}
