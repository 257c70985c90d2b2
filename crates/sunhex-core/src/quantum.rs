//! Quantum (V2) protocol: PBKDF2-derived AES-256-GCM over the packed record.
//!
//! Wire format v2:
//! [1 byte: version=2][8 bytes: salt][12 bytes: IV][N bytes: ciphertext + tag]
//! rendered as upper-case hex. Salt and IV are fresh per frame.

use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::CodecError;
use crate::kdf::derive_key;
use crate::record::{pack, unpack};
use crate::types::{
    IdentityRecord, AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, FRAME_HEADER_LENGTH, QUANTUM_VERSION,
    SALT_LENGTH,
};

const SALT_AT: usize = 1;
const IV_AT: usize = SALT_AT + SALT_LENGTH;

fn random_bytes<const N: usize>() -> Result<[u8; N], CodecError> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes).map_err(|e| CodecError::RngFailed(e.to_string()))?;
    Ok(bytes)
}

/// Generate a random 8-byte PBKDF2 salt.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH], CodecError> {
    random_bytes()
}

/// Generate a random 12-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; AES_GCM_IV_LENGTH], CodecError> {
    random_bytes()
}

/// Encrypt `plaintext` into a v2 frame with the given salt and IV.
///
/// Callers outside tests go through [`encrypt_frame`], which always draws a
/// fresh salt and IV.
pub(crate) fn seal(
    plaintext: &[u8],
    pin: &str,
    salt: &[u8; SALT_LENGTH],
    iv: &[u8; AES_GCM_IV_LENGTH],
    iterations: u32,
) -> Result<Vec<u8>, CodecError> {
    let cipher = derive_key(pin, salt, iterations).cipher();
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| CodecError::EncryptionFailed(e.to_string()))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LENGTH + ciphertext.len());
    frame.push(QUANTUM_VERSION);
    frame.extend_from_slice(salt);
    frame.extend_from_slice(iv);
    frame.extend_from_slice(&ciphertext);
    Ok(frame)
}

/// Authenticate and decrypt a v2 frame.
///
/// Any failure past the version check is reported as
/// [`CodecError::DecryptionFailed`], whatever the cause.
pub(crate) fn open(
    frame: &[u8],
    pin: &str,
    iterations: u32,
) -> Result<Zeroizing<Vec<u8>>, CodecError> {
    let version = *frame
        .first()
        .ok_or_else(|| CodecError::MalformedHex("empty code".into()))?;
    if version != QUANTUM_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    if frame.len() < FRAME_HEADER_LENGTH + AES_GCM_TAG_LENGTH {
        debug!(len = frame.len(), "quantum frame too short");
        return Err(CodecError::DecryptionFailed);
    }

    let salt = &frame[SALT_AT..IV_AT];
    let iv = &frame[IV_AT..FRAME_HEADER_LENGTH];
    let ciphertext = &frame[FRAME_HEADER_LENGTH..];

    let cipher = derive_key(pin, salt, iterations).cipher();
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| {
            debug!("quantum frame failed authentication");
            CodecError::DecryptionFailed
        })
}

/// Pack, encrypt and hex-encode `record` under `pin`.
pub fn encrypt_frame(
    record: &IdentityRecord,
    pin: &str,
    iterations: u32,
) -> Result<String, CodecError> {
    let packed = Zeroizing::new(pack(record)?);
    let salt = generate_salt()?;
    let iv = generate_iv()?;
    let frame = seal(&packed, pin, &salt, &iv, iterations)?;
    debug!(frame_len = frame.len(), "sealed quantum frame");
    Ok(hex::encode_upper(frame))
}

/// Hex-decode, authenticate, decrypt and unpack a v2 code.
pub fn decrypt_frame(
    hex_code: &str,
    pin: &str,
    iterations: u32,
) -> Result<IdentityRecord, CodecError> {
    if hex_code.is_empty() {
        return Err(CodecError::MalformedHex("empty code".into()));
    }
    let frame = hex::decode(hex_code).map_err(|e| CodecError::MalformedHex(e.to_string()))?;
    let plaintext = open(&frame, pin, iterations)?;
    unpack(&plaintext)
}
