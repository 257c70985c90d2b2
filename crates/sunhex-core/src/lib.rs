pub mod codec;
pub mod config;
pub mod countries;
pub mod error;
pub mod fields;
pub mod kdf;
pub mod legacy;
pub mod quantum;
pub mod record;
pub mod response;
pub mod types;
pub mod validate;

pub use codec::{Codec, Decoded, Encoded, LegacyCodec, QuantumCodec, SinCodec};
pub use config::{CodecConfig, ConfigError, MIN_KDF_ITERATIONS};
pub use countries::supported_codes;
pub use error::{CodecError, ErrorKind, RecordFault};
pub use legacy::{DecodeTrace, GenerateTrace};
pub use quantum::{decrypt_frame, encrypt_frame};
pub use record::CanonicalRecord;
pub use response::{
    decode_v1, decode_v2, generate_v1, generate_v2, DebugInfo, SinResponse, Status,
};
pub use types::{
    Gender, IdentityRecord, PersonalInfo, Protocol, CANONICAL_RECORD_LENGTH,
    DEFAULT_KDF_ITERATIONS, QUANTUM_VERSION,
};
pub use validate::{DecodeRequest, GenerateRequest, ValidationError};
