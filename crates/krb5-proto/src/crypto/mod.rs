pub mod aes;
mod checksum;
mod cipher;
pub(crate) mod common;
pub(crate) mod nfold;
pub(crate) mod utils;

use ::aes::cipher::block_padding::UnpadError;
use ::aes::cipher::inout::PadError;
use ::aes::cipher::InvalidLength;
use thiserror::Error;

/// https://www.rfc-editor.org/rfc/rfc3962.html#section-4
/// the 8-octet ASCII string "kerberos"
pub const KERBEROS: &[u8; 8] = b"kerberos";

#[derive(Error, Debug)]
pub enum KerberosCryptoError {
    #[error("invalid key length: {0}. Expected: {1}")]
    KeyLength(usize, usize),
    #[error("invalid cipher length: {0}. Expected at least: {1}")]
    CipherLength(usize, usize),
    #[error("unknown or unsupported algorithm identifier: {0}")]
    AlgorithmIdentifier(usize),
    #[error("unknown or unsupported algorithm identifier: {0:?}")]
    AlgorithmIdentifierData(Vec<u8>),
    #[error("bad integrity: calculated hmac is different than provided")]
    IntegrityCheck,
    #[error("invalid string-to-key parameters length: {0}. Expected: 4")]
    S2kParamsLength(usize),
    #[error("string-to-key iteration count must not be zero")]
    S2kIterationCount,
    #[error("cipher error: {0}")]
    CipherError(#[from] InvalidLength),
    #[error("padding error: {0:?}")]
    CipherUnpad(UnpadError),
    #[error("padding error: {0:?}")]
    CipherPad(PadError),
}

impl From<UnpadError> for KerberosCryptoError {
    fn from(err: UnpadError) -> Self {
        Self::CipherUnpad(err)
    }
}

impl From<PadError> for KerberosCryptoError {
    fn from(err: PadError) -> Self {
        Self::CipherPad(err)
    }
}

pub type KerberosCryptoResult<T> = Result<T, KerberosCryptoError>;

/// Outcome of the basic decryption step, before the HMAC is checked.
pub struct DecryptWithoutChecksum {
    pub plaintext: Vec<u8>,
    pub confounder: Vec<u8>,
    pub checksum: Vec<u8>,
    pub ki: Vec<u8>,
}

/// Outcome of the basic encryption step, before the HMAC is appended.
pub struct EncryptWithoutChecksum {
    pub encrypted: Vec<u8>,
    pub confounder: Vec<u8>,
    pub ki: Vec<u8>,
}

pub use checksum::{Checksum, ChecksumSuite};
pub use cipher::{Cipher, CipherSuite};
