use crate::constants::etypes::{AES128_CTS_HMAC_SHA1_96, AES256_CTS_HMAC_SHA1_96};

use super::aes::{Aes128CtsHmacSha196, Aes256CtsHmacSha196};
use super::{ChecksumSuite, DecryptWithoutChecksum, EncryptWithoutChecksum, KerberosCryptoError, KerberosCryptoResult};

/// Capability set of one encryption type, the RFC 3961 "encryption system
/// profile". One implementor per supported enctype; all of them are stateless.
pub trait Cipher {
    /// Protocol key size in bytes.
    fn key_size(&self) -> usize;
    /// Key-generation seed length, `k`, in bits.
    fn seed_bit_len(&self) -> usize;
    /// Size of the random confounder block in bytes (the cipher block size).
    fn confounder_byte_size(&self) -> usize;
    fn cipher_type(&self) -> CipherSuite;
    fn checksum_type(&self) -> ChecksumSuite;
    /// Default string-to-key parameters, opaque per enctype. For the AES
    /// family this is the PBKDF2 iteration count as four big-endian octets.
    fn default_s2k_params(&self) -> &'static [u8];

    /// Usage-keyed encryption: confounder ‖ E(Ke, …) ‖ HMAC(Ki, …).
    ///
    /// A `key_usage` of zero means `key` is already a specific key and is
    /// used directly for both encryption and integrity; any other usage
    /// derives Ke and Ki from it first.
    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>>;
    /// Inverse of [`Cipher::encrypt`]; verifies the trailing HMAC in
    /// constant time before returning the plaintext.
    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    fn encrypt_no_checksum(
        &self,
        key: &[u8],
        key_usage: i32,
        payload: &[u8],
    ) -> KerberosCryptoResult<EncryptWithoutChecksum>;
    fn decrypt_no_checksum(
        &self,
        key: &[u8],
        key_usage: i32,
        cipher_data: &[u8],
    ) -> KerberosCryptoResult<DecryptWithoutChecksum>;

    /// Calculates the Kerberos checksum (Kc-keyed truncated HMAC) over the
    /// provided data.
    ///
    /// Note: the key derivation differs from the integrity HMAC used inside
    /// [`Cipher::encrypt`]. More details:
    /// * [Encryption and Checksum Specifications for Kerberos 5](https://datatracker.ietf.org/doc/html/rfc3961).
    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    /// String-to-key with the default string-to-key parameters.
    fn generate_key_from_password(&self, password: &[u8], salt: &[u8]) -> KerberosCryptoResult<Vec<u8>>;
    /// String-to-key with explicit, enctype-opaque string-to-key parameters.
    fn generate_key_from_password_params(
        &self,
        password: &[u8],
        salt: &[u8],
        s2k_params: &[u8],
    ) -> KerberosCryptoResult<Vec<u8>>;
    fn random_to_key(&self, key: Vec<u8>) -> Vec<u8>;
}

/// Registry of the supported encryption types.
///
/// A pure value-to-capability mapping: no global state, construction of the
/// capability object is a [`CipherSuite::cipher`] call away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherSuite {
    Aes128CtsHmacSha196,
    Aes256CtsHmacSha196,
}

impl CipherSuite {
    pub fn cipher(&self) -> Box<dyn Cipher> {
        match self {
            CipherSuite::Aes128CtsHmacSha196 => Box::new(Aes128CtsHmacSha196::new()),
            CipherSuite::Aes256CtsHmacSha196 => Box::new(Aes256CtsHmacSha196::new()),
        }
    }
}

impl TryFrom<&[u8]> for CipherSuite {
    type Error = KerberosCryptoError;

    fn try_from(identifier: &[u8]) -> Result<Self, Self::Error> {
        if identifier.len() != 1 {
            return Err(KerberosCryptoError::AlgorithmIdentifierData(identifier.into()));
        }

        Self::try_from(identifier[0] as usize)
    }
}

impl TryFrom<usize> for CipherSuite {
    type Error = KerberosCryptoError;

    fn try_from(identifier: usize) -> Result<Self, Self::Error> {
        match identifier {
            AES128_CTS_HMAC_SHA1_96 => Ok(Self::Aes128CtsHmacSha196),
            AES256_CTS_HMAC_SHA1_96 => Ok(Self::Aes256CtsHmacSha196),
            _ => Err(KerberosCryptoError::AlgorithmIdentifier(identifier)),
        }
    }
}

impl From<CipherSuite> for usize {
    fn from(cipher: CipherSuite) -> Self {
        match cipher {
            CipherSuite::Aes128CtsHmacSha196 => AES128_CTS_HMAC_SHA1_96,
            CipherSuite::Aes256CtsHmacSha196 => AES256_CTS_HMAC_SHA1_96,
        }
    }
}

impl From<&CipherSuite> for usize {
    fn from(cipher: &CipherSuite) -> Self {
        match cipher {
            CipherSuite::Aes128CtsHmacSha196 => AES128_CTS_HMAC_SHA1_96,
            CipherSuite::Aes256CtsHmacSha196 => AES256_CTS_HMAC_SHA1_96,
        }
    }
}

impl From<&CipherSuite> for u8 {
    fn from(cipher: &CipherSuite) -> Self {
        usize::from(cipher) as u8
    }
}

impl From<CipherSuite> for u8 {
    fn from(cipher: CipherSuite) -> Self {
        usize::from(cipher) as u8
    }
}
