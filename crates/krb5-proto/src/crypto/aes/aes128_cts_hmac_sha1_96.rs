use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::{
    Checksum, ChecksumSuite, Cipher, CipherSuite, DecryptWithoutChecksum, EncryptWithoutChecksum,
    KerberosCryptoError, KerberosCryptoResult,
};

use super::decrypt::{decrypt_message, decrypt_message_no_checksum};
use super::encrypt::{encrypt_message, encrypt_message_no_checksum};
use super::key_derivation::{derive_key_from_password, derive_key_from_password_params, random_to_key};
use super::{parse_s2k_params, AesSize, AES128_KEY_SIZE, AES_BLOCK_SIZE, AES_DEFAULT_S2K_PARAMS};

/// [AES128-CTS-HMAC-SHA1-96](https://www.rfc-editor.org/rfc/rfc3962.html#section-7), enctype 17.
///
/// Identical to the 256-bit profile except for the key and seed lengths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aes128CtsHmacSha196;

impl Aes128CtsHmacSha196 {
    pub fn new() -> Self {
        Self
    }
}

impl Cipher for Aes128CtsHmacSha196 {
    fn key_size(&self) -> usize {
        AES128_KEY_SIZE
    }

    fn seed_bit_len(&self) -> usize {
        self.key_size() * 8
    }

    fn confounder_byte_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn cipher_type(&self) -> CipherSuite {
        CipherSuite::Aes128CtsHmacSha196
    }

    fn checksum_type(&self) -> ChecksumSuite {
        ChecksumSuite::HmacSha196Aes128
    }

    fn default_s2k_params(&self) -> &'static [u8] {
        &AES_DEFAULT_S2K_PARAMS
    }

    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> Result<Vec<u8>, KerberosCryptoError> {
        let mut confounder = [0; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut confounder);

        encrypt_message(key, key_usage, payload, &AesSize::Aes128, confounder)
    }

    fn encrypt_no_checksum(
        &self,
        key: &[u8],
        key_usage: i32,
        payload: &[u8],
    ) -> KerberosCryptoResult<EncryptWithoutChecksum> {
        let mut confounder = [0; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut confounder);

        encrypt_message_no_checksum(key, key_usage, payload, &AesSize::Aes128, confounder)
    }

    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        decrypt_message(key, key_usage, cipher_data, &AesSize::Aes128)
    }

    fn decrypt_no_checksum(
        &self,
        key: &[u8],
        key_usage: i32,
        cipher_data: &[u8],
    ) -> KerberosCryptoResult<DecryptWithoutChecksum> {
        decrypt_message_no_checksum(key, key_usage, cipher_data, &AesSize::Aes128)
    }

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        self.checksum_type().hasher().checksum(key, key_usage, payload)
    }

    fn generate_key_from_password(&self, password: &[u8], salt: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        derive_key_from_password(password, salt, &AesSize::Aes128)
    }

    fn generate_key_from_password_params(
        &self,
        password: &[u8],
        salt: &[u8],
        s2k_params: &[u8],
    ) -> KerberosCryptoResult<Vec<u8>> {
        let iterations = parse_s2k_params(s2k_params)?;

        derive_key_from_password_params(password, salt, iterations, &AesSize::Aes128)
    }

    fn random_to_key(&self, key: Vec<u8>) -> Vec<u8> {
        random_to_key(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::{Cipher, KerberosCryptoError};

    use super::Aes128CtsHmacSha196;

    #[test]
    fn roundtrip() {
        let cipher = Aes128CtsHmacSha196::new();
        let key = vec![0x11; 16];

        for len in [1_usize, 16, 17, 48, 99] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 3) as u8).collect();
            let encrypted = cipher.encrypt(&key, 3, &plaintext).unwrap();

            assert_eq!(16 + len + 12, encrypted.len());
            assert_eq!(plaintext, cipher.decrypt(&key, 3, &encrypted).unwrap());
        }
    }

    #[test]
    fn rejects_wrong_key_size() {
        let cipher = Aes128CtsHmacSha196::new();

        assert!(matches!(
            cipher.encrypt(&[0x11; 32], 3, b"payload"),
            Err(KerberosCryptoError::KeyLength(32, 16))
        ));
    }

    #[test]
    fn rejects_truncated_cipher_data() {
        let cipher = Aes128CtsHmacSha196::new();

        // shorter than confounder + mac
        assert!(matches!(
            cipher.decrypt(&[0x11; 16], 3, &[0; 20]),
            Err(KerberosCryptoError::CipherLength(20, 28))
        ));
    }
}
