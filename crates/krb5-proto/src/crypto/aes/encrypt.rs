use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes256};
use cbc::Encryptor;

use crate::crypto::aes::key_derivation::derive_key;
use crate::crypto::common::hmac_sha1;
use crate::crypto::utils::{usage_ke, usage_ki};
use crate::crypto::{EncryptWithoutChecksum, KerberosCryptoError, KerberosCryptoResult};

use super::{swap_two_last_blocks, AesSize, AES_BLOCK_SIZE, AES_MAC_SIZE};

pub type Aes256CbcEncryptor = Encryptor<Aes256>;
pub type Aes128CbcEncryptor = Encryptor<Aes128>;

//= [Cryptosystem Profile Based on Simplified Profile](https://datatracker.ietf.org/doc/html/rfc3961#section-5.3) =//
pub fn encrypt_message(
    key: &[u8],
    key_usage: i32,
    payload: &[u8],
    aes_size: &AesSize,
    // conf = Random string of length c
    confounder: [u8; AES_BLOCK_SIZE],
) -> KerberosCryptoResult<Vec<u8>> {
    let mut encryption_result = encrypt_message_no_checksum(key, key_usage, payload, aes_size, confounder)?;

    let mut conf_and_payload = Vec::with_capacity(AES_BLOCK_SIZE + payload.len());
    conf_and_payload.extend_from_slice(&confounder);
    conf_and_payload.extend_from_slice(payload);

    // H1 = HMAC(Ki, conf | plaintext | pad)
    let hmac = hmac_sha1(&encryption_result.ki, &conf_and_payload, AES_MAC_SIZE);

    // ciphertext = C1 | H1[1..h]
    encryption_result.encrypted.extend_from_slice(&hmac);

    Ok(encryption_result.encrypted)
}

/// Returns (C1, conf, Ki)
pub fn encrypt_message_no_checksum(
    key: &[u8],
    key_usage: i32,
    payload: &[u8],
    aes_size: &AesSize,
    // conf = Random string of length c
    confounder: [u8; AES_BLOCK_SIZE],
) -> KerberosCryptoResult<EncryptWithoutChecksum> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    let mut data_to_encrypt = Vec::with_capacity(AES_BLOCK_SIZE + payload.len());
    data_to_encrypt.extend_from_slice(&confounder);
    data_to_encrypt.extend_from_slice(payload);

    // A key usage of zero means the caller already derived (or otherwise
    // owns) the specific key: use it as-is for both Ke and Ki.
    let ke = if key_usage == 0 {
        key.to_vec()
    } else {
        derive_key(key, &usage_ke(key_usage), aes_size)?
    };
    // (C1, newIV) = E(Ke, conf | plaintext | pad, oldstate.ivec)
    let encrypted = encrypt_aes_cts(&ke, &data_to_encrypt, aes_size)?;

    let ki = if key_usage == 0 {
        key.to_vec()
    } else {
        derive_key(key, &usage_ki(key_usage), aes_size)?
    };

    Ok(EncryptWithoutChecksum {
        encrypted,
        confounder: confounder.to_vec(),
        ki,
    })
}

/// Raw AES-CBC with an all-zero IV over an already block-aligned payload.
pub fn encrypt_aes_cbc(key: &[u8], plaintext: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    // RFC 3961: initial cipher state, all bits zero.
    let iv = [0_u8; AES_BLOCK_SIZE];

    let mut payload = plaintext.to_vec();
    let payload_len = payload.len();

    match aes_size {
        AesSize::Aes256 => {
            Aes256CbcEncryptor::new_from_slices(key, &iv)?
                .encrypt_padded_mut::<NoPadding>(&mut payload, payload_len)?;
        }
        AesSize::Aes128 => {
            Aes128CbcEncryptor::new_from_slices(key, &iv)?
                .encrypt_padded_mut::<NoPadding>(&mut payload, payload_len)?;
        }
    }

    Ok(payload)
}

//= [CTS using CBC](https://en.wikipedia.org/wiki/Ciphertext_stealing#CBC_ciphertext_stealing_encryption_using_a_standard_CBC_interface) =//
pub fn encrypt_aes_cts(key: &[u8], payload: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    let pad_length = (AES_BLOCK_SIZE - (payload.len() % AES_BLOCK_SIZE)) % AES_BLOCK_SIZE;

    let mut padded_payload = payload.to_vec();
    padded_payload.resize(padded_payload.len() + pad_length, 0);

    let mut cipher = encrypt_aes_cbc(key, &padded_payload, aes_size)?;

    if cipher.len() <= AES_BLOCK_SIZE {
        return Ok(cipher);
    }

    if cipher.len() >= 2 * AES_BLOCK_SIZE {
        swap_two_last_blocks(&mut cipher)?;
    }

    // Ciphertext stealing keeps the ciphertext exactly as long as the
    // plaintext.
    cipher.resize(payload.len(), 0);

    Ok(cipher)
}
