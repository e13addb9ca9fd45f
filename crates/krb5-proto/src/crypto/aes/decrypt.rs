use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use aes::{Aes128, Aes256};
use cbc::Decryptor;

use crate::crypto::common::hmac_sha1_verify;
use crate::crypto::utils::{usage_ke, usage_ki};
use crate::crypto::{DecryptWithoutChecksum, KerberosCryptoError, KerberosCryptoResult};

use super::key_derivation::derive_key;
use super::{swap_two_last_blocks, AesSize, AES_BLOCK_SIZE, AES_MAC_SIZE};

pub type Aes256CbcDecryptor = Decryptor<Aes256>;
pub type Aes128CbcDecryptor = Decryptor<Aes128>;

//= [Cryptosystem Profile Based on Simplified Profile](https://datatracker.ietf.org/doc/html/rfc3961#section-5.3) =//
pub fn decrypt_message(
    key: &[u8],
    key_usage: i32,
    cipher_data: &[u8],
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    let decryption_result = decrypt_message_no_checksum(key, key_usage, cipher_data, aes_size)?;

    let mut conf_and_plaintext = decryption_result.confounder;
    conf_and_plaintext.extend_from_slice(&decryption_result.plaintext);

    // if (H1 != HMAC(Ki, P1)[1..h]) then the message was modified. The
    // comparison must not short-circuit.
    if !hmac_sha1_verify(&decryption_result.ki, &conf_and_plaintext, &decryption_result.checksum) {
        return Err(KerberosCryptoError::IntegrityCheck);
    }

    Ok(decryption_result.plaintext)
}

/// Returns (Plaintext, conf, H1, Ki)
pub fn decrypt_message_no_checksum(
    key: &[u8],
    key_usage: i32,
    cipher_data: &[u8],
    aes_size: &AesSize,
) -> KerberosCryptoResult<DecryptWithoutChecksum> {
    if cipher_data.len() < AES_BLOCK_SIZE + AES_MAC_SIZE {
        return Err(KerberosCryptoError::CipherLength(
            cipher_data.len(),
            AES_BLOCK_SIZE + AES_MAC_SIZE,
        ));
    }

    // (C1, H1) = ciphertext
    let (cipher_data, checksum) = cipher_data.split_at(cipher_data.len() - AES_MAC_SIZE);

    // Key usage zero: the caller's key is the specific key (see encrypt.rs).
    let ke = if key_usage == 0 {
        key.to_vec()
    } else {
        derive_key(key, &usage_ke(key_usage), aes_size)?
    };
    // (P1, newIV) = D(Ke, C1, oldstate.ivec)
    let plaintext = decrypt_aes_cts(&ke, cipher_data, aes_size)?;

    let ki = if key_usage == 0 {
        key.to_vec()
    } else {
        derive_key(key, &usage_ki(key_usage), aes_size)?
    };

    // The first block is the random confounder.
    let (confounder, plaintext) = plaintext.split_at(AES_BLOCK_SIZE);

    Ok(DecryptWithoutChecksum {
        plaintext: plaintext.to_vec(),
        confounder: confounder.to_vec(),
        checksum: checksum.to_vec(),
        ki,
    })
}

/// Raw AES-CBC with an all-zero IV over a block-aligned ciphertext.
pub fn decrypt_aes_cbc(key: &[u8], cipher_data: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    // RFC 3961: initial cipher state, all bits zero.
    let iv = [0_u8; AES_BLOCK_SIZE];

    let mut cipher_data = cipher_data.to_vec();

    match aes_size {
        AesSize::Aes256 => {
            Aes256CbcDecryptor::new_from_slices(key, &iv)?.decrypt_padded_mut::<NoPadding>(&mut cipher_data)?;
        }
        AesSize::Aes128 => {
            Aes128CbcDecryptor::new_from_slices(key, &iv)?.decrypt_padded_mut::<NoPadding>(&mut cipher_data)?;
        }
    }

    Ok(cipher_data)
}

//= [CTS using CBC](https://en.wikipedia.org/wiki/Ciphertext_stealing#CBC_ciphertext_stealing_decryption_using_a_standard_CBC_interface) =//
pub fn decrypt_aes_cts(key: &[u8], cipher_data: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if cipher_data.len() < AES_BLOCK_SIZE {
        return Err(KerberosCryptoError::CipherLength(cipher_data.len(), AES_BLOCK_SIZE));
    }

    if cipher_data.len() == AES_BLOCK_SIZE {
        return decrypt_aes_cbc(key, cipher_data, aes_size);
    }

    let pad_length = (AES_BLOCK_SIZE - (cipher_data.len() % AES_BLOCK_SIZE)) % AES_BLOCK_SIZE;

    let mut cipher = cipher_data.to_vec();

    if pad_length != 0 {
        // Recover the stolen tail of the next-to-last ciphertext block by
        // decrypting the final full block with a zero IV.
        let start = cipher.len() + pad_length - AES_BLOCK_SIZE * 2;

        let dn = decrypt_aes_cbc(key, &cipher[start..start + AES_BLOCK_SIZE], aes_size)?;

        let dn_len = dn.len();
        cipher.extend_from_slice(&dn[dn_len - pad_length..]);
    }

    if cipher.len() >= 2 * AES_BLOCK_SIZE {
        swap_two_last_blocks(&mut cipher)?;
    }

    let mut plaintext = decrypt_aes_cbc(key, &cipher, aes_size)?;

    plaintext.resize(cipher.len() - pad_length, 0);

    Ok(plaintext)
}
