use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::crypto::nfold::n_fold;
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult, KERBEROS};

use super::encrypt::encrypt_aes_cbc;
use super::AesSize;

/// https://www.rfc-editor.org/rfc/rfc3962.html#section-4
/// Default iteration count (rounds) for the pbkdf2 function:
/// default string-to-key parameters        00 00 10 00
const AES_ITERATION_COUNT: u32 = 0x1000;

/// https://www.rfc-editor.org/rfc/rfc3961.html#section-3
/// random-to-key (bitstring[K])->(protocol-key)
///
/// For AES the random-to-key function is the identity function:
/// https://www.rfc-editor.org/rfc/rfc3962.html#section-6
pub fn random_to_key(data: Vec<u8>) -> Vec<u8> {
    data
}

/// Parses enctype-opaque string-to-key parameters into a PBKDF2 iteration
/// count: exactly four big-endian octets, zero not allowed.
pub fn parse_s2k_params(s2k_params: &[u8]) -> KerberosCryptoResult<u32> {
    let iterations = u32::from_be_bytes(
        s2k_params
            .try_into()
            .map_err(|_| KerberosCryptoError::S2kParamsLength(s2k_params.len()))?,
    );

    if iterations == 0 {
        return Err(KerberosCryptoError::S2kIterationCount);
    }

    Ok(iterations)
}

//= [DK, DR](https://datatracker.ietf.org/doc/html/rfc3961#section-5.1) =//
//
// K1 = E(Key, n-fold(Constant)), Ki+1 = E(Key, Ki); concatenate and truncate
// to the seed length, then random-to-key (identity for AES).
pub fn derive_key(key: &[u8], well_known: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    let mut n_fold_usage = n_fold(well_known, aes_size.block_bit_len());

    let key_len = aes_size.seed_bit_len() / 8;
    let mut out = Vec::with_capacity(key_len);

    while out.len() < key_len {
        n_fold_usage = encrypt_aes_cbc(key, &n_fold_usage, aes_size)?;
        out.extend_from_slice(&n_fold_usage);
    }

    out.truncate(key_len);

    Ok(random_to_key(out))
}

/// String-to-key with the RFC 3962 default iteration count.
pub fn derive_key_from_password<P: AsRef<[u8]>, S: AsRef<[u8]>>(
    password: P,
    salt: S,
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    derive_key_from_password_params(password.as_ref(), salt.as_ref(), AES_ITERATION_COUNT, aes_size)
}

/// String-to-key with an explicit iteration count:
/// `DK(random-to-key(PBKDF2(passphrase, salt, iter, keylength)), "kerberos")`.
pub fn derive_key_from_password_params(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    if iterations == 0 {
        return Err(KerberosCryptoError::S2kIterationCount);
    }

    let mut tmp = vec![0; aes_size.key_length()];

    pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut tmp);

    let temp_key = random_to_key(tmp);

    derive_key(&temp_key, KERBEROS, aes_size)
}

#[cfg(test)]
mod tests {
    use pbkdf2::pbkdf2_hmac;
    use sha1::Sha1;

    use crate::crypto::aes::AesSize;
    use crate::crypto::KerberosCryptoError;

    use super::{derive_key, derive_key_from_password, derive_key_from_password_params, parse_s2k_params};

    #[test]
    fn usage_scoped_keys_are_deterministic_and_distinct() {
        use crate::crypto::utils::{usage_kc, usage_ke, usage_ki};

        let base_key = [7; 32];

        let kc = derive_key(&base_key, &usage_kc(3), &AesSize::Aes256).unwrap();
        let ke = derive_key(&base_key, &usage_ke(3), &AesSize::Aes256).unwrap();
        let ki = derive_key(&base_key, &usage_ki(3), &AesSize::Aes256).unwrap();

        assert_ne!(kc, ke);
        assert_ne!(ke, ki);
        assert_ne!(kc, ki);

        assert_eq!(kc, derive_key(&base_key, &usage_kc(3), &AesSize::Aes256).unwrap());
    }

    #[test]
    fn aes256_derive_key_from_password() {
        let key = derive_key_from_password("trustno1", "KDC.LOCALsvc-http", &AesSize::Aes256).unwrap();

        assert_eq!(
            &[
                80, 208, 81, 172, 244, 12, 157, 119, 224, 172, 203, 122, 186, 64, 252, 145, 97, 157, 39, 206, 221, 18,
                200, 113, 207, 98, 51, 195, 122, 176, 167, 254
            ],
            key.as_slice()
        );
    }

    #[test]
    fn aes128_derive_key_from_password() {
        let key = derive_key_from_password("trustno1", "KDC.LOCALsvc-http", &AesSize::Aes128).unwrap();

        assert_eq!(
            &[22, 244, 96, 50, 165, 118, 54, 97, 194, 237, 194, 123, 218, 252, 249, 105],
            key.as_slice()
        );
    }

    //= [RFC 3962 B test vectors](https://www.rfc-editor.org/rfc/rfc3962.html#appendix-B) =//
    //
    // String-to-key is PBKDF2 followed by DK with the "kerberos" constant;
    // the RFC publishes both stage outputs.
    #[test]
    fn rfc3962_iteration_count_1() {
        let mut pbkdf2_out = [0; 16];
        pbkdf2_hmac::<Sha1>(b"password", b"ATHENA.MIT.EDUraeburn", 1, &mut pbkdf2_out);
        assert_eq!(
            [205, 237, 181, 40, 27, 178, 248, 1, 86, 90, 17, 34, 178, 86, 53, 21],
            pbkdf2_out
        );

        let key =
            derive_key_from_password_params(b"password", b"ATHENA.MIT.EDUraeburn", 1, &AesSize::Aes128).unwrap();
        assert_eq!(
            &[66, 38, 60, 110, 137, 244, 252, 40, 184, 223, 104, 238, 9, 121, 159, 21],
            key.as_slice()
        );
    }

    #[test]
    fn rfc3962_iteration_count_2() {
        let key =
            derive_key_from_password_params(b"password", b"ATHENA.MIT.EDUraeburn", 2, &AesSize::Aes128).unwrap();
        assert_eq!(
            &[198, 81, 191, 41, 226, 48, 10, 194, 127, 164, 105, 214, 147, 189, 218, 19],
            key.as_slice()
        );

        let key =
            derive_key_from_password_params(b"password", b"ATHENA.MIT.EDUraeburn", 2, &AesSize::Aes256).unwrap();
        assert_eq!(
            &[
                162, 225, 109, 22, 179, 96, 105, 193, 53, 213, 233, 210, 226, 95, 137, 97, 2, 104, 86, 24, 185, 89,
                20, 180, 103, 198, 118, 34, 34, 88, 36, 255
            ],
            key.as_slice()
        );
    }

    #[test]
    fn rfc3962_iteration_count_1200() {
        let key = derive_key_from_password_params(b"password", b"ATHENA.MIT.EDUraeburn", 1200, &AesSize::Aes128)
            .unwrap();

        assert_eq!(
            &[76, 1, 205, 70, 214, 50, 208, 30, 109, 190, 35, 10, 1, 237, 100, 42],
            key.as_slice()
        );
    }

    #[test]
    fn s2k_params_roundtrip() {
        assert_eq!(4096, parse_s2k_params(&[0x00, 0x00, 0x10, 0x00]).unwrap());
        assert_eq!(1, parse_s2k_params(&[0x00, 0x00, 0x00, 0x01]).unwrap());
    }

    #[test]
    fn s2k_params_rejects_bad_length() {
        assert!(matches!(
            parse_s2k_params(&[0x10, 0x00]),
            Err(KerberosCryptoError::S2kParamsLength(2))
        ));
    }

    #[test]
    fn s2k_params_rejects_zero_iterations() {
        assert!(matches!(
            parse_s2k_params(&[0x00, 0x00, 0x00, 0x00]),
            Err(KerberosCryptoError::S2kIterationCount)
        ));
    }
}
