use crate::crypto::{Checksum, ChecksumSuite, KerberosCryptoResult};

use super::{checksum_sha_aes, AesSize};

/// [HMAC-SHA1-96-AES128](https://www.rfc-editor.org/rfc/rfc3962.html#section-7), checksum type 15.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HmacSha196Aes128;

impl Checksum for HmacSha196Aes128 {
    fn checksum_type(&self) -> ChecksumSuite {
        ChecksumSuite::HmacSha196Aes128
    }

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        checksum_sha_aes(key, key_usage, payload, &AesSize::Aes128)
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::{Checksum, ChecksumSuite};

    #[test]
    fn checksum_is_deterministic_and_usage_scoped() {
        let hasher = ChecksumSuite::HmacSha196Aes128.hasher();
        let key = [0x24; 16];

        let a = hasher.checksum(&key, 6, b"kdc-req-body").unwrap();
        let b = hasher.checksum(&key, 6, b"kdc-req-body").unwrap();
        let c = hasher.checksum(&key, 7, b"kdc-req-body").unwrap();

        assert_eq!(12, a.len());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
