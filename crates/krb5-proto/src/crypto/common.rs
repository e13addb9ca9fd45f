use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

//= [Checksum Profiles Based on Simplified Profile](https://datatracker.ietf.org/doc/html/rfc3961#section-5.4) =//
pub fn hmac_sha1(key: &[u8], payload: &[u8], mac_size: usize) -> Vec<u8> {
    let mut hmacker = HmacSha1::new_from_slice(key).expect("HMAC-SHA1 accepts keys of any length");

    hmacker.update(payload);

    let mut hmac = hmacker.finalize().into_bytes().to_vec();
    hmac.truncate(mac_size);

    hmac
}

/// Constant-time comparison of a truncated HMAC-SHA1 against `expected`.
pub fn hmac_sha1_verify(key: &[u8], payload: &[u8], expected: &[u8]) -> bool {
    let mut hmacker = HmacSha1::new_from_slice(key).expect("HMAC-SHA1 accepts keys of any length");

    hmacker.update(payload);

    hmacker.verify_truncated_left(expected).is_ok()
}
