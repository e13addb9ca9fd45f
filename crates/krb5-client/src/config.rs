use std::time::Duration;

use krb5_proto::crypto::CipherSuite;

/// Client-side configuration, the subset of `krb5.conf` libdefaults this
/// core consumes. Parsing configuration files is the caller's concern; the
/// struct is filled directly.
#[derive(Debug, Clone)]
pub struct KrbConfig {
    /// Default realm, e.g. `EXAMPLE.COM`.
    pub realm: String,
    /// KDC address, e.g. `kdc.example.com:88`. Consumed by the TCP transport;
    /// custom transports may ignore it.
    pub kdc: String,
    /// Ticket enctypes in preference order (strongest first).
    pub default_tkt_enctypes: Vec<CipherSuite>,
    /// Transport timeout for one KDC round trip.
    pub kdc_timeout: Duration,
    /// Maximum accepted difference between client and KDC clocks.
    pub max_time_skew: Duration,
    /// Requested ticket lifetime (the `till` field of requests).
    pub ticket_lifetime: Duration,
    /// Whether to request renewable tickets.
    pub renewable: bool,
}

impl KrbConfig {
    pub fn new(realm: impl Into<String>, kdc: impl Into<String>) -> Self {
        KrbConfig {
            realm: realm.into(),
            kdc: kdc.into(),
            ..Default::default()
        }
    }
}

impl Default for KrbConfig {
    fn default() -> Self {
        KrbConfig {
            realm: String::new(),
            kdc: String::new(),
            default_tkt_enctypes: vec![CipherSuite::Aes256CtsHmacSha196, CipherSuite::Aes128CtsHmacSha196],
            kdc_timeout: Duration::from_secs(30),
            max_time_skew: Duration::from_secs(300),
            ticket_lifetime: Duration::from_secs(10 * 60 * 60),
            renewable: false,
        }
    }
}
