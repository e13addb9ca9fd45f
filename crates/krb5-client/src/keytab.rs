use krb5_proto::data_types::EncryptionKey;
use picky_asn1::wrapper::{ExplicitContextTag0, ExplicitContextTag1, IntegerAsn1, OctetStringAsn1};

/// Long-term key store, the client-side view of a keytab file.
///
/// Parsing the keytab file format is out of scope; implementors only answer
/// point lookups.
pub trait Keytab {
    /// Returns the key for `(principal, realm, kvno, etype)` or `None` when
    /// the keytab holds no matching entry.
    fn get_key(&self, principal: &str, realm: &str, kvno: u32, etype: usize) -> Option<EncryptionKey>;
}

/// One keytab record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeytabEntry {
    pub principal: String,
    pub realm: String,
    pub kvno: u32,
    pub etype: usize,
    pub key: Vec<u8>,
}

/// In-memory keytab, enough for clients that obtain keys out of band and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeytab {
    entries: Vec<KeytabEntry>,
}

impl MemoryKeytab {
    pub fn new(entries: Vec<KeytabEntry>) -> Self {
        Self { entries }
    }

    pub fn add_entry(&mut self, entry: KeytabEntry) {
        self.entries.push(entry);
    }
}

impl Keytab for MemoryKeytab {
    fn get_key(&self, principal: &str, realm: &str, kvno: u32, etype: usize) -> Option<EncryptionKey> {
        self.entries
            .iter()
            .find(|entry| {
                entry.principal == principal && entry.realm == realm && entry.kvno == kvno && entry.etype == etype
            })
            .map(|entry| EncryptionKey {
                key_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![entry.etype as u8])),
                key_value: ExplicitContextTag1::from(OctetStringAsn1::from(entry.key.clone())),
            })
    }
}
