use std::fmt;

use krb5_proto::constants::types::{PA_ETYPE_INFO2_TYPE, PA_ETYPE_INFO_TYPE, PA_PW_SALT_TYPE};
use krb5_proto::crypto::CipherSuite;
use krb5_proto::data_types::{EncryptionKey, EtypeInfo, EtypeInfo2, PaData, PrincipalName};
use picky_asn1::wrapper::{ExplicitContextTag0, ExplicitContextTag1, IntegerAsn1, OctetStringAsn1};

use crate::client::extractors::asn1_uint;
use crate::keytab::Keytab;
use crate::{KerberosClientError, Result};

enum Secret {
    Password(String),
    Keytab(Box<dyn Keytab>),
}

/// What the client authenticates with: a user name plus either a password
/// (string-to-key at exchange time) or a keytab holding long-term keys.
pub struct Credentials {
    pub username: String,
    secret: Secret,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = match self.secret {
            Secret::Password(_) => "password(redacted)",
            Secret::Keytab(_) => "keytab",
        };

        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &secret)
            .finish()
    }
}

impl Credentials {
    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: Secret::Password(password.into()),
        }
    }

    pub fn with_keytab(username: impl Into<String>, keytab: impl Keytab + 'static) -> Self {
        Self {
            username: username.into(),
            secret: Secret::Keytab(Box::new(keytab)),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty()
    }

    /// Resolves the client's long-term key for one exchange.
    ///
    /// Password credentials run string-to-key with whatever salt and
    /// enctype hints the KDC attached; keytab credentials are a point
    /// lookup by `(principal, realm, kvno, enctype)`.
    pub(crate) fn client_key(
        &self,
        cname: &PrincipalName,
        realm: &str,
        etype: &CipherSuite,
        kvno: u32,
        pa_datas: &[PaData],
    ) -> Result<(EncryptionKey, CipherSuite)> {
        match &self.secret {
            Secret::Password(password) => get_key_from_password(password, cname, realm, etype, pa_datas),
            Secret::Keytab(keytab) => {
                let key = keytab
                    .get_key(&self.username, realm, kvno, usize::from(etype))
                    .ok_or_else(|| KerberosClientError::KeytabEntryNotFound {
                        principal: self.username.clone(),
                        realm: realm.to_owned(),
                        kvno,
                        etype: usize::from(etype),
                    })?;

                Ok((key, etype.clone()))
            }
        }
    }
}

const PW_SALT: u32 = PA_PW_SALT_TYPE[0] as u32;
const ETYPE_INFO: u32 = PA_ETYPE_INFO_TYPE[0] as u32;
const ETYPE_INFO2: u32 = PA_ETYPE_INFO2_TYPE[0] as u32;

/// Derives the client key from a password, honoring the KDC's PA-DATA salt
/// and enctype hints.
///
/// Precedence follows the highest PA-DATA type number seen so far, which
/// orders PA-ETYPE-INFO2 (19) over PA-ETYPE-INFO (11) over PA-PW-SALT (3):
/// a lower-ranked hint arriving after a higher-ranked one is ignored.
pub(crate) fn get_key_from_password(
    password: &str,
    cname: &PrincipalName,
    realm: &str,
    requested_etype: &CipherSuite,
    pa_datas: &[PaData],
) -> Result<(EncryptionKey, CipherSuite)> {
    let mut etype = requested_etype.clone();
    let mut s2k_params = etype.cipher().default_s2k_params().to_vec();
    let mut salt = String::new();
    let mut max_pa_type = 0;

    fn apply_salt(salt: &mut String, new_salt: String) {
        if !salt.is_empty() && *salt != new_salt {
            warn!(old = %salt, new = %new_salt, "conflicting salt hints in PA-DATA, keeping the later one");
        }
        *salt = new_salt;
    }

    for pa_data in pa_datas {
        let pa_type = asn1_uint(&pa_data.padata_type.0);

        if pa_type < max_pa_type {
            continue;
        }

        match pa_type {
            PW_SALT => {
                apply_salt(&mut salt, String::from_utf8_lossy(&pa_data.padata_data.0 .0).into_owned());
                max_pa_type = pa_type;
            }
            ETYPE_INFO => {
                let entries: EtypeInfo = picky_asn1_der::from_bytes(&pa_data.padata_data.0 .0)?;
                let Some(entry) = entries.0.first() else {
                    continue;
                };

                let hinted_etype = asn1_uint(&entry.etype.0) as usize;
                if hinted_etype != usize::from(&etype) {
                    etype = CipherSuite::try_from(hinted_etype)?;
                }

                if let Some(entry_salt) = entry.salt.0.as_ref() {
                    apply_salt(&mut salt, String::from_utf8_lossy(&entry_salt.0 .0).into_owned());
                }
                max_pa_type = pa_type;
            }
            ETYPE_INFO2 => {
                let entries: EtypeInfo2 = picky_asn1_der::from_bytes(&pa_data.padata_data.0 .0)?;
                let Some(entry) = entries.0.first() else {
                    continue;
                };

                let hinted_etype = asn1_uint(&entry.etype.0) as usize;
                if hinted_etype != usize::from(&etype) {
                    etype = CipherSuite::try_from(hinted_etype)?;
                }

                if let Some(params) = entry.s2kparams.0.as_ref() {
                    if params.0 .0.len() == 4 {
                        s2k_params = params.0 .0.clone();
                    }
                }

                if let Some(entry_salt) = entry.salt.0.as_ref() {
                    apply_salt(&mut salt, entry_salt.0 .0.as_utf8().to_owned());
                }
                max_pa_type = pa_type;
            }
            _ => {}
        }
    }

    if salt.is_empty() {
        salt = cname.default_salt(realm);
    }

    let key = etype
        .cipher()
        .generate_key_from_password_params(password.as_bytes(), salt.as_bytes(), &s2k_params)?;

    let key = EncryptionKey {
        key_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![u8::from(&etype)])),
        key_value: ExplicitContextTag1::from(OctetStringAsn1::from(key)),
    };

    Ok((key, etype))
}

#[cfg(test)]
mod tests {
    use krb5_proto::constants::types::{NT_PRINCIPAL, PA_ETYPE_INFO2_TYPE, PA_PW_SALT_TYPE};
    use krb5_proto::crypto::CipherSuite;
    use krb5_proto::data_types::{EtypeInfo2, EtypeInfo2Entry, PaData, PrincipalName};
    use picky_asn1::restricted_string::Ia5String;
    use picky_asn1::wrapper::{
        Asn1SequenceOf, ExplicitContextTag0, ExplicitContextTag1, ExplicitContextTag2, GeneralStringAsn1,
        IntegerAsn1, OctetStringAsn1, Optional,
    };

    use super::get_key_from_password;

    fn cname(user: &str) -> PrincipalName {
        PrincipalName {
            name_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![NT_PRINCIPAL])),
            name_string: ExplicitContextTag1::from(Asn1SequenceOf::from(vec![GeneralStringAsn1::from(
                Ia5String::from_string(user.to_owned()).unwrap(),
            )])),
        }
    }

    fn pa_pw_salt(salt: &str) -> PaData {
        PaData {
            padata_type: ExplicitContextTag1::from(IntegerAsn1::from(PA_PW_SALT_TYPE.to_vec())),
            padata_data: ExplicitContextTag2::from(OctetStringAsn1::from(salt.as_bytes().to_vec())),
        }
    }

    fn pa_etype_info2(etype: u8, salt: &str, s2kparams: Option<Vec<u8>>) -> PaData {
        let entries = EtypeInfo2::from(vec![EtypeInfo2Entry {
            etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![etype])),
            salt: Optional::from(Some(ExplicitContextTag1::from(GeneralStringAsn1::from(
                Ia5String::from_string(salt.to_owned()).unwrap(),
            )))),
            s2kparams: Optional::from(s2kparams.map(|params| ExplicitContextTag2::from(OctetStringAsn1::from(params)))),
        }]);

        PaData {
            padata_type: ExplicitContextTag1::from(IntegerAsn1::from(PA_ETYPE_INFO2_TYPE.to_vec())),
            padata_data: ExplicitContextTag2::from(OctetStringAsn1::from(picky_asn1_der::to_vec(&entries).unwrap())),
        }
    }

    #[test]
    fn default_salt_is_realm_then_components() {
        let (with_default, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[],
        )
        .unwrap();

        let (with_explicit, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_pw_salt("EXAMPLE.COMuser")],
        )
        .unwrap();

        assert_eq!(with_default, with_explicit);
    }

    #[test]
    fn etype_info2_overrides_pw_salt() {
        let (key_both, etype) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_pw_salt("ignored-salt"), pa_etype_info2(18, "EXAMPLE.COMuser", None)],
        )
        .unwrap();

        let (key_info2_only, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(18, "EXAMPLE.COMuser", None)],
        )
        .unwrap();

        assert_eq!(CipherSuite::Aes256CtsHmacSha196, etype);
        assert_eq!(key_both, key_info2_only);
    }

    #[test]
    fn lower_ranked_hint_after_higher_is_ignored() {
        let (key, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(18, "EXAMPLE.COMuser", None), pa_pw_salt("late-salt")],
        )
        .unwrap();

        let (expected, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(18, "EXAMPLE.COMuser", None)],
        )
        .unwrap();

        assert_eq!(expected, key);
    }

    #[test]
    fn etype_info2_switches_enctype() {
        let (key, etype) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(17, "EXAMPLE.COMuser", None)],
        )
        .unwrap();

        assert_eq!(CipherSuite::Aes128CtsHmacSha196, etype);
        assert_eq!(16, key.key_value.0 .0.len());
    }

    #[test]
    fn etype_info2_s2kparams_change_the_key() {
        let (key_default, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(18, "EXAMPLE.COMuser", None)],
        )
        .unwrap();

        let (key_one_iteration, _) = get_key_from_password(
            "password",
            &cname("user"),
            "EXAMPLE.COM",
            &CipherSuite::Aes256CtsHmacSha196,
            &[pa_etype_info2(18, "EXAMPLE.COMuser", Some(vec![0, 0, 0, 1]))],
        )
        .unwrap();

        assert_ne!(key_default, key_one_iteration);
    }
}
