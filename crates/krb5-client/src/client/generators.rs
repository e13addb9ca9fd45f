use krb5_proto::constants::key_usages::{AS_REQ_TIMESTAMP, TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR};
use krb5_proto::constants::types::{
    AP_REQ_MSG_TYPE, AS_REQ_MSG_TYPE, NT_PRINCIPAL, NT_SRV_INST, PA_ENC_TIMESTAMP, PA_TGS_REQ_TYPE,
    TGS_REQ_MSG_TYPE,
};
use krb5_proto::constants::{KERBEROS_VERSION, TGT_SERVICE_NAME};
use krb5_proto::crypto::CipherSuite;
use krb5_proto::data_types::{
    ApOptions, Authenticator, AuthenticatorInner, Checksum, EncryptedData, EncryptionKey, KerberosStringAsn1,
    KerberosTime, Microseconds, PaData, PaEncTsEnc, PrincipalName, Realm, Ticket,
};
use krb5_proto::messages::{ApReq, ApReqInner, AsReq, KdcReq, KdcReqBody, TgsReq};
use picky_asn1::bit_string::BitString;
use picky_asn1::date::GeneralizedTime;
use picky_asn1::restricted_string::Ia5String;
use picky_asn1::wrapper::{
    Asn1SequenceOf, BitStringAsn1, ExplicitContextTag0, ExplicitContextTag1, ExplicitContextTag2,
    ExplicitContextTag3, ExplicitContextTag4, ExplicitContextTag5, ExplicitContextTag7, ExplicitContextTag8,
    IntegerAsn1, OctetStringAsn1, Optional,
};
use time::OffsetDateTime;

use crate::config::KrbConfig;
use crate::{KerberosClientError, Result};

// KDCOptions bit numbers (RFC 4120 section 5.4.1).
const KDC_OPT_RENEWABLE: usize = 8;
const KDC_OPT_RENEWABLE_OK: usize = 27;

pub(crate) fn kerberos_string(value: &str) -> Result<KerberosStringAsn1> {
    Ia5String::from_string(value.to_owned())
        .map(KerberosStringAsn1::from)
        .map_err(|_| KerberosClientError::InvalidKerberosString(value.to_owned()))
}

pub(crate) fn principal_name(name_type: u8, components: &[&str]) -> Result<PrincipalName> {
    let name_string = components
        .iter()
        .map(|component| kerberos_string(component))
        .collect::<Result<Vec<_>>>()?;

    Ok(PrincipalName {
        name_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![name_type])),
        name_string: ExplicitContextTag1::from(Asn1SequenceOf::from(name_string)),
    })
}

/// Splits `HTTP/www.example.com` into a KRB-NT-PRINCIPAL name with one
/// component per `/`-separated part.
pub(crate) fn parse_spn(spn: &str) -> Result<PrincipalName> {
    let components: Vec<&str> = spn.split('/').collect();

    principal_name(NT_PRINCIPAL, &components)
}

pub(crate) fn kerberos_time(time: OffsetDateTime) -> KerberosTime {
    KerberosTime::from(GeneralizedTime::from(time))
}

/// Microseconds within the current second, clamped to the ASN.1 range.
pub(crate) fn microseconds(time: OffsetDateTime) -> Microseconds {
    Microseconds::from(time.microsecond().min(999_999).to_be_bytes().to_vec())
}

pub(crate) fn generate_kdc_options(renewable: bool) -> BitStringAsn1 {
    let mut flags = vec![0_u8; 4];

    if renewable {
        flags[KDC_OPT_RENEWABLE / 8] |= 0x80 >> (KDC_OPT_RENEWABLE % 8);
        flags[KDC_OPT_RENEWABLE_OK / 8] |= 0x80 >> (KDC_OPT_RENEWABLE_OK % 8);
    }

    BitStringAsn1::from(BitString::with_bytes(flags))
}

fn etype_preference_list(config: &KrbConfig) -> Asn1SequenceOf<IntegerAsn1> {
    Asn1SequenceOf::from(
        config
            .default_tkt_enctypes
            .iter()
            .map(|etype| IntegerAsn1::from(vec![u8::from(etype)]))
            .collect::<Vec<_>>(),
    )
}

/// Initial AS-REQ: no pre-authentication data. The KDC either answers with
/// an AS-REP right away or demands a PA-ENC-TIMESTAMP via KRB-ERROR 25.
pub(crate) fn generate_as_req(config: &KrbConfig, username: &str, nonce: u32, now: OffsetDateTime) -> Result<AsReq> {
    let cname = principal_name(NT_PRINCIPAL, &[username])?;
    let sname = principal_name(NT_SRV_INST, &[TGT_SERVICE_NAME, &config.realm])?;

    let till = now + config.ticket_lifetime;

    Ok(AsReq::from(KdcReq {
        pvno: ExplicitContextTag1::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
        msg_type: ExplicitContextTag2::from(IntegerAsn1::from(vec![AS_REQ_MSG_TYPE])),
        padata: Optional::from(None),
        req_body: ExplicitContextTag4::from(KdcReqBody {
            kdc_options: ExplicitContextTag0::from(generate_kdc_options(config.renewable)),
            cname: Optional::from(Some(ExplicitContextTag1::from(cname))),
            realm: ExplicitContextTag2::from(kerberos_string(&config.realm)?),
            sname: Optional::from(Some(ExplicitContextTag3::from(sname))),
            from: Optional::from(None),
            till: ExplicitContextTag5::from(kerberos_time(till)),
            rtime: Optional::from(None),
            nonce: ExplicitContextTag7::from(IntegerAsn1::from(nonce.to_be_bytes().to_vec())),
            etype: ExplicitContextTag8::from(etype_preference_list(config)),
            addresses: Optional::from(None),
            enc_authorization_data: Optional::from(None),
            additional_tickets: Optional::from(None),
        }),
    }))
}

/// PA-ENC-TIMESTAMP: the current client time, DER-encoded as PA-ENC-TS-ENC
/// and encrypted under the client's long-term key with usage 1. The kvno
/// records which key generation produced the proof.
pub(crate) fn generate_pa_enc_timestamp(
    key: &EncryptionKey,
    etype: &CipherSuite,
    kvno: u32,
    now: OffsetDateTime,
) -> Result<PaData> {
    let pa_enc_ts_enc = PaEncTsEnc {
        patimestamp: ExplicitContextTag0::from(kerberos_time(now)),
        pausec: Optional::from(Some(ExplicitContextTag1::from(microseconds(now)))),
    };
    let plaintext = picky_asn1_der::to_vec(&pa_enc_ts_enc)?;

    let encrypted = etype
        .cipher()
        .encrypt(&key.key_value.0 .0, AS_REQ_TIMESTAMP, &plaintext)?;

    let enc_data = EncryptedData {
        etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![u8::from(etype)])),
        kvno: Optional::from(Some(ExplicitContextTag1::from(IntegerAsn1::from(vec![kvno as u8])))),
        cipher: ExplicitContextTag2::from(OctetStringAsn1::from(encrypted)),
    };

    Ok(PaData {
        padata_type: ExplicitContextTag1::from(IntegerAsn1::from(PA_ENC_TIMESTAMP.to_vec())),
        padata_data: ExplicitContextTag2::from(OctetStringAsn1::from(picky_asn1_der::to_vec(&enc_data)?)),
    })
}

/// Fresh authenticator for the PA-TGS-REQ AP-REQ. No subkey and no sequence
/// number: the TGS reply comes back under the session key.
pub(crate) fn generate_authenticator(
    crealm: &Realm,
    cname: &PrincipalName,
    cksum: Option<Checksum>,
    now: OffsetDateTime,
) -> Authenticator {
    Authenticator::from(AuthenticatorInner {
        authenticator_vno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
        crealm: ExplicitContextTag1::from(crealm.clone()),
        cname: ExplicitContextTag2::from(cname.clone()),
        cksum: Optional::from(cksum.map(ExplicitContextTag3::from)),
        cusec: ExplicitContextTag4::from(microseconds(now)),
        ctime: ExplicitContextTag5::from(kerberos_time(now)),
        subkey: Optional::from(None),
        seq_number: Optional::from(None),
        authorization_data: Optional::from(None),
    })
}

/// AP-REQ carrying the TGT and the freshly encrypted authenticator, wrapped
/// into the PA-TGS-REQ pre-authentication entry of a TGS-REQ.
pub(crate) fn generate_pa_tgs_req(
    tgt: &Ticket,
    session_key: &EncryptionKey,
    etype: &CipherSuite,
    authenticator: &Authenticator,
) -> Result<PaData> {
    let authenticator_raw = picky_asn1_der::to_vec(authenticator)?;
    let encrypted = etype.cipher().encrypt(
        &session_key.key_value.0 .0,
        TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR,
        &authenticator_raw,
    )?;

    let ap_req = ApReq::from(ApReqInner {
        pvno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
        msg_type: ExplicitContextTag1::from(IntegerAsn1::from(vec![AP_REQ_MSG_TYPE])),
        ap_options: ExplicitContextTag2::from(ApOptions::from(BitString::with_bytes(vec![0, 0, 0, 0]))),
        ticket: ExplicitContextTag3::from(tgt.clone()),
        authenticator: ExplicitContextTag4::from(EncryptedData {
            etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![u8::from(etype)])),
            kvno: Optional::from(None),
            cipher: ExplicitContextTag2::from(OctetStringAsn1::from(encrypted)),
        }),
    });

    Ok(PaData {
        padata_type: ExplicitContextTag1::from(IntegerAsn1::from(PA_TGS_REQ_TYPE.to_vec())),
        padata_data: ExplicitContextTag2::from(OctetStringAsn1::from(picky_asn1_der::to_vec(&ap_req)?)),
    })
}

/// TGS-REQ body for the requested service principal. Kept separate from
/// [`generate_tgs_req`] so the authenticator checksum can cover the
/// marshaled body.
pub(crate) fn generate_tgs_req_body(
    config: &KrbConfig,
    sname: PrincipalName,
    nonce: u32,
    now: OffsetDateTime,
) -> Result<KdcReqBody> {
    let till = now + config.ticket_lifetime;

    Ok(KdcReqBody {
        kdc_options: ExplicitContextTag0::from(generate_kdc_options(config.renewable)),
        cname: Optional::from(None),
        realm: ExplicitContextTag2::from(kerberos_string(&config.realm)?),
        sname: Optional::from(Some(ExplicitContextTag3::from(sname))),
        from: Optional::from(None),
        till: ExplicitContextTag5::from(kerberos_time(till)),
        rtime: Optional::from(None),
        nonce: ExplicitContextTag7::from(IntegerAsn1::from(nonce.to_be_bytes().to_vec())),
        etype: ExplicitContextTag8::from(etype_preference_list(config)),
        addresses: Optional::from(None),
        enc_authorization_data: Optional::from(None),
        additional_tickets: Optional::from(None),
    })
}

pub(crate) fn generate_tgs_req(pa_tgs_req: PaData, req_body: KdcReqBody) -> TgsReq {
    TgsReq::from(KdcReq {
        pvno: ExplicitContextTag1::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
        msg_type: ExplicitContextTag2::from(IntegerAsn1::from(vec![TGS_REQ_MSG_TYPE])),
        padata: Optional::from(Some(ExplicitContextTag3::from(Asn1SequenceOf::from(vec![pa_tgs_req])))),
        req_body: ExplicitContextTag4::from(req_body),
    })
}

#[cfg(test)]
mod tests {
    use krb5_proto::constants::types::NT_PRINCIPAL;

    use super::{generate_kdc_options, parse_spn};

    #[test]
    fn spn_splits_on_slash() {
        let spn = parse_spn("HTTP/www.example.com").unwrap();

        assert_eq!(vec![NT_PRINCIPAL], spn.name_type.0 .0);
        let components: Vec<String> = spn
            .name_string
            .0
             .0
            .iter()
            .map(|c| c.0.as_utf8().to_owned())
            .collect();
        assert_eq!(vec!["HTTP".to_owned(), "www.example.com".to_owned()], components);
    }

    #[test]
    fn kdc_options_renewable_bits() {
        let none = generate_kdc_options(false);
        assert!(!none.0.is_set(8));
        assert!(!none.0.is_set(27));

        let renewable = generate_kdc_options(true);
        // renewable (bit 8) and renewable-ok (bit 27)
        assert!(renewable.0.is_set(8));
        assert!(renewable.0.is_set(27));
        assert!(!renewable.0.is_set(1));
    }
}
