use krb5_proto::constants::types::PA_ETYPE_INFO2_TYPE;
use krb5_proto::constants::{KERBEROS_VERSION, TGT_SERVICE_NAME};
use krb5_proto::crypto::CipherSuite;
use krb5_proto::data_types::{EtypeInfo2, EtypeInfo2Entry, KerberosTime, PaData, PrincipalName, Realm};
use krb5_proto::messages::{EncKdcRepPart, KdcRep, KrbError};
use picky_asn1::wrapper::{Asn1SequenceOf, IntegerAsn1};
use time::OffsetDateTime;

use crate::{KerberosClientError, Result};

/// Big-endian unsigned read of a DER integer, tolerating the leading zero
/// octet that keeps high values positive. Values wider than 32 bits cannot
/// name any protocol constant and collapse to `u32::MAX`.
pub(crate) fn asn1_uint(integer: &IntegerAsn1) -> u32 {
    let bytes: Vec<u8> = integer.0.iter().copied().skip_while(|byte| *byte == 0).collect();

    if bytes.len() > 4 {
        return u32::MAX;
    }

    bytes.into_iter().fold(0_u32, |acc, byte| (acc << 8) | u32::from(byte))
}

pub(crate) fn kerberos_time_to_offset(time: &KerberosTime) -> Result<OffsetDateTime> {
    OffsetDateTime::try_from(time.0.clone())
        .map_err(|err| KerberosClientError::Validation(format!("KerberosTime out of range: {err}")))
}

/// PA-DATA hints attached to a KRB-ERROR's e-data, when present.
pub(crate) fn extract_pa_datas_from_krb_error(krb_error: &KrbError) -> Vec<PaData> {
    let Some(e_data) = krb_error.0.e_data.0.as_ref() else {
        return Vec::new();
    };

    match picky_asn1_der::from_bytes::<Asn1SequenceOf<PaData>>(&e_data.0 .0) {
        Ok(pa_datas) => pa_datas.0,
        Err(_) => {
            debug!("KRB-ERROR e-data is not a PA-DATA sequence");
            Vec::new()
        }
    }
}

/// ETYPE-INFO2 entries among the given PA-DATA hints. The KDC uses these to
/// tell the client which enctype and salt to run string-to-key with before
/// retrying.
pub(crate) fn extract_etype_info2(pa_datas: &[PaData]) -> Vec<EtypeInfo2Entry> {
    pa_datas
        .iter()
        .filter(|pa_data| pa_data.padata_type.0 .0 == PA_ETYPE_INFO2_TYPE)
        .filter_map(|pa_data| picky_asn1_der::from_bytes::<EtypeInfo2>(&pa_data.padata_data.0 .0).ok())
        .flat_map(|entries| entries.0)
        .collect()
}

/// Strongest enctype present in both the client preference list and the
/// KDC's ETYPE-INFO2 hints. With no hints the client's first preference
/// wins.
pub(crate) fn negotiate_etype(preferences: &[CipherSuite], hints: &[EtypeInfo2Entry]) -> Result<CipherSuite> {
    if hints.is_empty() {
        return preferences.first().cloned().ok_or(KerberosClientError::NoSuitableEtype);
    }

    let hinted: Vec<usize> = hints.iter().map(|entry| asn1_uint(&entry.etype.0) as usize).collect();

    preferences
        .iter()
        .find(|preference| hinted.contains(&usize::from(*preference)))
        .cloned()
        .ok_or(KerberosClientError::NoSuitableEtype)
}

/// Outer KDC-REP validation: protocol version, message type and the echo of
/// the client identity.
pub(crate) fn validate_kdc_rep(
    rep: &KdcRep,
    expected_msg_type: u8,
    expected_cname: &PrincipalName,
    expected_crealm: &Realm,
) -> Result<()> {
    if rep.pvno.0 .0 != [KERBEROS_VERSION] {
        return Err(KerberosClientError::Validation(format!(
            "bad protocol version: {:?}",
            rep.pvno.0 .0
        )));
    }

    if rep.msg_type.0 .0 != [expected_msg_type] {
        return Err(KerberosClientError::UnexpectedMsgType {
            expected: expected_msg_type,
            got: rep.msg_type.0 .0.clone(),
        });
    }

    if rep.cname.0 != *expected_cname {
        return Err(KerberosClientError::Validation("cname does not match the request".into()));
    }

    if rep.crealm.0 != *expected_crealm {
        return Err(KerberosClientError::Validation("crealm does not match the request".into()));
    }

    Ok(())
}

/// Inner (decrypted) KDC-REP validation: nonce echo, expected service name
/// and a sane validity window.
pub(crate) fn validate_enc_kdc_rep_part(
    enc_part: &EncKdcRepPart,
    expected_nonce: u32,
    expected_sname: &PrincipalName,
    now: OffsetDateTime,
    max_time_skew: std::time::Duration,
) -> Result<()> {
    if asn1_uint(&enc_part.nonce.0) != expected_nonce {
        return Err(KerberosClientError::Validation("nonce does not match the request".into()));
    }

    if enc_part.sname.0 != *expected_sname {
        return Err(KerberosClientError::Validation("sname does not match the request".into()));
    }

    let end_time = kerberos_time_to_offset(&enc_part.end_time.0)?;
    if end_time + max_time_skew < now {
        return Err(KerberosClientError::Validation("ticket is already expired".into()));
    }

    let auth_time = kerberos_time_to_offset(&enc_part.auth_time.0)?;
    if auth_time > now + max_time_skew {
        return Err(KerberosClientError::Validation("auth-time lies in the future".into()));
    }

    Ok(())
}

/// The sname a TGT must carry: `krbtgt/REALM`.
pub(crate) fn expected_tgt_sname(realm: &str) -> Result<PrincipalName> {
    use krb5_proto::constants::types::NT_SRV_INST;

    super::generators::principal_name(NT_SRV_INST, &[TGT_SERVICE_NAME, realm])
}
