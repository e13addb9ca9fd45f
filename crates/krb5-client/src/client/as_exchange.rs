use krb5_proto::constants::error_codes::KDC_ERR_PREAUTH_REQUIRED;
use krb5_proto::constants::key_usages::AS_REP_ENC;
use krb5_proto::constants::types::{AS_REP_MSG_TYPE, NT_PRINCIPAL};
use krb5_proto::crypto::CipherSuite;
use krb5_proto::data_types::{EncryptionKey, KrbResult, PaData, ResultExt};
use krb5_proto::messages::{AsRep, AsReq, EncAsRepPart};
use picky_asn1::wrapper::{Asn1SequenceOf, ExplicitContextTag3, Optional};
use rand::rngs::OsRng;
use rand::RngCore;
use time::OffsetDateTime;

use crate::session::Session;
use crate::transport::KdcTransport;
use crate::{KerberosClientError, Result};

use super::extractors::{
    asn1_uint, expected_tgt_sname, extract_etype_info2, extract_pa_datas_from_krb_error, kerberos_time_to_offset,
    negotiate_etype, validate_enc_kdc_rep_part, validate_kdc_rep,
};
use super::generators::{generate_as_req, generate_pa_enc_timestamp, kerberos_string, principal_name};
use super::Client;

impl<T: KdcTransport> Client<T> {
    /// The Authentication Service exchange (RFC 4120 section 3.1).
    ///
    /// The first AS-REQ goes out without pre-authentication. A KRB-ERROR
    /// with code 25 (preauth required) is the only locally recovered
    /// condition: the client derives its long-term key from the error's
    /// ETYPE-INFO2 hints, encrypts a fresh timestamp under it and retries
    /// exactly once. Every other KRB-ERROR, and a second preauth demand,
    /// surfaces to the caller.
    pub(crate) fn as_exchange(&mut self) -> Result<()> {
        if !self.is_configured() {
            return Err(KerberosClientError::Config(
                "realm, enctypes and credentials must all be set before login",
            ));
        }

        let now = OffsetDateTime::now_utc();
        // 31 bits keep the DER integer positive without an extra leading octet.
        let nonce = OsRng.next_u32() >> 1;

        let mut as_req = generate_as_req(&self.config, &self.credentials.username, nonce, now)?;

        let reply = self.transport.send(&picky_asn1_der::to_vec(&as_req)?)?;
        let mut deserializer = picky_asn1_der::Deserializer::new_from_bytes(&reply);
        let reply: KrbResult<AsRep> = KrbResult::deserialize(&mut deserializer)?;

        let cname = principal_name(NT_PRINCIPAL, &[&self.credentials.username])?;

        let (as_rep, known_key) = match reply {
            Ok(as_rep) => (as_rep, None),
            Err(krb_error) => {
                if krb_error.0.error_code.0 != KDC_ERR_PREAUTH_REQUIRED {
                    return Err(KerberosClientError::from_krb_error(krb_error));
                }

                debug!("KDC requires pre-authentication, retrying with PA-ENC-TIMESTAMP");

                let hint_pa_datas = extract_pa_datas_from_krb_error(&krb_error);
                let hints = extract_etype_info2(&hint_pa_datas);
                let etype = negotiate_etype(&self.config.default_tkt_enctypes, &hints)?;

                // kvno 1 unless the KDC says otherwise later; password
                // credentials run string-to-key with the salt hints instead.
                let (client_key, etype) =
                    self.credentials
                        .client_key(&cname, &self.config.realm, &etype, 1, &hint_pa_datas)?;

                let pa_enc_timestamp =
                    generate_pa_enc_timestamp(&client_key, &etype, 1, OffsetDateTime::now_utc())?;
                append_pa_data(&mut as_req, pa_enc_timestamp);

                let reply = self.transport.send(&picky_asn1_der::to_vec(&as_req)?)?;
                let mut deserializer = picky_asn1_der::Deserializer::new_from_bytes(&reply);
                let reply: KrbResult<AsRep> = KrbResult::deserialize(&mut deserializer)?;

                // A second KRB-ERROR, preauth-required included, is terminal.
                let as_rep = reply.map_err(KerberosClientError::from_krb_error)?;

                (as_rep, Some((client_key, etype)))
            }
        };

        let crealm = kerberos_string(&self.config.realm)?;
        validate_kdc_rep(&as_rep.0, AS_REP_MSG_TYPE, &cname, &crealm)?;

        // The reply's enc-part dictates the enctype; when the optimistic
        // request got through without preauth the key is derived from the
        // reply's own PA-DATA hints.
        let enc_data = &as_rep.0.enc_part.0;
        let rep_etype = CipherSuite::try_from(asn1_uint(&enc_data.etype.0) as usize)
            .map_err(KerberosClientError::Crypto)?;

        let (client_key, _) = match known_key {
            Some((key, etype)) => (key, etype),
            None => {
                let rep_pa_datas: Vec<PaData> = as_rep
                    .0
                    .padata
                    .0
                    .as_ref()
                    .map(|pa_datas| pa_datas.0 .0.clone())
                    .unwrap_or_default();
                let kvno = enc_data.kvno.0.as_ref().map(|kvno| asn1_uint(&kvno.0)).unwrap_or(1);

                self.credentials
                    .client_key(&cname, &self.config.realm, &rep_etype, kvno, &rep_pa_datas)?
            }
        };

        let plaintext = rep_etype
            .cipher()
            .decrypt(&client_key.key_value.0 .0, AS_REP_ENC, &enc_data.cipher.0 .0)?;
        let enc_part: EncAsRepPart = picky_asn1_der::from_bytes(&plaintext)?;

        let tgt_sname = expected_tgt_sname(&self.config.realm)?;
        validate_enc_kdc_rep_part(&enc_part.0, nonce, &tgt_sname, now, self.config.max_time_skew)?;

        // The TGT itself must also be addressed to the ticket-granting service.
        if as_rep.0.ticket.0 .0.sname.0 != tgt_sname {
            return Err(KerberosClientError::Validation(
                "AS-REP ticket is not a ticket-granting ticket".into(),
            ));
        }

        let session_key = enc_part.0.key.0.clone();
        validate_session_key(&session_key)?;

        self.session = Some(Session {
            auth_time: kerberos_time_to_offset(&enc_part.0.auth_time.0)?,
            end_time: kerberos_time_to_offset(&enc_part.0.end_time.0)?,
            renew_till: enc_part
                .0
                .renew_till
                .0
                .as_ref()
                .map(|till| kerberos_time_to_offset(&till.0))
                .transpose()?,
            session_key_expiration: enc_part
                .0
                .key_expiration
                .0
                .as_ref()
                .map(|expiration| kerberos_time_to_offset(&expiration.0))
                .transpose()?,
            tgt: as_rep.0.ticket.0.clone(),
            session_key,
        });

        debug!(realm = %self.config.realm, "AS exchange complete, session established");

        Ok(())
    }
}

fn append_pa_data(as_req: &mut AsReq, pa_data: PaData) {
    let mut pa_datas = match as_req.0.padata.0.take() {
        Some(existing) => existing.0 .0,
        None => Vec::new(),
    };
    pa_datas.push(pa_data);

    as_req.0.padata = Optional::from(Some(ExplicitContextTag3::from(Asn1SequenceOf::from(pa_datas))));
}

/// The session key must be a key of the enctype it claims to be (its length
/// has to match the declared key size).
fn validate_session_key(key: &EncryptionKey) -> Result<()> {
    let etype = CipherSuite::try_from(asn1_uint(&key.key_type.0) as usize)?;

    let expected = etype.cipher().key_size();
    let actual = key.key_value.0 .0.len();
    if actual != expected {
        return Err(KerberosClientError::Validation(format!(
            "session key length {actual} does not match enctype key size {expected}"
        )));
    }

    Ok(())
}
