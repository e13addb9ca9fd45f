use krb5_proto::constants::key_usages::{
    TGS_REP_ENC_SESSION_KEY, TGS_REP_ENC_SUB_KEY, TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR_CKSUM,
};
use krb5_proto::constants::types::{NT_PRINCIPAL, TGS_REP_MSG_TYPE};
use krb5_proto::crypto::{CipherSuite, KerberosCryptoError};
use krb5_proto::data_types::{Checksum, KrbResult, PrincipalName, ResultExt, Ticket};
use krb5_proto::messages::{EncKdcRepPart, EncTgsRepPart, TgsRep};
use picky_asn1::wrapper::{ExplicitContextTag0, ExplicitContextTag1, IntegerAsn1, OctetStringAsn1};
use rand::rngs::OsRng;
use rand::RngCore;
use time::OffsetDateTime;

use crate::transport::KdcTransport;
use crate::{KerberosClientError, Result};

use super::extractors::{asn1_uint, validate_enc_kdc_rep_part, validate_kdc_rep};
use super::generators::{
    generate_authenticator, generate_pa_tgs_req, generate_tgs_req, generate_tgs_req_body, kerberos_string,
    principal_name,
};
use super::Client;

impl<T: KdcTransport> Client<T> {
    /// The Ticket-Granting Service exchange (RFC 4120 section 3.3).
    ///
    /// Requires an established session. Builds an AP-REQ with a fresh
    /// authenticator (checksummed over the request body), wraps it in a
    /// PA-TGS-REQ, and decrypts the reply with the session key.
    pub(crate) fn tgs_exchange(&mut self, sname: PrincipalName) -> Result<(Ticket, EncKdcRepPart)> {
        let session = self
            .session
            .as_ref()
            .ok_or(KerberosClientError::Config("client has no session, log in first"))?;

        let now = OffsetDateTime::now_utc();
        let nonce = OsRng.next_u32() >> 1;

        let session_etype = CipherSuite::try_from(asn1_uint(&session.session_key.key_type.0) as usize)?;
        let session_key = session.session_key.key_value.0 .0.clone();

        let req_body = generate_tgs_req_body(&self.config, sname.clone(), nonce, now)?;

        // The authenticator checksum binds the request body to this AP-REQ.
        let body_raw = picky_asn1_der::to_vec(&req_body)?;
        let cipher = session_etype.cipher();
        let body_checksum = cipher.checksum(&session_key, TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR_CKSUM, &body_raw)?;
        let cksum = Checksum {
            cksumtype: ExplicitContextTag0::from(IntegerAsn1::from(vec![u8::from(&cipher.checksum_type())])),
            checksum: ExplicitContextTag1::from(OctetStringAsn1::from(body_checksum)),
        };

        let crealm = kerberos_string(&self.config.realm)?;
        let cname = principal_name(NT_PRINCIPAL, &[&self.credentials.username])?;

        let authenticator = generate_authenticator(&crealm, &cname, Some(cksum), now);
        let sent_subkey = authenticator.0.subkey.0.clone();

        let pa_tgs_req = generate_pa_tgs_req(&session.tgt, &session.session_key, &session_etype, &authenticator)?;
        let tgs_req = generate_tgs_req(pa_tgs_req, req_body);

        let reply = self.transport.send(&picky_asn1_der::to_vec(&tgs_req)?)?;
        let mut deserializer = picky_asn1_der::Deserializer::new_from_bytes(&reply);
        let reply: KrbResult<TgsRep> = KrbResult::deserialize(&mut deserializer)?;

        let tgs_rep = reply.map_err(KerberosClientError::from_krb_error)?;

        validate_kdc_rep(&tgs_rep.0, TGS_REP_MSG_TYPE, &cname, &crealm)?;

        let enc_data = &tgs_rep.0.enc_part.0;
        let rep_etype = CipherSuite::try_from(asn1_uint(&enc_data.etype.0) as usize)?;
        let rep_cipher = rep_etype.cipher();

        let plaintext = match rep_cipher.decrypt(&session_key, TGS_REP_ENC_SESSION_KEY, &enc_data.cipher.0 .0) {
            Ok(plaintext) => plaintext,
            // Some KDCs encrypt under the authenticator sub-key usage when
            // one was offered. We currently never send one, so this arm
            // only fires once sub-keys are in play.
            Err(KerberosCryptoError::IntegrityCheck) if sent_subkey.is_some() => {
                debug!("session-key decryption failed, retrying with the sub-key usage");

                let subkey = sent_subkey.as_ref().map(|subkey| subkey.0.key_value.0 .0.clone());
                rep_cipher.decrypt(
                    &subkey.unwrap_or(session_key),
                    TGS_REP_ENC_SUB_KEY,
                    &enc_data.cipher.0 .0,
                )?
            }
            Err(err) => return Err(err.into()),
        };
        let enc_part: EncTgsRepPart = picky_asn1_der::from_bytes(&plaintext)?;

        validate_enc_kdc_rep_part(&enc_part.0, nonce, &sname, now, self.config.max_time_skew)?;

        Ok((tgs_rep.0.ticket.0.clone(), enc_part.0))
    }
}
