//! In-process KDC double: implements the transport trait and answers AS/TGS
//! requests the way a minimal KDC would, with switches to provoke the error
//! paths (preauth demand, wrong nonce, tampered cipher, outright rejection).

use std::io;

use krb5_client::KdcTransport;
use krb5_proto::constants::error_codes::KDC_ERR_PREAUTH_REQUIRED;
use krb5_proto::constants::key_usages::{
    AS_REP_ENC, AS_REQ_TIMESTAMP, TGS_REP_ENC_SESSION_KEY, TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR,
    TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR_CKSUM,
};
use krb5_proto::constants::types::{
    AS_REP_MSG_TYPE, KRB_ERROR_MSG_TYPE, NT_SRV_INST, PA_ENC_TIMESTAMP, PA_ETYPE_INFO2_TYPE, PA_TGS_REQ_TYPE,
    TGS_REP_MSG_TYPE,
};
use krb5_proto::constants::{KERBEROS_VERSION, TGT_SERVICE_NAME};
use krb5_proto::crypto::CipherSuite;
use krb5_proto::data_types::{
    Authenticator, EncryptedData, EncryptionKey, EtypeInfo2, EtypeInfo2Entry, KerberosStringAsn1, KerberosTime,
    LastReq, LastReqInner, Microseconds, PaData, PaEncTsEnc, PrincipalName, Realm, Ticket, TicketInner,
};
use krb5_proto::messages::{
    ApReq, AsRep, AsReq, EncAsRepPart, EncKdcRepPart, EncTgsRepPart, KdcRep, KrbError, KrbErrorInner, TgsRep, TgsReq,
};
use picky_asn1::date::GeneralizedTime;
use picky_asn1::restricted_string::Ia5String;
use picky_asn1::wrapper::{
    Asn1SequenceOf, BitStringAsn1, ExplicitContextTag0, ExplicitContextTag1, ExplicitContextTag2,
    ExplicitContextTag3, ExplicitContextTag4, ExplicitContextTag5, ExplicitContextTag6, ExplicitContextTag7,
    ExplicitContextTag9, ExplicitContextTag10, ExplicitContextTag12, IntegerAsn1, OctetStringAsn1, Optional,
};
use rand::rngs::OsRng;
use rand::RngCore;
use time::{Duration, OffsetDateTime};

pub const REALM: &str = "EXAMPLE.COM";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "s3cret-password";

pub struct KdcMock {
    pub realm: String,
    pub username: String,
    pub password: String,
    /// Salt advertised in ETYPE-INFO2 hints. `None` means the KDC expects
    /// the default realm+name salt and sends salt-less hints.
    pub salt: Option<String>,
    pub require_preauth: bool,
    /// When set, every AS-REQ is answered with this KRB-ERROR code.
    pub reject_with: Option<u32>,
    pub wrong_nonce: bool,
    pub tamper_enc_part: bool,
    pub as_request_count: u32,
    session_key: Option<Vec<u8>>,
}

impl KdcMock {
    pub fn new() -> Self {
        Self {
            realm: REALM.to_owned(),
            username: USERNAME.to_owned(),
            password: PASSWORD.to_owned(),
            salt: Some(format!("{REALM}{USERNAME}")),
            require_preauth: true,
            reject_with: None,
            wrong_nonce: false,
            tamper_enc_part: false,
            as_request_count: 0,
            session_key: None,
        }
    }

    pub fn user_key(&self) -> Vec<u8> {
        let salt = self.salt.clone().unwrap_or_else(|| format!("{}{}", self.realm, self.username));

        CipherSuite::Aes256CtsHmacSha196
            .cipher()
            .generate_key_from_password(self.password.as_bytes(), salt.as_bytes())
            .unwrap()
    }

    fn realm_asn1(&self) -> Realm {
        KerberosStringAsn1::from(Ia5String::from_string(self.realm.clone()).unwrap())
    }

    fn krbtgt_sname(&self) -> PrincipalName {
        PrincipalName {
            name_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![NT_SRV_INST])),
            name_string: ExplicitContextTag1::from(Asn1SequenceOf::from(vec![
                KerberosStringAsn1::from(Ia5String::from_string(TGT_SERVICE_NAME.to_owned()).unwrap()),
                KerberosStringAsn1::from(Ia5String::from_string(self.realm.clone()).unwrap()),
            ])),
        }
    }

    fn etype_info2_hint(&self) -> PaData {
        let entry = EtypeInfo2Entry {
            etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![18])),
            salt: Optional::from(self.salt.clone().map(|salt| {
                ExplicitContextTag1::from(KerberosStringAsn1::from(Ia5String::from_string(salt).unwrap()))
            })),
            s2kparams: Optional::from(None),
        };

        PaData {
            padata_type: ExplicitContextTag1::from(IntegerAsn1::from(PA_ETYPE_INFO2_TYPE.to_vec())),
            padata_data: ExplicitContextTag2::from(OctetStringAsn1::from(
                picky_asn1_der::to_vec(&EtypeInfo2::from(vec![entry])).unwrap(),
            )),
        }
    }

    fn krb_error(&self, error_code: u32, with_hints: bool) -> Vec<u8> {
        let now = OffsetDateTime::now_utc();

        let e_data = with_hints.then(|| {
            ExplicitContextTag12::from(OctetStringAsn1::from(
                picky_asn1_der::to_vec(&Asn1SequenceOf::from(vec![self.etype_info2_hint()])).unwrap(),
            ))
        });

        let error = KrbError::from(KrbErrorInner {
            pvno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
            msg_type: ExplicitContextTag1::from(IntegerAsn1::from(vec![KRB_ERROR_MSG_TYPE])),
            ctime: Optional::from(None),
            cusec: Optional::from(None),
            stime: ExplicitContextTag4::from(KerberosTime::from(GeneralizedTime::from(now))),
            susec: ExplicitContextTag5::from(Microseconds::from(
                now.microsecond().min(999_999).to_be_bytes().to_vec(),
            )),
            error_code: ExplicitContextTag6::from(error_code),
            crealm: Optional::from(None),
            cname: Optional::from(None),
            realm: ExplicitContextTag9::from(self.realm_asn1()),
            sname: ExplicitContextTag10::from(self.krbtgt_sname()),
            e_text: Optional::from(None),
            e_data: Optional::from(e_data),
        });

        picky_asn1_der::to_vec(&error).unwrap()
    }

    fn opaque_ticket(&self, sname: PrincipalName) -> Ticket {
        // The client never opens ticket enc-parts, so random bytes are as
        // good as a real EncTicketPart here.
        let mut opaque = vec![0; 64];
        OsRng.fill_bytes(&mut opaque);

        Ticket::from(TicketInner {
            tkt_vno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
            realm: ExplicitContextTag1::from(self.realm_asn1()),
            sname: ExplicitContextTag2::from(sname),
            enc_part: ExplicitContextTag3::from(EncryptedData {
                etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![18])),
                kvno: Optional::from(None),
                cipher: ExplicitContextTag2::from(OctetStringAsn1::from(opaque)),
            }),
        })
    }

    fn rep_enc_part(
        &self,
        session_key: &[u8],
        nonce: &IntegerAsn1,
        flags: BitStringAsn1,
        sname: PrincipalName,
        now: OffsetDateTime,
    ) -> EncKdcRepPart {
        let nonce = if self.wrong_nonce {
            IntegerAsn1::from(vec![0x01, 0x02, 0x03, 0x04])
        } else {
            nonce.clone()
        };

        EncKdcRepPart {
            key: ExplicitContextTag0::from(EncryptionKey {
                key_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![18])),
                key_value: ExplicitContextTag1::from(OctetStringAsn1::from(session_key.to_vec())),
            }),
            last_req: ExplicitContextTag1::from(LastReq::from(vec![LastReqInner {
                lr_type: ExplicitContextTag0::from(IntegerAsn1::from(vec![0])),
                lr_value: ExplicitContextTag1::from(KerberosTime::from(GeneralizedTime::from(
                    now - Duration::hours(1),
                ))),
            }])),
            nonce: ExplicitContextTag2::from(nonce),
            key_expiration: Optional::from(None),
            flags: ExplicitContextTag4::from(flags),
            auth_time: ExplicitContextTag5::from(KerberosTime::from(GeneralizedTime::from(now))),
            start_time: Optional::from(None),
            end_time: ExplicitContextTag7::from(KerberosTime::from(GeneralizedTime::from(now + Duration::hours(8)))),
            renew_till: Optional::from(None),
            srealm: ExplicitContextTag9::from(self.realm_asn1()),
            sname: ExplicitContextTag10::from(sname),
            caddr: Optional::from(None),
            encrypted_pa_data: Optional::from(None),
        }
    }

    fn handle_as_req(&mut self, request: &[u8]) -> Vec<u8> {
        self.as_request_count += 1;

        let as_req: AsReq = picky_asn1_der::from_bytes(request).unwrap();

        if let Some(error_code) = self.reject_with {
            return self.krb_error(error_code, false);
        }

        let pa_enc_timestamp = as_req.0.padata.0.as_ref().and_then(|pa_datas| {
            pa_datas
                .0
                 .0
                .iter()
                .find(|pa_data| pa_data.padata_type.0 .0 == PA_ENC_TIMESTAMP)
                .cloned()
        });

        let user_key = self.user_key();

        if self.require_preauth {
            let Some(pa_enc_timestamp) = pa_enc_timestamp else {
                return self.krb_error(KDC_ERR_PREAUTH_REQUIRED, true);
            };

            // The proof of password: a fresh timestamp under the client key.
            let enc_data: EncryptedData = picky_asn1_der::from_bytes(&pa_enc_timestamp.padata_data.0 .0).unwrap();
            let cipher = CipherSuite::try_from(enc_data.etype.0 .0.as_slice()).unwrap().cipher();
            let timestamp_raw = cipher
                .decrypt(&user_key, AS_REQ_TIMESTAMP, &enc_data.cipher.0 .0)
                .expect("PA-ENC-TIMESTAMP must decrypt under the user key");
            let _timestamp: PaEncTsEnc = picky_asn1_der::from_bytes(&timestamp_raw).unwrap();
        }

        let mut session_key = vec![0; 32];
        OsRng.fill_bytes(&mut session_key);
        self.session_key = Some(session_key.clone());

        let req_body = &as_req.0.req_body.0;
        let cname = req_body.cname.0.as_ref().unwrap().0.clone();
        let now = OffsetDateTime::now_utc();

        let enc_part = EncAsRepPart::from(self.rep_enc_part(
            &session_key,
            &req_body.nonce.0,
            req_body.kdc_options.0.clone(),
            self.krbtgt_sname(),
            now,
        ));
        let mut enc_data = CipherSuite::Aes256CtsHmacSha196
            .cipher()
            .encrypt(&user_key, AS_REP_ENC, &picky_asn1_der::to_vec(&enc_part).unwrap())
            .unwrap();

        if self.tamper_enc_part {
            enc_data[20] ^= 0x01;
        }

        let as_rep = AsRep::from(KdcRep {
            pvno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
            msg_type: ExplicitContextTag1::from(IntegerAsn1::from(vec![AS_REP_MSG_TYPE])),
            padata: Optional::from(Some(ExplicitContextTag2::from(Asn1SequenceOf::from(vec![
                self.etype_info2_hint(),
            ])))),
            crealm: ExplicitContextTag3::from(self.realm_asn1()),
            cname: ExplicitContextTag4::from(cname),
            ticket: ExplicitContextTag5::from(self.opaque_ticket(self.krbtgt_sname())),
            enc_part: ExplicitContextTag6::from(EncryptedData {
                etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![18])),
                kvno: Optional::from(None),
                cipher: ExplicitContextTag2::from(OctetStringAsn1::from(enc_data)),
            }),
        });

        picky_asn1_der::to_vec(&as_rep).unwrap()
    }

    fn handle_tgs_req(&mut self, request: &[u8]) -> Vec<u8> {
        let tgs_req: TgsReq = picky_asn1_der::from_bytes(request).unwrap();
        let session_key = self.session_key.clone().expect("TGS-REQ before any AS exchange");

        let pa_tgs_req = tgs_req
            .0
            .padata
            .0
            .as_ref()
            .unwrap()
            .0
             .0
            .iter()
            .find(|pa_data| pa_data.padata_type.0 .0 == PA_TGS_REQ_TYPE)
            .expect("TGS-REQ must carry a PA-TGS-REQ entry")
            .clone();

        let ap_req: ApReq = picky_asn1_der::from_bytes(&pa_tgs_req.padata_data.0 .0).unwrap();

        // Authenticator must decrypt under the session key with usage 7.
        let authenticator_data = &ap_req.0.authenticator.0;
        let cipher = CipherSuite::try_from(authenticator_data.etype.0 .0.as_slice()).unwrap().cipher();
        let authenticator_raw = cipher
            .decrypt(
                &session_key,
                TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR,
                &authenticator_data.cipher.0 .0,
            )
            .expect("authenticator must decrypt under the session key");
        let authenticator: Authenticator = picky_asn1_der::from_bytes(&authenticator_raw).unwrap();

        // And its checksum must cover the marshaled request body.
        let req_body = &tgs_req.0.req_body.0;
        let body_raw = picky_asn1_der::to_vec(req_body).unwrap();
        let expected_checksum = cipher
            .checksum(&session_key, TGS_REQ_PA_DATA_AP_REQ_AUTHENTICATOR_CKSUM, &body_raw)
            .unwrap();
        let cksum = authenticator.0.cksum.0.as_ref().expect("authenticator must carry a checksum");
        assert_eq!(expected_checksum, cksum.0.checksum.0 .0);

        let sname = req_body.sname.0.as_ref().unwrap().0.clone();
        let now = OffsetDateTime::now_utc();

        let mut service_session_key = vec![0; 32];
        OsRng.fill_bytes(&mut service_session_key);

        let enc_part = EncTgsRepPart::from(self.rep_enc_part(
            &service_session_key,
            &req_body.nonce.0,
            req_body.kdc_options.0.clone(),
            sname.clone(),
            now,
        ));
        let enc_data = CipherSuite::Aes256CtsHmacSha196
            .cipher()
            .encrypt(
                &session_key,
                TGS_REP_ENC_SESSION_KEY,
                &picky_asn1_der::to_vec(&enc_part).unwrap(),
            )
            .unwrap();

        let tgs_rep = TgsRep::from(KdcRep {
            pvno: ExplicitContextTag0::from(IntegerAsn1::from(vec![KERBEROS_VERSION])),
            msg_type: ExplicitContextTag1::from(IntegerAsn1::from(vec![TGS_REP_MSG_TYPE])),
            padata: Optional::from(None),
            crealm: ExplicitContextTag3::from(self.realm_asn1()),
            cname: ExplicitContextTag4::from(authenticator.0.cname.0.clone()),
            ticket: ExplicitContextTag5::from(self.opaque_ticket(sname)),
            enc_part: ExplicitContextTag6::from(EncryptedData {
                etype: ExplicitContextTag0::from(IntegerAsn1::from(vec![18])),
                kvno: Optional::from(None),
                cipher: ExplicitContextTag2::from(OctetStringAsn1::from(enc_data)),
            }),
        });

        picky_asn1_der::to_vec(&tgs_rep).unwrap()
    }
}

impl KdcTransport for KdcMock {
    fn send(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        // APPLICATION 10 is an AS-REQ, APPLICATION 12 a TGS-REQ.
        match request.first() {
            Some(0x6a) => Ok(self.handle_as_req(request)),
            Some(0x6c) => Ok(self.handle_tgs_req(request)),
            _ => Err(io::Error::new(io::ErrorKind::InvalidData, "unknown request tag")),
        }
    }
}
