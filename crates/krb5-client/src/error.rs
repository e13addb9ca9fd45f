use std::io;

use krb5_proto::crypto::KerberosCryptoError;
use krb5_proto::messages::KrbError;
use picky_asn1_der::Asn1DerError;
use thiserror::Error;

/// Everything that can go wrong between "build a request" and "session
/// established". KDC-side rejections keep the KRB-ERROR so callers can read
/// the error code and e-text verbatim.
#[derive(Debug, Error)]
pub enum KerberosClientError {
    #[error("client is not configured correctly: {0}")]
    Config(&'static str),

    #[error("ASN.1 codec failure: {0:?}")]
    Codec(#[from] Asn1DerError),

    #[error("unexpected message type: expected {expected}, got {got:?}")]
    UnexpectedMsgType { expected: u8, got: Vec<u8> },

    #[error(transparent)]
    Crypto(#[from] KerberosCryptoError),

    #[error("KDC returned error code {error_code}")]
    Kdc {
        error_code: u32,
        e_text: Option<String>,
        krb_error: Box<KrbError>,
    },

    #[error("KDC transport failure: {0}")]
    Transport(#[from] io::Error),

    #[error("reply validation failed: {0}")]
    Validation(String),

    #[error("no enctype shared between client configuration and KDC hints")]
    NoSuitableEtype,

    #[error("no matching keytab entry for {principal}@{realm} (kvno {kvno}, enctype {etype})")]
    KeytabEntryNotFound {
        principal: String,
        realm: String,
        kvno: u32,
        etype: usize,
    },

    #[error("invalid Kerberos string: {0}")]
    InvalidKerberosString(String),
}

impl KerberosClientError {
    pub(crate) fn from_krb_error(krb_error: KrbError) -> Self {
        let error_code = krb_error.0.error_code.0;
        let e_text = krb_error
            .0
            .e_text
            .0
            .as_ref()
            .map(|text| text.0 .0.as_utf8().to_owned());

        KerberosClientError::Kdc {
            error_code,
            e_text,
            krb_error: Box::new(krb_error),
        }
    }
}
