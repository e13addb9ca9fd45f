//! Kerberos v5 protocol building blocks.
//!
//! This crate provides the two halves every Kerberos client needs before it
//! can talk to a KDC:
//!
//! * [`crypto`]: the RFC 3961/3962 cryptographic engine. n-fold, DK/DR key
//!   derivation, AES-CTS with the confounder + encrypt + HMAC envelope, and
//!   PBKDF2 string-to-key. Only the AES simplified-profile enctypes
//!   (17 and 18) are implemented.
//! * [`messages`] and [`data_types`]: the RFC 4120 ASN.1 structures
//!   (AS/TGS requests and replies, tickets, authenticators, KRB-ERROR),
//!   DER-encoded through `picky-asn1-der`.
//!
//! The wire structures keep the explicit-context-tag wrapper types in their
//! public fields so that callers can build messages field by field, the same
//! way the RFC lays them out.

pub mod constants;
pub mod crypto;
pub mod data_types;
pub mod messages;
