//! Kerberos v5 client core.
//!
//! The flow mirrors RFC 4120 section 3: [`Client::login`] runs the
//! Authentication Service exchange (including the pre-authentication retry
//! when the KDC demands a PA-ENC-TIMESTAMP) and establishes a [`Session`]
//! holding the TGT and session key; [`Client::get_service_ticket`] then runs
//! Ticket-Granting Service exchanges and fills the [`TicketCache`].
//!
//! Everything that talks to the outside world is a trait the caller plugs
//! in: [`KdcTransport`] for the wire and [`Keytab`] for long-term keys.
//! The client itself is synchronous and single-threaded; the only blocking
//! point is the transport call.

#[macro_use]
extern crate tracing;

mod cache;
mod client;
mod config;
mod credentials;
mod error;
mod keytab;
mod session;
mod transport;

pub use cache::{CacheEntry, TicketCache};
pub use client::Client;
pub use config::KrbConfig;
pub use credentials::Credentials;
pub use error::KerberosClientError;
pub use keytab::{Keytab, KeytabEntry, MemoryKeytab};
pub use session::Session;
pub use transport::{KdcTransport, TcpKdcTransport};

pub type Result<T> = std::result::Result<T, KerberosClientError>;
