mod as_exchange;
pub(crate) mod extractors;
pub(crate) mod generators;
mod tgs_exchange;

use crate::cache::TicketCache;
use crate::config::KrbConfig;
use crate::credentials::Credentials;
use crate::session::Session;
use crate::transport::KdcTransport;
use crate::Result;

use self::extractors::kerberos_time_to_offset;
use self::generators::parse_spn;

/// A Kerberos client instance: one principal, one realm, one KDC.
///
/// Single-threaded by design; wrap it in external synchronization if it has
/// to be shared. The session is written once per successful [`Client::login`]
/// and read by every TGS exchange.
pub struct Client<T> {
    pub(crate) config: KrbConfig,
    pub(crate) credentials: Credentials,
    pub(crate) transport: T,
    pub(crate) session: Option<Session>,
    pub(crate) cache: TicketCache,
}

impl<T: KdcTransport> Client<T> {
    pub fn new(config: KrbConfig, credentials: Credentials, transport: T) -> Self {
        Self {
            config,
            credentials,
            transport,
            session: None,
            cache: TicketCache::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.realm.is_empty()
            && !self.config.default_tkt_enctypes.is_empty()
            && self.credentials.is_configured()
    }

    /// Logs the client in with the KDC via an AS exchange, establishing the
    /// session (TGT plus session key).
    pub fn login(&mut self) -> Result<()> {
        self.as_exchange()
    }

    /// Drops the session. Cached service tickets stay around; they are
    /// useless without the session key anyway once their lifetime runs out.
    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cache(&self) -> &TicketCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Requests a service ticket for the SPN (`<SERVICE>/<FQDN>`, e.g.
    /// `HTTP/www.example.com`) via a TGS exchange and adds it to the ticket
    /// cache.
    pub fn get_service_ticket(&mut self, spn: &str) -> Result<()> {
        let sname = parse_spn(spn)?;

        let (ticket, enc_part) = self.tgs_exchange(sname)?;

        let auth_time = kerberos_time_to_offset(&enc_part.auth_time.0)?;
        let end_time = kerberos_time_to_offset(&enc_part.end_time.0)?;
        let renew_till = enc_part
            .renew_till
            .0
            .as_ref()
            .map(|till| kerberos_time_to_offset(&till.0))
            .transpose()?;

        self.cache.add_entry(spn, ticket, auth_time, end_time, renew_till);

        Ok(())
    }
}
