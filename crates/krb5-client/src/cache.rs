use std::collections::HashMap;

use krb5_proto::data_types::Ticket;
use time::OffsetDateTime;

/// A cached service ticket with its validity window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub ticket: Ticket,
    pub auth_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub renew_till: Option<OffsetDateTime>,
}

/// Service tickets keyed by SPN, e.g. `HTTP/www.example.com`.
///
/// Append-only from the exchange code's point of view; persistence and
/// eviction are out of scope.
#[derive(Debug, Clone, Default)]
pub struct TicketCache {
    entries: HashMap<String, CacheEntry>,
}

impl TicketCache {
    pub fn add_entry(
        &mut self,
        spn: impl Into<String>,
        ticket: Ticket,
        auth_time: OffsetDateTime,
        end_time: OffsetDateTime,
        renew_till: Option<OffsetDateTime>,
    ) {
        self.entries.insert(
            spn.into(),
            CacheEntry {
                ticket,
                auth_time,
                end_time,
                renew_till,
            },
        );
    }

    pub fn get(&self, spn: &str) -> Option<&CacheEntry> {
        self.entries.get(spn)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
