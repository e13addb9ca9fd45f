use krb5_proto::data_types::{EncryptionKey, Ticket};
use time::OffsetDateTime;

/// State established by a successful AS exchange and consumed by every TGS
/// exchange. Written exactly once per login; dropped on logout.
#[derive(Debug, Clone)]
pub struct Session {
    pub auth_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub renew_till: Option<OffsetDateTime>,
    pub session_key_expiration: Option<OffsetDateTime>,
    /// The ticket-granting ticket, opaque to us: only `krbtgt` can open it.
    pub tgt: Ticket,
    pub session_key: EncryptionKey,
}
