use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One visited domain from the router's web history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebHistoryEntry {
    pub mac: String,
    /// `UNIX_EPOCH` when the firmware's timestamp is unreadable.
    pub access_time: DateTime<Utc>,
    pub domain: String,
}
