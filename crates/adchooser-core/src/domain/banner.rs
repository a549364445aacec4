use serde::{Deserialize, Serialize};

use super::ids::{BannerId, ClientId};

/// A banner owned by an advertiser.
///
/// Only the banner repository creates these; the engine forwards them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub client_id: ClientId,
}

impl Banner {
    pub fn new(id: BannerId, client_id: ClientId) -> Self {
        Self { id, client_id }
    }
}
