use serde::{Deserialize, Serialize};

/// Server side half of a login session, stored under the session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: i64,
    pub username: String,
    pub csrf_token: String,
}
