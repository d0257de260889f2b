use serde::{Deserialize, Serialize};

/// Account record from the authentication tables; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub role: String,
}
