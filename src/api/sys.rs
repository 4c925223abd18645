//! Client wrappers for system-administration endpoints.

use serde::{Deserialize, Serialize};

use crate::api::Envelope;
use crate::error::Error;
use crate::transport::Transport;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SysUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub real_name: Option<String>,
    pub status: String,
}

/// Lists the staff accounts.
///
/// # Errors
/// Propagates transport failures.
pub async fn list_users(transport: &Transport) -> Result<Envelope<Vec<SysUser>>, Error> {
    transport.get("/api/v1/sys/users").await
}
