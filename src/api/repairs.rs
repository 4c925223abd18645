//! Client wrappers for repair tickets and their audit logs.

use serde::{Deserialize, Serialize};

use crate::api::{Envelope, PageResult};
use crate::error::Error;
use crate::transport::Transport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairPriority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Submitted,
    InProgress,
    Done,
    Rejected,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairOrder {
    pub id: i64,
    pub title: String,
    pub priority: RepairPriority,
    pub status: RepairStatus,
    #[serde(default)]
    pub assignee_user_id: Option<i64>,
    #[serde(default)]
    pub assignee_username: Option<String>,
    #[serde(default)]
    pub assignee_real_name: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairOrderDetail {
    pub id: i64,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub student_no: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub building_id: Option<i64>,
    #[serde(default)]
    pub building_code: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub room_no: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: RepairPriority,
    pub status: RepairStatus,
    #[serde(default)]
    pub assignee_user_id: Option<i64>,
    #[serde(default)]
    pub assignee_username: Option<String>,
    #[serde(default)]
    pub assignee_real_name: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairLog {
    pub id: i64,
    pub repair_order_id: i64,
    pub action: String,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub created_by: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRepairsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepair {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRepair {
    pub assignee_user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRepair {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// # Errors
/// Propagates transport failures.
pub async fn list_repairs(
    transport: &Transport,
    params: &ListRepairsParams,
) -> Result<Envelope<PageResult<RepairOrder>>, Error> {
    transport.get_with_query("/api/v1/repairs", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_repair(transport: &Transport, id: i64) -> Result<Envelope<RepairOrderDetail>, Error> {
    transport.get(&format!("/api/v1/repairs/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_repair(
    transport: &Transport,
    payload: &NewRepair,
) -> Result<Envelope<RepairOrderDetail>, Error> {
    transport.post("/api/v1/repairs", payload).await
}

/// Assigns the ticket to a staff member.
///
/// # Errors
/// Propagates transport failures.
pub async fn assign_repair(
    transport: &Transport,
    id: i64,
    payload: &AssignRepair,
) -> Result<Envelope<RepairOrderDetail>, Error> {
    transport
        .post(&format!("/api/v1/repairs/{id}/assign"), payload)
        .await
}

/// Moves the ticket through its workflow.
///
/// # Errors
/// Propagates transport failures; invalid transitions arrive as non-zero
/// envelope codes.
pub async fn transition_repair(
    transport: &Transport,
    id: i64,
    payload: &TransitionRepair,
) -> Result<Envelope<RepairOrderDetail>, Error> {
    transport
        .post(&format!("/api/v1/repairs/{id}/transition"), payload)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn list_repair_logs(
    transport: &Transport,
    id: i64,
) -> Result<Envelope<Vec<RepairLog>>, Error> {
    transport.get(&format!("/api/v1/repairs/{id}/logs")).await
}

#[cfg(test)]
mod tests {
    use super::{RepairPriority, RepairStatus};
    use anyhow::Result;

    #[test]
    fn workflow_enums_use_screaming_snake_case_on_the_wire() -> Result<()> {
        assert_eq!(serde_json::to_string(&RepairPriority::High)?, r#""HIGH""#);
        assert_eq!(
            serde_json::to_string(&RepairStatus::InProgress)?,
            r#""IN_PROGRESS""#
        );
        let status: RepairStatus = serde_json::from_str(r#""SUBMITTED""#)?;
        assert_eq!(status, RepairStatus::Submitted);
        Ok(())
    }
}
