//! Client wrappers for visitor check-in records.

use serde::{Deserialize, Serialize};

use crate::api::{Envelope, PageResult};
use crate::error::Error;
use crate::transport::Transport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorStatus {
    In,
    Out,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub id: i64,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub student_no: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    pub visitor_name: String,
    #[serde(default)]
    pub id_no: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub visit_reason: Option<String>,
    pub visit_at: String,
    #[serde(default)]
    pub leave_at: Option<String>,
    pub status: VisitorStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVisitorsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
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
pub struct NewVisitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_at: Option<String>,
}

/// # Errors
/// Propagates transport failures.
pub async fn list_visitors(
    transport: &Transport,
    params: &ListVisitorsParams,
) -> Result<Envelope<PageResult<VisitorRecord>>, Error> {
    transport.get_with_query("/api/v1/visitors", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_visitor(transport: &Transport, id: i64) -> Result<Envelope<VisitorRecord>, Error> {
    transport.get(&format!("/api/v1/visitors/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_visitor(
    transport: &Transport,
    payload: &NewVisitor,
) -> Result<Envelope<VisitorRecord>, Error> {
    transport.post("/api/v1/visitors", payload).await
}

/// Marks the visitor as checked out.
///
/// # Errors
/// Propagates transport failures.
pub async fn leave_visitor(transport: &Transport, id: i64) -> Result<Envelope<VisitorRecord>, Error> {
    transport
        .post_empty(&format!("/api/v1/visitors/{id}/leave"))
        .await
}
