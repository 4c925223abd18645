//! Client wrappers for student records.

use serde::{Deserialize, Serialize};

use crate::api::{Envelope, PageResult};
use crate::error::Error;
use crate::transport::Transport;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub student_no: String,
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
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
pub struct StudentPayload {
    pub student_no: String,
    pub name: String,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// # Errors
/// Propagates transport failures.
pub async fn list_students(
    transport: &Transport,
    params: &ListStudentsParams,
) -> Result<Envelope<PageResult<Student>>, Error> {
    transport.get_with_query("/api/v1/students", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_student(transport: &Transport, id: i64) -> Result<Envelope<Student>, Error> {
    transport.get(&format!("/api/v1/students/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_student(
    transport: &Transport,
    payload: &StudentPayload,
) -> Result<Envelope<Student>, Error> {
    transport.post("/api/v1/students", payload).await
}

/// # Errors
/// Propagates transport failures.
pub async fn update_student(
    transport: &Transport,
    id: i64,
    payload: &StudentPayload,
) -> Result<Envelope<Student>, Error> {
    transport
        .put(&format!("/api/v1/students/{id}"), payload)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn delete_student(transport: &Transport, id: i64) -> Result<Envelope<()>, Error> {
    transport.delete(&format!("/api/v1/students/{id}")).await
}
