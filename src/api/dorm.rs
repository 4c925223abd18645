//! Client wrappers for buildings, rooms, beds, and bed assignments. These
//! keep endpoint paths centralized and assume the backend enforces
//! authorization.

use serde::{Deserialize, Serialize};

use crate::api::{Envelope, PageResult};
use crate::error::Error;
use crate::transport::Transport;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormBuilding {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub gender_limit: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormRoom {
    pub id: i64,
    pub building_id: i64,
    pub building_code: String,
    pub building_name: String,
    pub floor_no: i32,
    pub room_no: String,
    #[serde(default)]
    pub room_type: Option<String>,
    pub gender_limit: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormBed {
    pub id: i64,
    pub room_id: i64,
    pub room_no: String,
    pub building_id: i64,
    pub building_code: String,
    pub building_name: String,
    pub bed_no: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DormAssignment {
    pub id: i64,
    pub student_id: i64,
    pub student_no: String,
    pub student_name: String,
    pub bed_id: i64,
    pub bed_no: String,
    pub room_id: i64,
    pub room_no: String,
    pub building_id: i64,
    pub building_code: String,
    pub building_name: String,
    pub start_at: String,
    #[serde(default)]
    pub end_at: Option<String>,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Filters for the building listing; unset fields are omitted from the query.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBuildingsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_no: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_no: Option<String>,
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

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBedsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
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

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
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
pub struct BuildingPayload {
    pub code: String,
    pub name: String,
    pub gender_limit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub building_id: i64,
    pub floor_no: i32,
    pub room_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedPayload {
    pub room_id: i64,
    pub bed_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub student_id: i64,
    pub bed_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct EndAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// # Errors
/// Propagates transport failures.
pub async fn list_buildings(
    transport: &Transport,
    params: &ListBuildingsParams,
) -> Result<Envelope<PageResult<DormBuilding>>, Error> {
    transport.get_with_query("/api/v1/dorm/buildings", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_building(transport: &Transport, id: i64) -> Result<Envelope<DormBuilding>, Error> {
    transport.get(&format!("/api/v1/dorm/buildings/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_building(
    transport: &Transport,
    payload: &BuildingPayload,
) -> Result<Envelope<DormBuilding>, Error> {
    transport.post("/api/v1/dorm/buildings", payload).await
}

/// # Errors
/// Propagates transport failures.
pub async fn update_building(
    transport: &Transport,
    id: i64,
    payload: &BuildingPayload,
) -> Result<Envelope<DormBuilding>, Error> {
    transport
        .put(&format!("/api/v1/dorm/buildings/{id}"), payload)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn delete_building(transport: &Transport, id: i64) -> Result<Envelope<()>, Error> {
    transport
        .delete(&format!("/api/v1/dorm/buildings/{id}"))
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn list_rooms(
    transport: &Transport,
    params: &ListRoomsParams,
) -> Result<Envelope<PageResult<DormRoom>>, Error> {
    transport.get_with_query("/api/v1/dorm/rooms", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_room(transport: &Transport, id: i64) -> Result<Envelope<DormRoom>, Error> {
    transport.get(&format!("/api/v1/dorm/rooms/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_room(
    transport: &Transport,
    payload: &RoomPayload,
) -> Result<Envelope<DormRoom>, Error> {
    transport.post("/api/v1/dorm/rooms", payload).await
}

/// # Errors
/// Propagates transport failures.
pub async fn update_room(
    transport: &Transport,
    id: i64,
    payload: &RoomPayload,
) -> Result<Envelope<DormRoom>, Error> {
    transport
        .put(&format!("/api/v1/dorm/rooms/{id}"), payload)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn delete_room(transport: &Transport, id: i64) -> Result<Envelope<()>, Error> {
    transport.delete(&format!("/api/v1/dorm/rooms/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn list_beds(
    transport: &Transport,
    params: &ListBedsParams,
) -> Result<Envelope<PageResult<DormBed>>, Error> {
    transport.get_with_query("/api/v1/dorm/beds", params).await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_bed(transport: &Transport, id: i64) -> Result<Envelope<DormBed>, Error> {
    transport.get(&format!("/api/v1/dorm/beds/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn create_bed(
    transport: &Transport,
    payload: &BedPayload,
) -> Result<Envelope<DormBed>, Error> {
    transport.post("/api/v1/dorm/beds", payload).await
}

/// # Errors
/// Propagates transport failures.
pub async fn update_bed(
    transport: &Transport,
    id: i64,
    payload: &BedPayload,
) -> Result<Envelope<DormBed>, Error> {
    transport
        .put(&format!("/api/v1/dorm/beds/{id}"), payload)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn delete_bed(transport: &Transport, id: i64) -> Result<Envelope<()>, Error> {
    transport.delete(&format!("/api/v1/dorm/beds/{id}")).await
}

/// # Errors
/// Propagates transport failures.
pub async fn list_assignments(
    transport: &Transport,
    params: &ListAssignmentsParams,
) -> Result<Envelope<PageResult<DormAssignment>>, Error> {
    transport
        .get_with_query("/api/v1/dorm/assignments", params)
        .await
}

/// # Errors
/// Propagates transport failures.
pub async fn get_assignment(
    transport: &Transport,
    id: i64,
) -> Result<Envelope<DormAssignment>, Error> {
    transport
        .get(&format!("/api/v1/dorm/assignments/{id}"))
        .await
}

/// Assigns a student to a bed.
///
/// # Errors
/// Propagates transport failures; conflicts arrive as non-zero envelope
/// codes.
pub async fn create_assignment(
    transport: &Transport,
    payload: &NewAssignment,
) -> Result<Envelope<DormAssignment>, Error> {
    transport.post("/api/v1/dorm/assignments", payload).await
}

/// Ends an active assignment, freeing the bed.
///
/// # Errors
/// Propagates transport failures.
pub async fn end_assignment(
    transport: &Transport,
    id: i64,
    payload: &EndAssignment,
) -> Result<Envelope<DormAssignment>, Error> {
    transport
        .post(&format!("/api/v1/dorm/assignments/{id}/end"), payload)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn list_params_serialize_to_camel_case_and_skip_unset() -> Result<()> {
        let params = ListRoomsParams {
            building_id: Some(3),
            page: Some(2),
            page_size: Some(20),
            sort_by: Some("roomNo".to_string()),
            ..ListRoomsParams::default()
        };
        let encoded = serde_json::to_value(&params)?;
        assert_eq!(encoded["buildingId"], 3);
        assert_eq!(encoded["pageSize"], 20);
        assert_eq!(encoded["sortBy"], "roomNo");
        assert!(encoded.get("keyword").is_none());
        assert!(encoded.get("sortOrder").is_none());
        Ok(())
    }

    #[test]
    fn assignment_deserializes_with_optional_end() -> Result<()> {
        let assignment: DormAssignment = serde_json::from_str(
            r#"{
                "id": 9, "studentId": 4, "studentNo": "S-4", "studentName": "Li",
                "bedId": 2, "bedNo": "1", "roomId": 8, "roomNo": "302",
                "buildingId": 1, "buildingCode": "A", "buildingName": "A",
                "startAt": "2026-02-01T08:00:00Z", "status": "ACTIVE"
            }"#,
        )?;
        assert_eq!(assignment.end_at, None);
        assert_eq!(assignment.reason, None);
        Ok(())
    }
}
