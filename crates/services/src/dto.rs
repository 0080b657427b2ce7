//! Request/response shapes, one pair per use case. Plain data, no behavior.
//!
//! Patch fields use `Option<Option<T>>`: absent leaves the field untouched,
//! `null` clears it, a value sets it.

use chrono::{DateTime, Utc};
use domains::{Activity, Board, BoardMember, Card, Label, List, Role};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

// ── Boards ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub actor_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardResponse {
    pub board: Board,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardActionRequest {
    pub board_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBoardResponse {
    pub board: Board,
    /// `None` for visitors of a public board.
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub board_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub background_url: Option<Option<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetActivityRequest {
    pub board_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default = "default_activity_limit")]
    pub limit: usize,
}

fn default_activity_limit() -> usize {
    50
}

#[derive(Debug, Clone, Serialize)]
pub struct GetActivityResponse {
    pub activities: Vec<Activity>,
}

// ── Members ─────────────────────────────────────────────────────────────────

/// `role` arrives as a string and is parsed into the closed [`Role`] set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddMemberResponse {
    pub member: BoardMember,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleResponse {
    pub member: BoardMember,
    pub previous_role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberRequest {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberResponse {
    pub removed_role: Role,
    pub self_removal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetMembersResponse {
    /// The owner first, then membership rows.
    pub members: Vec<BoardMember>,
}

// ── Lists ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub board_id: Uuid,
    pub actor_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub list_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteListRequest {
    pub list_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub list: List,
}

// ── Cards ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub list_id: Uuid,
    pub actor_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub card_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_url: Option<Option<String>>,
    #[serde(default)]
    pub is_archived: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardActionRequest {
    pub card_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub card_id: Uuid,
    pub actor_id: Uuid,
    pub target_list_id: Uuid,
    #[serde(default)]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub card: Card,
}

// ── Labels ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    pub board_id: Uuid,
    pub actor_id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelRequest {
    pub label_id: Uuid,
    pub actor_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLabelRequest {
    pub label_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLabelRequest {
    pub card_id: Uuid,
    pub label_id: Uuid,
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelResponse {
    pub label: Label,
}
