use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Move,
    AddMember,
    RemoveMember,
    AddLabel,
    RemoveLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Board,
    List,
    Card,
    Label,
}

/// Immutable audit record of a state-changing action. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    /// Snapshot of the entity's title at the time of the action.
    pub entity_title: String,
    pub description: Option<String>,
    pub data: serde_json::Value,
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub card_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
