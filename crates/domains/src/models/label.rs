use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A board-scoped tag. Attachable only to cards of the same board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub board_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Label {
    pub fn new(board_id: Uuid, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            board_id,
            created_at: Utc::now(),
        }
    }

    pub fn belongs_to_board(&self, board_id: Uuid) -> bool {
        self.board_id == board_id
    }

    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }

    pub fn recolor(&mut self, color: impl Into<String>) -> bool {
        let color = color.into();
        if self.color == color {
            return false;
        }
        self.color = color;
        true
    }
}
