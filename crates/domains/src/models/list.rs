use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Rejects NaN and infinities. Negative and fractional keys are valid so
/// callers can reorder by interpolating between neighbours.
pub fn ensure_position(position: f64) -> DomainResult<f64> {
    if !position.is_finite() {
        return Err(DomainError::validation("Position must be a finite number"));
    }
    Ok(position)
}

/// An ordered column of cards. Belongs to one board for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub title: String,
    pub position: f64,
    pub color: Option<String>,
    board_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn new(
        board_id: Uuid,
        title: impl Into<String>,
        position: f64,
        color: Option<String>,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            position: ensure_position(position)?,
            color,
            board_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// The board is fixed at creation; there is no setter.
    pub fn board_id(&self) -> Uuid {
        self.board_id
    }

    pub fn belongs_to_board(&self, board_id: Uuid) -> bool {
        self.board_id == board_id
    }

    pub fn rename(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if self.title == title {
            return false;
        }
        self.title = title;
        self.touch();
        true
    }

    pub fn set_color(&mut self, color: Option<String>) -> bool {
        if self.color == color {
            return false;
        }
        self.color = color;
        self.touch();
        true
    }

    pub fn reposition(&mut self, position: f64) -> DomainResult<bool> {
        let position = ensure_position(position)?;
        if self.position == position {
            return Ok(false);
        }
        self.position = position;
        self.touch();
        Ok(true)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_negative_and_fractional_positions() {
        let list = List::new(Uuid::new_v4(), "Doing", -0.5, None).unwrap();
        assert_eq!(list.position, -0.5);
    }

    #[test]
    fn rejects_nan_position() {
        assert!(List::new(Uuid::new_v4(), "Doing", f64::NAN, None).is_err());
        let mut list = List::new(Uuid::new_v4(), "Doing", 1.0, None).unwrap();
        assert!(list.reposition(f64::INFINITY).is_err());
        assert_eq!(list.position, 1.0);
    }

    #[test]
    fn belongs_to_board_is_a_pure_check() {
        let board_id = Uuid::new_v4();
        let list = List::new(board_id, "Done", 0.0, None).unwrap();
        assert!(list.belongs_to_board(board_id));
        assert!(!list.belongs_to_board(Uuid::new_v4()));
    }
}
