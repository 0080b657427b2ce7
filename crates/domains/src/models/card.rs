use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::models::list::ensure_position;

/// A task item within one list.
///
/// A card never stores its board: the owning board is always reached
/// through `list_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub is_archived: bool,
    pub cover_url: Option<String>,
    pub list_id: Uuid,
    pub creator_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn ensure_schedule(
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
) -> DomainResult<()> {
    if let (Some(start), Some(due)) = (start_date, due_date) {
        if start > due {
            return Err(DomainError::validation("Start date cannot be after due date"));
        }
    }
    Ok(())
}

impl Card {
    pub fn new(
        list_id: Uuid,
        creator_id: Uuid,
        title: impl Into<String>,
        position: f64,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            position: ensure_position(position)?,
            due_date: None,
            start_date: None,
            is_archived: false,
            cover_url: None,
            list_id,
            creator_id,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_created_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
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

    pub fn set_description(&mut self, description: Option<String>) -> bool {
        if self.description == description {
            return false;
        }
        self.description = description;
        self.touch();
        true
    }

    pub fn set_cover(&mut self, cover_url: Option<String>) -> bool {
        if self.cover_url == cover_url {
            return false;
        }
        self.cover_url = cover_url;
        self.touch();
        true
    }

    /// Sets both dates at once; `start_date` must not exceed `due_date`.
    /// The card is left untouched when the pair is invalid.
    pub fn schedule(
        &mut self,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
    ) -> DomainResult<bool> {
        ensure_schedule(start_date, due_date)?;
        if self.start_date == start_date && self.due_date == due_date {
            return Ok(false);
        }
        self.start_date = start_date;
        self.due_date = due_date;
        self.touch();
        Ok(true)
    }

    pub fn assign(&mut self, assignee_id: Option<Uuid>) -> bool {
        if self.assignee_id == assignee_id {
            return false;
        }
        self.assignee_id = assignee_id;
        self.touch();
        true
    }

    /// Archiving an archived card is allowed and changes nothing.
    pub fn archive(&mut self) -> bool {
        if self.is_archived {
            return false;
        }
        self.is_archived = true;
        self.touch();
        true
    }

    pub fn unarchive(&mut self) -> bool {
        if !self.is_archived {
            return false;
        }
        self.is_archived = false;
        self.touch();
        true
    }

    pub fn move_to(&mut self, list_id: Uuid, position: f64) -> DomainResult<()> {
        self.position = ensure_position(position)?;
        self.list_id = list_id;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
