//! The Board aggregate and its membership rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::models::Role;

pub const ARCHIVED_BOARD: &str = "Board is archived and read-only";

/// Top-level shared workspace. Owns lists, labels and membership.
///
/// `owner_id` carries the implicit `Owner` role; it is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub background_url: Option<String>,
    pub is_public: bool,
    pub is_archived: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(
        owner_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        background_url: Option<String>,
        is_public: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            background_url,
            is_public,
            is_archived: false,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Archived boards reject every member-management and child mutation.
    pub fn ensure_not_archived(&self) -> DomainResult<()> {
        if self.is_archived {
            return Err(DomainError::conflict(ARCHIVED_BOARD));
        }
        Ok(())
    }

    /// Returns `true` when the title actually changed.
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

    pub fn set_background(&mut self, background_url: Option<String>) -> bool {
        if self.background_url == background_url {
            return false;
        }
        self.background_url = background_url;
        self.touch();
        true
    }

    pub fn set_visibility(&mut self, is_public: bool) -> bool {
        if self.is_public == is_public {
            return false;
        }
        self.is_public = is_public;
        self.touch();
        true
    }

    /// Idempotent: archiving an archived board is a silent no-op.
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

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A (board, user, role) grant below the owner level.
///
/// Rows only ever carry `Admin`, `Member` or `Viewer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl BoardMember {
    pub fn new(board_id: Uuid, user_id: Uuid, role: Role) -> DomainResult<Self> {
        if !role.is_assignable() {
            return Err(DomainError::conflict(
                "Only the board owner can transfer ownership",
            ));
        }
        Ok(Self {
            board_id,
            user_id,
            role,
            joined_at: Utc::now(),
        })
    }
}
