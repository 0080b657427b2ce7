//! # Audit Logger
//!
//! Appends one [`Activity`] per successful mutation. The write happens after
//! the primary mutation is persisted; if it fails the error is surfaced to
//! the caller and the primary write stays in place (no compensation).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    Activity, ActivityAction, ActivityRepository, Board, Card, DomainResult, EntityType, Label,
    List,
};
use serde_json::Value;
use uuid::Uuid;

/// Everything about an activity except its identity, actor and timestamp.
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub entity_title: String,
    pub board_id: Uuid,
    pub card_id: Option<Uuid>,
    pub description: Option<String>,
    pub data: Value,
}

impl ActivityDraft {
    pub fn new(
        action: ActivityAction,
        entity_type: EntityType,
        entity_id: Uuid,
        entity_title: impl Into<String>,
        board_id: Uuid,
    ) -> Self {
        Self {
            action,
            entity_type,
            entity_id,
            entity_title: entity_title.into(),
            board_id,
            card_id: None,
            description: None,
            data: Value::Null,
        }
    }

    pub fn for_board(action: ActivityAction, board: &Board) -> Self {
        Self::new(action, EntityType::Board, board.id, &board.title, board.id)
    }

    pub fn for_list(action: ActivityAction, list: &List) -> Self {
        Self::new(action, EntityType::List, list.id, &list.title, list.board_id())
    }

    pub fn for_card(action: ActivityAction, card: &Card, board_id: Uuid) -> Self {
        Self::new(action, EntityType::Card, card.id, &card.title, board_id).with_card(card.id)
    }

    pub fn for_label(action: ActivityAction, label: &Label) -> Self {
        Self::new(action, EntityType::Label, label.id, &label.name, label.board_id)
    }

    pub fn with_card(mut self, card_id: Uuid) -> Self {
        self.card_id = Some(card_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

#[derive(Clone)]
pub struct ActivityRecorder {
    activities: Arc<dyn ActivityRepository>,
}

impl ActivityRecorder {
    pub fn new(activities: Arc<dyn ActivityRepository>) -> Self {
        Self { activities }
    }

    pub async fn record(&self, actor_id: Uuid, draft: ActivityDraft) -> DomainResult<Activity> {
        let activity = Activity {
            id: Uuid::new_v4(),
            action: draft.action,
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            entity_title: draft.entity_title,
            description: draft.description,
            data: draft.data,
            user_id: actor_id,
            board_id: draft.board_id,
            card_id: draft.card_id,
            created_at: Utc::now(),
        };

        if let Err(err) = self.activities.save(&activity).await {
            tracing::error!(
                board_id = %activity.board_id,
                entity_id = %activity.entity_id,
                action = ?activity.action,
                error = %err,
                "audit write failed after the mutation was persisted"
            );
            return Err(err);
        }

        tracing::debug!(
            activity_id = %activity.id,
            board_id = %activity.board_id,
            action = ?activity.action,
            "activity recorded"
        );
        Ok(activity)
    }

    pub async fn feed(&self, board_id: Uuid, limit: usize) -> DomainResult<Vec<Activity>> {
        self.activities.find_by_board(board_id, limit).await
    }
}

/// Collects human-readable fragments for the fields that actually changed.
#[derive(Debug, Default)]
pub struct ChangeLog(Vec<String>);

impl ChangeLog {
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.0.push(fragment.into());
    }

    /// `None` when nothing changed.
    pub fn describe(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(", "))
        }
    }

    fn text(&mut self, field: &str, before: &str, after: &str) {
        if before != after {
            self.push(format!("changed {field} from \"{before}\" to \"{after}\""));
        }
    }

    fn optional_text(&mut self, field: &str, before: &Option<String>, after: &Option<String>) {
        match (before, after) {
            (None, Some(_)) => self.push(format!("added {field}")),
            (Some(_), None) => self.push(format!("removed {field}")),
            (Some(a), Some(b)) if a != b => self.push(format!("updated {field}")),
            _ => {}
        }
    }

    fn date(&mut self, field: &str, before: Option<DateTime<Utc>>, after: Option<DateTime<Utc>>) {
        if before == after {
            return;
        }
        match after {
            Some(date) => self.push(format!("set {field} to {}", date.format("%Y-%m-%d"))),
            None => self.push(format!("removed {field}")),
        }
    }
}

pub fn board_changes(before: &Board, after: &Board) -> ChangeLog {
    let mut log = ChangeLog::default();
    log.text("title", &before.title, &after.title);
    log.optional_text("the description", &before.description, &after.description);
    log.optional_text("the background", &before.background_url, &after.background_url);
    if before.is_public != after.is_public {
        log.push(if after.is_public { "made the board public" } else { "made the board private" });
    }
    if before.is_archived != after.is_archived {
        log.push(if after.is_archived { "archived the board" } else { "unarchived the board" });
    }
    log
}

pub fn list_changes(before: &List, after: &List) -> ChangeLog {
    let mut log = ChangeLog::default();
    log.text("title", &before.title, &after.title);
    log.optional_text("the color", &before.color, &after.color);
    if before.position != after.position {
        log.push("reordered the list");
    }
    log
}

pub fn card_changes(before: &Card, after: &Card) -> ChangeLog {
    let mut log = ChangeLog::default();
    log.text("title", &before.title, &after.title);
    log.optional_text("the description", &before.description, &after.description);
    log.optional_text("the cover", &before.cover_url, &after.cover_url);
    log.date("due date", before.due_date, after.due_date);
    log.date("start date", before.start_date, after.start_date);
    match (before.assignee_id, after.assignee_id) {
        (_, Some(assignee)) if before.assignee_id != after.assignee_id => {
            log.push(format!("assigned the card to {assignee}"))
        }
        (Some(_), None) => log.push("unassigned the card"),
        _ => {}
    }
    if before.is_archived != after.is_archived {
        log.push(if after.is_archived { "archived the card" } else { "unarchived the card" });
    }
    log
}

pub fn label_changes(before: &Label, after: &Label) -> ChangeLog {
    let mut log = ChangeLog::default();
    log.text("name", &before.name, &after.name);
    log.text("color", &before.color, &after.color);
    log
}
