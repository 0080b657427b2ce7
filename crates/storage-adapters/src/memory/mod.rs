//! # In-memory storage
//!
//! A concurrent implementation of every repository port on top of
//! `dashmap`. Membership is keyed by `(board_id, user_id)`, which gives the
//! same per-row uniqueness a unique constraint would. Deleting a board
//! cascades to its lists, cards, labels, membership and activity.

mod repositories;

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::{DashMap, DashSet};
use domains::{Activity, Board, BoardMember, Card, DomainError, DomainResult, Label, List, User};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    boards: DashMap<Uuid, Board>,
    members: DashMap<(Uuid, Uuid), BoardMember>,
    lists: DashMap<Uuid, List>,
    cards: DashMap<Uuid, Card>,
    labels: DashMap<Uuid, Label>,
    /// `(card_id, label_id)` attachments.
    card_labels: DashSet<(Uuid, Uuid)>,
    users: DashMap<Uuid, User>,
    activities: RwLock<Vec<Activity>>,
    fail_activity_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users are provisioned outside the board core (sign-up, SSO).
    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Makes every subsequent activity write fail, to exercise the
    /// surfaced-audit-failure path.
    pub fn fail_activity_writes(&self, fail: bool) {
        self.fail_activity_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored activity in append order, across boards.
    pub async fn all_activities(&self) -> Vec<Activity> {
        self.activities.read().await.clone()
    }

    pub fn labels_on_card(&self, card_id: Uuid) -> Vec<Uuid> {
        self.card_labels
            .iter()
            .filter(|pair| pair.0 == card_id)
            .map(|pair| pair.1)
            .collect()
    }

    fn ensure_activity_writable(&self) -> DomainResult<()> {
        if self.fail_activity_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Internal(anyhow::anyhow!(
                "activity store unavailable"
            )));
        }
        Ok(())
    }

    fn remove_cards_of_list(&self, list_id: Uuid) {
        let card_ids: Vec<Uuid> = self
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| c.id)
            .collect();
        for card_id in card_ids {
            self.cards.remove(&card_id);
            self.card_labels.retain(|pair| pair.0 != card_id);
        }
    }

    fn remove_board_tree(&self, board_id: Uuid) {
        let list_ids: Vec<Uuid> = self
            .lists
            .iter()
            .filter(|l| l.belongs_to_board(board_id))
            .map(|l| l.id)
            .collect();
        for list_id in list_ids {
            self.remove_cards_of_list(list_id);
            self.lists.remove(&list_id);
        }

        let label_ids: Vec<Uuid> = self
            .labels
            .iter()
            .filter(|l| l.belongs_to_board(board_id))
            .map(|l| l.id)
            .collect();
        for label_id in label_ids {
            self.labels.remove(&label_id);
            self.card_labels.retain(|pair| pair.1 != label_id);
        }

        self.members.retain(|(b, _), _| *b != board_id);
        self.boards.remove(&board_id);
    }
}

fn next_position(positions: impl Iterator<Item = f64>) -> f64 {
    positions.fold(None, |max: Option<f64>, p| Some(max.map_or(p, |m| m.max(p))))
        .map_or(0.0, |max| max + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_position_starts_at_zero() {
        assert_eq!(next_position(std::iter::empty()), 0.0);
    }

    #[test]
    fn next_position_is_one_past_the_max() {
        assert_eq!(next_position([-3.0, 2.5, 1.0].into_iter()), 3.5);
        assert_eq!(next_position([-3.0].into_iter()), -2.0);
    }
}
