//! # Repository Ports
//!
//! Persistence contracts consumed by the use cases. Any storage adapter
//! must implement these traits to be wired into the services.
//!
//! Return values are domain entities, never raw rows. Absence is `Ok(None)`;
//! `Err` is reserved for infrastructure failures.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::models::{Activity, Board, BoardMember, Card, Label, List, Role, User};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Board>>;
    async fn save(&self, board: &Board) -> DomainResult<()>;
    /// Cascades to lists, cards, labels, membership and activity.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// `None` when the user has no membership row. The owner is detected
    /// through `Board::owner_id`, not through this lookup.
    async fn get_member_role(&self, board_id: Uuid, user_id: Uuid) -> DomainResult<Option<Role>>;
    async fn get_membership(
        &self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<BoardMember>>;
    async fn get_members(&self, board_id: Uuid) -> DomainResult<Vec<BoardMember>>;

    /// Upsert: re-adding an existing member updates the role.
    async fn add_member(&self, board_id: Uuid, user_id: Uuid, role: Role) -> DomainResult<()>;
    async fn update_member_role(&self, board_id: Uuid, user_id: Uuid, role: Role)
        -> DomainResult<()>;
    async fn remove_member(&self, board_id: Uuid, user_id: Uuid) -> DomainResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<List>>;
    async fn save(&self, list: &List) -> DomainResult<()>;
    /// Cascades to the list's cards.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    async fn get_next_position(&self, board_id: Uuid) -> DomainResult<f64>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Card>>;
    async fn save(&self, card: &Card) -> DomainResult<()>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    async fn get_next_position(&self, list_id: Uuid) -> DomainResult<f64>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Label>>;
    async fn save(&self, label: &Label) -> DomainResult<()>;
    /// Detaches the label from every card before removing it.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    async fn is_attached_to_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<bool>;
    async fn add_to_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<()>;
    async fn remove_from_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<()>;
}

/// Existence checks only; users carry no role data.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
}

/// Append-only audit trail.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn save(&self, activity: &Activity) -> DomainResult<()>;
    /// Most recent first.
    async fn find_by_board(&self, board_id: Uuid, limit: usize) -> DomainResult<Vec<Activity>>;
}
