//! Owning-board resolution shared by every use case.
//!
//! Cards reach their board through their list; labels and lists carry the
//! board id directly. Each hop reports its own `NotFound` message.

use std::sync::Arc;

use domains::permissions;
use domains::{
    Board, BoardRepository, Card, CardRepository, DomainError, DomainResult, Label,
    LabelRepository, List, ListRepository, Role,
};
use uuid::Uuid;

pub const BOARD_NOT_FOUND: &str = "Board not found";
pub const LIST_NOT_FOUND: &str = "List not found";
pub const CARD_NOT_FOUND: &str = "Card not found";
pub const LABEL_NOT_FOUND: &str = "Label not found";

const NO_CHILD_PERMISSION: &str = "You don't have permission to modify this board";

/// A loaded board together with the requesting actor's membership role.
#[derive(Debug, Clone)]
pub struct BoardAccess {
    pub board: Board,
    pub actor_id: Uuid,
    pub role: Option<Role>,
}

impl BoardAccess {
    pub fn effective_role(&self) -> Option<Role> {
        permissions::effective_role(&self.board, self.actor_id, self.role)
    }

    pub fn ensure_can_view(&self) -> DomainResult<()> {
        if permissions::can_view(&self.board, self.actor_id, self.role) {
            return Ok(());
        }
        Err(self.deny("You don't have permission to view this board"))
    }

    /// Archive state is checked first so archived boards always answer
    /// with a business-rule error rather than a permission error.
    pub fn ensure_can_edit(&self) -> DomainResult<()> {
        self.board.ensure_not_archived()?;
        if permissions::can_edit(&self.board, self.actor_id, self.role) {
            return Ok(());
        }
        Err(self.deny("You don't have permission to edit this board"))
    }

    pub fn ensure_can_mutate_children(&self) -> DomainResult<()> {
        self.board.ensure_not_archived()?;
        if permissions::can_mutate_child_entity(&self.board, self.actor_id, self.role) {
            return Ok(());
        }
        Err(self.deny(NO_CHILD_PERMISSION))
    }

    /// Card deletion: the role gate, widened to the card's creator.
    pub fn ensure_can_delete_card(&self, card: &Card) -> DomainResult<()> {
        self.board.ensure_not_archived()?;
        if card.is_created_by(self.actor_id)
            || permissions::can_mutate_child_entity(&self.board, self.actor_id, self.role)
        {
            return Ok(());
        }
        Err(self.deny(NO_CHILD_PERMISSION))
    }

    pub fn deny(&self, msg: &str) -> DomainError {
        tracing::warn!(
            board_id = %self.board.id,
            actor_id = %self.actor_id,
            role = ?self.role,
            "{msg}"
        );
        DomainError::forbidden(msg)
    }
}

pub async fn load_board(boards: &dyn BoardRepository, board_id: Uuid) -> DomainResult<Board> {
    boards
        .find_by_id(board_id)
        .await?
        .ok_or_else(|| DomainError::not_found(BOARD_NOT_FOUND))
}

/// Loads the board and looks the actor's role up once for the request.
pub async fn load_access(
    boards: &dyn BoardRepository,
    board_id: Uuid,
    actor_id: Uuid,
) -> DomainResult<BoardAccess> {
    let board = load_board(boards, board_id).await?;
    let role = boards.get_member_role(board.id, actor_id).await?;
    Ok(BoardAccess {
        board,
        actor_id,
        role,
    })
}

/// Walks `card -> list -> board` for the child-entity use cases.
#[derive(Clone)]
pub struct BoardResolver {
    boards: Arc<dyn BoardRepository>,
    lists: Arc<dyn ListRepository>,
}

impl BoardResolver {
    pub fn new(boards: Arc<dyn BoardRepository>, lists: Arc<dyn ListRepository>) -> Self {
        Self { boards, lists }
    }

    pub async fn board(&self, board_id: Uuid, actor_id: Uuid) -> DomainResult<BoardAccess> {
        load_access(&*self.boards, board_id, actor_id).await
    }

    pub async fn list(&self, list_id: Uuid) -> DomainResult<List> {
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| DomainError::not_found(LIST_NOT_FOUND))
    }

    pub async fn list_with_board(
        &self,
        list_id: Uuid,
        actor_id: Uuid,
    ) -> DomainResult<(List, BoardAccess)> {
        let list = self.list(list_id).await?;
        let access = self.board(list.board_id(), actor_id).await?;
        Ok((list, access))
    }

    pub async fn card_with_board(
        &self,
        cards: &dyn CardRepository,
        card_id: Uuid,
        actor_id: Uuid,
    ) -> DomainResult<(Card, List, BoardAccess)> {
        let card = cards
            .find_by_id(card_id)
            .await?
            .ok_or_else(|| DomainError::not_found(CARD_NOT_FOUND))?;
        let (list, access) = self.list_with_board(card.list_id, actor_id).await?;
        Ok((card, list, access))
    }

    pub async fn label_with_board(
        &self,
        labels: &dyn LabelRepository,
        label_id: Uuid,
        actor_id: Uuid,
    ) -> DomainResult<(Label, BoardAccess)> {
        let label = labels
            .find_by_id(label_id)
            .await?
            .ok_or_else(|| DomainError::not_found(LABEL_NOT_FOUND))?;
        let access = self.board(label.board_id, actor_id).await?;
        Ok((label, access))
    }
}
