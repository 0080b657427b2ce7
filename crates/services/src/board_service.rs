//! Board lifecycle: create, view, edit, archive toggles, delete, activity feed.

use std::sync::Arc;

use domains::permissions;
use domains::{ActivityAction, Board, BoardRepository, DomainError, DomainResult, UserRepository};
use serde_json::json;
use uuid::Uuid;

use crate::access::{load_access, load_board};
use crate::audit::{board_changes, ActivityDraft, ActivityRecorder};
use crate::dto::{
    BoardActionRequest, BoardResponse, CreateBoardRequest, GetActivityRequest,
    GetActivityResponse, GetBoardResponse, UpdateBoardRequest,
};

pub struct BoardService {
    boards: Arc<dyn BoardRepository>,
    users: Arc<dyn UserRepository>,
    audit: ActivityRecorder,
}

impl BoardService {
    pub fn new(
        boards: Arc<dyn BoardRepository>,
        users: Arc<dyn UserRepository>,
        audit: ActivityRecorder,
    ) -> Self {
        Self {
            boards,
            users,
            audit,
        }
    }

    /// The creator becomes the owner. Ownership lives on the board itself;
    /// no membership row is written.
    #[tracing::instrument(skip(self, req), fields(actor_id = %req.actor_id))]
    pub async fn create_board(&self, req: CreateBoardRequest) -> DomainResult<BoardResponse> {
        self.users
            .find_by_id(req.actor_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        let board = Board::new(
            req.actor_id,
            req.title,
            req.description,
            req.background_url,
            req.is_public,
        );
        self.boards.save(&board).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_board(ActivityAction::Create, &board)
                    .with_description(format!("created board \"{}\"", board.title))
                    .with_data(json!({ "isPublic": board.is_public })),
            )
            .await?;

        tracing::info!(board_id = %board.id, "board created");
        Ok(BoardResponse { board })
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn get_board(&self, req: BoardActionRequest) -> DomainResult<GetBoardResponse> {
        let access = load_access(&*self.boards, req.board_id, req.actor_id).await?;
        access.ensure_can_view()?;
        let role = access.effective_role();
        Ok(GetBoardResponse {
            board: access.board,
            role,
        })
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn update_board(&self, req: UpdateBoardRequest) -> DomainResult<BoardResponse> {
        let access = load_access(&*self.boards, req.board_id, req.actor_id).await?;
        access.ensure_can_edit()?;

        let before = access.board;
        let mut board = before.clone();
        if let Some(title) = req.title {
            board.rename(title);
        }
        if let Some(description) = req.description {
            board.set_description(description);
        }
        if let Some(background_url) = req.background_url {
            board.set_background(background_url);
        }
        if let Some(is_public) = req.is_public {
            board.set_visibility(is_public);
        }

        self.persist_changes(req.actor_id, &before, &board).await?;
        Ok(BoardResponse { board })
    }

    /// Redundant archive requests succeed without writing anything.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn archive_board(&self, req: BoardActionRequest) -> DomainResult<BoardResponse> {
        self.toggle_archive(req, true).await
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn unarchive_board(&self, req: BoardActionRequest) -> DomainResult<BoardResponse> {
        self.toggle_archive(req, false).await
    }

    async fn toggle_archive(
        &self,
        req: BoardActionRequest,
        archived: bool,
    ) -> DomainResult<BoardResponse> {
        let access = load_access(&*self.boards, req.board_id, req.actor_id).await?;
        if !permissions::can_toggle_archive(&access.board, req.actor_id, access.role) {
            return Err(access.deny("Only the board owner or an admin can archive this board"));
        }

        let before = access.board;
        let mut board = before.clone();
        if archived {
            board.archive();
        } else {
            board.unarchive();
        }

        self.persist_changes(req.actor_id, &before, &board).await?;
        Ok(BoardResponse { board })
    }

    async fn persist_changes(
        &self,
        actor_id: Uuid,
        before: &Board,
        after: &Board,
    ) -> DomainResult<()> {
        let Some(description) = board_changes(before, after).describe() else {
            tracing::debug!(board_id = %after.id, "no effective board change");
            return Ok(());
        };

        self.boards.save(after).await?;
        self.audit
            .record(
                actor_id,
                ActivityDraft::for_board(ActivityAction::Update, after)
                    .with_description(description),
            )
            .await?;

        tracing::info!(board_id = %after.id, "board updated");
        Ok(())
    }

    /// Owner only, archived or not. Storage cascades the board's children
    /// and history; the deletion record itself is written afterwards.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn delete_board(&self, req: BoardActionRequest) -> DomainResult<()> {
        let board = load_board(&*self.boards, req.board_id).await?;
        if !permissions::can_delete_board(&board, req.actor_id) {
            tracing::warn!(board_id = %board.id, actor_id = %req.actor_id, "board delete denied");
            return Err(DomainError::forbidden("Only the board owner can delete this board"));
        }

        self.boards.delete(board.id).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_board(ActivityAction::Delete, &board)
                    .with_description(format!("deleted board \"{}\"", board.title)),
            )
            .await?;

        tracing::info!(board_id = %board.id, "board deleted");
        Ok(())
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn get_activity(&self, req: GetActivityRequest) -> DomainResult<GetActivityResponse> {
        let access = load_access(&*self.boards, req.board_id, req.actor_id).await?;
        access.ensure_can_view()?;
        let activities = self.audit.feed(access.board.id, req.limit).await?;
        Ok(GetActivityResponse { activities })
    }
}
