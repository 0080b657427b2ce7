use std::sync::Arc;

use domains::{
    ActivityAction, Card, CardRepository, DomainError, DomainResult, UserRepository,
};
use serde_json::json;
use uuid::Uuid;

use crate::access::BoardResolver;
use crate::audit::{card_changes, ActivityDraft, ActivityRecorder};
use crate::dto::{
    CardActionRequest, CardResponse, CreateCardRequest, MoveCardRequest, UpdateCardRequest,
};

pub const CROSS_BOARD_MOVE: &str = "Cannot move card between different boards";

pub struct CardService {
    resolver: BoardResolver,
    cards: Arc<dyn CardRepository>,
    users: Arc<dyn UserRepository>,
    audit: ActivityRecorder,
}

impl CardService {
    pub fn new(
        resolver: BoardResolver,
        cards: Arc<dyn CardRepository>,
        users: Arc<dyn UserRepository>,
        audit: ActivityRecorder,
    ) -> Self {
        Self {
            resolver,
            cards,
            users,
            audit,
        }
    }

    async fn ensure_assignee_exists(&self, assignee_id: Option<Uuid>) -> DomainResult<()> {
        if let Some(id) = assignee_id {
            self.users
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found("Assignee not found"))?;
        }
        Ok(())
    }

    #[tracing::instrument(
        skip(self, req),
        fields(list_id = %req.list_id, actor_id = %req.actor_id)
    )]
    pub async fn create_card(&self, req: CreateCardRequest) -> DomainResult<CardResponse> {
        let (list, access) = self
            .resolver
            .list_with_board(req.list_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;
        self.ensure_assignee_exists(req.assignee_id).await?;

        let position = match req.position {
            Some(position) => position,
            None => self.cards.get_next_position(list.id).await?,
        };
        let mut card = Card::new(list.id, req.actor_id, req.title, position)?;
        card.set_description(req.description);
        card.schedule(req.start_date, req.due_date)?;
        card.assign(req.assignee_id);
        self.cards.save(&card).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::Create, &card, access.board.id)
                    .with_description(format!("added card \"{}\" to {}", card.title, list.title))
                    .with_data(json!({ "listId": list.id })),
            )
            .await?;

        tracing::info!(card_id = %card.id, list_id = %list.id, "card created");
        Ok(CardResponse { card })
    }

    /// Applies the patch; only fields that actually change are described,
    /// and a patch with no effective change writes nothing.
    #[tracing::instrument(
        skip(self, req),
        fields(card_id = %req.card_id, actor_id = %req.actor_id)
    )]
    pub async fn update_card(&self, req: UpdateCardRequest) -> DomainResult<CardResponse> {
        let (before, _list, access) = self
            .resolver
            .card_with_board(&*self.cards, req.card_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;

        let mut card = before.clone();
        if let Some(title) = req.title {
            card.rename(title);
        }
        if let Some(description) = req.description {
            card.set_description(description);
        }
        if let Some(cover_url) = req.cover_url {
            card.set_cover(cover_url);
        }
        if req.start_date.is_some() || req.due_date.is_some() {
            let start = req.start_date.unwrap_or(card.start_date);
            let due = req.due_date.unwrap_or(card.due_date);
            card.schedule(start, due)?;
        }
        if let Some(assignee_id) = req.assignee_id {
            self.ensure_assignee_exists(assignee_id).await?;
            card.assign(assignee_id);
        }
        match req.is_archived {
            Some(true) => {
                card.archive();
            }
            Some(false) => {
                card.unarchive();
            }
            None => {}
        }

        let Some(description) = card_changes(&before, &card).describe() else {
            tracing::debug!(card_id = %card.id, "no effective card change");
            return Ok(CardResponse { card });
        };

        self.cards.save(&card).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::Update, &card, access.board.id)
                    .with_description(description),
            )
            .await?;

        tracing::info!(card_id = %card.id, "card updated");
        Ok(CardResponse { card })
    }

    /// Archiving an archived card succeeds and records nothing.
    pub async fn archive_card(&self, req: CardActionRequest) -> DomainResult<CardResponse> {
        self.update_card(UpdateCardRequest {
            card_id: req.card_id,
            actor_id: req.actor_id,
            is_archived: Some(true),
            ..Default::default()
        })
        .await
    }

    pub async fn unarchive_card(&self, req: CardActionRequest) -> DomainResult<CardResponse> {
        self.update_card(UpdateCardRequest {
            card_id: req.card_id,
            actor_id: req.actor_id,
            is_archived: Some(false),
            ..Default::default()
        })
        .await
    }

    /// Moves within one board only. Permission is evaluated against the
    /// source board.
    #[tracing::instrument(
        skip(self, req),
        fields(
            card_id = %req.card_id,
            actor_id = %req.actor_id,
            target_list_id = %req.target_list_id,
        )
    )]
    pub async fn move_card(&self, req: MoveCardRequest) -> DomainResult<CardResponse> {
        let (mut card, source, access) = self
            .resolver
            .card_with_board(&*self.cards, req.card_id, req.actor_id)
            .await?;
        let target = self.resolver.list(req.target_list_id).await?;

        if source.board_id() != target.board_id() {
            tracing::warn!(
                card_id = %card.id,
                source_board = %source.board_id(),
                target_board = %target.board_id(),
                "cross-board move rejected"
            );
            return Err(DomainError::conflict(CROSS_BOARD_MOVE));
        }
        access.ensure_can_mutate_children()?;

        let position = match req.position {
            Some(position) => position,
            None => self.cards.get_next_position(target.id).await?,
        };
        card.move_to(target.id, position)?;
        self.cards.save(&card).await?;

        let description = if source.id == target.id {
            format!("moved card within {}", source.title)
        } else {
            format!("moved card from {} to {}", source.title, target.title)
        };
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::Move, &card, access.board.id)
                    .with_description(description)
                    .with_data(json!({
                        "fromListId": source.id,
                        "toListId": target.id,
                        "position": card.position,
                    })),
            )
            .await?;

        tracing::info!(card_id = %card.id, from = %source.id, to = %target.id, "card moved");
        Ok(CardResponse { card })
    }

    /// The card's creator may always delete it, whatever their role.
    #[tracing::instrument(
        skip(self, req),
        fields(card_id = %req.card_id, actor_id = %req.actor_id)
    )]
    pub async fn delete_card(&self, req: CardActionRequest) -> DomainResult<()> {
        let (card, list, access) = self
            .resolver
            .card_with_board(&*self.cards, req.card_id, req.actor_id)
            .await?;
        access.ensure_can_delete_card(&card)?;

        self.cards.delete(card.id).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::Delete, &card, access.board.id)
                    .with_description(format!(
                        "deleted card \"{}\" from {}",
                        card.title, list.title
                    )),
            )
            .await?;

        tracing::info!(card_id = %card.id, "card deleted");
        Ok(())
    }
}
