use std::sync::Arc;

use domains::{
    ActivityAction, Card, CardRepository, DomainError, DomainResult, Label, LabelRepository,
};
use serde_json::json;

use crate::access::{BoardAccess, BoardResolver, LABEL_NOT_FOUND};
use crate::audit::{label_changes, ActivityDraft, ActivityRecorder};
use crate::dto::{
    CardLabelRequest, CreateLabelRequest, DeleteLabelRequest, LabelResponse, UpdateLabelRequest,
};

pub const CROSS_BOARD_LABEL: &str = "Label does not belong to the card's board";
pub const ALREADY_ATTACHED: &str = "Label is already attached to this card";
pub const NOT_ATTACHED: &str = "Label is not attached to this card";

pub struct LabelService {
    resolver: BoardResolver,
    labels: Arc<dyn LabelRepository>,
    cards: Arc<dyn CardRepository>,
    audit: ActivityRecorder,
}

impl LabelService {
    pub fn new(
        resolver: BoardResolver,
        labels: Arc<dyn LabelRepository>,
        cards: Arc<dyn CardRepository>,
        audit: ActivityRecorder,
    ) -> Self {
        Self {
            resolver,
            labels,
            cards,
            audit,
        }
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn create_label(&self, req: CreateLabelRequest) -> DomainResult<LabelResponse> {
        let access = self.resolver.board(req.board_id, req.actor_id).await?;
        access.ensure_can_mutate_children()?;

        let label = Label::new(access.board.id, req.name, req.color);
        self.labels.save(&label).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_label(ActivityAction::Create, &label)
                    .with_description(format!("created label \"{}\"", label.name))
                    .with_data(json!({ "color": label.color })),
            )
            .await?;

        tracing::info!(label_id = %label.id, board_id = %label.board_id, "label created");
        Ok(LabelResponse { label })
    }

    #[tracing::instrument(
        skip(self, req),
        fields(label_id = %req.label_id, actor_id = %req.actor_id)
    )]
    pub async fn update_label(&self, req: UpdateLabelRequest) -> DomainResult<LabelResponse> {
        let (before, access) = self
            .resolver
            .label_with_board(&*self.labels, req.label_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;

        let mut label = before.clone();
        if let Some(name) = req.name {
            label.rename(name);
        }
        if let Some(color) = req.color {
            label.recolor(color);
        }

        let Some(description) = label_changes(&before, &label).describe() else {
            return Ok(LabelResponse { label });
        };

        self.labels.save(&label).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_label(ActivityAction::Update, &label)
                    .with_description(description),
            )
            .await?;

        tracing::info!(label_id = %label.id, "label updated");
        Ok(LabelResponse { label })
    }

    /// Detaches the label from every card it is on.
    #[tracing::instrument(
        skip(self, req),
        fields(label_id = %req.label_id, actor_id = %req.actor_id)
    )]
    pub async fn delete_label(&self, req: DeleteLabelRequest) -> DomainResult<()> {
        let (label, access) = self
            .resolver
            .label_with_board(&*self.labels, req.label_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;

        self.labels.delete(label.id).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_label(ActivityAction::Delete, &label)
                    .with_description(format!("deleted label \"{}\"", label.name)),
            )
            .await?;

        tracing::info!(label_id = %label.id, "label deleted");
        Ok(())
    }

    /// Attaching twice is an error, not a no-op.
    #[tracing::instrument(
        skip(self, req),
        fields(card_id = %req.card_id, label_id = %req.label_id, actor_id = %req.actor_id)
    )]
    pub async fn add_label_to_card(&self, req: CardLabelRequest) -> DomainResult<()> {
        let (card, label, access) = self.attachment_context(&req).await?;

        if self.labels.is_attached_to_card(card.id, label.id).await? {
            return Err(DomainError::conflict(ALREADY_ATTACHED));
        }
        self.labels.add_to_card(card.id, label.id).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::AddLabel, &card, access.board.id)
                    .with_description(format!("added label \"{}\"", label.name))
                    .with_data(json!({ "labelId": label.id, "labelName": label.name })),
            )
            .await?;

        tracing::info!(card_id = %card.id, label_id = %label.id, "label attached");
        Ok(())
    }

    /// Detaching a label that is not attached is an error, not a no-op.
    #[tracing::instrument(
        skip(self, req),
        fields(card_id = %req.card_id, label_id = %req.label_id, actor_id = %req.actor_id)
    )]
    pub async fn remove_label_from_card(&self, req: CardLabelRequest) -> DomainResult<()> {
        let (card, label, access) = self.attachment_context(&req).await?;

        if !self.labels.is_attached_to_card(card.id, label.id).await? {
            return Err(DomainError::conflict(NOT_ATTACHED));
        }
        self.labels.remove_from_card(card.id, label.id).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_card(ActivityAction::RemoveLabel, &card, access.board.id)
                    .with_description(format!("removed label \"{}\"", label.name))
                    .with_data(json!({ "labelId": label.id, "labelName": label.name })),
            )
            .await?;

        tracing::info!(card_id = %card.id, label_id = %label.id, "label detached");
        Ok(())
    }

    /// Resolves the card's board, checks the label lives on that same board
    /// and applies the child-mutation gate.
    async fn attachment_context(
        &self,
        req: &CardLabelRequest,
    ) -> DomainResult<(Card, Label, BoardAccess)> {
        let (card, _list, access) = self
            .resolver
            .card_with_board(&*self.cards, req.card_id, req.actor_id)
            .await?;
        let label = self
            .labels
            .find_by_id(req.label_id)
            .await?
            .ok_or_else(|| DomainError::not_found(LABEL_NOT_FOUND))?;

        access.ensure_can_mutate_children()?;
        if !label.belongs_to_board(access.board.id) {
            tracing::warn!(
                card_id = %card.id,
                label_id = %label.id,
                card_board = %access.board.id,
                label_board = %label.board_id,
                "cross-board label attachment rejected"
            );
            return Err(DomainError::validation(CROSS_BOARD_LABEL));
        }
        Ok((card, label, access))
    }
}
