use std::sync::Arc;

use domains::{ActivityAction, DomainResult, List, ListRepository};
use serde_json::json;

use crate::access::BoardResolver;
use crate::audit::{list_changes, ActivityDraft, ActivityRecorder};
use crate::dto::{CreateListRequest, DeleteListRequest, ListResponse, UpdateListRequest};

pub struct ListService {
    resolver: BoardResolver,
    lists: Arc<dyn ListRepository>,
    audit: ActivityRecorder,
}

impl ListService {
    pub fn new(
        resolver: BoardResolver,
        lists: Arc<dyn ListRepository>,
        audit: ActivityRecorder,
    ) -> Self {
        Self {
            resolver,
            lists,
            audit,
        }
    }

    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn create_list(&self, req: CreateListRequest) -> DomainResult<ListResponse> {
        let access = self.resolver.board(req.board_id, req.actor_id).await?;
        access.ensure_can_mutate_children()?;

        let position = match req.position {
            Some(position) => position,
            None => self.lists.get_next_position(access.board.id).await?,
        };
        let list = List::new(access.board.id, req.title, position, req.color)?;
        self.lists.save(&list).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_list(ActivityAction::Create, &list)
                    .with_description(format!("added list \"{}\"", list.title))
                    .with_data(json!({ "position": list.position })),
            )
            .await?;

        tracing::info!(list_id = %list.id, board_id = %list.board_id(), "list created");
        Ok(ListResponse { list })
    }

    /// An update that changes nothing is accepted without writing.
    #[tracing::instrument(
        skip(self, req),
        fields(list_id = %req.list_id, actor_id = %req.actor_id)
    )]
    pub async fn update_list(&self, req: UpdateListRequest) -> DomainResult<ListResponse> {
        let (before, access) = self
            .resolver
            .list_with_board(req.list_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;

        let mut list = before.clone();
        if let Some(title) = req.title {
            list.rename(title);
        }
        if let Some(color) = req.color {
            list.set_color(color);
        }
        if let Some(position) = req.position {
            list.reposition(position)?;
        }

        let Some(description) = list_changes(&before, &list).describe() else {
            return Ok(ListResponse { list });
        };

        self.lists.save(&list).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_list(ActivityAction::Update, &list)
                    .with_description(description),
            )
            .await?;

        tracing::info!(list_id = %list.id, "list updated");
        Ok(ListResponse { list })
    }

    /// Cards in the list go with it.
    #[tracing::instrument(
        skip(self, req),
        fields(list_id = %req.list_id, actor_id = %req.actor_id)
    )]
    pub async fn delete_list(&self, req: DeleteListRequest) -> DomainResult<()> {
        let (list, access) = self
            .resolver
            .list_with_board(req.list_id, req.actor_id)
            .await?;
        access.ensure_can_mutate_children()?;

        self.lists.delete(list.id).await?;
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_list(ActivityAction::Delete, &list)
                    .with_description(format!("deleted list \"{}\"", list.title)),
            )
            .await?;

        tracing::info!(list_id = %list.id, "list deleted");
        Ok(())
    }
}
