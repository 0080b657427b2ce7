use async_trait::async_trait;
use domains::{
    Activity, ActivityRepository, Board, BoardMember, BoardRepository, Card, CardRepository,
    DomainResult, Label, LabelRepository, List, ListRepository, Role, User, UserRepository,
};
use uuid::Uuid;

use super::{next_position, MemoryStore};

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Board>> {
        Ok(self.boards.get(&id).map(|b| b.value().clone()))
    }

    async fn save(&self, board: &Board) -> DomainResult<()> {
        self.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.remove_board_tree(id);
        self.activities.write().await.retain(|a| a.board_id != id);
        tracing::debug!(board_id = %id, "board tree removed");
        Ok(())
    }

    async fn get_member_role(&self, board_id: Uuid, user_id: Uuid) -> DomainResult<Option<Role>> {
        Ok(self.members.get(&(board_id, user_id)).map(|m| m.role))
    }

    async fn get_membership(
        &self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<BoardMember>> {
        Ok(self.members.get(&(board_id, user_id)).map(|m| m.value().clone()))
    }

    async fn get_members(&self, board_id: Uuid) -> DomainResult<Vec<BoardMember>> {
        let mut members: Vec<BoardMember> = self
            .members
            .iter()
            .filter(|m| m.board_id == board_id)
            .map(|m| m.value().clone())
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn add_member(&self, board_id: Uuid, user_id: Uuid, role: Role) -> DomainResult<()> {
        let member = BoardMember::new(board_id, user_id, role)?;
        self.members
            .entry((board_id, user_id))
            .and_modify(|existing| existing.role = role)
            .or_insert(member);
        Ok(())
    }

    async fn update_member_role(
        &self,
        board_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> DomainResult<()> {
        match self.members.get_mut(&(board_id, user_id)) {
            Some(mut member) => {
                member.role = role;
                Ok(())
            }
            None => Err(anyhow::anyhow!(
                "no membership row for user {user_id} on board {board_id}"
            )
            .into()),
        }
    }

    async fn remove_member(&self, board_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        self.members.remove(&(board_id, user_id));
        Ok(())
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<List>> {
        Ok(self.lists.get(&id).map(|l| l.value().clone()))
    }

    async fn save(&self, list: &List) -> DomainResult<()> {
        self.lists.insert(list.id, list.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.remove_cards_of_list(id);
        self.lists.remove(&id);
        Ok(())
    }

    async fn get_next_position(&self, board_id: Uuid) -> DomainResult<f64> {
        Ok(next_position(
            self.lists
                .iter()
                .filter(|l| l.belongs_to_board(board_id))
                .map(|l| l.position),
        ))
    }
}

#[async_trait]
impl CardRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Card>> {
        Ok(self.cards.get(&id).map(|c| c.value().clone()))
    }

    async fn save(&self, card: &Card) -> DomainResult<()> {
        self.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.cards.remove(&id);
        self.card_labels.retain(|pair| pair.0 != id);
        Ok(())
    }

    async fn get_next_position(&self, list_id: Uuid) -> DomainResult<f64> {
        Ok(next_position(
            self.cards
                .iter()
                .filter(|c| c.list_id == list_id)
                .map(|c| c.position),
        ))
    }
}

#[async_trait]
impl LabelRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Label>> {
        Ok(self.labels.get(&id).map(|l| l.value().clone()))
    }

    async fn save(&self, label: &Label) -> DomainResult<()> {
        self.labels.insert(label.id, label.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.card_labels.retain(|pair| pair.1 != id);
        self.labels.remove(&id);
        Ok(())
    }

    async fn is_attached_to_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<bool> {
        Ok(self.card_labels.contains(&(card_id, label_id)))
    }

    async fn add_to_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<()> {
        self.card_labels.insert((card_id, label_id));
        Ok(())
    }

    async fn remove_from_card(&self, card_id: Uuid, label_id: Uuid) -> DomainResult<()> {
        self.card_labels.remove(&(card_id, label_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn save(&self, activity: &Activity) -> DomainResult<()> {
        self.ensure_activity_writable()?;
        self.activities.write().await.push(activity.clone());
        Ok(())
    }

    async fn find_by_board(&self, board_id: Uuid, limit: usize) -> DomainResult<Vec<Activity>> {
        Ok(self
            .activities
            .read()
            .await
            .iter()
            .rev()
            .filter(|a| a.board_id == board_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
