//! Shared fixtures for the integration tests: an in-memory store wired into
//! the full set of services, plus helpers that drive the public use cases.

use std::sync::Arc;

use domains::{Activity, Board, Card, Label, List, User};
use services::dto::{
    AddMemberRequest, CreateBoardRequest, CreateCardRequest, CreateLabelRequest,
    CreateListRequest,
};
use services::{Repositories, Services};
use storage_adapters::MemoryStore;
use uuid::Uuid;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub services: Services,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let services = Services::new(Repositories {
            boards: store.clone(),
            lists: store.clone(),
            cards: store.clone(),
            labels: store.clone(),
            users: store.clone(),
            activities: store.clone(),
        });
        Self { store, services }
    }

    pub fn user(&self, name: &str) -> User {
        let user = User::new(name, format!("{}@example.com", name.to_lowercase()));
        self.store.insert_user(user.clone());
        user
    }

    pub async fn board(&self, owner: &User, title: &str) -> Board {
        self.services
            .boards
            .create_board(CreateBoardRequest {
                actor_id: owner.id,
                title: title.into(),
                description: None,
                background_url: None,
                is_public: false,
            })
            .await
            .expect("create board")
            .board
    }

    pub async fn add(&self, board: &Board, actor: &User, user: &User, role: &str) {
        self.services
            .members
            .add_member(AddMemberRequest {
                board_id: board.id,
                user_id: user.id,
                role: role.into(),
                actor_id: actor.id,
            })
            .await
            .expect("add member");
    }

    pub async fn list(&self, board: &Board, actor: &User, title: &str) -> List {
        self.services
            .lists
            .create_list(CreateListRequest {
                board_id: board.id,
                actor_id: actor.id,
                title: title.into(),
                color: None,
                position: None,
            })
            .await
            .expect("create list")
            .list
    }

    pub async fn card(&self, list: &List, actor: &User, title: &str) -> Card {
        self.services
            .cards
            .create_card(CreateCardRequest {
                list_id: list.id,
                actor_id: actor.id,
                title: title.into(),
                ..Default::default()
            })
            .await
            .expect("create card")
            .card
    }

    pub async fn label(&self, board: &Board, actor: &User, name: &str) -> Label {
        self.services
            .labels
            .create_label(CreateLabelRequest {
                board_id: board.id,
                actor_id: actor.id,
                name: name.into(),
                color: "#eb5a46".into(),
            })
            .await
            .expect("create label")
            .label
    }

    /// Activity for one board in append order.
    pub async fn activities(&self, board_id: Uuid) -> Vec<Activity> {
        self.store
            .all_activities()
            .await
            .into_iter()
            .filter(|a| a.board_id == board_id)
            .collect()
    }

    pub async fn last_activity(&self, board_id: Uuid) -> Activity {
        self.activities(board_id)
            .await
            .pop()
            .expect("at least one activity")
    }
}
