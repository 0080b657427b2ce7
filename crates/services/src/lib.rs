//! Use-case orchestration for the task board.
//!
//! Every mutating use case follows the same sequence: load the target,
//! resolve its owning board, consult the permission evaluator, mutate via
//! the entity's own methods, persist, then append one activity record.
//! Each service receives only the repositories it uses.

pub mod access;
pub mod audit;
pub mod board_service;
pub mod card_service;
pub mod dto;
pub mod label_service;
pub mod list_service;
pub mod membership_service;

use std::sync::Arc;

use domains::{
    ActivityRepository, BoardRepository, CardRepository, LabelRepository, ListRepository,
    UserRepository,
};

pub use access::{BoardAccess, BoardResolver};
pub use audit::{ActivityDraft, ActivityRecorder};
pub use board_service::BoardService;
pub use card_service::CardService;
pub use label_service::LabelService;
pub use list_service::ListService;
pub use membership_service::MembershipService;

/// Port implementations handed to [`Services::new`].
#[derive(Clone)]
pub struct Repositories {
    pub boards: Arc<dyn BoardRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub cards: Arc<dyn CardRepository>,
    pub labels: Arc<dyn LabelRepository>,
    pub users: Arc<dyn UserRepository>,
    pub activities: Arc<dyn ActivityRepository>,
}

/// Composition root: one instance of each use-case group.
pub struct Services {
    pub boards: BoardService,
    pub members: MembershipService,
    pub lists: ListService,
    pub cards: CardService,
    pub labels: LabelService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        let audit = ActivityRecorder::new(repos.activities);
        let resolver = BoardResolver::new(repos.boards.clone(), repos.lists.clone());

        Self {
            boards: BoardService::new(repos.boards.clone(), repos.users.clone(), audit.clone()),
            members: MembershipService::new(repos.boards, repos.users.clone(), audit.clone()),
            lists: ListService::new(resolver.clone(), repos.lists, audit.clone()),
            cards: CardService::new(
                resolver.clone(),
                repos.cards.clone(),
                repos.users,
                audit.clone(),
            ),
            labels: LabelService::new(resolver, repos.labels, repos.cards, audit),
        }
    }
}
