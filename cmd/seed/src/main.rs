//! # Seed
//!
//! Builds a demo board through the public use cases against the in-memory
//! store and prints the resulting activity feed as JSON.

use std::sync::Arc;

use anyhow::Context;
use configs::{LogFormat, Settings};
use domains::User;
use services::dto::{
    AddMemberRequest, CardLabelRequest, CreateBoardRequest, CreateCardRequest,
    CreateLabelRequest, CreateListRequest, GetActivityRequest, MoveCardRequest,
    UpdateMemberRoleRequest,
};
use services::{Repositories, Services};
use storage_adapters::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    // Logs go to stderr so stdout carries only the JSON feed.
    match settings.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration and logging
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings);
    tracing::info!(app = %settings.app.name, env = %settings.app.environment, "seeding demo board");

    // 2. Storage and use cases
    let store = Arc::new(MemoryStore::new());
    let services = Services::new(Repositories {
        boards: store.clone(),
        lists: store.clone(),
        cards: store.clone(),
        labels: store.clone(),
        users: store.clone(),
        activities: store.clone(),
    });

    // 3. People
    let owner = User::new(&settings.seed.owner_name, &settings.seed.owner_email);
    let alice = User::new("Alice", "alice@example.com");
    let bob = User::new("Bob", "bob@example.com");
    for user in [&owner, &alice, &bob] {
        store.insert_user(user.clone());
    }

    // 4. Board and membership
    let board = services
        .boards
        .create_board(CreateBoardRequest {
            actor_id: owner.id,
            title: settings.seed.board_title.clone(),
            description: Some("Seeded demo board".into()),
            background_url: None,
            is_public: settings.seed.public_board,
        })
        .await?
        .board;

    services
        .members
        .add_member(AddMemberRequest {
            board_id: board.id,
            user_id: alice.id,
            role: "MEMBER".into(),
            actor_id: owner.id,
        })
        .await?;
    services
        .members
        .update_member_role(UpdateMemberRoleRequest {
            board_id: board.id,
            user_id: alice.id,
            role: "ADMIN".into(),
            actor_id: owner.id,
        })
        .await?;
    services
        .members
        .add_member(AddMemberRequest {
            board_id: board.id,
            user_id: bob.id,
            role: "VIEWER".into(),
            actor_id: alice.id,
        })
        .await?;

    // 5. Lists, cards and labels
    let mut lists = Vec::new();
    for title in ["Backlog", "In Progress", "Done"] {
        let list = services
            .lists
            .create_list(CreateListRequest {
                board_id: board.id,
                actor_id: alice.id,
                title: title.into(),
                color: None,
                position: None,
            })
            .await?
            .list;
        lists.push(list);
    }

    let card = services
        .cards
        .create_card(CreateCardRequest {
            list_id: lists[0].id,
            actor_id: alice.id,
            title: "Draft the launch checklist".into(),
            assignee_id: Some(alice.id),
            ..Default::default()
        })
        .await?
        .card;

    let label = services
        .labels
        .create_label(CreateLabelRequest {
            board_id: board.id,
            actor_id: owner.id,
            name: "launch".into(),
            color: "#2f80ed".into(),
        })
        .await?
        .label;

    services
        .labels
        .add_label_to_card(CardLabelRequest {
            card_id: card.id,
            label_id: label.id,
            actor_id: alice.id,
        })
        .await?;

    services
        .cards
        .move_card(MoveCardRequest {
            card_id: card.id,
            actor_id: alice.id,
            target_list_id: lists[1].id,
            position: None,
        })
        .await?;

    // 6. Report
    let feed = services
        .boards
        .get_activity(GetActivityRequest {
            board_id: board.id,
            actor_id: bob.id,
            limit: 100,
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&feed.activities)?);

    tracing::info!(board_id = %board.id, activities = feed.activities.len(), "seed complete");
    Ok(())
}
