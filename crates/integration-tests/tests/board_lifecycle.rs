use domains::{ActivityAction, EntityType, ErrorKind, Role};
use integration_tests::TestApp;
use services::dto::{
    BoardActionRequest, CreateBoardRequest, GetActivityRequest, UpdateBoardRequest,
};
use uuid::Uuid;

fn action(board_id: Uuid, actor_id: Uuid) -> BoardActionRequest {
    BoardActionRequest { board_id, actor_id }
}

#[tokio::test]
async fn creating_a_board_makes_the_creator_owner_without_a_membership_row() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let board = app.board(&owner, "Roadmap").await;
    assert_eq!(board.owner_id, owner.id);

    let view = app
        .services
        .boards
        .get_board(action(board.id, owner.id))
        .await
        .unwrap();
    assert_eq!(view.role, Some(Role::Owner));

    let activity = app.last_activity(board.id).await;
    assert_eq!(activity.action, ActivityAction::Create);
    assert_eq!(activity.entity_type, EntityType::Board);
    assert_eq!(activity.entity_title, "Roadmap");
}

#[tokio::test]
async fn unknown_creator_is_rejected() {
    let app = TestApp::new();
    let err = app
        .services
        .boards
        .create_board(CreateBoardRequest {
            actor_id: Uuid::new_v4(),
            title: "Ghost".into(),
            description: None,
            background_url: None,
            is_public: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn private_boards_hide_from_outsiders_public_boards_do_not() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let stranger = app.user("Sam");
    let board = app.board(&owner, "Roadmap").await;

    let err = app
        .services
        .boards
        .get_board(action(board.id, stranger.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    app.services
        .boards
        .update_board(UpdateBoardRequest {
            board_id: board.id,
            actor_id: owner.id,
            is_public: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    let view = app
        .services
        .boards
        .get_board(action(board.id, stranger.id))
        .await
        .unwrap();
    assert_eq!(view.role, None);

    let feed = app
        .services
        .boards
        .get_activity(GetActivityRequest {
            board_id: board.id,
            actor_id: stranger.id,
            limit: 1,
        })
        .await
        .unwrap();
    assert_eq!(feed.activities.len(), 1);
    assert_eq!(
        feed.activities[0].description.as_deref(),
        Some("made the board public")
    );
}

#[tokio::test]
async fn only_owner_and_admin_edit_board_metadata() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let admin = app.user("Ada");
    let member = app.user("Mia");
    let board = app.board(&owner, "Roadmap").await;
    app.add(&board, &owner, &admin, "ADMIN").await;
    app.add(&board, &owner, &member, "MEMBER").await;

    let err = app
        .services
        .boards
        .update_board(UpdateBoardRequest {
            board_id: board.id,
            actor_id: member.id,
            title: Some("Mine now".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let updated = app
        .services
        .boards
        .update_board(UpdateBoardRequest {
            board_id: board.id,
            actor_id: admin.id,
            title: Some("Roadmap 2027".into()),
            description: Some(Some("Next year".into())),
            ..Default::default()
        })
        .await
        .unwrap()
        .board;
    assert_eq!(updated.title, "Roadmap 2027");
    assert_eq!(
        app.last_activity(board.id).await.description.as_deref(),
        Some("changed title from \"Roadmap\" to \"Roadmap 2027\", added the description")
    );
}

#[tokio::test]
async fn archive_toggles_are_silent_when_redundant() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let member = app.user("Mia");
    let board = app.board(&owner, "Roadmap").await;
    app.add(&board, &owner, &member, "MEMBER").await;

    let err = app
        .services
        .boards
        .archive_board(action(board.id, member.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let boards = &app.services.boards;
    boards.archive_board(action(board.id, owner.id)).await.unwrap();
    let count = app.activities(board.id).await.len();
    let again = boards.archive_board(action(board.id, owner.id)).await.unwrap();
    assert!(again.board.is_archived);
    assert_eq!(app.activities(board.id).await.len(), count);

    // Metadata edits are refused while archived.
    let err = boards
        .update_board(UpdateBoardRequest {
            board_id: board.id,
            actor_id: owner.id,
            title: Some("Frozen".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let restored = boards.unarchive_board(action(board.id, owner.id)).await.unwrap();
    assert!(!restored.board.is_archived);
    app.list(&board, &member, "Back in business").await;
}

#[tokio::test]
async fn only_the_owner_deletes_and_deletion_cascades() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let admin = app.user("Ada");
    let board = app.board(&owner, "Roadmap").await;
    app.add(&board, &owner, &admin, "ADMIN").await;
    let list = app.list(&board, &owner, "Todo").await;
    app.card(&list, &owner, "Task").await;

    let err = app
        .services
        .boards
        .delete_board(action(board.id, admin.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    app.services
        .boards
        .archive_board(action(board.id, owner.id))
        .await
        .unwrap();
    app.services
        .boards
        .delete_board(action(board.id, owner.id))
        .await
        .unwrap();

    let err = app
        .services
        .boards
        .get_board(action(board.id, owner.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Earlier history is cascaded away; only the deletion record remains.
    let history = app.activities(board.id).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ActivityAction::Delete);
}

#[tokio::test]
async fn audit_failure_surfaces_after_the_primary_write() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let board = app.board(&owner, "Roadmap").await;

    app.store.fail_activity_writes(true);
    let err = app
        .services
        .boards
        .update_board(UpdateBoardRequest {
            board_id: board.id,
            actor_id: owner.id,
            title: Some("Renamed".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    app.store.fail_activity_writes(false);

    // No compensation: the rename stuck even though the caller saw an error.
    let view = app
        .services
        .boards
        .get_board(action(board.id, owner.id))
        .await
        .unwrap();
    assert_eq!(view.board.title, "Renamed");
}
