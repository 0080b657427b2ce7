//! End-to-end walkthroughs of the permission engine's headline guarantees.

use domains::{ActivityAction, ErrorKind, Role};
use integration_tests::TestApp;
use serde_json::json;
use services::dto::{
    AddMemberRequest, BoardActionRequest, CardLabelRequest, CreateCardRequest,
    RemoveMemberRequest, UpdateMemberRoleRequest,
};
use services::label_service::CROSS_BOARD_LABEL;
use services::membership_service::{OWNER_NOT_REMOVABLE, SAME_ROLE};

#[tokio::test]
async fn owner_grants_promotes_and_admin_cannot_remove_owner() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let x = app.user("Xavier");
    let board = app.board(&owner, "B").await;
    let members = &app.services.members;

    members
        .add_member(AddMemberRequest {
            board_id: board.id,
            user_id: x.id,
            role: "MEMBER".into(),
            actor_id: owner.id,
        })
        .await
        .unwrap();
    assert_eq!(
        app.last_activity(board.id).await.action,
        ActivityAction::AddMember
    );

    let same = UpdateMemberRoleRequest {
        board_id: board.id,
        user_id: x.id,
        role: "MEMBER".into(),
        actor_id: owner.id,
    };
    let err = members.update_member_role(same).await.unwrap_err();
    assert_eq!(err.to_string(), SAME_ROLE);

    let promote = UpdateMemberRoleRequest {
        board_id: board.id,
        user_id: x.id,
        role: "ADMIN".into(),
        actor_id: owner.id,
    };
    members.update_member_role(promote.clone()).await.unwrap();
    let activity = app.last_activity(board.id).await;
    assert_eq!(activity.action, ActivityAction::Update);
    assert_eq!(activity.data["oldRole"], json!("MEMBER"));
    assert_eq!(activity.data["newRole"], json!("ADMIN"));

    // Never idempotent: the same promotion a second time fails.
    let err = members.update_member_role(promote).await.unwrap_err();
    assert_eq!(err.to_string(), SAME_ROLE);

    let err = members
        .remove_member(RemoveMemberRequest {
            board_id: board.id,
            user_id: owner.id,
            actor_id: x.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), OWNER_NOT_REMOVABLE);

    let view = app
        .services
        .boards
        .get_board(BoardActionRequest {
            board_id: board.id,
            actor_id: owner.id,
        })
        .await
        .unwrap();
    assert_eq!(view.board.owner_id, owner.id);
    assert_eq!(view.role, Some(Role::Owner));
}

#[tokio::test]
async fn viewer_cannot_create_cards_but_can_leave() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let viewer = app.user("Vic");
    let board = app.board(&owner, "B").await;
    app.add(&board, &owner, &viewer, "VIEWER").await;
    let list = app.list(&board, &owner, "Todo").await;

    let err = app
        .services
        .cards
        .create_card(CreateCardRequest {
            list_id: list.id,
            actor_id: viewer.id,
            title: "Sneaky".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let resp = app
        .services
        .members
        .remove_member(RemoveMemberRequest {
            board_id: board.id,
            user_id: viewer.id,
            actor_id: viewer.id,
        })
        .await
        .unwrap();
    assert!(resp.self_removal);
    assert_eq!(resp.removed_role, Role::Viewer);
    assert_eq!(app.last_activity(board.id).await.data["selfRemoval"], json!(true));
}

#[tokio::test]
async fn labels_do_not_cross_boards_even_for_the_owner_of_both() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let board_a = app.board(&owner, "A").await;
    let board_b = app.board(&owner, "B").await;
    let label = app.label(&board_a, &owner, "urgent").await;
    let list = app.list(&board_b, &owner, "Todo").await;
    let card = app.card(&list, &owner, "Task").await;

    let err = app
        .services
        .labels
        .add_label_to_card(CardLabelRequest {
            card_id: card.id,
            label_id: label.id,
            actor_id: owner.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains(CROSS_BOARD_LABEL));
    assert!(app.store.labels_on_card(card.id).is_empty());
}

#[tokio::test]
async fn archiving_freezes_every_mutation_but_not_reads() {
    let app = TestApp::new();
    let owner = app.user("Olivia");
    let admin = app.user("Ada");
    let viewer = app.user("Vic");
    let board = app.board(&owner, "B").await;
    app.add(&board, &owner, &admin, "ADMIN").await;
    app.add(&board, &owner, &viewer, "VIEWER").await;
    let list = app.list(&board, &owner, "Todo").await;
    let card = app.card(&list, &owner, "Task").await;
    let label = app.label(&board, &owner, "urgent").await;

    app.services
        .boards
        .archive_board(BoardActionRequest {
            board_id: board.id,
            actor_id: admin.id,
        })
        .await
        .unwrap();

    for actor in [&owner, &admin] {
        let err = app
            .services
            .labels
            .add_label_to_card(CardLabelRequest {
                card_id: card.id,
                label_id: label.id,
                actor_id: actor.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = app
            .services
            .members
            .update_member_role(UpdateMemberRoleRequest {
                board_id: board.id,
                user_id: viewer.id,
                role: "MEMBER".into(),
                actor_id: actor.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    for actor in [&owner, &admin, &viewer] {
        app.services
            .boards
            .get_board(BoardActionRequest {
                board_id: board.id,
                actor_id: actor.id,
            })
            .await
            .unwrap();
    }
}
