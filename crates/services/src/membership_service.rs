//! # Membership Manager
//!
//! Add, re-role and remove board members. The owner is never a membership
//! row and can be neither re-roled nor removed here; ownership transfer is
//! not offered by any operation.

use std::sync::Arc;

use domains::permissions;
use domains::{
    ActivityAction, BoardMember, BoardRepository, DomainError, DomainResult, Role, User,
    UserRepository,
};
use serde_json::json;
use uuid::Uuid;

use crate::access::{load_access, BoardAccess};
use crate::audit::{ActivityDraft, ActivityRecorder};
use crate::dto::{
    AddMemberRequest, AddMemberResponse, BoardActionRequest, GetMembersResponse,
    RemoveMemberRequest, RemoveMemberResponse, UpdateMemberRoleRequest,
    UpdateMemberRoleResponse,
};

pub const OWNERSHIP_TRANSFER: &str = "Only the board owner can transfer ownership";
pub const OWNER_ROLE_LOCKED: &str = "Cannot change the role of the board owner";
pub const OWNER_NOT_REMOVABLE: &str = "Cannot remove the board owner";
pub const SAME_ROLE: &str = "Member already has this role";
pub const NOT_A_MEMBER: &str = "User is not a member of this board";
pub const MEMBER_NOT_FOUND: &str = "Member not found";

pub struct MembershipService {
    boards: Arc<dyn BoardRepository>,
    users: Arc<dyn UserRepository>,
    audit: ActivityRecorder,
}

impl MembershipService {
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

    /// Loads the board, rejects archived boards and applies the
    /// member-management gate.
    async fn managing_access(
        &self,
        board_id: Uuid,
        actor_id: Uuid,
        is_self_target: bool,
        denial: &str,
    ) -> DomainResult<BoardAccess> {
        let access = load_access(&*self.boards, board_id, actor_id).await?;
        access.board.ensure_not_archived()?;
        if !permissions::can_manage_members(&access.board, actor_id, access.role, is_self_target) {
            return Err(access.deny(denial));
        }
        Ok(access)
    }

    async fn target_user(&self, user_id: Uuid, missing: &str) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(missing))
    }

    async fn membership(&self, board_id: Uuid, user_id: Uuid) -> DomainResult<BoardMember> {
        self.boards
            .get_membership(board_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_A_MEMBER))
    }

    /// Re-adding an existing member updates their role at the repository.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id, user_id = %req.user_id)
    )]
    pub async fn add_member(&self, req: AddMemberRequest) -> DomainResult<AddMemberResponse> {
        let access = self
            .managing_access(
                req.board_id,
                req.actor_id,
                false,
                "Insufficient permissions to add members",
            )
            .await?;
        let board = &access.board;

        let role: Role = req.role.parse()?;
        if !role.is_assignable() {
            return Err(DomainError::conflict(OWNERSHIP_TRANSFER));
        }

        let user = self.target_user(req.user_id, "User not found").await?;
        if board.is_owner(user.id) {
            return Err(DomainError::conflict("User is already the board owner"));
        }

        self.boards.add_member(board.id, user.id, role).await?;
        let member = self.membership(board.id, user.id).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_board(ActivityAction::AddMember, board)
                    .with_description(format!("added {} as {}", user.name, role))
                    .with_data(json!({ "memberUserId": user.id, "role": role })),
            )
            .await?;

        tracing::info!(board_id = %board.id, user_id = %user.id, %role, "member added");
        Ok(AddMemberResponse { member })
    }

    /// Never idempotent: assigning the role a member already holds fails.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id, user_id = %req.user_id)
    )]
    pub async fn update_member_role(
        &self,
        req: UpdateMemberRoleRequest,
    ) -> DomainResult<UpdateMemberRoleResponse> {
        let access = self
            .managing_access(
                req.board_id,
                req.actor_id,
                false,
                "Insufficient permissions to update member roles",
            )
            .await?;
        let board = &access.board;
        let new_role: Role = req.role.parse()?;

        let user = self.target_user(req.user_id, MEMBER_NOT_FOUND).await?;
        if board.is_owner(user.id) {
            return Err(DomainError::conflict(OWNER_ROLE_LOCKED));
        }
        let current = self.membership(board.id, user.id).await?;

        if new_role == Role::Owner {
            return Err(DomainError::conflict(OWNERSHIP_TRANSFER));
        }
        if new_role == current.role {
            return Err(DomainError::conflict(SAME_ROLE));
        }

        self.boards
            .update_member_role(board.id, user.id, new_role)
            .await?;
        let member = self.membership(board.id, user.id).await?;

        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_board(ActivityAction::Update, board)
                    .with_description(format!(
                        "changed {}'s role from {} to {}",
                        user.name, current.role, new_role
                    ))
                    .with_data(json!({
                        "memberUserId": user.id,
                        "oldRole": current.role,
                        "newRole": new_role,
                    })),
            )
            .await?;

        tracing::info!(
            board_id = %board.id,
            user_id = %user.id,
            old_role = %current.role,
            new_role = %new_role,
            "member role updated"
        );
        Ok(UpdateMemberRoleResponse {
            member,
            previous_role: current.role,
        })
    }

    /// Self-removal is open to every role; removing someone else needs owner
    /// or admin. The owner can never be removed, not even by themself.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id, user_id = %req.user_id)
    )]
    pub async fn remove_member(
        &self,
        req: RemoveMemberRequest,
    ) -> DomainResult<RemoveMemberResponse> {
        let self_removal = req.actor_id == req.user_id;
        let access = self
            .managing_access(
                req.board_id,
                req.actor_id,
                self_removal,
                "Insufficient permissions to remove members",
            )
            .await?;
        let board = &access.board;

        let user = self.target_user(req.user_id, MEMBER_NOT_FOUND).await?;
        if board.is_owner(user.id) {
            return Err(DomainError::conflict(OWNER_NOT_REMOVABLE));
        }
        let membership = self.membership(board.id, user.id).await?;

        self.boards.remove_member(board.id, user.id).await?;

        let description = if self_removal {
            "left the board".to_string()
        } else {
            format!("removed {} from the board", user.name)
        };
        self.audit
            .record(
                req.actor_id,
                ActivityDraft::for_board(ActivityAction::RemoveMember, board)
                    .with_description(description)
                    .with_data(json!({
                        "memberUserId": user.id,
                        "removedRole": membership.role,
                        "selfRemoval": self_removal,
                    })),
            )
            .await?;

        tracing::info!(board_id = %board.id, user_id = %user.id, self_removal, "member removed");
        Ok(RemoveMemberResponse {
            removed_role: membership.role,
            self_removal,
        })
    }

    /// The owner is listed first with a synthesized `Owner` entry.
    #[tracing::instrument(
        skip(self, req),
        fields(board_id = %req.board_id, actor_id = %req.actor_id)
    )]
    pub async fn get_members(&self, req: BoardActionRequest) -> DomainResult<GetMembersResponse> {
        let access = load_access(&*self.boards, req.board_id, req.actor_id).await?;
        access.ensure_can_view()?;
        let board = &access.board;

        let mut members = vec![BoardMember {
            board_id: board.id,
            user_id: board.owner_id,
            role: Role::Owner,
            joined_at: board.created_at,
        }];
        members.extend(
            self.boards
                .get_members(board.id)
                .await?
                .into_iter()
                .filter(|m| !board.is_owner(m.user_id)),
        );
        Ok(GetMembersResponse { members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        Activity, Board, ErrorKind, MockActivityRepository, MockBoardRepository,
        MockUserRepository,
    };
    use mockall::predicate::eq;

    struct Fixture {
        board: Board,
        boards: MockBoardRepository,
        users: MockUserRepository,
        activities: MockActivityRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = User::new("owner", "owner@example.com");
            let board = Board::new(owner.id, "Launch", None, None, false);
            let mut boards = MockBoardRepository::new();
            let loaded = board.clone();
            boards
                .expect_find_by_id()
                .with(eq(board.id))
                .returning(move |_| Ok(Some(loaded.clone())));
            Self {
                board,
                boards,
                users: MockUserRepository::new(),
                activities: MockActivityRepository::new(),
            }
        }

        fn service(self) -> MembershipService {
            MembershipService::new(
                Arc::new(self.boards),
                Arc::new(self.users),
                ActivityRecorder::new(Arc::new(self.activities)),
            )
        }
    }

    #[tokio::test]
    async fn member_cannot_remove_another_member_and_nothing_is_written() {
        let mut fx = Fixture::new();
        let requester = Uuid::new_v4();
        fx.boards
            .expect_get_member_role()
            .returning(|_, _| Ok(Some(Role::Member)));
        fx.boards.expect_remove_member().never();
        fx.activities.expect_save().never();
        let board_id = fx.board.id;

        let err = fx
            .service()
            .remove_member(RemoveMemberRequest {
                board_id,
                user_id: Uuid::new_v4(),
                actor_id: requester,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn audit_failure_surfaces_after_the_role_is_persisted() {
        let mut fx = Fixture::new();
        let owner_id = fx.board.owner_id;
        let board_id = fx.board.id;
        let target = User::new("dana", "dana@example.com");
        let target_id = target.id;

        fx.boards.expect_get_member_role().returning(|_, _| Ok(None));
        fx.users
            .expect_find_by_id()
            .with(eq(target_id))
            .returning(move |_| Ok(Some(target.clone())));
        let mut seq = mockall::Sequence::new();
        fx.boards
            .expect_get_membership()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |b, u| Ok(Some(BoardMember::new(b, u, Role::Member).unwrap())));
        fx.boards
            .expect_update_member_role()
            .with(eq(board_id), eq(target_id), eq(Role::Admin))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        fx.boards
            .expect_get_membership()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |b, u| Ok(Some(BoardMember::new(b, u, Role::Admin).unwrap())));
        fx.activities
            .expect_save()
            .times(1)
            .returning(|_: &Activity| Err(anyhow::anyhow!("audit store unavailable").into()));

        let err = fx
            .service()
            .update_member_role(UpdateMemberRoleRequest {
                board_id,
                user_id: target_id,
                role: "ADMIN".into(),
                actor_id: owner_id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn unknown_role_string_is_a_validation_error() {
        let mut fx = Fixture::new();
        let owner_id = fx.board.owner_id;
        let board_id = fx.board.id;
        fx.boards.expect_get_member_role().returning(|_, _| Ok(None));
        fx.boards.expect_add_member().never();

        let err = fx
            .service()
            .add_member(AddMemberRequest {
                board_id,
                user_id: Uuid::new_v4(),
                role: "SUPERUSER".into(),
                actor_id: owner_id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn owner_role_is_never_assignable_through_add() {
        let mut fx = Fixture::new();
        let owner_id = fx.board.owner_id;
        let board_id = fx.board.id;
        fx.boards.expect_get_member_role().returning(|_, _| Ok(None));
        fx.boards.expect_add_member().never();

        let err = fx
            .service()
            .add_member(AddMemberRequest {
                board_id,
                user_id: Uuid::new_v4(),
                role: "OWNER".into(),
                actor_id: owner_id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), OWNERSHIP_TRANSFER);
    }
}
