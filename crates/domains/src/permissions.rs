//! # Permission Evaluator
//!
//! Pure decision functions over `(board, actor, role-at-board)`.
//!
//! `role` is the actor's membership row as returned by
//! `BoardRepository::get_member_role`, or `None` without one. Ownership is
//! never read from `role`: only `board.owner_id` confers owner privilege, so
//! a stray `Role::Owner` on a non-owner grants nothing beyond viewing.
//!
//! Every mutating predicate answers `false` on an archived board; view
//! predicates are unaffected by archival.

use uuid::Uuid;

use crate::models::{Board, Role};

/// Where the actor stands on a board once ownership has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    Owner,
    Member(Role),
    Outsider,
}

fn standing(board: &Board, actor_id: Uuid, role: Option<Role>) -> Standing {
    if board.is_owner(actor_id) {
        return Standing::Owner;
    }
    match role {
        Some(role) => Standing::Member(role),
        None => Standing::Outsider,
    }
}

/// The role the actor effectively holds: `Owner` for the board owner,
/// otherwise the membership role (if any).
pub fn effective_role(board: &Board, actor_id: Uuid, role: Option<Role>) -> Option<Role> {
    match standing(board, actor_id, role) {
        Standing::Owner => Some(Role::Owner),
        Standing::Member(role) => Some(role),
        Standing::Outsider => None,
    }
}

/// Public boards are readable by anyone; otherwise any membership grants view.
pub fn can_view(board: &Board, actor_id: Uuid, role: Option<Role>) -> bool {
    if board.is_public {
        return true;
    }
    match standing(board, actor_id, role) {
        Standing::Owner => true,
        Standing::Member(Role::Owner | Role::Admin | Role::Member | Role::Viewer) => true,
        Standing::Outsider => false,
    }
}

/// Board metadata edits: owner or `Admin`.
pub fn can_edit(board: &Board, actor_id: Uuid, role: Option<Role>) -> bool {
    if board.is_archived {
        return false;
    }
    match standing(board, actor_id, role) {
        Standing::Owner | Standing::Member(Role::Admin) => true,
        Standing::Member(Role::Owner | Role::Member | Role::Viewer) | Standing::Outsider => false,
    }
}

/// Member management: owner or `Admin`, or anyone acting on themself.
pub fn can_manage_members(
    board: &Board,
    actor_id: Uuid,
    role: Option<Role>,
    is_self_target: bool,
) -> bool {
    if board.is_archived {
        return false;
    }
    if is_self_target {
        return true;
    }
    match standing(board, actor_id, role) {
        Standing::Owner | Standing::Member(Role::Admin) => true,
        Standing::Member(Role::Owner | Role::Member | Role::Viewer) | Standing::Outsider => false,
    }
}

/// Lists, cards and labels: owner, `Admin` or `Member`. `Viewer` is read-only.
pub fn can_mutate_child_entity(board: &Board, actor_id: Uuid, role: Option<Role>) -> bool {
    if board.is_archived {
        return false;
    }
    match standing(board, actor_id, role) {
        Standing::Owner | Standing::Member(Role::Admin | Role::Member) => true,
        Standing::Member(Role::Owner | Role::Viewer) | Standing::Outsider => false,
    }
}

/// Archive and unarchive: owner or `Admin`. Evaluated regardless of the
/// current archive state.
pub fn can_toggle_archive(board: &Board, actor_id: Uuid, role: Option<Role>) -> bool {
    match standing(board, actor_id, role) {
        Standing::Owner | Standing::Member(Role::Admin) => true,
        Standing::Member(Role::Owner | Role::Member | Role::Viewer) | Standing::Outsider => false,
    }
}

/// Only the owner may delete a board, archived or not.
pub fn can_delete_board(board: &Board, actor_id: Uuid) -> bool {
    board.is_owner(actor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Option<Role>; 5] = [
        None,
        Some(Role::Viewer),
        Some(Role::Member),
        Some(Role::Admin),
        Some(Role::Owner),
    ];

    fn board(owner: Uuid) -> Board {
        Board::new(owner, "Sprint", None, None, false)
    }

    #[test]
    fn owner_passes_every_gate_without_a_membership_row() {
        let owner = Uuid::new_v4();
        let b = board(owner);
        assert!(can_view(&b, owner, None));
        assert!(can_edit(&b, owner, None));
        assert!(can_manage_members(&b, owner, None, false));
        assert!(can_mutate_child_entity(&b, owner, None));
        assert!(can_delete_board(&b, owner));
        assert_eq!(effective_role(&b, owner, None), Some(Role::Owner));
    }

    #[test]
    fn owner_role_row_on_non_owner_grants_no_privilege() {
        let b = board(Uuid::new_v4());
        let impostor = Uuid::new_v4();
        assert!(can_view(&b, impostor, Some(Role::Owner)));
        assert!(!can_edit(&b, impostor, Some(Role::Owner)));
        assert!(!can_manage_members(&b, impostor, Some(Role::Owner), false));
        assert!(!can_mutate_child_entity(&b, impostor, Some(Role::Owner)));
        assert!(!can_delete_board(&b, impostor));
    }

    #[test]
    fn viewer_is_read_only_but_may_leave() {
        let b = board(Uuid::new_v4());
        let viewer = Uuid::new_v4();
        assert!(can_view(&b, viewer, Some(Role::Viewer)));
        assert!(!can_mutate_child_entity(&b, viewer, Some(Role::Viewer)));
        assert!(!can_manage_members(&b, viewer, Some(Role::Viewer), false));
        assert!(can_manage_members(&b, viewer, Some(Role::Viewer), true));
    }

    #[test]
    fn member_mutates_children_but_not_board_or_members() {
        let b = board(Uuid::new_v4());
        let member = Uuid::new_v4();
        assert!(can_mutate_child_entity(&b, member, Some(Role::Member)));
        assert!(!can_edit(&b, member, Some(Role::Member)));
        assert!(!can_manage_members(&b, member, Some(Role::Member), false));
    }

    #[test]
    fn admin_edits_and_manages() {
        let b = board(Uuid::new_v4());
        let admin = Uuid::new_v4();
        assert!(can_edit(&b, admin, Some(Role::Admin)));
        assert!(can_manage_members(&b, admin, Some(Role::Admin), false));
        assert!(can_toggle_archive(&b, admin, Some(Role::Admin)));
        assert!(!can_delete_board(&b, admin));
    }

    #[test]
    fn outsiders_see_public_boards_only() {
        let mut b = board(Uuid::new_v4());
        let stranger = Uuid::new_v4();
        assert!(!can_view(&b, stranger, None));
        b.set_visibility(true);
        assert!(can_view(&b, stranger, None));
        assert!(!can_mutate_child_entity(&b, stranger, None));
    }

    #[test]
    fn archived_board_denies_every_mutation_but_keeps_view() {
        let owner = Uuid::new_v4();
        let mut b = board(owner);
        b.archive();
        let actor = Uuid::new_v4();
        for role in ALL_ROLES {
            assert!(!can_edit(&b, actor, role));
            assert!(!can_mutate_child_entity(&b, actor, role));
            assert!(!can_manage_members(&b, actor, role, false));
            assert!(!can_manage_members(&b, actor, role, true));
        }
        assert!(!can_edit(&b, owner, None));
        assert!(can_view(&b, owner, None));
        assert!(can_view(&b, actor, Some(Role::Viewer)));
        assert!(can_toggle_archive(&b, owner, None));
    }

    #[test]
    fn self_target_passes_for_every_role() {
        let b = board(Uuid::new_v4());
        let actor = Uuid::new_v4();
        for role in ALL_ROLES {
            assert!(can_manage_members(&b, actor, role, true));
        }
    }
}
