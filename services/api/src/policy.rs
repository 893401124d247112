//! Authorization policy
//!
//! Pure decision functions over requester identity, ownership, and
//! visibility. No I/O happens here; handlers load the resource first (a
//! missing resource is always NotFound, regardless of who asks) and only
//! then consult the policy, so Forbidden can never mask existence.

use uuid::Uuid;

/// Whether the requester may read a memory
///
/// Visibility is exactly `is_public OR requester == owner`.
pub fn can_read(requester: Option<Uuid>, owner_id: Uuid, is_public: bool) -> bool {
    is_public || requester == Some(owner_id)
}

/// Whether the requester may mutate an owned resource
///
/// Owner-only for memory edit/delete/privacy-toggle, author-only for
/// comment delete.
pub fn can_write(requester_id: Uuid, owner_id: Uuid) -> bool {
    requester_id == owner_id
}

/// Outcome of a follow precondition check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowCheck {
    Allowed,
    SelfFollow,
    AlreadyFollowing,
}

/// Check whether a follow edge may be created
///
/// Self-follows are invalid regardless of prior state; a duplicate edge is
/// an error, not a no-op.
pub fn check_follow(follower_id: Uuid, target_id: Uuid, already_following: bool) -> FollowCheck {
    if follower_id == target_id {
        FollowCheck::SelfFollow
    } else if already_following {
        FollowCheck::AlreadyFollowing
    } else {
        FollowCheck::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_read_matches_visibility_rule() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // Truth table: is_public OR requester == owner.
        assert!(can_read(None, owner, true));
        assert!(can_read(Some(stranger), owner, true));
        assert!(can_read(Some(owner), owner, false));
        assert!(!can_read(Some(stranger), owner, false));
        assert!(!can_read(None, owner, false));
    }

    #[test]
    fn test_can_write_is_owner_only() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        assert!(can_write(owner, owner));
        assert!(!can_write(stranger, owner));
    }

    #[test]
    fn test_self_follow_is_rejected_regardless_of_state() {
        let user = Uuid::new_v4();

        assert_eq!(check_follow(user, user, false), FollowCheck::SelfFollow);
        assert_eq!(check_follow(user, user, true), FollowCheck::SelfFollow);
    }

    #[test]
    fn test_duplicate_follow_is_rejected() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(check_follow(a, b, true), FollowCheck::AlreadyFollowing);
        assert_eq!(check_follow(a, b, false), FollowCheck::Allowed);
    }
}
