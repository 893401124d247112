//! User models and account status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account setup progression
///
/// Advances monotonically as the profile and email verification fill in;
/// it never regresses on its own. `Suspended` is sticky and only set by an
/// explicit administrative update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountStatus {
    SetupNeeded,
    SemiSetup,
    Complete,
    Suspended,
}

impl AccountStatus {
    /// Database representation
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::SetupNeeded => "setup-needed",
            AccountStatus::SemiSetup => "semi-setup",
            AccountStatus::Complete => "complete",
            AccountStatus::Suspended => "suspended",
        }
    }

    /// Parse the database representation, defaulting unknown values to
    /// `SetupNeeded`
    pub fn from_str(s: &str) -> Self {
        match s {
            "semi-setup" => AccountStatus::SemiSetup,
            "complete" => AccountStatus::Complete,
            "suspended" => AccountStatus::Suspended,
            _ => AccountStatus::SetupNeeded,
        }
    }

    fn rank(self) -> u8 {
        match self {
            AccountStatus::SetupNeeded => 0,
            AccountStatus::SemiSetup => 1,
            AccountStatus::Complete => 2,
            AccountStatus::Suspended => 3,
        }
    }

    /// Recompute the status from the current profile state
    ///
    /// The result never ranks below the stored status, and a suspended
    /// account stays suspended.
    pub fn advanced(self, email_verified: bool, has_name: bool) -> Self {
        if self == AccountStatus::Suspended {
            return AccountStatus::Suspended;
        }

        let candidate = if email_verified && has_name {
            AccountStatus::Complete
        } else if email_verified || has_name {
            AccountStatus::SemiSetup
        } else {
            AccountStatus::SetupNeeded
        };

        if candidate.rank() > self.rank() {
            candidate
        } else {
            self
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub account_status: AccountStatus,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfilePatch {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }

    /// Merge the patch over an existing user, keeping absent fields
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &self.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
    }
}

/// Public profile response
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            bio: user.bio,
            account_status: user.account_status,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_advances_with_profile_completion() {
        let status = AccountStatus::SetupNeeded;
        assert_eq!(status.advanced(false, false), AccountStatus::SetupNeeded);
        assert_eq!(status.advanced(false, true), AccountStatus::SemiSetup);
        assert_eq!(status.advanced(true, false), AccountStatus::SemiSetup);
        assert_eq!(status.advanced(true, true), AccountStatus::Complete);
    }

    #[test]
    fn test_status_never_regresses() {
        // A cleared profile does not demote an already-advanced account.
        assert_eq!(
            AccountStatus::Complete.advanced(false, false),
            AccountStatus::Complete
        );
        assert_eq!(
            AccountStatus::SemiSetup.advanced(false, false),
            AccountStatus::SemiSetup
        );
    }

    #[test]
    fn test_suspended_is_sticky() {
        assert_eq!(
            AccountStatus::Suspended.advanced(true, true),
            AccountStatus::Suspended
        );
    }

    #[test]
    fn test_status_round_trips_through_db_representation() {
        for status in [
            AccountStatus::SetupNeeded,
            AccountStatus::SemiSetup,
            AccountStatus::Complete,
            AccountStatus::Suspended,
        ] {
            assert_eq!(AccountStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_profile_patch_keeps_absent_fields() {
        let mut user = User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            avatar_url: None,
            bio: Some("hello".to_string()),
            account_status: AccountStatus::SemiSetup,
            email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let patch = ProfilePatch {
            bio: Some("new bio".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut user);

        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.bio.as_deref(), Some("new bio"));
        assert!(user.avatar_url.is_none());
    }
}
