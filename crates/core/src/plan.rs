//! User plan tiers and their derived capture/download entitlements.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Plan string constants
// ---------------------------------------------------------------------------

/// Unregistered user.
pub const PLAN_GUEST: &str = "guest";
/// Registered user on the free tier.
pub const PLAN_FREE: &str = "free";
/// Paying subscriber.
pub const PLAN_PREMIUM: &str = "premium";

/// All valid plan values, matching the `users.plan` column.
pub const VALID_PLANS: &[&str] = &[PLAN_GUEST, PLAN_FREE, PLAN_PREMIUM];

// ---------------------------------------------------------------------------
// Quota constants
// ---------------------------------------------------------------------------

/// Guests get a fixed budget per room for the room's whole lifetime.
pub const GUEST_ROOM_PHOTO_LIMIT: u32 = 5;

/// Free users get a budget per room-local calendar day.
pub const FREE_DAILY_PHOTO_LIMIT: u32 = 24;

/// Premium users get a larger daily budget.
pub const PREMIUM_DAILY_PHOTO_LIMIT: u32 = 36;

// ---------------------------------------------------------------------------
// Plan enum
// ---------------------------------------------------------------------------

/// A user's subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Guest,
    Free,
    Premium,
}

impl Plan {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => PLAN_GUEST,
            Self::Free => PLAN_FREE,
            Self::Premium => PLAN_PREMIUM,
        }
    }

    /// Parse from a string, returning an error for unknown plans.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PLAN_GUEST => Ok(Self::Guest),
            PLAN_FREE => Ok(Self::Free),
            PLAN_PREMIUM => Ok(Self::Premium),
            other => Err(CoreError::Validation(format!(
                "Unknown plan: '{other}'. Valid plans: {}",
                VALID_PLANS.join(", ")
            ))),
        }
    }

    /// Photos a user may capture per room-local calendar day.
    ///
    /// Guests return 0: their quota is not daily at all; the
    /// [`GUEST_ROOM_PHOTO_LIMIT`] room-lifetime rule applies instead.
    pub fn daily_photo_limit(&self) -> u32 {
        match self {
            Self::Guest => 0,
            Self::Free => FREE_DAILY_PHOTO_LIMIT,
            Self::Premium => PREMIUM_DAILY_PHOTO_LIMIT,
        }
    }

    /// Whether the user may download original-quality photos.
    pub fn can_download(&self) -> bool {
        !matches!(self, Self::Guest)
    }

    /// Whether this is the unregistered guest tier.
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_round_trips_through_strings() {
        for plan in [Plan::Guest, Plan::Free, Plan::Premium] {
            assert_eq!(Plan::from_str(plan.as_str()).unwrap(), plan);
        }
    }

    #[test]
    fn unknown_plan_rejected() {
        let err = Plan::from_str("platinum").unwrap_err();
        assert!(err.to_string().contains("Unknown plan"));
    }

    #[test]
    fn daily_limits_match_tiers() {
        assert_eq!(Plan::Guest.daily_photo_limit(), 0);
        assert_eq!(Plan::Free.daily_photo_limit(), 24);
        assert_eq!(Plan::Premium.daily_photo_limit(), 36);
    }

    #[test]
    fn only_guests_cannot_download() {
        assert!(!Plan::Guest.can_download());
        assert!(Plan::Free.can_download());
        assert!(Plan::Premium.can_download());
    }
}
