//! Physics body roles
//!
//! The host tags every body with a single-bit category mask. Contact
//! handling dispatches on the decoded enum, never on raw bits.

use serde::{Deserialize, Serialize};

/// Physics body role, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    Ball,
    Stone,
    Pillar,
    Crate,
    Pearl,
}

/// What touching a body of some category does to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    /// Hide it, score it, bring it back later
    Collect,
    /// Solid obstacle; reported to the host, no state change
    Bump,
    /// Track or the ball itself
    Ignore,
}

impl CollisionCategory {
    pub const ALL: [CollisionCategory; 5] = [
        CollisionCategory::Ball,
        CollisionCategory::Stone,
        CollisionCategory::Pillar,
        CollisionCategory::Crate,
        CollisionCategory::Pearl,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            CollisionCategory::Ball => 1,
            CollisionCategory::Stone => 2,
            CollisionCategory::Pillar => 4,
            CollisionCategory::Crate => 8,
            CollisionCategory::Pearl => 16,
        }
    }

    /// Decode a host category mask. Only exact single-category masks map.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bits() == bits)
    }

    pub fn contact_response(self) -> ContactResponse {
        match self {
            CollisionCategory::Pearl => ContactResponse::Collect,
            CollisionCategory::Pillar | CollisionCategory::Crate => ContactResponse::Bump,
            CollisionCategory::Ball | CollisionCategory::Stone => ContactResponse::Ignore,
        }
    }

    /// Mask of categories the ball reports contacts with
    pub fn ball_contact_mask() -> u32 {
        Self::ALL
            .into_iter()
            .filter(|c| c.contact_response() != ContactResponse::Ignore)
            .fold(0, |mask, c| mask | c.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_roundtrip() {
        for category in CollisionCategory::ALL {
            assert_eq!(CollisionCategory::from_bits(category.bits()), Some(category));
        }
        assert_eq!(CollisionCategory::from_bits(0), None);
        assert_eq!(CollisionCategory::from_bits(4 | 8), None);
    }

    #[test]
    fn test_ball_contact_mask() {
        // Pillar | Crate | Pearl
        assert_eq!(CollisionCategory::ball_contact_mask(), 4 | 8 | 16);
    }

    #[test]
    fn test_responses() {
        assert_eq!(
            CollisionCategory::Pearl.contact_response(),
            ContactResponse::Collect
        );
        assert_eq!(
            CollisionCategory::Crate.contact_response(),
            ContactResponse::Bump
        );
        assert_eq!(
            CollisionCategory::Stone.contact_response(),
            ContactResponse::Ignore
        );
    }
}
