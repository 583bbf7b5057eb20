//! Authoritative star attributes.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids::StarId;

/// Upper bound (inclusive) of a freshly rolled natural resource value.
pub const MAX_NATURAL_RESOURCES: u32 = 50;

/// Economy / industry / science triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub economy: u32,
    pub industry: u32,
    pub science: u32,
}

impl Resources {
    /// All three categories set to `value`.
    pub const fn uniform(value: u32) -> Self {
        Self {
            economy: value,
            industry: value,
            science: value,
        }
    }

    /// Rolls one shared value in `[0, MAX_NATURAL_RESOURCES]`.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::uniform(rng.random_range(0..=MAX_NATURAL_RESOURCES))
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.economy, self.industry, self.science)
    }
}

/// Every attribute a star carries.
///
/// Reference ids use `None` as the single "unset" value; `-1` and `null` only
/// exist at the snapshot boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct StarState {
    /// Assigned once by the allocator or a snapshot.
    pub(crate) id: StarId,
    pub location: Vec2,
    /// Assigned by the owning game, never persisted with the star.
    pub infrastructure: Resources,
    pub natural_resources: Resources,
    pub player_id: Option<u32>,
    pub specialist_id: Option<u32>,
    pub worm_hole_to_star_id: Option<StarId>,
    pub warp_gate: bool,
    pub home_star: bool,
    pub is_asteroid_field: bool,
    pub is_binary_star: bool,
    pub is_black_hole: bool,
    pub is_nebula: bool,
    pub is_pulsar: bool,
}

impl StarState {
    /// A brand-new star: rolled resources, no owner, no modifiers.
    pub fn fresh<R: Rng + ?Sized>(id: StarId, location: Vec2, rng: &mut R) -> Self {
        Self {
            id,
            location,
            infrastructure: Resources::default(),
            natural_resources: Resources::roll(rng),
            player_id: None,
            specialist_id: None,
            worm_hole_to_star_id: None,
            warp_gate: false,
            home_star: false,
            is_asteroid_field: false,
            is_binary_star: false,
            is_black_hole: false,
            is_nebula: false,
            is_pulsar: false,
        }
    }

    pub fn id(&self) -> StarId {
        self.id
    }

    /// The plain core marker is hidden whenever another facet replaces it.
    pub fn shows_core_marker(&self) -> bool {
        self.specialist_id.is_none() && !self.is_black_hole && !self.is_binary_star && !self.is_pulsar
    }

    /// A black hole in a binary system is drawn by the binary sprite instead.
    pub fn shows_black_hole_marker(&self) -> bool {
        self.is_black_hole && !self.is_binary_star
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fresh_resources_are_uniform_and_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for i in 0..200 {
            let state = StarState::fresh(StarId(i), Vec2::ZERO, &mut rng);
            let r = state.natural_resources;
            assert_eq!(r.economy, r.industry);
            assert_eq!(r.industry, r.science);
            assert!(r.economy <= MAX_NATURAL_RESOURCES);
        }
    }

    #[test]
    fn test_fresh_star_has_defaults() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = StarState::fresh(StarId(0), Vec2::new(10.0, 20.0), &mut rng);
        assert_eq!(state.location, Vec2::new(10.0, 20.0));
        assert_eq!(state.infrastructure, Resources::default());
        assert_eq!(state.player_id, None);
        assert_eq!(state.specialist_id, None);
        assert_eq!(state.worm_hole_to_star_id, None);
        assert!(!state.warp_gate && !state.home_star && !state.is_pulsar);
        assert!(state.shows_core_marker());
    }

    #[test]
    fn test_core_marker_hidden_by_specialist_and_modifiers() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let base = StarState::fresh(StarId(0), Vec2::ZERO, &mut rng);

        let mut s = base.clone();
        s.specialist_id = Some(2);
        assert!(!s.shows_core_marker());

        let mut s = base.clone();
        s.is_pulsar = true;
        assert!(!s.shows_core_marker());

        let mut s = base.clone();
        s.is_nebula = true;
        s.is_asteroid_field = true;
        assert!(s.shows_core_marker());
    }

    #[test]
    fn test_binary_black_hole_defers_to_binary_sprite() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut s = StarState::fresh(StarId(0), Vec2::ZERO, &mut rng);
        s.is_black_hole = true;
        assert!(s.shows_black_hole_marker());
        s.is_binary_star = true;
        assert!(!s.shows_black_hole_marker());
    }

    #[test]
    fn test_resources_display() {
        let r = Resources {
            economy: 1,
            industry: 22,
            science: 3,
        };
        assert_eq!(r.to_string(), "1 22 3");
    }
}
