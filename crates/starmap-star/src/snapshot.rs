//! Persisted star snapshots.
//!
//! The wire shape uses camelCase field names. Reference ids are written as
//! `null` when unset and accept `null`, `-1`, or an omitted field on input.
//! Infrastructure is never part of a snapshot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::ids::StarId;
use crate::state::{Resources, StarState};

/// Errors produced while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid star snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Plain 2D coordinate as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Location {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Location> for Vec2 {
    fn from(l: Location) -> Self {
        Vec2::new(l.x, l.y)
    }
}

/// Persistable subset of a star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StarSnapshot {
    pub id: StarId,
    pub location: Location,
    /// Rolled fresh on hydration when absent.
    #[serde(default)]
    pub natural_resources: Option<Resources>,
    #[serde(default)]
    pub warp_gate: bool,
    #[serde(default)]
    pub home_star: bool,
    #[serde(default)]
    pub is_asteroid_field: bool,
    #[serde(default)]
    pub is_binary_star: bool,
    #[serde(default)]
    pub is_black_hole: bool,
    #[serde(default)]
    pub is_nebula: bool,
    #[serde(default)]
    pub is_pulsar: bool,
    #[serde(default, deserialize_with = "reference_id")]
    pub player_id: Option<u32>,
    #[serde(default, deserialize_with = "reference_id")]
    pub specialist_id: Option<u32>,
    #[serde(default, deserialize_with = "reference_id")]
    pub worm_hole_to_star_id: Option<StarId>,
}

/// `null` and `-1` both mean unset; any other negative id is rejected.
fn reference_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u32>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(-1) => Ok(None),
        Some(raw) => u32::try_from(raw)
            .map(|id| Some(T::from(id)))
            .map_err(|_| serde::de::Error::custom(format!("invalid reference id {raw}"))),
    }
}

impl StarSnapshot {
    /// Captures the persistable attributes of `state`.
    pub fn capture(state: &StarState) -> Self {
        Self {
            id: state.id,
            location: state.location.into(),
            natural_resources: Some(state.natural_resources),
            warp_gate: state.warp_gate,
            home_star: state.home_star,
            is_asteroid_field: state.is_asteroid_field,
            is_binary_star: state.is_binary_star,
            is_black_hole: state.is_black_hole,
            is_nebula: state.is_nebula,
            is_pulsar: state.is_pulsar,
            player_id: state.player_id,
            specialist_id: state.specialist_id,
            worm_hole_to_star_id: state.worm_hole_to_star_id,
        }
    }

    /// Rebuilds star state from this snapshot. Infrastructure starts at zero;
    /// missing natural resources are rolled with `rng`.
    pub fn hydrate<R: Rng + ?Sized>(&self, rng: &mut R) -> StarState {
        StarState {
            id: self.id,
            location: self.location.into(),
            infrastructure: Resources::default(),
            natural_resources: self
                .natural_resources
                .unwrap_or_else(|| Resources::roll(rng)),
            player_id: self.player_id,
            specialist_id: self.specialist_id,
            worm_hole_to_star_id: self.worm_hole_to_star_id,
            warp_gate: self.warp_gate,
            home_star: self.home_star,
            is_asteroid_field: self.is_asteroid_field,
            is_binary_star: self.is_binary_star,
            is_black_hole: self.is_black_hole,
            is_nebula: self.is_nebula,
            is_pulsar: self.is_pulsar,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a JSON array of snapshots.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
