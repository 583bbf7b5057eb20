//! Player colour/shape tables and the per-star resolved style.

use std::str::FromStr;

use starmap_config::GalaxyConfig;
use thiserror::Error;

use crate::scene::Colour;

/// Number of colours before the shape table advances.
pub const PALETTE_SIZE: u32 = 8;

/// Outline drawn around an owned star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerShape {
    Circle,
    Square,
    Diamond,
    Hexagon,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown player shape {0:?}")]
pub struct UnknownShape(pub String);

impl FromStr for PlayerShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(PlayerShape::Circle),
            "square" => Ok(PlayerShape::Square),
            "diamond" => Ok(PlayerShape::Diamond),
            "hexagon" => Ok(PlayerShape::Hexagon),
            other => Err(UnknownShape(other.to_string())),
        }
    }
}

/// Resolved colour and shape of a star's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStyle {
    pub colour: Colour,
    pub shape: PlayerShape,
}

/// Read-only palette and shape table supplied by the host scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTables {
    /// Indexed by `player_id % 8`.
    pub palette: Vec<Colour>,
    /// Indexed by `player_id / 8`.
    pub shapes: Vec<PlayerShape>,
}

impl PlayerTables {
    pub fn new(palette: Vec<Colour>, shapes: Vec<PlayerShape>) -> Self {
        Self { palette, shapes }
    }

    /// Builds the tables from the galaxy section of the config.
    pub fn from_config(config: &GalaxyConfig) -> Result<Self, UnknownShape> {
        let shapes = config
            .shapes
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<_>, _>>()?;
        let palette = config.palette.iter().copied().map(Colour).collect();
        Ok(Self { palette, shapes })
    }

    /// Style for `player_id`, or `None` when either table is too short.
    pub fn resolve(&self, player_id: u32) -> Option<PlayerStyle> {
        let colour = *self.palette.get((player_id % PALETTE_SIZE) as usize)?;
        let shape = *self.shapes.get((player_id / PALETTE_SIZE) as usize)?;
        Some(PlayerStyle { colour, shape })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> PlayerTables {
        PlayerTables::from_config(&GalaxyConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_uses_modulo_and_division() {
        let t = tables();
        let style = t.resolve(3).unwrap();
        assert_eq!(style.colour, t.palette[3]);
        assert_eq!(style.shape, PlayerShape::Circle);

        let style = t.resolve(11).unwrap();
        assert_eq!(style.colour, t.palette[3]);
        assert_eq!(style.shape, PlayerShape::Square);

        assert_eq!(t.resolve(31).unwrap().shape, PlayerShape::Hexagon);
    }

    #[test]
    fn test_resolve_out_of_range_is_none() {
        assert_eq!(tables().resolve(32), None);

        let short = PlayerTables::new(vec![Colour::WHITE], vec![PlayerShape::Circle]);
        assert_eq!(short.resolve(2), None);
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let mut config = GalaxyConfig::default();
        config.shapes.push("star".to_string());
        assert_eq!(
            PlayerTables::from_config(&config),
            Err(UnknownShape("star".to_string()))
        );
    }
}
