//! Texture and font collaborators.

use glam::Vec2;
use thiserror::Error;

/// Stable, reusable handle to a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureHandle {
    pub id: u64,
    /// Native size in pixels.
    pub size: Vec2,
}

/// Sprites drawn for star modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierSprite {
    Nebula,
    Asteroids,
    Binary,
    BlackholeBinary,
    Wormhole,
}

impl ModifierSprite {
    pub const ALL: [ModifierSprite; 5] = [
        ModifierSprite::Nebula,
        ModifierSprite::Asteroids,
        ModifierSprite::Binary,
        ModifierSprite::BlackholeBinary,
        ModifierSprite::Wormhole,
    ];

    /// Asset name the provider is keyed by.
    pub fn name(self) -> &'static str {
        match self {
            ModifierSprite::Nebula => "nebula",
            ModifierSprite::Asteroids => "asteroids",
            ModifierSprite::Binary => "binary",
            ModifierSprite::BlackholeBinary => "blackhole_binary",
            ModifierSprite::Wormhole => "wormhole",
        }
    }
}

/// Map symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Scannable,
}

impl Symbol {
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Scannable => "scannable",
        }
    }
}

/// Named text styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LabelStyle {
    #[default]
    Default,
    Small,
}

/// A texture lookup that could not be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("no icon for specialist {0}")]
    MissingSpecialist(u32),

    #[error("no modifier sprite named {0:?}")]
    MissingSprite(&'static str),

    #[error("no symbol named {0:?}")]
    MissingSymbol(&'static str),
}

/// Synchronous texture lookup service.
pub trait AssetProvider {
    fn specialist_icon(&self, specialist_id: u32) -> Result<TextureHandle, AssetError>;

    fn modifier_sprite(&self, sprite: ModifierSprite) -> Result<TextureHandle, AssetError>;

    fn symbol(&self, symbol: Symbol) -> Result<TextureHandle, AssetError>;
}

/// Synchronous text measurement, so label facets can center themselves.
pub trait FontMetrics {
    /// Width and height of `text` rendered in `style`.
    fn measure(&self, text: &str, style: LabelStyle) -> Vec2;
}
