//! Facet renderers.
//!
//! Each facet is a pure function from star state to an optional [`Visual`].
//! `None` means the facet is hidden. Geometry is expressed in the star's local
//! space, origin at the star center, before the root container's scale.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::assets::{
    AssetError, AssetProvider, FontMetrics, LabelStyle, ModifierSprite, Symbol, TextureHandle,
};
use crate::player::{PlayerShape, PlayerStyle};
use crate::scene::{Colour, Path, Shape, Stroke, Visual};
use crate::state::StarState;

const CORE_MARKER_SIZE: f32 = 16.0;
/// Gap between the star center and the nearest edge of a side/top/bottom label.
const LABEL_GAP: f32 = 16.0;
const OWNERSHIP_SCALE: f32 = 3.0;
const SPECIALIST_SIZE: f32 = 32.0;
const WARP_GATE_RADIUS: f32 = 32.0;
const WORMHOLE_SIZE: f32 = 40.0;
const WORMHOLE_ALPHA: f32 = 0.5;
const WORMHOLE_LABEL_X: f32 = 24.0;
const MODIFIER_SPRITE_SCALE: f32 = 1.5;
const BINARY_SIZE: f32 = 24.0;
const BLACK_HOLE_RADIUS: f32 = 6.0;
const BLACK_HOLE_RING_RADIUS: f32 = 8.0;

/// Every facet, in draw order (back to front).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetKind {
    CoreMarker,
    IdentityLabel,
    WarpGateRing,
    WormholeMarker,
    WormholeLabel,
    OwnershipMarker,
    InfrastructureLabel,
    ResourceLabel,
    SpecialistMarker,
    AsteroidField,
    BinaryStar,
    BlackHole,
    Nebula,
    Pulsar,
}

impl FacetKind {
    pub const COUNT: usize = 14;

    pub const ALL: [FacetKind; Self::COUNT] = [
        FacetKind::CoreMarker,
        FacetKind::IdentityLabel,
        FacetKind::WarpGateRing,
        FacetKind::WormholeMarker,
        FacetKind::WormholeLabel,
        FacetKind::OwnershipMarker,
        FacetKind::InfrastructureLabel,
        FacetKind::ResourceLabel,
        FacetKind::SpecialistMarker,
        FacetKind::AsteroidField,
        FacetKind::BinaryStar,
        FacetKind::BlackHole,
        FacetKind::Nebula,
        FacetKind::Pulsar,
    ];

    /// Position in the draw order.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Inputs shared by every facet for one sync pass.
pub struct FacetContext<'a> {
    pub state: &'a StarState,
    pub player: Option<&'a PlayerStyle>,
    pub assets: &'a dyn AssetProvider,
    pub fonts: &'a dyn FontMetrics,
    /// Rotation for the pulsar marker, drawn fresh for every pass.
    pub pulsar_rotation: f32,
}

/// Builds the visual for `kind`, or `None` when the facet is hidden.
pub fn describe(kind: FacetKind, ctx: &FacetContext<'_>) -> Result<Option<Visual>, AssetError> {
    let state = ctx.state;
    match kind {
        FacetKind::CoreMarker => {
            if !state.shows_core_marker() {
                return Ok(None);
            }
            let texture = ctx.assets.symbol(Symbol::Scannable)?;
            Ok(Some(centered_sprite(texture, Vec2::splat(CORE_MARKER_SIZE))))
        }
        FacetKind::IdentityLabel => {
            let text = format!("#{}", state.id);
            let size = ctx.fonts.measure(&text, LabelStyle::Small);
            let position = Vec2::new(-LABEL_GAP - size.x, -size.y / 2.0);
            Ok(Some(Visual::text(text, LabelStyle::Small).at(position)))
        }
        FacetKind::WarpGateRing => Ok(state.warp_gate.then(|| {
            Visual::graphics(vec![Path::stroked(
                Shape::Circle {
                    center: Vec2::ZERO,
                    radius: WARP_GATE_RADIUS,
                },
                Stroke::solid(2.0, Colour::WHITE),
            )])
        })),
        FacetKind::WormholeMarker => {
            if state.worm_hole_to_star_id.is_none() {
                return Ok(None);
            }
            let texture = ctx.assets.modifier_sprite(ModifierSprite::Wormhole)?;
            Ok(Some(
                centered_sprite(texture, Vec2::splat(WORMHOLE_SIZE)).with_alpha(WORMHOLE_ALPHA),
            ))
        }
        FacetKind::WormholeLabel => Ok(state.worm_hole_to_star_id.map(|target| {
            let text = format!(">{target}");
            let size = ctx.fonts.measure(&text, LabelStyle::Small);
            Visual::text(text, LabelStyle::Small).at(Vec2::new(WORMHOLE_LABEL_X, -size.y / 2.0))
        })),
        FacetKind::OwnershipMarker => {
            if state.player_id.is_none() {
                return Ok(None);
            }
            Ok(ctx.player.map(ownership_marker))
        }
        FacetKind::InfrastructureLabel => {
            let text = state.infrastructure.to_string();
            let size = ctx.fonts.measure(&text, LabelStyle::Default);
            let position = Vec2::new(-size.x / 2.0, -LABEL_GAP - size.y);
            Ok(Some(Visual::text(text, LabelStyle::Default).at(position)))
        }
        FacetKind::ResourceLabel => {
            let text = state.natural_resources.to_string();
            let size = ctx.fonts.measure(&text, LabelStyle::Default);
            let position = Vec2::new(-size.x / 2.0, LABEL_GAP);
            Ok(Some(Visual::text(text, LabelStyle::Default).at(position)))
        }
        FacetKind::SpecialistMarker => match state.specialist_id {
            Some(specialist) => {
                let texture = ctx.assets.specialist_icon(specialist)?;
                Ok(Some(centered_sprite(texture, Vec2::splat(SPECIALIST_SIZE))))
            }
            None => Ok(None),
        },
        FacetKind::AsteroidField => {
            if !state.is_asteroid_field {
                return Ok(None);
            }
            let texture = ctx.assets.modifier_sprite(ModifierSprite::Asteroids)?;
            Ok(Some(centered_sprite(texture, texture.size * MODIFIER_SPRITE_SCALE)))
        }
        FacetKind::BinaryStar => {
            if !state.is_binary_star {
                return Ok(None);
            }
            let sprite = if state.is_black_hole {
                ModifierSprite::BlackholeBinary
            } else {
                ModifierSprite::Binary
            };
            let texture = ctx.assets.modifier_sprite(sprite)?;
            Ok(Some(centered_sprite(texture, Vec2::splat(BINARY_SIZE))))
        }
        FacetKind::BlackHole => Ok(state.shows_black_hole_marker().then(black_hole_marker)),
        FacetKind::Nebula => {
            if !state.is_nebula {
                return Ok(None);
            }
            let texture = ctx.assets.modifier_sprite(ModifierSprite::Nebula)?;
            Ok(Some(centered_sprite(texture, texture.size * MODIFIER_SPRITE_SCALE)))
        }
        FacetKind::Pulsar => Ok(state
            .is_pulsar
            .then(|| pulsar_marker().rotated(ctx.pulsar_rotation))),
    }
}

fn centered_sprite(texture: TextureHandle, size: Vec2) -> Visual {
    Visual::sprite(texture, size).at(-size / 2.0)
}

fn ownership_marker(style: &PlayerStyle) -> Visual {
    let shape = match style.shape {
        PlayerShape::Circle => Shape::Circle {
            center: Vec2::ZERO,
            radius: 8.0,
        },
        PlayerShape::Square => Shape::Rect {
            origin: Vec2::new(-8.0, -8.0),
            size: Vec2::splat(16.0),
        },
        PlayerShape::Diamond => {
            let s = 9.0;
            Shape::Polygon(vec![
                Vec2::new(0.0, -s),
                Vec2::new(-s, 0.0),
                Vec2::new(0.0, s),
                Vec2::new(s, 0.0),
            ])
        }
        PlayerShape::Hexagon => Shape::Polygon(vec![
            Vec2::new(4.0, -7.0),
            Vec2::new(-4.0, -7.0),
            Vec2::new(-8.0, 0.0),
            Vec2::new(-4.0, 7.0),
            Vec2::new(4.0, 7.0),
            Vec2::new(8.0, 0.0),
        ]),
    };
    Visual::graphics(vec![Path::stroked(shape, Stroke::solid(1.0, style.colour))])
        .scaled(OWNERSHIP_SCALE)
}

fn black_hole_marker() -> Visual {
    Visual::graphics(vec![
        Path::filled(
            Shape::Circle {
                center: Vec2::ZERO,
                radius: BLACK_HOLE_RADIUS,
            },
            Colour::BLACK,
        ),
        Path::stroked(
            Shape::Circle {
                center: Vec2::ZERO,
                radius: BLACK_HOLE_RING_RADIUS,
            },
            Stroke::solid(1.0, Colour::WHITE),
        ),
    ])
}

/// Two crossing beams with a pair of lobes along each arm of the long beam.
fn pulsar_marker() -> Visual {
    let beam = Stroke::solid(1.0, Colour::WHITE);
    let mut paths = vec![
        Path::stroked(
            Shape::Line {
                from: Vec2::new(0.0, -24.0),
                to: Vec2::new(0.0, 24.0),
            },
            beam,
        ),
        Path::stroked(
            Shape::Line {
                from: Vec2::new(-6.0, 0.0),
                to: Vec2::new(6.0, 0.0),
            },
            beam,
        ),
    ];
    for (y, radii) in [
        (-14.0, Vec2::new(3.0, 6.0)),
        (14.0, Vec2::new(3.0, 6.0)),
        (-22.0, Vec2::new(2.0, 3.0)),
        (22.0, Vec2::new(2.0, 3.0)),
    ] {
        paths.push(Path::filled(
            Shape::Ellipse {
                center: Vec2::new(0.0, y),
                radii,
            },
            Colour::WHITE,
        ));
    }
    Visual::graphics(paths)
}

/// A rotation in `[0, 2π)` from a unit sample. A full turn maps back to 0.
pub fn pulsar_rotation(sample: f32) -> f32 {
    let rotation = sample.clamp(0.0, 1.0) * TAU;
    if rotation < TAU { rotation } else { 0.0 }
}
