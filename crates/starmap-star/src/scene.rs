//! Scene-graph seam: the retained-mode primitives a star is built from and the
//! trait the host rendering engine implements to display them.
//!
//! A star owns one root container (hit-testable, positioned at the star's
//! location) and inserts one child [`Visual`] per visible facet. Children are
//! drawn back to front in index order.

use glam::Vec2;

use crate::assets::{LabelStyle, TextureHandle};

/// Opaque handle to a node owned by the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 24-bit RGB colour, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    pub const WHITE: Colour = Colour(0xffffff);
    pub const BLACK: Colour = Colour(0x000000);
}

/// Mouse cursor shown while hovering a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Circular hit region in the node's local (pre-scale) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl HitCircle {
    pub fn contains(&self, local: Vec2) -> bool {
        local.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Description of a star's root container.
#[derive(Debug, Clone, PartialEq)]
pub struct RootDesc {
    pub position: Vec2,
    pub scale: f32,
    pub hit_area: HitCircle,
    pub cursor: Cursor,
}

/// Line style for stroked shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub colour: Colour,
    pub alpha: f32,
}

impl Stroke {
    pub fn solid(width: f32, colour: Colour) -> Self {
        Self {
            width,
            colour,
            alpha: 1.0,
        }
    }
}

/// Vector primitive in local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { origin: Vec2, size: Vec2 },
    /// Closed polygon through the given points.
    Polygon(Vec<Vec2>),
    Line { from: Vec2, to: Vec2 },
    Ellipse { center: Vec2, radii: Vec2 },
}

/// A shape with its own stroke and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub shape: Shape,
    pub stroke: Option<Stroke>,
    pub fill: Option<Colour>,
}

impl Path {
    pub fn stroked(shape: Shape, stroke: Stroke) -> Self {
        Self {
            shape,
            stroke: Some(stroke),
            fill: None,
        }
    }

    pub fn filled(shape: Shape, fill: Colour) -> Self {
        Self {
            shape,
            stroke: None,
            fill: Some(fill),
        }
    }
}

/// What a visual draws.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualContent {
    Graphics(Vec<Path>),
    /// Texture stretched to `size` with its top-left corner at the visual's position.
    Sprite { texture: TextureHandle, size: Vec2 },
    /// Text whose top-left corner sits at the visual's position.
    Text { text: String, style: LabelStyle },
}

/// One child node of a star's root container.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub content: VisualContent,
    pub position: Vec2,
    pub scale: f32,
    /// Radians, applied around the visual's local origin.
    pub rotation: f32,
    pub alpha: f32,
}

impl Visual {
    fn new(content: VisualContent) -> Self {
        Self {
            content,
            position: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
            alpha: 1.0,
        }
    }

    pub fn graphics(paths: Vec<Path>) -> Self {
        Self::new(VisualContent::Graphics(paths))
    }

    pub fn sprite(texture: TextureHandle, size: Vec2) -> Self {
        Self::new(VisualContent::Sprite { texture, size })
    }

    pub fn text(text: impl Into<String>, style: LabelStyle) -> Self {
        Self::new(VisualContent::Text {
            text: text.into(),
            style,
        })
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// The label text, if this visual is a text run.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            VisualContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Retained-mode scene graph provided by the host rendering engine.
///
/// Node handles stay valid until removed or destroyed. Removing a child
/// releases it; destroying a root releases the root and all its children.
pub trait SceneGraph {
    /// Creates a hit-testable root container.
    fn create_root(&mut self, root: &RootDesc) -> NodeId;

    fn set_position(&mut self, node: NodeId, position: Vec2);

    fn set_scale(&mut self, node: NodeId, scale: f32);

    /// Inserts `visual` as a child of `parent` at draw-order `index`
    /// (0 = back). Indices past the end append.
    fn insert_child(&mut self, parent: NodeId, index: usize, visual: Visual) -> NodeId;

    /// Detaches and releases `child`.
    fn remove_child(&mut self, parent: NodeId, child: NodeId);

    /// Releases `node` and every descendant.
    fn destroy(&mut self, node: NodeId);
}
