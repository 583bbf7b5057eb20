//! Headless collaborators: an in-memory scene graph that records every
//! mutation, a static texture table, and fixed-advance font metrics.
//!
//! Used by tests and by hosts that need to inspect what a star would draw
//! without a renderer.

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::assets::{
    AssetError, AssetProvider, FontMetrics, LabelStyle, ModifierSprite, Symbol, TextureHandle,
};
use crate::scene::{NodeId, RootDesc, SceneGraph, Visual};

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    root: Option<RootDesc>,
    visual: Option<Visual>,
}

/// Counters of structural changes, for asserting how much work a sync did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub inserted: usize,
    pub removed: usize,
    pub destroyed: usize,
}

/// In-memory [`SceneGraph`].
#[derive(Debug, Default)]
pub struct RecordingScene {
    nodes: FxHashMap<NodeId, SceneNode>,
    next_id: u64,
    stats: SceneStats,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn release(&mut self, node: NodeId) {
        if let Some(removed) = self.nodes.remove(&node) {
            for child in removed.children {
                self.release(child);
            }
        }
    }

    /// Number of live nodes, roots included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Current state of a root container.
    pub fn root(&self, node: NodeId) -> Option<&RootDesc> {
        self.nodes.get(&node)?.root.as_ref()
    }

    /// Child handles of `parent`, back to front.
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&parent)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Child visuals of `parent`, back to front.
    pub fn children(&self, parent: NodeId) -> Vec<&Visual> {
        self.nodes
            .get(&parent)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c)?.visual.as_ref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Text of every label under `parent`, back to front.
    pub fn labels(&self, parent: NodeId) -> Vec<&str> {
        self.children(parent)
            .into_iter()
            .filter_map(Visual::as_text)
            .collect()
    }
}

impl SceneGraph for RecordingScene {
    fn create_root(&mut self, root: &RootDesc) -> NodeId {
        self.alloc(SceneNode {
            parent: None,
            children: Vec::new(),
            root: Some(root.clone()),
            visual: None,
        })
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(n) = self.nodes.get_mut(&node) {
            match (&mut n.root, &mut n.visual) {
                (Some(root), _) => root.position = position,
                (None, Some(visual)) => visual.position = position,
                (None, None) => {}
            }
        }
    }

    fn set_scale(&mut self, node: NodeId, scale: f32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            match (&mut n.root, &mut n.visual) {
                (Some(root), _) => root.scale = scale,
                (None, Some(visual)) => visual.scale = scale,
                (None, None) => {}
            }
        }
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, visual: Visual) -> NodeId {
        let child = self.alloc(SceneNode {
            parent: Some(parent),
            children: Vec::new(),
            root: None,
            visual: Some(visual),
        });
        if let Some(p) = self.nodes.get_mut(&parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        self.stats.inserted += 1;
        child
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != child);
        }
        self.release(child);
        self.stats.removed += 1;
    }

    fn destroy(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|&c| c != node);
        }
        self.release(node);
        self.stats.destroyed += 1;
    }
}

/// Texture table that knows every modifier sprite, every symbol, and an icon
/// for any specialist id, unless explicitly removed.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    native_size: Vec2,
    missing: FxHashSet<String>,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticAssets {
    pub fn new() -> Self {
        Self {
            native_size: Vec2::splat(64.0),
            missing: FxHashSet::default(),
        }
    }

    /// Removes an asset. Keys are sprite/symbol names or `specialist:<id>`.
    pub fn without(mut self, key: &str) -> Self {
        self.missing.insert(key.to_string());
        self
    }

    pub fn native_size(&self) -> Vec2 {
        self.native_size
    }

    fn handle(&self, id: u64) -> TextureHandle {
        TextureHandle {
            id,
            size: self.native_size,
        }
    }
}

impl AssetProvider for StaticAssets {
    fn specialist_icon(&self, specialist_id: u32) -> Result<TextureHandle, AssetError> {
        if self.missing.contains(&format!("specialist:{specialist_id}")) {
            return Err(AssetError::MissingSpecialist(specialist_id));
        }
        Ok(self.handle(1000 + u64::from(specialist_id)))
    }

    fn modifier_sprite(&self, sprite: ModifierSprite) -> Result<TextureHandle, AssetError> {
        if self.missing.contains(sprite.name()) {
            return Err(AssetError::MissingSprite(sprite.name()));
        }
        let index = ModifierSprite::ALL
            .iter()
            .position(|&s| s == sprite)
            .unwrap_or_default();
        Ok(self.handle(1 + index as u64))
    }

    fn symbol(&self, symbol: Symbol) -> Result<TextureHandle, AssetError> {
        if self.missing.contains(symbol.name()) {
            return Err(AssetError::MissingSymbol(symbol.name()));
        }
        Ok(self.handle(100))
    }
}

/// Monospace metrics: every glyph has the same advance per style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFontMetrics {
    pub default_glyph: Vec2,
    pub small_glyph: Vec2,
}

impl Default for FixedFontMetrics {
    fn default() -> Self {
        Self {
            default_glyph: Vec2::new(12.0, 24.0),
            small_glyph: Vec2::new(8.0, 16.0),
        }
    }
}

impl FontMetrics for FixedFontMetrics {
    fn measure(&self, text: &str, style: LabelStyle) -> Vec2 {
        let glyph = match style {
            LabelStyle::Default => self.default_glyph,
            LabelStyle::Small => self.small_glyph,
        };
        Vec2::new(glyph.x * text.chars().count() as f32, glyph.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Cursor, HitCircle};

    fn root_desc() -> RootDesc {
        RootDesc {
            position: Vec2::ZERO,
            scale: 1.0,
            hit_area: HitCircle {
                center: Vec2::ZERO,
                radius: 32.0,
            },
            cursor: Cursor::Pointer,
        }
    }

    #[test]
    fn test_insert_respects_index() {
        let mut scene = RecordingScene::new();
        let root = scene.create_root(&root_desc());
        scene.insert_child(root, 0, Visual::text("b", LabelStyle::Default));
        scene.insert_child(root, 0, Visual::text("a", LabelStyle::Default));
        scene.insert_child(root, 99, Visual::text("c", LabelStyle::Default));
        assert_eq!(scene.labels(root), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_destroy_releases_children() {
        let mut scene = RecordingScene::new();
        let root = scene.create_root(&root_desc());
        let child = scene.insert_child(root, 0, Visual::text("x", LabelStyle::Small));
        assert_eq!(scene.node_count(), 2);

        scene.destroy(root);
        assert_eq!(scene.node_count(), 0);
        assert!(!scene.is_alive(child));
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut scene = RecordingScene::new();
        let root = scene.create_root(&root_desc());
        let child = scene.insert_child(root, 0, Visual::text("x", LabelStyle::Small));
        scene.remove_child(root, child);
        assert!(scene.child_ids(root).is_empty());
        assert_eq!(scene.stats().removed, 1);
    }

    #[test]
    fn test_font_metrics_scale_with_length() {
        let fonts = FixedFontMetrics::default();
        assert_eq!(fonts.measure("#12", LabelStyle::Small), Vec2::new(24.0, 16.0));
        assert_eq!(fonts.measure("1 2 3", LabelStyle::Default), Vec2::new(60.0, 24.0));
    }

    #[test]
    fn test_static_assets_missing_entries() {
        let assets = StaticAssets::new().without("specialist:3").without("scannable");
        assert_eq!(
            assets.specialist_icon(3),
            Err(AssetError::MissingSpecialist(3))
        );
        assert!(assets.specialist_icon(4).is_ok());
        assert_eq!(
            assets.symbol(Symbol::Scannable),
            Err(AssetError::MissingSymbol("scannable"))
        );
    }
}
