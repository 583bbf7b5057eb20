//! Headless host scene: owns the scene graph, the shared collaborators, and
//! every star, and routes pointer input to whichever star is under it.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use starmap_config::Config;
use starmap_star::headless::{FixedFontMetrics, RecordingScene, StaticAssets};
use starmap_star::{
    CreateError, PlayerTables, PointerButton, PointerEvent, RenderContext, Star, StarEvent,
    StarFactory, StarId, StarIdAllocator, StarSnapshot, SyncError, UnknownShape,
};
use tracing::{debug, info};

/// Spacing between generated stars.
const GRID_SPACING: f32 = 64.0;

/// A galaxy map with a headless renderer.
pub struct StarMap {
    scene: RecordingScene,
    assets: StaticAssets,
    fonts: FixedFontMetrics,
    factory: StarFactory,
    players: PlayerTables,
    stars: Vec<Star>,
    hovered: Option<StarId>,
    selected: Rc<RefCell<Option<StarId>>>,
}

impl StarMap {
    pub fn new(config: &Config) -> Result<Self, UnknownShape> {
        let ids = Arc::new(StarIdAllocator::new());
        Ok(Self {
            scene: RecordingScene::new(),
            assets: StaticAssets::new(),
            fonts: FixedFontMetrics::default(),
            factory: StarFactory::new(ids, config.star.clone(), config.galaxy.seed),
            players: PlayerTables::from_config(&config.galaxy)?,
            stars: Vec::new(),
            hovered: None,
            selected: Rc::new(RefCell::new(None)),
        })
    }

    fn spawn(
        &mut self,
        location: Vec2,
        snapshot: Option<&StarSnapshot>,
    ) -> Result<StarId, CreateError> {
        let mut ctx = RenderContext {
            scene: &mut self.scene,
            assets: &self.assets,
            fonts: &self.fonts,
        };
        let mut star = self
            .factory
            .create(location, snapshot, &self.players, &mut ctx)?;

        let selected = Rc::clone(&self.selected);
        star.subscribe(move |event| match event {
            StarEvent::Selected { star, pointer } => {
                info!(star = %star.id(), x = pointer.position.x, y = pointer.position.y, "star selected");
                *selected.borrow_mut() = Some(star.id());
            }
            StarEvent::HoverStart { star } | StarEvent::HoverEnd { star } => {
                debug!(star = %star.id(), event = event.name(), "hover");
            }
        });

        let id = star.id();
        self.stars.push(star);
        Ok(id)
    }

    /// Lays out `count` fresh stars on a square grid.
    pub fn generate(&mut self, count: usize) -> Result<(), CreateError> {
        let columns = (count as f32).sqrt().ceil().max(1.0) as usize;
        for i in 0..count {
            let location = Vec2::new((i % columns) as f32, (i / columns) as f32) * GRID_SPACING;
            self.spawn(location, None)?;
        }
        Ok(())
    }

    /// Hydrates one star per snapshot.
    pub fn load(&mut self, snapshots: &[StarSnapshot]) -> Result<(), CreateError> {
        for snapshot in snapshots {
            self.spawn(Vec2::ZERO, Some(snapshot))?;
        }
        Ok(())
    }

    /// Re-resolves player styles and re-syncs every star.
    pub fn update_all(&mut self) -> Result<(), SyncError> {
        let mut ctx = RenderContext {
            scene: &mut self.scene,
            assets: &self.assets,
            fonts: &self.fonts,
        };
        for star in &mut self.stars {
            star.update(&self.players, &mut ctx)?;
        }
        Ok(())
    }

    /// Topmost star under `world`; later stars draw above earlier ones.
    fn star_at(&mut self, world: Vec2) -> Option<&mut Star> {
        self.stars.iter_mut().rev().find(|s| s.hit_test(world))
    }

    fn star_mut(&mut self, id: StarId) -> Option<&mut Star> {
        self.stars.iter_mut().find(|s| s.id() == id)
    }

    /// Moves the pointer, emitting hover end/start as it crosses stars.
    pub fn pointer_moved(&mut self, world: Vec2) {
        let under = self.star_at(world).map(|s| s.id());
        if under == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take()
            && let Some(star) = self.star_mut(previous)
        {
            star.handle_pointer(&PointerEvent::leave(world));
        }
        if let Some(id) = under
            && let Some(star) = self.star_mut(id)
        {
            star.handle_pointer(&PointerEvent::enter(world));
        }
        self.hovered = under;
    }

    /// Releases a button at `world`. Returns the star that received it.
    pub fn pointer_up(&mut self, world: Vec2, button: PointerButton) -> Option<StarId> {
        let star = self.star_at(world)?;
        star.handle_pointer(&PointerEvent::up(button, world));
        Some(star.id())
    }

    /// Last star selected with the primary button.
    pub fn selected(&self) -> Option<StarId> {
        *self.selected.borrow()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn scene(&self) -> &RecordingScene {
        &self.scene
    }

    pub fn snapshots(&self) -> Vec<StarSnapshot> {
        self.stars.iter().map(Star::to_snapshot).collect()
    }

    /// Removes a star and releases its visuals.
    pub fn remove(&mut self, id: StarId) -> bool {
        let Some(index) = self.stars.iter().position(|s| s.id() == id) else {
            return false;
        };
        let star = self.stars.remove(index);
        star.destroy(&mut self.scene);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_map() -> StarMap {
        let mut config = Config::default();
        config.galaxy.seed = Some(5);
        StarMap::new(&config).unwrap()
    }

    #[test]
    fn test_generate_lays_out_grid() {
        let mut map = seeded_map();
        map.generate(5).unwrap();

        assert_eq!(map.stars().len(), 5);
        assert_eq!(map.stars()[4].state().location, Vec2::new(64.0, 64.0));
        let ids: Vec<_> = map.stars().iter().map(Star::id).collect();
        assert_eq!(ids, (0..5).map(StarId).collect::<Vec<_>>());
    }

    #[test]
    fn test_click_selects_star_under_pointer() {
        let mut map = seeded_map();
        map.generate(4).unwrap();

        assert_eq!(map.pointer_up(Vec2::new(65.0, 1.0), PointerButton::Primary), Some(StarId(1)));
        assert_eq!(map.selected(), Some(StarId(1)));
        assert_eq!(map.pointer_up(Vec2::new(32.0, 32.0), PointerButton::Primary), None);
    }

    #[test]
    fn test_secondary_click_does_not_select() {
        let mut map = seeded_map();
        map.generate(1).unwrap();

        assert_eq!(map.pointer_up(Vec2::ZERO, PointerButton::Secondary), Some(StarId(0)));
        assert_eq!(map.selected(), None);
    }

    #[test]
    fn test_hover_tracks_pointer() {
        let mut map = seeded_map();
        map.generate(2).unwrap();

        map.pointer_moved(Vec2::ZERO);
        assert_eq!(map.hovered, Some(StarId(0)));
        map.pointer_moved(Vec2::new(64.0, 0.0));
        assert_eq!(map.hovered, Some(StarId(1)));
        map.pointer_moved(Vec2::new(30.0, 30.0));
        assert_eq!(map.hovered, None);
    }

    #[test]
    fn test_loaded_galaxy_continues_ids() {
        let mut map = seeded_map();
        let snapshots = StarSnapshot::list_from_json(
            r#"[{"id":3,"location":{"x":0,"y":0},"homeStar":true,"playerId":0},
                {"id":7,"location":{"x":64,"y":0},"isNebula":true}]"#,
        )
        .unwrap();
        map.load(&snapshots).unwrap();
        map.generate(1).unwrap();

        assert_eq!(map.stars()[2].id(), StarId(8));
        let saved = map.snapshots();
        assert_eq!(saved[0].player_id, Some(0));
        assert!(saved[0].home_star);
        assert!(saved[1].is_nebula);
        assert_eq!(saved[1].location.x, 64.0);
    }

    #[test]
    fn test_exhausted_ids_stop_generation() {
        let mut map = seeded_map();
        let snapshots =
            StarSnapshot::list_from_json(r#"[{"id":4294967295,"location":{"x":0,"y":0}}]"#)
                .unwrap();
        map.load(&snapshots).unwrap();

        assert!(matches!(map.generate(1), Err(CreateError::Ids(_))));
        assert_eq!(map.stars().len(), 1);
    }

    #[test]
    fn test_remove_releases_visuals() {
        let mut map = seeded_map();
        map.generate(2).unwrap();
        let before = map.scene().node_count();

        assert!(map.remove(StarId(0)));
        assert!(!map.remove(StarId(0)));
        assert!(map.scene().node_count() < before);
        assert_eq!(map.scene().stats().destroyed, 1);
        assert_eq!(map.stars().len(), 1);
    }

    #[test]
    fn test_update_all_resyncs() {
        let mut map = seeded_map();
        map.generate(3).unwrap();
        map.update_all().unwrap();
        assert_eq!(map.scene().node_count(), 3 * 5);
    }
}
