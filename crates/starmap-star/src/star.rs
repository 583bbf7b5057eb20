//! The star entity: state, visual root, mounted facets, and listeners.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starmap_config::StarConfig;
use tracing::{debug, warn};

use crate::assets::{AssetProvider, FontMetrics};
use crate::error::{CreateError, SyncError};
use crate::events::{EventHub, PointerEvent, StarEvent, SubscriptionId};
use crate::facets::{self, FacetContext, FacetKind};
use crate::ids::{StarId, StarIdAllocator};
use crate::player::{PlayerStyle, PlayerTables};
use crate::scene::{Cursor, HitCircle, NodeId, RootDesc, SceneGraph, Visual};
use crate::snapshot::StarSnapshot;
use crate::state::StarState;
use crate::sync::{FacetSlots, SyncReport};

/// The external collaborators a star draws through.
pub struct RenderContext<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub assets: &'a dyn AssetProvider,
    pub fonts: &'a dyn FontMetrics,
}

/// Creates stars, fresh or hydrated, sharing one id allocator.
#[derive(Debug)]
pub struct StarFactory {
    ids: Arc<StarIdAllocator>,
    rng: ChaCha8Rng,
    config: StarConfig,
}

impl StarFactory {
    /// `seed` makes resource rolls and pulsar rotations reproducible.
    pub fn new(ids: Arc<StarIdAllocator>, config: StarConfig, seed: Option<u64>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
        Self { ids, rng, config }
    }

    pub fn ids(&self) -> &Arc<StarIdAllocator> {
        &self.ids
    }

    /// Creates a star and performs its first sync.
    ///
    /// With a snapshot, every persisted field (location included) comes from
    /// it and the allocator is advanced past its id. Without one, the star
    /// gets the next id, rolled resources, and default flags at `location`.
    /// Fails without touching the scene once the id space is exhausted.
    pub fn create(
        &mut self,
        location: Vec2,
        snapshot: Option<&StarSnapshot>,
        players: &PlayerTables,
        ctx: &mut RenderContext<'_>,
    ) -> Result<Star, CreateError> {
        let state = match snapshot {
            Some(snapshot) => {
                self.ids.reserve(snapshot.id);
                snapshot.hydrate(&mut self.rng)
            }
            None => StarState::fresh(self.ids.allocate()?, location, &mut self.rng),
        };

        let scale = root_scale(&self.config, &state);
        let root = ctx.scene.create_root(&RootDesc {
            position: state.location,
            scale,
            hit_area: HitCircle {
                center: Vec2::ZERO,
                radius: self.config.hit_radius,
            },
            cursor: Cursor::Pointer,
        });

        let mut star = Star {
            state,
            player: None,
            root,
            facets: FacetSlots::default(),
            events: EventHub::default(),
            rng: ChaCha8Rng::seed_from_u64(self.rng.random()),
            config: self.config.clone(),
        };
        star.resolve_player(players);

        if let Err(err) = star.sync(ctx) {
            star.destroy(&mut *ctx.scene);
            return Err(err.into());
        }

        debug!(star = %star.id(), hydrated = snapshot.is_some(), "star created");
        Ok(star)
    }
}

fn root_scale(config: &StarConfig, state: &StarState) -> f32 {
    if state.home_star {
        config.base_scale * config.home_star_scale
    } else {
        config.base_scale
    }
}

/// A star on the galaxy map.
///
/// Attribute changes go through [`state_mut`](Self::state_mut) and become
/// visible on the next [`sync`](Self::sync) or [`update`](Self::update).
#[derive(Debug)]
pub struct Star {
    state: StarState,
    player: Option<PlayerStyle>,
    root: NodeId,
    facets: FacetSlots,
    events: EventHub,
    rng: ChaCha8Rng,
    config: StarConfig,
}

impl Star {
    pub fn id(&self) -> StarId {
        self.state.id
    }

    pub fn state(&self) -> &StarState {
        &self.state
    }

    /// Mutable attributes. The id cannot be changed through this handle.
    pub fn state_mut(&mut self) -> StateMut<'_> {
        let id = self.state.id;
        StateMut {
            state: &mut self.state,
            original_id: id,
        }
    }

    /// Resolved owner style, if the star is owned and the tables covered it.
    pub fn player(&self) -> Option<&PlayerStyle> {
        self.player.as_ref()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_scale(&self) -> f32 {
        root_scale(&self.config, &self.state)
    }

    fn resolve_player(&mut self, players: &PlayerTables) {
        self.player = self.state.player_id.and_then(|player_id| {
            let style = players.resolve(player_id);
            if style.is_none() {
                warn!(star = %self.state.id, player_id, "no colour/shape for player");
            }
            style
        });
    }

    /// Re-resolves the owner style from fresh tables, then syncs.
    pub fn update(
        &mut self,
        players: &PlayerTables,
        ctx: &mut RenderContext<'_>,
    ) -> Result<SyncReport, SyncError> {
        self.resolve_player(players);
        self.sync(ctx)
    }

    /// Rebuilds the visual representation from the current state.
    ///
    /// Every facet is described before the scene is touched, so a failing
    /// texture lookup leaves the previous visuals mounted.
    pub fn sync(&mut self, ctx: &mut RenderContext<'_>) -> Result<SyncReport, SyncError> {
        let pulsar_rotation = if self.state.is_pulsar {
            facets::pulsar_rotation(self.rng.random())
        } else {
            0.0
        };
        let facet_ctx = FacetContext {
            state: &self.state,
            player: self.player.as_ref(),
            assets: ctx.assets,
            fonts: ctx.fonts,
            pulsar_rotation,
        };

        let mut next: [Option<Visual>; FacetKind::COUNT] = Default::default();
        for kind in FacetKind::ALL {
            next[kind.index()] = facets::describe(kind, &facet_ctx)
                .map_err(|source| SyncError { facet: kind, source })?;
        }

        ctx.scene.set_scale(self.root, self.root_scale());
        let report = self
            .facets
            .apply(&mut *ctx.scene, self.root, next, self.config.sync_mode);
        debug!(
            star = %self.state.id,
            built = report.built,
            removed = report.removed,
            kept = report.kept,
            "star synced"
        );
        Ok(report)
    }

    /// Reapplies `location` to the root container.
    pub fn update_position(&self, scene: &mut dyn SceneGraph) {
        scene.set_position(self.root, self.state.location);
    }

    pub fn is_facet_visible(&self, kind: FacetKind) -> bool {
        self.facets.is_mounted(kind)
    }

    /// The visual currently mounted for `kind`.
    pub fn facet(&self, kind: FacetKind) -> Option<&Visual> {
        self.facets.visual(kind)
    }

    /// Scene node currently displaying `kind`.
    pub fn facet_node(&self, kind: FacetKind) -> Option<NodeId> {
        self.facets.node(kind)
    }

    /// Mounted facets in draw order.
    pub fn visible_facets(&self) -> Vec<FacetKind> {
        FacetKind::ALL
            .into_iter()
            .filter(|&kind| self.facets.is_mounted(kind))
            .collect()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StarEvent<'_>) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Whether `world` falls inside the root's hit region.
    pub fn hit_test(&self, world: Vec2) -> bool {
        let local = (world - self.state.location) / self.root_scale();
        HitCircle {
            center: Vec2::ZERO,
            radius: self.config.hit_radius,
        }
        .contains(local)
    }

    /// Forwards a pointer event that landed on this star to its listeners.
    /// Returns whether an event was emitted.
    pub fn handle_pointer(&mut self, pointer: &PointerEvent) -> bool {
        match StarEvent::from_pointer(&self.state, pointer) {
            Some(event) => {
                self.events.emit(&event);
                true
            }
            None => false,
        }
    }

    pub fn to_snapshot(&self) -> StarSnapshot {
        StarSnapshot::capture(&self.state)
    }

    /// Releases the root container and every facet with it.
    pub fn destroy(mut self, scene: &mut dyn SceneGraph) {
        self.facets.clear();
        scene.destroy(self.root);
        debug!(star = %self.state.id, "star destroyed");
    }
}

/// Write access to a star's attributes, returned by [`Star::state_mut`].
///
/// The id is put back on drop, so even replacing the whole state keeps the
/// allocator's guarantee that ids are unique.
pub struct StateMut<'a> {
    state: &'a mut StarState,
    original_id: StarId,
}

impl Deref for StateMut<'_> {
    type Target = StarState;

    fn deref(&self) -> &StarState {
        self.state
    }
}

impl DerefMut for StateMut<'_> {
    fn deref_mut(&mut self) -> &mut StarState {
        self.state
    }
}

impl Drop for StateMut<'_> {
    fn drop(&mut self) {
        if self.state.id != self.original_id {
            warn!(star = %self.original_id, attempted = %self.state.id, "star id is immutable");
            self.state.id = self.original_id;
        }
    }
}
