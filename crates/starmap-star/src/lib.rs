//! Galaxy-map star: attributes, snapshot persistence, and the synchronization
//! of those attributes into a composite scene-graph representation.
//!
//! A [`Star`] owns one root container in the host's [`SceneGraph`] and mounts
//! one child per visible [`FacetKind`]. Every [`Star::sync`] re-describes all
//! facets from the current [`StarState`] and hands them to the reconciler.
//! Pointer input forwarded by the host comes back out as [`StarEvent`]s.

mod assets;
mod error;
mod events;
mod facets;
pub mod headless;
mod ids;
mod player;
mod scene;
mod snapshot;
mod star;
mod state;
mod sync;

pub use assets::{
    AssetError, AssetProvider, FontMetrics, LabelStyle, ModifierSprite, Symbol, TextureHandle,
};
pub use error::{CreateError, SyncError};
pub use events::{
    EventHub, PointerButton, PointerEvent, PointerKind, StarEvent, SubscriptionId,
};
pub use facets::{FacetContext, FacetKind, describe, pulsar_rotation};
pub use ids::{IdsExhausted, StarId, StarIdAllocator};
pub use player::{PALETTE_SIZE, PlayerShape, PlayerStyle, PlayerTables, UnknownShape};
pub use scene::{
    Colour, Cursor, HitCircle, NodeId, Path, RootDesc, SceneGraph, Shape, Stroke, Visual,
    VisualContent,
};
pub use snapshot::{Location, SnapshotError, StarSnapshot};
pub use star::{RenderContext, Star, StarFactory, StateMut};
pub use state::{MAX_NATURAL_RESOURCES, Resources, StarState};
pub use sync::SyncReport;
