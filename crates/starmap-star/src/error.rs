//! Star error types.

use thiserror::Error;

use crate::assets::AssetError;
use crate::facets::FacetKind;
use crate::ids::IdsExhausted;

/// A facet could not be built during a sync pass. The star's attributes are
/// untouched and its previously mounted visuals stay in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to build {facet:?} facet: {source}")]
pub struct SyncError {
    pub facet: FacetKind,
    #[source]
    pub source: AssetError,
}

/// A star could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Ids(#[from] IdsExhausted),

    /// The initial sync failed; the root created for the star was released.
    #[error(transparent)]
    Sync(#[from] SyncError),
}
