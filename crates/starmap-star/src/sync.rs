//! Facet reconciliation against the scene graph.
//!
//! [`FacetSlots`] remembers which node currently displays each facet. A sync
//! pass hands it the freshly described visual for every facet in draw order;
//! in [`SyncMode::Rebuild`] every mounted facet is torn down and rebuilt, in
//! [`SyncMode::Reconcile`] facets whose descriptor is unchanged keep their node.
//! Both modes leave the root with the same child sequence.

use starmap_config::SyncMode;
use tracing::trace;

use crate::facets::FacetKind;
use crate::scene::{NodeId, SceneGraph, Visual};

#[derive(Debug, Clone)]
struct Mounted {
    node: NodeId,
    visual: Visual,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Facets newly inserted into the scene.
    pub built: usize,
    /// Facets removed from the scene.
    pub removed: usize,
    /// Facets whose existing node was kept.
    pub kept: usize,
}

/// Per-facet mounted nodes under one root.
#[derive(Debug, Default)]
pub(crate) struct FacetSlots {
    slots: [Option<Mounted>; FacetKind::COUNT],
}

impl FacetSlots {
    /// Child index `kind` occupies when mounted: the number of mounted facets
    /// that draw behind it.
    fn z_index(&self, kind: FacetKind) -> usize {
        self.slots[..kind.index()]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Brings every facet in line with `next`, indexed by draw order.
    pub fn apply(
        &mut self,
        scene: &mut dyn SceneGraph,
        root: NodeId,
        next: [Option<Visual>; FacetKind::COUNT],
        mode: SyncMode,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for (kind, visual) in FacetKind::ALL.into_iter().zip(next) {
            let slot = kind.index();

            if mode == SyncMode::Reconcile
                && let (Some(mounted), Some(visual)) = (&self.slots[slot], &visual)
                && mounted.visual == *visual
            {
                report.kept += 1;
                continue;
            }

            if let Some(old) = self.slots[slot].take() {
                scene.remove_child(root, old.node);
                report.removed += 1;
            }

            if let Some(visual) = visual {
                let index = self.z_index(kind);
                let node = scene.insert_child(root, index, visual.clone());
                trace!(facet = ?kind, index, "facet built");
                self.slots[slot] = Some(Mounted { node, visual });
                report.built += 1;
            }
        }

        report
    }

    pub fn is_mounted(&self, kind: FacetKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn node(&self, kind: FacetKind) -> Option<NodeId> {
        self.slots[kind.index()].as_ref().map(|m| m.node)
    }

    pub fn visual(&self, kind: FacetKind) -> Option<&Visual> {
        self.slots[kind.index()].as_ref().map(|m| &m.visual)
    }

    /// Forgets every mounted facet. The nodes themselves are released with
    /// the root.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}
