//! R-tree index over boundary geometries.
//!
//! The spatial join checks every feature against every boundary; the index
//! cuts that to the boundaries whose bounding box overlaps the feature
//! before the exact intersects test runs.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use geo::Geometry as GeoGeometry;
use rstar::{RTree, RTreeObject, AABB};
use stateline_core::models::{to_geo_geometry, FeatureCollection};

/// A boundary geometry tagged with its position in the source collection
#[derive(Debug, Clone)]
struct IndexedBoundary {
    idx: usize,
    geometry: GeoGeometry,
    envelope: AABB<[f64; 2]>,
}

impl IndexedBoundary {
    fn new(idx: usize, geometry: GeoGeometry) -> Option<Self> {
        // Geometries with no extent (empty linestrings, empty polygons)
        // cannot participate in the join
        let rect = geometry.bounding_rect()?;
        let envelope = AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        );
        Some(Self { idx, geometry, envelope })
    }
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over the boundaries of one collection
pub struct BoundaryIndex {
    tree: RTree<IndexedBoundary>,
}

impl BoundaryIndex {
    /// Build an index from a boundary collection. Features without geometry
    /// (or with empty geometry) are skipped.
    pub fn from_collection(boundaries: &FeatureCollection) -> Self {
        let indexed: Vec<IndexedBoundary> = boundaries
            .features
            .iter()
            .enumerate()
            .filter_map(|(idx, feature)| {
                let geometry = feature.geometry.as_ref()?;
                IndexedBoundary::new(idx, to_geo_geometry(geometry))
            })
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Indices of boundaries whose geometry intersects the query geometry,
    /// in ascending order. Envelope overlap prefilters; the exact predicate
    /// decides.
    pub fn intersecting(&self, query: &GeoGeometry) -> Vec<usize> {
        let rect = match query.bounding_rect() {
            Some(rect) => rect,
            None => return Vec::new(),
        };

        let envelope =
            AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut matches: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|boundary| query.intersects(&boundary.geometry))
            .map(|boundary| boundary.idx)
            .collect();

        matches.sort_unstable();
        matches
    }

    /// Number of indexed boundaries
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
