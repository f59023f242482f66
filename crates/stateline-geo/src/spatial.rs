//! Intersects predicate and the feature/boundary spatial join.

use geo::algorithm::intersects::Intersects;
use stateline_core::error::Result;
use stateline_core::models::{to_geo_geometry, FeatureCollection, Geometry};

use crate::index::BoundaryIndex;
use crate::transform::reproject_features;

/// Check if two geometries share at least one point
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    to_geo_geometry(a).intersects(&to_geo_geometry(b))
}

/// Inner spatial join with the intersects predicate.
///
/// The feature collection's CRS is authoritative: boundaries are reprojected
/// into it before the join, so output geometry is identical to input
/// geometry. Each input feature is retained at most once, in input order,
/// however many boundaries it intersects; output features carry only their
/// original attributes — nothing from the boundary side is attached.
///
/// An empty boundary selection yields an empty collection, not an error.
pub fn spatial_join_intersects(
    features: &FeatureCollection,
    boundaries: &FeatureCollection,
) -> Result<FeatureCollection> {
    let mut result = FeatureCollection::named(features.name.clone(), features.crs.clone());

    if boundaries.is_empty() {
        return Ok(result);
    }

    let boundaries = reproject_features(boundaries, &features.crs)?;
    let index = BoundaryIndex::from_collection(&boundaries);

    for feature in &features.features {
        let geometry = match &feature.geometry {
            Some(geometry) => to_geo_geometry(geometry),
            None => continue,
        };

        if !index.intersecting(&geometry).is_empty() {
            result.features.push(feature.clone());
        }
    }

    tracing::debug!(
        "Spatial join kept {} of {} features against {} boundaries",
        result.len(),
        features.len(),
        boundaries.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stateline_core::models::{Crs, Feature};

    fn square(origin: f64, size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [origin, origin],
            [origin + size, origin],
            [origin + size, origin + size],
            [origin, origin + size],
            [origin, origin],
        ]])
    }

    fn features() -> FeatureCollection {
        let mut collection = FeatureCollection::named("urban", Crs::wgs84());
        collection
            .features
            .push(Feature::new(Geometry::point(5.0, 5.0)).with_property("NAME", "inside-first"));
        collection
            .features
            .push(Feature::new(Geometry::point(25.0, 25.0)).with_property("NAME", "inside-second"));
        collection
            .features
            .push(Feature::new(Geometry::point(50.0, 50.0)).with_property("NAME", "outside"));
        collection.features.push(
            Feature::new(Geometry::line_string(vec![[5.0, 5.0], [25.0, 25.0]]))
                .with_property("NAME", "spanning"),
        );
        collection
    }

    fn boundaries() -> FeatureCollection {
        let mut collection = FeatureCollection::new(Crs::wgs84());
        collection.features.push(Feature::new(square(0.0, 10.0)).with_property("STUSPS", "AA"));
        collection.features.push(Feature::new(square(20.0, 10.0)).with_property("STUSPS", "BB"));
        collection
    }

    #[test]
    fn test_intersects_predicate() {
        assert!(intersects(&square(0.0, 10.0), &square(5.0, 10.0)));
        assert!(!intersects(&square(0.0, 1.0), &square(5.0, 1.0)));
        assert!(intersects(&Geometry::point(5.0, 5.0), &square(0.0, 10.0)));
    }

    #[test]
    fn test_join_keeps_intersecting_features_once() {
        let joined = spatial_join_intersects(&features(), &boundaries()).unwrap();

        let names: Vec<&str> = joined.features.iter().filter_map(|f| f.property_str("NAME")).collect();
        // "spanning" intersects both boundaries but appears once
        assert_eq!(names, vec!["inside-first", "inside-second", "spanning"]);
    }

    #[test]
    fn test_join_against_empty_boundaries_is_empty() {
        let joined =
            spatial_join_intersects(&features(), &FeatureCollection::new(Crs::wgs84())).unwrap();

        assert!(joined.is_empty());
        assert_eq!(joined.crs, Crs::wgs84());
    }

    #[test]
    fn test_join_does_not_attach_boundary_attributes() {
        let joined = spatial_join_intersects(&features(), &boundaries()).unwrap();

        for feature in &joined.features {
            assert!(feature.properties.contains_key("NAME"));
            assert!(
                !feature.properties.contains_key("STUSPS"),
                "Boundary attributes must not leak into the output"
            );
        }
    }

    #[test]
    fn test_join_is_idempotent() {
        let once = spatial_join_intersects(&features(), &boundaries()).unwrap();
        let twice = spatial_join_intersects(&once, &boundaries()).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_join_skips_features_without_geometry() {
        let mut collection = features();
        collection.features.push(Feature { geometry: None, properties: Default::default() });

        let joined = spatial_join_intersects(&collection, &boundaries()).unwrap();

        assert_eq!(joined.len(), 3);
    }

    #[test]
    fn test_join_preserves_feature_crs() {
        let mut mercator_features = FeatureCollection::new(Crs::web_mercator());
        // Roughly (5, 5) degrees in Web Mercator meters, inside the first
        // square once the boundaries are reprojected to match
        mercator_features
            .features
            .push(Feature::new(Geometry::point(556_597.45, 557_305.26)));

        let joined = spatial_join_intersects(&mercator_features, &boundaries()).unwrap();

        assert_eq!(joined.crs, Crs::web_mercator());
        assert_eq!(joined.len(), 1);
        // Geometry comes back bit-for-bit: the features were never reprojected
        assert_eq!(joined.features[0], mercator_features.features[0]);
    }
}
