//! CRS transformation and normalization

use proj::Proj;
use stateline_core::error::{Result, StatelineError};
use stateline_core::models::{Crs, Feature, FeatureCollection, Geometry};

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Reproject a geometry from one CRS to another.
///
/// Identity (a clone) when the CRS already match; otherwise every coordinate
/// goes through a PROJ transformation between the two EPSG definitions.
pub fn reproject_geometry(geometry: &Geometry, from: &Crs, to: &Crs) -> Result<Geometry> {
    if crs_match(from, to) {
        return Ok(geometry.clone());
    }

    let proj = projection(from, to)?;
    map_coords(geometry, &mut |coord| convert(&proj, coord, from, to))
}

/// Reproject every feature of a collection into the target CRS.
///
/// Returns a new collection; the input is untouched. Features without
/// geometry pass through unchanged.
pub fn reproject_features(collection: &FeatureCollection, target: &Crs) -> Result<FeatureCollection> {
    if crs_match(&collection.crs, target) {
        return Ok(collection.clone());
    }

    let proj = projection(&collection.crs, target)?;

    let features = collection
        .features
        .iter()
        .map(|feature| {
            let geometry = feature
                .geometry
                .as_ref()
                .map(|g| map_coords(g, &mut |coord| convert(&proj, coord, &collection.crs, target)))
                .transpose()?;
            Ok(Feature { geometry, properties: feature.properties.clone() })
        })
        .collect::<Result<Vec<Feature>>>()?;

    Ok(FeatureCollection { name: collection.name.clone(), crs: target.clone(), features })
}

fn projection(from: &Crs, to: &Crs) -> Result<Proj> {
    let from_def = format!("EPSG:{}", from.epsg);
    let to_def = format!("EPSG:{}", to.epsg);

    Proj::new_known_crs(&from_def, &to_def, None).map_err(|e| StatelineError::Projection {
        from: from.epsg,
        to: to.epsg,
        message: format!("Failed to create projection: {}", e),
    })
}

fn convert(proj: &Proj, coord: [f64; 2], from: &Crs, to: &Crs) -> Result<[f64; 2]> {
    proj.convert((coord[0], coord[1])).map(|(x, y)| [x, y]).map_err(|e| {
        StatelineError::Projection {
            from: from.epsg,
            to: to.epsg,
            message: format!("Projection failed: {}", e),
        }
    })
}

/// Rebuild a geometry with every coordinate mapped through `f`
fn map_coords<F>(geometry: &Geometry, f: &mut F) -> Result<Geometry>
where
    F: FnMut([f64; 2]) -> Result<[f64; 2]>,
{
    let mapped = match geometry {
        Geometry::Point { coordinates } => Geometry::Point { coordinates: f(*coordinates)? },
        Geometry::LineString { coordinates } => {
            Geometry::LineString { coordinates: map_line(coordinates, f)? }
        }
        Geometry::Polygon { coordinates } => {
            Geometry::Polygon { coordinates: map_rings(coordinates, f)? }
        }
        Geometry::MultiPoint { coordinates } => {
            Geometry::MultiPoint { coordinates: map_line(coordinates, f)? }
        }
        Geometry::MultiLineString { coordinates } => {
            Geometry::MultiLineString { coordinates: map_rings(coordinates, f)? }
        }
        Geometry::MultiPolygon { coordinates } => {
            let mut polygons = Vec::with_capacity(coordinates.len());
            for rings in coordinates {
                polygons.push(map_rings(rings, f)?);
            }
            Geometry::MultiPolygon { coordinates: polygons }
        }
    };

    Ok(mapped)
}

fn map_line<F>(coords: &[[f64; 2]], f: &mut F) -> Result<Vec<[f64; 2]>>
where
    F: FnMut([f64; 2]) -> Result<[f64; 2]>,
{
    let mut mapped = Vec::with_capacity(coords.len());
    for coord in coords {
        mapped.push(f(*coord)?);
    }
    Ok(mapped)
}

fn map_rings<F>(rings: &[Vec<[f64; 2]>], f: &mut F) -> Result<Vec<Vec<[f64; 2]>>>
where
    F: FnMut([f64; 2]) -> Result<[f64; 2]>,
{
    let mut mapped = Vec::with_capacity(rings.len());
    for ring in rings {
        mapped.push(map_line(ring, f)?);
    }
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_match() {
        assert!(crs_match(&Crs::wgs84(), &Crs::from_epsg(4326)));
        assert!(!crs_match(&Crs::wgs84(), &Crs::web_mercator()));
    }

    #[test]
    fn test_reproject_identity_when_crs_match() {
        let geom = Geometry::point(-100.0, 40.0);
        let out = reproject_geometry(&geom, &Crs::wgs84(), &Crs::wgs84()).unwrap();
        assert_eq!(geom, out);
    }

    #[test]
    fn test_reproject_wgs84_to_web_mercator() {
        let geom = Geometry::point(1.0, 0.0);
        let out = reproject_geometry(&geom, &Crs::wgs84(), &Crs::web_mercator()).unwrap();

        // One degree of longitude at the equator is ~111.32 km in Web Mercator
        if let Geometry::Point { coordinates } = out {
            assert!((coordinates[0] - 111_319.49).abs() < 1.0, "x was {}", coordinates[0]);
            assert!(coordinates[1].abs() < 1e-6, "y was {}", coordinates[1]);
        } else {
            panic!("Expected Point geometry");
        }
    }

    #[test]
    fn test_reproject_roundtrip() {
        let geom = Geometry::polygon(vec![vec![
            [-122.4, 37.7],
            [-122.3, 37.7],
            [-122.3, 37.8],
            [-122.4, 37.7],
        ]]);

        let there = reproject_geometry(&geom, &Crs::wgs84(), &Crs::web_mercator()).unwrap();
        let back = reproject_geometry(&there, &Crs::web_mercator(), &Crs::wgs84()).unwrap();

        if let (Geometry::Polygon { coordinates: orig }, Geometry::Polygon { coordinates: rt }) =
            (&geom, &back)
        {
            for (a, b) in orig[0].iter().zip(rt[0].iter()) {
                assert!((a[0] - b[0]).abs() < 1e-6);
                assert!((a[1] - b[1]).abs() < 1e-6);
            }
        } else {
            panic!("Expected Polygon geometry");
        }
    }

    #[test]
    fn test_reproject_features_preserves_attributes_and_skips_empty() {
        let mut collection = FeatureCollection::named("urban", Crs::wgs84());
        collection
            .features
            .push(Feature::new(Geometry::point(0.0, 0.0)).with_property("NAME", "origin"));
        collection.features.push(Feature { geometry: None, properties: Default::default() });

        let out = reproject_features(&collection, &Crs::web_mercator()).unwrap();

        assert_eq!(out.crs, Crs::web_mercator());
        assert_eq!(out.len(), 2);
        assert_eq!(out.features[0].property_str("NAME"), Some("origin"));
        assert!(out.features[1].geometry.is_none());
        // Input CRS is untouched
        assert_eq!(collection.crs, Crs::wgs84());
    }
}
