pub mod feature;
pub mod geometry;

pub use feature::{Feature, FeatureCollection};
pub use geometry::{from_geo_geometry, to_geo_geometry, Crs, Geometry};
