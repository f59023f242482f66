//! Stateline Geo - CRS transformation, spatial predicates, and state filtering
//!
//! This crate holds the computational half of the workspace: reprojection,
//! the intersects spatial join, and the `filter_by_states` entry points that
//! combine the boundary reference dataset with a caller-supplied feature
//! collection.

pub mod filter;
pub mod index;
pub mod spatial;
pub mod transform;

pub use filter::{
    filter_by_boundaries, filter_by_states, filter_by_states_at, STATE_BOUNDARY_PATH,
    STATE_POSTAL_FIELD,
};
pub use spatial::{intersects, spatial_join_intersects};
pub use transform::{crs_match, reproject_features, reproject_geometry};
