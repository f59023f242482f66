//! Format abstraction layer for reading feature datasets.
//!
//! Each supported file format implements the [`FormatReader`] trait and
//! produces a [`FeatureCollection`]. Readers are synchronous: the inputs are
//! small local files read once per call, with no caching across calls.

use std::path::Path;

use crate::error::Result;
use crate::models::FeatureCollection;

pub mod geojson;
pub mod shapefile;

pub use geojson::GeoJsonReader;
pub use shapefile::ShapefileReader;

/// Format reader trait that all format implementations must implement
pub trait FormatReader {
    /// Read a feature collection from the given path
    fn read(&self, path: &Path) -> Result<FeatureCollection>;

    /// Get supported file extensions (e.g., ["shp"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name (e.g., "Shapefile", "GeoJSON")
    fn format_name(&self) -> &str;
}

/// Check if a path has a specific extension, case-insensitively
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case(ext)).unwrap_or(false)
}
