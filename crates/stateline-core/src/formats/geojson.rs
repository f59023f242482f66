//! GeoJSON format reader implementation

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, StatelineError};
use crate::formats::FormatReader;
use crate::models::{Crs, Feature, FeatureCollection, Geometry};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl FormatReader for GeoJsonReader {
    fn read(&self, path: &Path) -> Result<FeatureCollection> {
        let content = fs::read_to_string(path).map_err(StatelineError::Io)?;

        let geojson: geojson::GeoJson = content.parse().map_err(|e| StatelineError::Format {
            format: "GeoJSON".to_string(),
            message: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let (features, crs) = extract_features_and_crs(&geojson)?;

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();

        Ok(FeatureCollection { name, crs, features })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

/// Extract features and CRS from a parsed GeoJSON document.
///
/// Modern GeoJSON is always WGS 84; the legacy `crs` foreign member is still
/// honored when present because reference datasets exported from GIS tools
/// commonly carry it.
fn extract_features_and_crs(geojson: &geojson::GeoJson) -> Result<(Vec<Feature>, Crs)> {
    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let features =
                fc.features.iter().map(convert_feature).collect::<Result<Vec<Feature>>>()?;

            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .map(Crs::from_epsg)
                .unwrap_or_default();

            Ok((features, crs))
        }
        geojson::GeoJson::Feature(feature) => Ok((vec![convert_feature(feature)?], Crs::wgs84())),
        geojson::GeoJson::Geometry(geom) => {
            let feature = Feature {
                geometry: Some(convert_geometry(geom)?),
                properties: HashMap::new(),
            };
            Ok((vec![feature], Crs::wgs84()))
        }
    }
}

/// Convert a GeoJSON feature to the canonical Feature model
fn convert_feature(feature: &geojson::Feature) -> Result<Feature> {
    let geometry = feature.geometry.as_ref().map(convert_geometry).transpose()?;

    let properties = feature
        .properties
        .as_ref()
        .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    Ok(Feature { geometry, properties })
}

/// Convert a geojson geometry to the canonical Geometry enum.
///
/// Both sides share the GeoJSON object layout, so the conversion goes
/// through the serde representation. Coordinates with extra dimensions or
/// GeometryCollection values do not fit the canonical enum and are rejected.
fn convert_geometry(geom: &geojson::Geometry) -> Result<Geometry> {
    let value = serde_json::to_value(geom)
        .map_err(|e| StatelineError::Serialization(format!("Failed to serialize geometry: {}", e)))?;

    Geometry::from_geojson(&value).ok_or_else(|| StatelineError::Format {
        format: "GeoJSON".to_string(),
        message: format!("Unsupported geometry: {}", value["type"].as_str().unwrap_or("unknown")),
    })
}

/// Extract EPSG code from a legacy CRS object
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    // Parse "EPSG:4326" or "urn:ogc:def:crs:EPSG::4326" from properties.name
    crs.get("properties")
        .and_then(|props| props.get("name"))
        .and_then(|name| name.as_str())
        .and_then(|name_str| name_str.split(':').next_back())
        .and_then(|epsg_str| epsg_str.parse().ok())
}
