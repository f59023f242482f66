//! Shapefile format reader implementation
//!
//! Reads ESRI Shapefiles using pure Rust. Shapefiles consist of multiple
//! component files (.shp, .shx, .dbf, .prj) that must all be present for
//! proper reading; the optional .prj sidecar carries the CRS.

use shapefile::dbase::FieldValue as DbaseFieldValue;
use shapefile::{PolygonRing, Reader as ShpReader, Shape};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatelineError};
use crate::formats::{has_extension, FormatReader};
use crate::models::{Crs, Feature, FeatureCollection, Geometry};

/// Shapefile format reader
pub struct ShapefileReader;

impl FormatReader for ShapefileReader {
    fn read(&self, path: &Path) -> Result<FeatureCollection> {
        self.verify_components(path)?;

        let mut reader = ShpReader::from_path(path).map_err(|e| StatelineError::Format {
            format: "Shapefile".to_string(),
            message: format!("Failed to open shapefile: {}", e),
        })?;

        let crs = self.extract_crs(path)?;
        let features = self.read_features(&mut reader)?;

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();

        Ok(FeatureCollection { name, crs, features })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

impl ShapefileReader {
    /// Get the base path for a shapefile (without extension)
    fn shapefile_base(&self, path: &Path) -> Result<PathBuf> {
        if !has_extension(path, "shp") {
            return Err(StatelineError::InvalidPath {
                path: path.to_path_buf(),
                reason: "Not a shapefile (.shp)".to_string(),
            });
        }

        Ok(path.with_extension(""))
    }

    /// Verify that all required shapefile component files exist
    fn verify_components(&self, path: &Path) -> Result<()> {
        let base = self.shapefile_base(path)?;
        let mut missing = Vec::new();

        for ext in ["shp", "shx", "dbf"] {
            let component_path = base.with_extension(ext);
            if !component_path.exists() {
                missing.push(format!(".{}", ext));
            }
        }

        if !missing.is_empty() {
            return Err(StatelineError::Format {
                format: "Shapefile".to_string(),
                message: format!("Missing required component files: {}", missing.join(", ")),
            });
        }

        Ok(())
    }

    /// Extract the CRS from the .prj sidecar, defaulting to EPSG:4326
    fn extract_crs(&self, path: &Path) -> Result<Crs> {
        let base = self.shapefile_base(path)?;
        let prj_path = base.with_extension("prj");

        if !prj_path.exists() {
            tracing::warn!("No .prj sidecar for {}, assuming EPSG:4326", path.display());
            return Ok(Crs::wgs84());
        }

        let prj_content = fs::read_to_string(&prj_path).map_err(|e| StatelineError::Format {
            format: "Shapefile".to_string(),
            message: format!("Failed to read .prj file: {}", e),
        })?;

        match parse_epsg_from_wkt(&prj_content) {
            Some(epsg) => Ok(Crs::from_epsg(epsg)),
            None => {
                tracing::warn!(
                    "Could not resolve an EPSG code from {}, assuming EPSG:4326",
                    prj_path.display()
                );
                Ok(Crs::wgs84())
            }
        }
    }

    /// Read all features from the shapefile
    fn read_features(
        &self,
        reader: &mut shapefile::Reader<
            std::io::BufReader<fs::File>,
            std::io::BufReader<fs::File>,
        >,
    ) -> Result<Vec<Feature>> {
        let mut features = Vec::new();

        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|e| StatelineError::Format {
                format: "Shapefile".to_string(),
                message: format!("Failed to read feature: {}", e),
            })?;

            let geometry = convert_shape(&shape)?;
            let properties = convert_record(&record);

            features.push(Feature { geometry, properties });
        }

        Ok(features)
    }
}

/// Parse an EPSG code out of a CRS WKT string.
///
/// Handles the `AUTHORITY["EPSG","4326"]` form emitted by most tools and the
/// bare `EPSG:4326` form. WKT1 nests the geographic CRS inside a projected
/// one, with the outermost node's AUTHORITY last in the string, so the last
/// occurrence wins. ESRI-flavored WKT without an AUTHORITY node cannot be
/// resolved and yields None.
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    if let Some(start) = wkt.rfind("AUTHORITY[\"EPSG\",\"") {
        let code_start = start + "AUTHORITY[\"EPSG\",\"".len();
        if let Some(end) = wkt[code_start..].find('"') {
            if let Ok(code) = wkt[code_start..code_start + end].parse::<u32>() {
                return Some(code);
            }
        }
    }

    if let Some(start) = wkt.find("EPSG:") {
        let code_start = start + "EPSG:".len();
        let code_str: String =
            wkt[code_start..].chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = code_str.parse::<u32>() {
            return Some(code);
        }
    }

    None
}

/// Convert a shapefile Shape to a typed geometry.
///
/// Polygon shapes store their rings flat; consecutive outer rings become
/// separate polygons of a MultiPolygon, inner rings attach to the polygon
/// opened by the preceding outer ring. M and Z variants drop the extra
/// dimensions.
fn convert_shape(shape: &Shape) -> Result<Option<Geometry>> {
    let geometry = match shape {
        Shape::NullShape => None,
        Shape::Point(p) => Some(Geometry::point(p.x, p.y)),
        Shape::PointZ(p) => Some(Geometry::point(p.x, p.y)),
        Shape::PointM(p) => Some(Geometry::point(p.x, p.y)),
        Shape::Polyline(polyline) => Some(polyline_geometry(
            polyline.parts().iter().map(|part| part.iter().map(|p| [p.x, p.y]).collect()).collect(),
        )),
        Shape::PolylineZ(polyline) => Some(polyline_geometry(
            polyline.parts().iter().map(|part| part.iter().map(|p| [p.x, p.y]).collect()).collect(),
        )),
        Shape::PolylineM(polyline) => Some(polyline_geometry(
            polyline.parts().iter().map(|part| part.iter().map(|p| [p.x, p.y]).collect()).collect(),
        )),
        Shape::Polygon(polygon) => Some(polygon_geometry(
            polygon.rings().iter().map(|ring| match ring {
                PolygonRing::Outer(points) => {
                    (true, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
                PolygonRing::Inner(points) => {
                    (false, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
            }),
        )),
        Shape::PolygonZ(polygon) => Some(polygon_geometry(
            polygon.rings().iter().map(|ring| match ring {
                PolygonRing::Outer(points) => {
                    (true, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
                PolygonRing::Inner(points) => {
                    (false, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
            }),
        )),
        Shape::PolygonM(polygon) => Some(polygon_geometry(
            polygon.rings().iter().map(|ring| match ring {
                PolygonRing::Outer(points) => {
                    (true, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
                PolygonRing::Inner(points) => {
                    (false, points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
                }
            }),
        )),
        Shape::Multipoint(multipoint) => Some(Geometry::MultiPoint {
            coordinates: multipoint.points().iter().map(|p| [p.x, p.y]).collect(),
        }),
        Shape::MultipointZ(multipoint) => Some(Geometry::MultiPoint {
            coordinates: multipoint.points().iter().map(|p| [p.x, p.y]).collect(),
        }),
        Shape::MultipointM(multipoint) => Some(Geometry::MultiPoint {
            coordinates: multipoint.points().iter().map(|p| [p.x, p.y]).collect(),
        }),
        Shape::Multipatch(_) => {
            return Err(StatelineError::Format {
                format: "Shapefile".to_string(),
                message: "Multipatch geometry type is not supported".to_string(),
            });
        }
    };

    Ok(geometry)
}

fn polyline_geometry(parts: Vec<Vec<[f64; 2]>>) -> Geometry {
    if parts.len() == 1 {
        Geometry::LineString { coordinates: parts.into_iter().next().unwrap() }
    } else {
        Geometry::MultiLineString { coordinates: parts }
    }
}

/// Assemble polygon rings into a Polygon or MultiPolygon.
///
/// `rings` yields `(is_outer, points)` in file order. An inner ring arriving
/// before any outer ring is treated as an outer ring, matching how lenient
/// readers handle malformed winding.
fn polygon_geometry(rings: impl Iterator<Item = (bool, Vec<[f64; 2]>)>) -> Geometry {
    let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();

    for (is_outer, points) in rings {
        if is_outer || polygons.is_empty() {
            polygons.push(vec![points]);
        } else {
            polygons.last_mut().expect("checked non-empty").push(points);
        }
    }

    if polygons.len() == 1 {
        Geometry::Polygon { coordinates: polygons.into_iter().next().unwrap() }
    } else {
        Geometry::MultiPolygon { coordinates: polygons }
    }
}

/// Convert a dBase record into JSON property values
fn convert_record(record: &shapefile::dbase::Record) -> HashMap<String, serde_json::Value> {
    let mut properties = HashMap::new();

    for (name, value) in record.clone() {
        properties.insert(name, convert_dbase_value(&value));
    }

    properties
}

/// Convert a dBase field value to a JSON value
fn convert_dbase_value(value: &DbaseFieldValue) -> serde_json::Value {
    match value {
        DbaseFieldValue::Character(Some(s)) => serde_json::Value::String(s.clone()),
        DbaseFieldValue::Character(None) => serde_json::Value::Null,
        DbaseFieldValue::Numeric(Some(n)) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Numeric(None) => serde_json::Value::Null,
        DbaseFieldValue::Logical(Some(b)) => serde_json::Value::Bool(*b),
        DbaseFieldValue::Logical(None) => serde_json::Value::Null,
        DbaseFieldValue::Date(Some(date)) => serde_json::Value::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        DbaseFieldValue::Date(None) => serde_json::Value::Null,
        DbaseFieldValue::Float(Some(f)) => serde_json::Number::from_f64(*f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Float(None) => serde_json::Value::Null,
        DbaseFieldValue::Integer(i) => serde_json::Value::Number((*i).into()),
        DbaseFieldValue::Currency(c) => serde_json::Number::from_f64(*c)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::DateTime(dt) => serde_json::Value::String(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        DbaseFieldValue::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        DbaseFieldValue::Memo(s) => serde_json::Value::String(s.clone()),
    }
}
