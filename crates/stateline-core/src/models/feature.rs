//! Feature and feature-collection models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::geometry::{Crs, Geometry};

/// A geographic record: a geometry plus arbitrary attributes.
///
/// The geometry is optional because some sources (null shapes in a
/// shapefile, attribute-only GeoJSON features) carry records without one.
/// Features without geometry never match a spatial predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Feature {
    /// Create a feature with a geometry and no attributes
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry: Some(geometry), properties: HashMap::new() }
    }

    /// Attach an attribute, builder-style
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a string attribute, if present and string-typed
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

/// An in-memory collection of features sharing one CRS.
///
/// Collections are owned by the caller. Every operation in this workspace
/// takes a collection by reference and returns a new one; the input is never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Source name, usually the file stem the collection was read from
    #[serde(default)]
    pub name: String,

    pub crs: Crs,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create an empty collection in the given CRS
    pub fn new(crs: Crs) -> Self {
        Self { name: String::new(), crs, features: Vec::new() }
    }

    /// Create an empty collection with a source name
    pub fn named(name: impl Into<String>, crs: Crs) -> Self {
        Self { name: name.into(), crs, features: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// New collection keeping only the features the predicate accepts.
    /// Name and CRS carry over.
    pub fn filtered(&self, mut keep: impl FnMut(&Feature) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            crs: self.crs.clone(),
            features: self.features.iter().filter(|f| keep(f)).cloned().collect(),
        }
    }
}
