//! Stateline Core - Domain models, region tables, and format readers
//!
//! This crate contains the typed feature/geometry models, the US census
//! region lookup table, and the file-format readers used to load boundary
//! and feature datasets.

pub mod error;
pub mod formats;
pub mod models;
pub mod regions;

pub use error::{Result, StatelineError};
pub use models::{Crs, Feature, FeatureCollection, Geometry};
