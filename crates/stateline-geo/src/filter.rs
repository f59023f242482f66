//! Filter feature collections by US state boundaries.
//!
//! The state-code path loads the TIGER/Line state boundary shapefile,
//! restricts it to the requested postal codes, and hands off to the shared
//! spatial join. The boundary file is read fresh on every call.

use std::path::Path;

use stateline_core::error::Result;
use stateline_core::formats::{FormatReader, ShapefileReader};
use stateline_core::models::FeatureCollection;

use crate::spatial::spatial_join_intersects;

/// Default location of the state boundary reference dataset, relative to the
/// process working directory
pub const STATE_BOUNDARY_PATH: &str = "shapefiles/tl_2023_us_state/tl_2023_us_state.shp";

/// Attribute column carrying the 2-letter postal code in the boundary dataset
pub const STATE_POSTAL_FIELD: &str = "STUSPS";

/// Filter a feature collection down to the features intersecting any of the
/// named states, using the boundary shapefile at [`STATE_BOUNDARY_PATH`].
///
/// State codes are matched case-insensitively against the boundary dataset's
/// `STUSPS` column; codes with no boundary row are silently dropped. An
/// empty code list yields an empty collection. The result is a new
/// collection in the input's CRS with the input's attributes untouched.
pub fn filter_by_states<S: AsRef<str>>(
    features: &FeatureCollection,
    state_codes: &[S],
) -> Result<FeatureCollection> {
    filter_by_states_at(features, state_codes, Path::new(STATE_BOUNDARY_PATH))
}

/// [`filter_by_states`] with an explicit boundary shapefile path
pub fn filter_by_states_at<S: AsRef<str>>(
    features: &FeatureCollection,
    state_codes: &[S],
    boundary_path: &Path,
) -> Result<FeatureCollection> {
    let boundaries = ShapefileReader.read(boundary_path)?;
    let selected = select_states(&boundaries, state_codes);

    if selected.len() < state_codes.len() {
        tracing::debug!(
            "{} of {} requested state codes matched a boundary row",
            selected.len(),
            state_codes.len()
        );
    }

    spatial_join_intersects(features, &selected)
}

/// Filter a feature collection by an already-loaded boundary collection
pub fn filter_by_boundaries(
    features: &FeatureCollection,
    boundaries: &FeatureCollection,
) -> Result<FeatureCollection> {
    spatial_join_intersects(features, boundaries)
}

/// Restrict a boundary collection to rows whose postal code matches one of
/// the requested codes
fn select_states<S: AsRef<str>>(
    boundaries: &FeatureCollection,
    state_codes: &[S],
) -> FeatureCollection {
    boundaries.filtered(|feature| {
        feature
            .property_str(STATE_POSTAL_FIELD)
            .map(|code| state_codes.iter().any(|wanted| wanted.as_ref().eq_ignore_ascii_case(code)))
            .unwrap_or(false)
    })
}
