//! US census region lookup table and name expansion.
//!
//! Maps human-readable macro-region and subregion names ("Northeast",
//! "Pacific Northwest") to 2-letter state postal abbreviations. The table is
//! compile-time constant data; lookups are case-insensitive.

use std::collections::BTreeSet;

use crate::error::{Result, StatelineError};

/// A named grouping of states nested inside a macro-region
#[derive(Debug, Clone, Copy)]
pub struct Subregion {
    pub name: &'static str,
    pub states: &'static [&'static str],
}

/// A top-level named grouping of US states
#[derive(Debug, Clone, Copy)]
pub struct MacroRegion {
    pub name: &'static str,
    pub subregions: &'static [Subregion],
}

/// The census macro-region / subregion table.
///
/// Abbreviations are literal 2-letter postal codes. Some states appear in
/// more than one subregion ("MN" is in both "West North Central" and "Upper
/// Midwest"); expansion deduplicates.
pub const CENSUS_REGIONS: &[MacroRegion] = &[
    MacroRegion {
        name: "Northeast",
        subregions: &[
            Subregion { name: "New England", states: &["CT", "ME", "MA", "NH", "RI", "VT"] },
            Subregion { name: "Mid-Atlantic", states: &["NJ", "NY", "PA"] },
        ],
    },
    MacroRegion {
        name: "Midwest",
        subregions: &[
            Subregion { name: "East North Central", states: &["IL", "IN", "MI", "OH", "WI"] },
            Subregion {
                name: "West North Central",
                states: &["IA", "KS", "MN", "MO", "NE", "ND", "SD"],
            },
            Subregion { name: "Upper Midwest", states: &["MN", "WI", "IA", "ND", "SD"] },
        ],
    },
    MacroRegion {
        name: "South",
        subregions: &[
            Subregion {
                name: "South Atlantic",
                states: &["DE", "FL", "GA", "MD", "NC", "SC", "VA", "DC", "WV"],
            },
            Subregion { name: "East South Central", states: &["AL", "KY", "MS", "TN"] },
            Subregion { name: "West South Central", states: &["AR", "LA", "OK", "TX"] },
            Subregion { name: "Deep South", states: &["AL", "GA", "LA", "MS", "SC"] },
        ],
    },
    MacroRegion {
        name: "West",
        subregions: &[
            Subregion { name: "Mountain", states: &["AZ", "CO", "ID", "MT", "NV", "NM", "UT", "WY"] },
            Subregion { name: "Pacific", states: &["AK", "CA", "HI", "OR", "WA"] },
            Subregion { name: "Pacific Northwest", states: &["OR", "WA", "ID"] },
            Subregion { name: "Southwest", states: &["AZ", "NM", "OK", "TX"] },
        ],
    },
];

/// Expand region names into a deduplicated, sorted list of state codes.
///
/// Each name is checked at two levels: as a macro-region (contributing every
/// subregion beneath it) and as a subregion nested inside any macro-region
/// (contributing just that subregion). A name matching at both levels unions
/// both contributions. Matching is case-insensitive. Names matching nothing
/// contribute nothing; they are not an error.
pub fn expand<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let (codes, _) = lookup(CENSUS_REGIONS, names);
    codes
}

/// Expand a single region name. See [`expand`].
pub fn expand_one(name: &str) -> Vec<String> {
    expand(&[name])
}

/// Strict variant of [`expand`]: any name matching neither a macro-region
/// nor a subregion yields [`StatelineError::UnknownRegion`].
pub fn expand_strict<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    let (codes, unmatched) = lookup(CENSUS_REGIONS, names);
    match unmatched.into_iter().next() {
        Some(name) => Err(StatelineError::UnknownRegion { name }),
        None => Ok(codes),
    }
}

/// Two-level table lookup. Returns the sorted union of matched state codes
/// and the input names that matched nothing, preserving input order.
fn lookup<S: AsRef<str>>(table: &[MacroRegion], names: &[S]) -> (Vec<String>, Vec<String>) {
    let mut codes: BTreeSet<&'static str> = BTreeSet::new();
    let mut unmatched = Vec::new();

    for name in names {
        let name = name.as_ref();
        let mut matched = false;

        for region in table {
            if region.name.eq_ignore_ascii_case(name) {
                for subregion in region.subregions {
                    codes.extend(subregion.states);
                }
                matched = true;
            }

            for subregion in region.subregions {
                if subregion.name.eq_ignore_ascii_case(name) {
                    codes.extend(subregion.states);
                    matched = true;
                }
            }
        }

        if !matched {
            unmatched.push(name.to_string());
        }
    }

    (codes.into_iter().map(str::to_string).collect(), unmatched)
}
