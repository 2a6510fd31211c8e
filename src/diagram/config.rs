//! Configuration for Pourbaix diagram construction.
//!
//! The hull classification thresholds are absolute and expressed in the
//! units of the stability space (reaction coefficients and eV), so they may
//! need tuning when entries use a different energy scale.

use super::error::Error;
use serde::Deserialize;

/// Default absolute tolerance below which a facet's homogeneous
/// determinant marks it as vertical.
pub const DEFAULT_VERTICAL_TOLERANCE: f64 = 1e-8;

/// Default upper bound on the energy component of a lower-hull facet normal.
pub const DEFAULT_LOWER_HULL_TOLERANCE: f64 = 0.0;

/// Settings controlling diagram construction.
///
/// # Examples
///
/// ```
/// use pourbaix_forge::DiagramConfig;
///
/// let config = DiagramConfig::from_toml("max_combinations = 10000").unwrap();
/// assert_eq!(config.max_combinations, Some(10000));
/// assert_eq!(config.vertical_tolerance, 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramConfig {
    /// Facets with `|det| <=` this value are discarded as vertical.
    #[serde(default = "default_vertical_tolerance")]
    pub vertical_tolerance: f64,

    /// Facets whose outward normal has an energy component above this
    /// value belong to the upper hull and are discarded.
    #[serde(default = "default_lower_hull_tolerance")]
    pub lower_hull_tolerance: f64,

    /// Maximum number of entry combinations multi-element synthesis may
    /// enumerate. `None` means unlimited.
    #[serde(default)]
    pub max_combinations: Option<u64>,
}

fn default_vertical_tolerance() -> f64 {
    DEFAULT_VERTICAL_TOLERANCE
}
fn default_lower_hull_tolerance() -> f64 {
    DEFAULT_LOWER_HULL_TOLERANCE
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            vertical_tolerance: default_vertical_tolerance(),
            lower_hull_tolerance: default_lower_hull_tolerance(),
            max_combinations: None,
        }
    }
}

impl DiagramConfig {
    /// Parses a configuration from TOML; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }
}
