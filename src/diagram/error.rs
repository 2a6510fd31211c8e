//! Error types for Pourbaix diagram construction.
//!
//! Every variant is fatal: construction aborts and no partially built
//! diagram is returned. Infeasible entry combinations during multi-element
//! synthesis are expected and never surface here.

use crate::model::composition::ParseFormulaError;
use thiserror::Error;

/// Errors that can occur while building a Pourbaix diagram.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a diagram configuration TOML document.
    #[error("failed to parse diagram configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An entry cannot take part in the diagram.
    ///
    /// Occurs when an entry's phase tag is neither `Solid` nor `Ion`, or
    /// when it contains no element other than hydrogen and oxygen and so
    /// cannot be normalized.
    #[error("invalid entry {index} ('{entry}'): {detail}")]
    Configuration {
        /// Position of the entry in the input.
        index: usize,
        /// Formula or tag of the offending entry.
        entry: String,
        /// Description of the problem.
        detail: String,
    },

    /// A formula could not be parsed as an ion or a neutral composition.
    #[error(transparent)]
    Parse(#[from] ParseFormulaError),

    /// The composition target does not define a unique set of element fractions.
    #[error("singular composition target: {0}")]
    SingularSystem(String),

    /// Too few hull points to span the stability space.
    #[error("need at least {required} entries to build the diagram, found {found}")]
    InsufficientData {
        /// Dimensionality of the stability space.
        required: usize,
        /// Number of hull points available.
        found: usize,
    },

    /// A linear solve produced a result other than a clean solution or a
    /// singular matrix.
    #[error("linear algebra failure: {0}")]
    LinearAlgebra(String),

    /// The hull primitive could not build a three-dimensional hull.
    #[error("degenerate convex hull: {0}")]
    DegenerateHull(String),

    /// Multi-element synthesis would enumerate more combinations than allowed.
    #[error(
        "multi-element synthesis needs {required} entry combinations, exceeding the limit of {limit}"
    )]
    CombinationLimit {
        /// Number of combinations the entry set would require.
        required: u128,
        /// Configured maximum.
        limit: u128,
    },
}

impl Error {
    /// Creates a [`Configuration`](Error::Configuration) error.
    ///
    /// # Arguments
    ///
    /// * `index` — Position of the entry in the input
    /// * `entry` — Formula or tag identifying the entry
    /// * `detail` — Description of the problem
    pub fn configuration(index: usize, entry: &str, detail: impl Into<String>) -> Self {
        Self::Configuration {
            index,
            entry: entry.to_string(),
            detail: detail.into(),
        }
    }

    /// Creates an [`InsufficientData`](Error::InsufficientData) error.
    pub fn insufficient_data(required: usize, found: usize) -> Self {
        Self::InsufficientData { required, found }
    }
}
