//! A pure Rust library for constructing Pourbaix (pH / potential) stability
//! diagrams from formation energies of solid and aqueous species.
//!
//! Every candidate species is placed in a three-dimensional stability space
//! spanned by its proton coefficient, its electron coefficient and its free
//! energy per solute atom. The lower convex hull of that point cloud holds,
//! for each pH and potential, the species of minimum free energy: its
//! vertices are the stable entries of the diagram.
//!
//! # Features
//!
//! - **Chemistry model** — Element, formula and ionic-notation parsing
//!   (`MnO4[-]`, `Fe[2+]`, `Fe+3`, `X(aq)`)
//! - **Multi-element diagrams** — Composition targets such as
//!   `{MnO2: 1, Mn2O3: 1}` are solved for element fractions, and every
//!   feasible weighted combination of entries becomes a composite entry
//! - **Lower-hull selection** — Built-in 3-D convex hull with vertical and
//!   upper facets filtered out; tolerances are configurable
//! - **TOML input** — Entry lists, targets and settings from a single document
//!
//! # Quick Start
//!
//! The main entry point is the [`build_diagram`] function, which takes
//! [`PourbaixEntry`] values, a [`CompositionTarget`] and a [`DiagramConfig`]
//! and produces a [`PourbaixDiagram`]:
//!
//! ```
//! use pourbaix_forge::{CompositionTarget, DiagramConfig, PourbaixEntry};
//! use pourbaix_forge::build_diagram;
//!
//! let entries = vec![
//!     PourbaixEntry::solid("Mn", 0.0)?,
//!     PourbaixEntry::solid("MnO", -3.76)?,
//!     PourbaixEntry::solid("Mn3O4", -13.3)?,
//!     PourbaixEntry::solid("MnO2", -4.82)?,
//!     PourbaixEntry::ion("Mn[2+]", -2.36)?,
//!     PourbaixEntry::ion("MnO4[-]", -4.63)?,
//! ];
//!
//! // An empty target builds a single-element diagram
//! let diagram = build_diagram(&entries, &CompositionTarget::new(), &DiagramConfig::default())?;
//!
//! // One hull point per entry, sorted by free energy
//! assert_eq!(diagram.qhull_data().len(), 6);
//!
//! // Every stable entry is a vertex of some lower-hull facet
//! for facet in diagram.facets() {
//!     for v in facet {
//!         assert!(diagram.vertices().contains(v));
//!     }
//! }
//!
//! // The stable species at pH 0 and -1 V vs SHE
//! let stable = diagram.stable_entry_at(0.0, -1.0).unwrap();
//! assert_eq!(stable.name, "Mn[2+]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — TOML diagram input documents
//! - [`build_diagram`] — Main construction function
//! - [`DiagramConfig`] — Hull tolerances and the combination limit
//!
//! # Data Types
//!
//! ## Chemistry
//!
//! - [`Element`] — Chemical element (H through Og)
//! - [`Composition`] — Ordered element amounts of a formula
//! - [`Ion`] — Composition with a charge
//! - [`PhaseType`] — Solid or Ion
//!
//! ## Entries
//!
//! - [`PourbaixEntry`] — Solid or aqueous species with its formation energy
//! - [`MultiEntry`] — Weighted combination of entries for multi-element diagrams
//! - [`DiagramEntry`] — Either of the above, as used to build the hull
//! - [`EntryView`] — Attribute contract shared by all entries
//! - [`EntryRecord`] — Untyped entry with a string phase tag
//!
//! ## Output
//!
//! - [`PourbaixDiagram`] — Facets, hull points and stable entries
//! - [`ProjectedEntry`] — An entry normalized and placed in stability space
//!
//! ## Extension
//!
//! - [`ConvexHull`] — Hull primitive trait
//! - [`IncrementalHull`] — Built-in incremental hull

mod diagram;
mod model;

pub mod io;

pub use model::composition::{Composition, ParseFormulaError};
pub use model::ion::{Ion, is_ionic_notation};
pub use model::types::{Element, ParseElementError, ParsePhaseTypeError, PhaseType};

pub use model::entry::{
    DEFAULT_ION_CONCENTRATION, EntryRecord, EntryView, MU_H2O, PREFAC, Phase, PourbaixEntry,
};
pub use model::multi::MultiEntry;

pub use model::diagram::{DiagramEntry, PourbaixDiagram, ProjectedEntry};

pub use diagram::{
    CompositionTarget, ConvexHull, DEFAULT_HULL_TOLERANCE, DEFAULT_LOWER_HULL_TOLERANCE,
    DEFAULT_VERTICAL_TOLERANCE, DiagramConfig, IncrementalHull, Synthesizer, TargetComponent,
    build_diagram, build_diagram_from_records, build_diagram_with_hull, combination_count,
    solve_fractions,
};

pub use diagram::Error as DiagramError;
