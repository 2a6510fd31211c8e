//! Core data structures for Pourbaix diagram construction.
//!
//! This module provides the types that flow through `pourbaix-forge`:
//!
//! - [`types`] – Periodic table elements and phase classification.
//! - [`composition`] – Element amounts and chemical formula parsing.
//! - [`ion`] – Charged aqueous species and ionic notation.
//! - [`entry`] – Pourbaix entries, their reaction coefficients, and physical constants.
//! - [`multi`] – Weighted composite entries for multi-element diagrams.
//! - [`diagram`] – The constructed diagram and its projected entries.
//!
//! Input entries ([`PourbaixEntry`]) are never modified by diagram
//! construction; every derived quantity lives in a new
//! [`ProjectedEntry`] owned by the [`PourbaixDiagram`].
//!
//! [`PourbaixEntry`]: entry::PourbaixEntry
//! [`ProjectedEntry`]: diagram::ProjectedEntry
//! [`PourbaixDiagram`]: diagram::PourbaixDiagram

pub mod composition;
pub mod diagram;
pub mod entry;
pub mod ion;
pub mod multi;
pub mod types;
