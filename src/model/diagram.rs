//! The constructed Pourbaix diagram and the entries it is built from.

use super::entry::{EntryView, PREFAC, PourbaixEntry};
use super::multi::MultiEntry;
use super::types::{Element, PhaseType};
use std::collections::BTreeSet;

/// An entry of the working set: a raw entry in single-element diagrams or
/// a synthesized composite in multi-element diagrams.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEntry {
    Single(PourbaixEntry),
    Multi(MultiEntry),
}

impl DiagramEntry {
    pub fn as_single(&self) -> Option<&PourbaixEntry> {
        match self {
            DiagramEntry::Single(entry) => Some(entry),
            DiagramEntry::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiEntry> {
        match self {
            DiagramEntry::Single(_) => None,
            DiagramEntry::Multi(multi) => Some(multi),
        }
    }
}

impl EntryView for DiagramEntry {
    fn name(&self) -> String {
        match self {
            DiagramEntry::Single(e) => e.name(),
            DiagramEntry::Multi(e) => e.name(),
        }
    }

    fn energy(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.energy(),
            DiagramEntry::Multi(e) => e.energy(),
        }
    }

    fn n_h2o(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.n_h2o(),
            DiagramEntry::Multi(e) => e.n_h2o(),
        }
    }

    fn n_ph(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.n_ph(),
            DiagramEntry::Multi(e) => e.n_ph(),
        }
    }

    fn n_phi(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.n_phi(),
            DiagramEntry::Multi(e) => e.n_phi(),
        }
    }

    fn n_m(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.n_m(),
            DiagramEntry::Multi(e) => e.n_m(),
        }
    }

    fn conc_term(&self) -> f64 {
        match self {
            DiagramEntry::Single(e) => e.conc_term(),
            DiagramEntry::Multi(e) => e.conc_term(),
        }
    }
}

/// An entry normalized to one solute atom and placed in stability space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedEntry {
    /// Index of the source entry in [`PourbaixDiagram::all_entries`].
    pub entry_index: usize,
    /// Name of the source entry.
    pub name: String,
    /// Normalized proton coefficient (pH axis).
    pub n_ph: f64,
    /// Normalized electron coefficient (potential axis).
    pub n_phi: f64,
    /// Normalized water coefficient.
    pub n_h2o: f64,
    /// Normalized free energy including water and concentration terms, in eV.
    pub g0: f64,
}

impl ProjectedEntry {
    /// The hull point `[npH, nPhi, g0]`.
    #[inline]
    pub fn point(&self) -> [f64; 3] {
        [self.n_ph, self.n_phi, self.g0]
    }

    /// Free energy per solute atom at the given pH and potential (V vs SHE).
    pub fn free_energy(&self, ph: f64, potential: f64) -> f64 {
        self.g0 - PREFAC * self.n_ph * ph - self.n_phi * potential
    }
}

/// A Pourbaix diagram: stable species over pH and potential.
///
/// Built once by [`PourbaixDiagram::new`](crate::PourbaixDiagram::new) (or
/// [`build_diagram`](crate::build_diagram)); every accessor is a read-only
/// view of state fixed at construction.
#[derive(Debug, Clone)]
pub struct PourbaixDiagram {
    pub(crate) unprocessed_entries: Vec<PourbaixEntry>,
    pub(crate) pourbaix_elements: Vec<Element>,
    pub(crate) element_fractions: Option<Vec<(Element, f64)>>,
    pub(crate) all_entries: Vec<DiagramEntry>,
    pub(crate) qhull_data: Vec<[f64; 3]>,
    pub(crate) qhull_entries: Vec<ProjectedEntry>,
    pub(crate) facets: Vec<[usize; 3]>,
    pub(crate) vertices: BTreeSet<usize>,
}

impl PourbaixDiagram {
    /// Lower-hull facets as sorted index triples into [`qhull_data`](Self::qhull_data).
    pub fn facets(&self) -> &[[usize; 3]] {
        &self.facets
    }

    /// Hull points `[npH, nPhi, g0]`, sorted by ascending `g0`.
    pub fn qhull_data(&self) -> &[[f64; 3]] {
        &self.qhull_data
    }

    /// Projected entries, index-aligned with [`qhull_data`](Self::qhull_data).
    pub fn qhull_entries(&self) -> &[ProjectedEntry] {
        &self.qhull_entries
    }

    /// The working entry set the hull was built from.
    pub fn all_entries(&self) -> &[DiagramEntry] {
        &self.all_entries
    }

    /// Input entries after classification: solids first, then ions.
    pub fn unprocessed_entries(&self) -> &[PourbaixEntry] {
        &self.unprocessed_entries
    }

    pub fn solid_entries(&self) -> impl Iterator<Item = &PourbaixEntry> {
        self.unprocessed_entries
            .iter()
            .filter(|e| e.phase_type() == PhaseType::Solid)
    }

    pub fn ion_entries(&self) -> impl Iterator<Item = &PourbaixEntry> {
        self.unprocessed_entries
            .iter()
            .filter(|e| e.phase_type() == PhaseType::Ion)
    }

    /// Indices into [`qhull_entries`](Self::qhull_entries) referenced by any facet.
    pub fn vertices(&self) -> &BTreeSet<usize> {
        &self.vertices
    }

    /// Entries referenced by at least one lower-hull facet, in vertex order.
    pub fn stable_entries(&self) -> Vec<&ProjectedEntry> {
        self.vertices
            .iter()
            .map(|&v| &self.qhull_entries[v])
            .collect()
    }

    /// Elements the diagram is drawn for.
    pub fn pourbaix_elements(&self) -> &[Element] {
        &self.pourbaix_elements
    }

    /// Target element fractions of a multi-element diagram.
    pub fn element_fractions(&self) -> Option<&[(Element, f64)]> {
        self.element_fractions.as_deref()
    }

    #[inline]
    pub fn is_multielement(&self) -> bool {
        self.element_fractions.is_some()
    }

    /// Unprocessed-entry indices behind each composite entry.
    pub fn entry_components(&self) -> Vec<&[usize]> {
        self.all_entries
            .iter()
            .filter_map(DiagramEntry::as_multi)
            .map(MultiEntry::components)
            .collect()
    }

    /// The stable entry with the lowest free energy at the given conditions.
    pub fn stable_entry_at(&self, ph: f64, potential: f64) -> Option<&ProjectedEntry> {
        self.stable_entries().into_iter().min_by(|a, b| {
            a.free_energy(ph, potential)
                .total_cmp(&b.free_energy(ph, potential))
        })
    }
}
