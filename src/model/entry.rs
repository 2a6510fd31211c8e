//! Pourbaix entries: candidate species with a free-energy model.
//!
//! Every entry, raw or composite, exposes the coordinates of the reaction
//! that forms it from its solute elements and water:
//!
//! ```text
//! a M + b H2O  ->  M_a O_b H_c^q + (2b - c) H+ + (2b - c + q) e-
//! ```
//!
//! giving `nH2O = b`, `npH = 2b - c` and `nPhi = 2b - c + q`. The free
//! energy at a given pH and potential `V` is `g0 - PREFAC·npH·pH - nPhi·V`.

use super::composition::{Composition, ParseFormulaError};
use super::ion::Ion;
use super::types::{Element, PhaseType};
use serde::Deserialize;

/// Nernst prefactor `ln(10)·kT/e` at 298.15 K, in eV per pH unit.
pub const PREFAC: f64 = 0.0591;

/// Chemical potential of liquid water, in eV per molecule.
pub const MU_H2O: f64 = -2.4583;

/// Default activity of dissolved ions, in mol/L.
pub const DEFAULT_ION_CONCENTRATION: f64 = 1e-6;

/// Read-only attribute contract shared by raw and composite entries.
///
/// All quantities are per formula unit of the entry, before normalization.
pub trait EntryView {
    /// Human-readable species name.
    fn name(&self) -> String;

    /// Formation energy including corrections, in eV.
    fn energy(&self) -> f64;

    /// Water molecules consumed by the formation reaction.
    fn n_h2o(&self) -> f64;

    /// Protons released by the formation reaction (pH slope).
    fn n_ph(&self) -> f64;

    /// Electrons released by the formation reaction (potential slope).
    fn n_phi(&self) -> f64;

    /// Atoms that are neither hydrogen nor oxygen.
    fn n_m(&self) -> f64;

    /// Concentration correction `PREFAC·log10(c)`, in eV.
    fn conc_term(&self) -> f64;

    /// Scale that brings the entry to one solute atom.
    #[inline]
    fn normalization_factor(&self) -> f64 {
        1.0 / self.n_m()
    }
}

/// Phase of an entry, carrying the species data each phase needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Solid(Composition),
    Ion(Ion),
}

impl Phase {
    /// Parses `formula` in the notation of the given phase type.
    pub fn from_formula(phase_type: PhaseType, formula: &str) -> Result<Self, ParseFormulaError> {
        match phase_type {
            PhaseType::Solid => Composition::from_formula(formula).map(Phase::Solid),
            PhaseType::Ion => Ion::from_formula(formula).map(Phase::Ion),
        }
    }

    pub fn phase_type(&self) -> PhaseType {
        match self {
            Phase::Solid(_) => PhaseType::Solid,
            Phase::Ion(_) => PhaseType::Ion,
        }
    }

    pub fn composition(&self) -> &Composition {
        match self {
            Phase::Solid(composition) => composition,
            Phase::Ion(ion) => ion.composition(),
        }
    }

    pub fn charge(&self) -> f64 {
        match self {
            Phase::Solid(_) => 0.0,
            Phase::Ion(ion) => ion.charge(),
        }
    }

    /// Formula units per reduced formula unit.
    ///
    /// Solids reduce by the gcd of their amounts; ions are always taken
    /// as written.
    pub fn reduction_factor(&self) -> f64 {
        match self {
            Phase::Solid(composition) => composition.reduced_factor(),
            Phase::Ion(_) => 1.0,
        }
    }

    fn default_concentration(&self) -> f64 {
        match self {
            Phase::Solid(_) => 1.0,
            Phase::Ion(_) => DEFAULT_ION_CONCENTRATION,
        }
    }
}

/// A single solid or aqueous species with its formation energy.
#[derive(Debug, Clone, PartialEq)]
pub struct PourbaixEntry {
    phase: Phase,
    uncorrected_energy: f64,
    correction: f64,
    concentration: f64,
    id: Option<String>,
}

impl PourbaixEntry {
    /// Creates an entry with zero correction and the phase's default
    /// concentration (1 for solids, [`DEFAULT_ION_CONCENTRATION`] for ions).
    pub fn new(phase: Phase, energy: f64) -> Self {
        let concentration = phase.default_concentration();
        Self {
            phase,
            uncorrected_energy: energy,
            correction: 0.0,
            concentration,
            id: None,
        }
    }

    pub fn solid(formula: &str, energy: f64) -> Result<Self, ParseFormulaError> {
        Phase::from_formula(PhaseType::Solid, formula).map(|phase| Self::new(phase, energy))
    }

    pub fn ion(formula: &str, energy: f64) -> Result<Self, ParseFormulaError> {
        Phase::from_formula(PhaseType::Ion, formula).map(|phase| Self::new(phase, energy))
    }

    pub fn with_correction(mut self, correction: f64) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_concentration(mut self, concentration: f64) -> Self {
        self.concentration = concentration;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_type(&self) -> PhaseType {
        self.phase.phase_type()
    }

    pub fn composition(&self) -> &Composition {
        self.phase.composition()
    }

    pub fn charge(&self) -> f64 {
        self.phase.charge()
    }

    pub fn uncorrected_energy(&self) -> f64 {
        self.uncorrected_energy
    }

    pub fn correction(&self) -> f64 {
        self.correction
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Amount of `element` per reduced formula unit.
    pub fn reduced_amount(&self, element: Element) -> f64 {
        self.composition().get(element) / self.phase.reduction_factor()
    }
}

impl EntryView for PourbaixEntry {
    fn name(&self) -> String {
        match &self.phase {
            Phase::Solid(composition) => format!("{}(s)", composition),
            Phase::Ion(ion) => ion.to_string(),
        }
    }

    fn energy(&self) -> f64 {
        self.uncorrected_energy + self.correction
    }

    fn n_h2o(&self) -> f64 {
        self.composition().get(Element::O)
    }

    fn n_ph(&self) -> f64 {
        let comp = self.composition();
        2.0 * comp.get(Element::O) - comp.get(Element::H)
    }

    fn n_phi(&self) -> f64 {
        self.n_ph() + self.charge()
    }

    fn n_m(&self) -> f64 {
        self.composition().solute_atoms()
    }

    fn conc_term(&self) -> f64 {
        PREFAC * self.concentration.log10()
    }
}

/// Untyped entry as supplied by an entry provider, before classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryRecord {
    /// Phase tag; must be `"Solid"` or `"Ion"`.
    pub phase_type: String,
    pub formula: String,
    /// Formation energy per formula unit, in eV.
    pub energy: f64,
    #[serde(default)]
    pub correction: f64,
    /// Overrides the phase's default concentration.
    #[serde(default)]
    pub concentration: Option<f64>,
    #[serde(default)]
    pub id: Option<String>,
}

impl EntryRecord {
    pub fn new(phase_type: impl Into<String>, formula: impl Into<String>, energy: f64) -> Self {
        Self {
            phase_type: phase_type.into(),
            formula: formula.into(),
            energy,
            correction: 0.0,
            concentration: None,
            id: None,
        }
    }
}
