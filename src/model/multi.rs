use super::composition::Composition;
use super::entry::{EntryView, PourbaixEntry};

/// Weighted combination of base entries for multi-element diagrams.
///
/// Weights are expressed per reduced formula unit of each constituent,
/// with the first (pivot) weight fixed at `1.0`. Constituent `j` therefore
/// contributes `weights[j] / reduction_factor_j` times its own quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiEntry {
    components: Vec<usize>,
    weights: Vec<f64>,
    name: String,
    composition: Composition,
    energy: f64,
    n_h2o: f64,
    n_ph: f64,
    n_phi: f64,
    n_m: f64,
    conc_term: f64,
}

impl MultiEntry {
    /// Combines `entries` with the matching `weights`.
    ///
    /// `components` records the indices the constituents were drawn from,
    /// so the composite can be traced back to its source entries.
    ///
    /// # Panics
    ///
    /// Panics if `entries`, `components` and `weights` differ in length.
    pub fn new(entries: &[&PourbaixEntry], components: Vec<usize>, weights: Vec<f64>) -> Self {
        assert_eq!(entries.len(), weights.len(), "one weight per constituent");
        assert_eq!(entries.len(), components.len(), "one index per constituent");

        let mut multi = Self {
            components,
            weights,
            name: String::new(),
            composition: Composition::new(),
            energy: 0.0,
            n_h2o: 0.0,
            n_ph: 0.0,
            n_phi: 0.0,
            n_m: 0.0,
            conc_term: 0.0,
        };

        let mut names = Vec::with_capacity(entries.len());
        for (entry, &weight) in entries.iter().zip(multi.weights.iter()) {
            let scale = weight / entry.phase().reduction_factor();
            multi.energy += scale * entry.energy();
            multi.n_h2o += scale * entry.n_h2o();
            multi.n_ph += scale * entry.n_ph();
            multi.n_phi += scale * entry.n_phi();
            multi.n_m += scale * entry.n_m();
            multi.conc_term += scale * entry.conc_term();
            multi.composition.add_scaled(entry.composition(), scale);
            names.push(entry.name());
        }
        multi.name = names.join(" + ");

        multi
    }

    /// Indices of the constituent entries.
    pub fn components(&self) -> &[usize] {
        &self.components
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted total composition of all constituents.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }
}

impl EntryView for MultiEntry {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn energy(&self) -> f64 {
        self.energy
    }

    fn n_h2o(&self) -> f64 {
        self.n_h2o
    }

    fn n_ph(&self) -> f64 {
        self.n_ph
    }

    fn n_phi(&self) -> f64 {
        self.n_phi
    }

    fn n_m(&self) -> f64 {
        self.n_m
    }

    fn conc_term(&self) -> f64 {
        self.conc_term
    }
}
