//! Synthesis of composite entries for multi-element diagrams.
//!
//! Every N-combination of base entries (N = number of target elements) is
//! tested for a positive weighting that reproduces the target element
//! fractions. With the first entry of a combination as pivot (weight 1),
//! the remaining weights `w_j` solve, for every non-pivot element `i`,
//!
//! ```text
//! Σ_j w_j (x_i·S_j − c_ij) = c_i0 − x_i·S_0
//! ```
//!
//! where `c_ij` is the amount of element `i` per reduced formula unit of
//! entry `j` and `S_j = Σ_i c_ij`. Singular systems and non-positive
//! weights mark combinations that cannot realize the target; they are
//! filtered out of the enumeration.

use super::error::Error;
use crate::model::entry::PourbaixEntry;
use crate::model::multi::MultiEntry;
use crate::model::types::Element;
use itertools::{Combinations, Itertools};
use nalgebra::{DMatrix, DVector};
use std::ops::Range;

/// Number of `k`-combinations of `n` items, saturating at `u128::MAX`.
pub fn combination_count(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut count: u128 = 1;
    for i in 0..k {
        // Exact at every step: the running product is C(n, i + 1).
        count = match count.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    count
}

/// Iterator over the feasible composite entries of an entry set.
///
/// Yields only combinations with strictly positive weights; an `Err` is
/// yielded for numerical failures other than a singular system.
pub struct Synthesizer<'a> {
    entries: &'a [PourbaixEntry],
    elements: Vec<Element>,
    fractions: Vec<f64>,
    combinations: Combinations<Range<usize>>,
}

impl<'a> Synthesizer<'a> {
    /// Prepares the enumeration over `entries` for the given element fractions.
    pub fn new(entries: &'a [PourbaixEntry], fractions: &[(Element, f64)]) -> Self {
        let (elements, fractions): (Vec<_>, Vec<_>) = fractions.iter().copied().unzip();
        let combinations = (0..entries.len()).combinations(elements.len());
        Self {
            entries,
            elements,
            fractions,
            combinations,
        }
    }

    fn total_content(&self, entry: &PourbaixEntry) -> f64 {
        self.elements
            .iter()
            .map(|&el| entry.reduced_amount(el))
            .sum()
    }

    fn evaluate(&self, combination: Vec<usize>) -> Result<Option<MultiEntry>, Error> {
        let members: Vec<&PourbaixEntry> =
            combination.iter().map(|&i| &self.entries[i]).collect();
        let n = self.elements.len();

        let solved = if n == 1 {
            DVector::zeros(0)
        } else {
            let pivot = members[0];
            let pivot_total = self.total_content(pivot);
            let totals: Vec<f64> = members[1..]
                .iter()
                .map(|e| self.total_content(e))
                .collect();

            let a = DMatrix::from_fn(n - 1, n - 1, |i, j| {
                let entry = members[j + 1];
                self.fractions[i + 1] * totals[j] - entry.reduced_amount(self.elements[i + 1])
            });
            let b = DVector::from_fn(n - 1, |i, _| {
                pivot.reduced_amount(self.elements[i + 1]) - self.fractions[i + 1] * pivot_total
            });

            match a.lu().solve(&b) {
                Some(weights) => weights,
                None => {
                    log::trace!("Skipping combination {:?}: singular system", combination);
                    return Ok(None);
                }
            }
        };

        if solved.iter().any(|w| !w.is_finite()) {
            return Err(Error::LinearAlgebra(format!(
                "non-finite weights {:?} for entry combination {:?}",
                solved.as_slice(),
                combination
            )));
        }
        if solved.iter().any(|&w| w <= 0.0) {
            log::trace!(
                "Skipping combination {:?}: non-positive weights {:?}",
                combination,
                solved.as_slice()
            );
            return Ok(None);
        }

        let mut weights = Vec::with_capacity(n);
        weights.push(1.0);
        weights.extend(solved.iter().copied());

        Ok(Some(MultiEntry::new(&members, combination, weights)))
    }
}

impl Iterator for Synthesizer<'_> {
    type Item = Result<MultiEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let combination = self.combinations.next()?;
            match self.evaluate(combination) {
                Ok(Some(multi)) => return Some(Ok(multi)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
