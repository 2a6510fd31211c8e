//! Composition targets for multi-element diagrams.
//!
//! A target lists formulas with weights, e.g. `{MnO2: 1, Mn2O3: 1}`. The
//! elements appearing in those formulas, in first-encountered order, define
//! the diagram's element set; the weighted formulas define the element
//! fractions every composite entry must reproduce.

use super::error::Error;
use crate::model::composition::Composition;
use crate::model::ion::{Ion, is_ionic_notation};
use crate::model::types::Element;
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

/// One weighted formula of a composition target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetComponent {
    /// Formula in neutral (`MnO2`) or ionic (`Mn[2+]`, `X(aq)`) notation.
    pub formula: String,
    /// Relative amount of the formula in the target.
    pub weight: f64,
}

/// Ordered set of weighted formulas; empty means a single-element diagram.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositionTarget {
    components: Vec<TargetComponent>,
}

impl CompositionTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `formula` with `weight` and returns the target.
    pub fn with(mut self, formula: impl Into<String>, weight: f64) -> Self {
        self.push(formula, weight);
        self
    }

    pub fn push(&mut self, formula: impl Into<String>, weight: f64) {
        self.components.push(TargetComponent {
            formula: formula.into(),
            weight,
        });
    }

    pub fn components(&self) -> &[TargetComponent] {
        &self.components
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CompositionTarget {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut target = Self::new();
        for (formula, weight) in iter {
            target.push(formula, weight);
        }
        target
    }
}

impl From<Vec<TargetComponent>> for CompositionTarget {
    fn from(components: Vec<TargetComponent>) -> Self {
        Self { components }
    }
}

/// Parses a target formula, as an ion when written in ionic notation.
fn parse_target_formula(formula: &str) -> Result<Composition, Error> {
    if is_ionic_notation(formula) {
        Ok(Ion::from_formula(formula)?.composition().clone())
    } else {
        Ok(Composition::from_formula(formula)?)
    }
}

/// Derives the element fractions a composition target describes.
///
/// Builds the square matrix `A` whose column `j` holds the element amounts
/// of formula `j`, normalizes it by the weighted element total, and returns
/// `Â·w`: the fraction of each element in the weighted mixture. The result
/// sums to one.
///
/// # Errors
///
/// - [`Error::Parse`] if a formula cannot be parsed.
/// - [`Error::SingularSystem`] if the number of formulas differs from the
///   number of elements, the weighted total is zero, or `A` is singular
///   (the formulas are linearly dependent).
/// - [`Error::LinearAlgebra`] if the fractions are not finite.
pub fn solve_fractions(target: &CompositionTarget) -> Result<Vec<(Element, f64)>, Error> {
    let compositions = target
        .components()
        .iter()
        .map(|c| parse_target_formula(&c.formula))
        .collect::<Result<Vec<_>, _>>()?;

    let mut elements: Vec<Element> = Vec::new();
    for element in compositions.iter().flat_map(Composition::elements) {
        if !elements.contains(&element) {
            elements.push(element);
        }
    }

    let n = compositions.len();
    if elements.len() != n {
        return Err(Error::SingularSystem(format!(
            "{} formulas span {} elements; the target must give one formula per element",
            n,
            elements.len()
        )));
    }

    let a = DMatrix::from_fn(n, n, |i, j| compositions[j].get(elements[i]));
    let w = DVector::from_iterator(n, target.components().iter().map(|c| c.weight));

    let total: f64 = (0..n).map(|j| w[j] * a.column(j).sum()).sum();
    if total == 0.0 || !total.is_finite() {
        return Err(Error::SingularSystem(format!(
            "weighted element total is {}",
            total
        )));
    }
    let a = a / total;

    if !a.clone().lu().is_invertible() {
        return Err(Error::SingularSystem(
            "target formulas are linearly dependent".to_string(),
        ));
    }

    let x = &a * &w;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(Error::LinearAlgebra(format!(
            "non-finite element fractions {:?}",
            x.as_slice()
        )));
    }

    log::debug!(
        "Element fractions: {}",
        elements
            .iter()
            .zip(x.iter())
            .map(|(el, f)| format!("{}={:.6}", el, f))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(elements.into_iter().zip(x.iter().copied()).collect())
}
