mod assemble;
mod classify;
mod config;
mod envelope;
mod error;
mod hull;
mod project;
mod synth;
mod target;

pub use config::{DEFAULT_LOWER_HULL_TOLERANCE, DEFAULT_VERTICAL_TOLERANCE, DiagramConfig};
pub use error::Error;
pub use hull::{ConvexHull, DEFAULT_HULL_TOLERANCE, IncrementalHull};
pub use synth::{Synthesizer, combination_count};
pub use target::{CompositionTarget, TargetComponent, solve_fractions};

use crate::model::diagram::{DiagramEntry, PourbaixDiagram};
use crate::model::entry::{EntryRecord, PourbaixEntry};
use crate::model::types::Element;
use assemble::WorkingSet;
use classify::Classified;

/// Builds a Pourbaix diagram with the built-in hull.
///
/// An empty `target` builds a single-element diagram over the entries as
/// given. Otherwise the target's element fractions are solved and every
/// feasible entry combination becomes a composite entry.
///
/// # Errors
///
/// Fails with the first fatal [`Error`] raised by any stage.
pub fn build_diagram(
    entries: &[PourbaixEntry],
    target: &CompositionTarget,
    config: &DiagramConfig,
) -> Result<PourbaixDiagram, Error> {
    build_diagram_with_hull(entries, target, config, &IncrementalHull::default())
}

/// Builds a Pourbaix diagram using a caller-supplied hull primitive.
pub fn build_diagram_with_hull(
    entries: &[PourbaixEntry],
    target: &CompositionTarget,
    config: &DiagramConfig,
    hull: &dyn ConvexHull,
) -> Result<PourbaixDiagram, Error> {
    let classified = Classified::from_entries(entries)?;
    run(classified, target, config, hull)
}

/// Builds a Pourbaix diagram from untyped entry records.
///
/// # Errors
///
/// Besides the errors of [`build_diagram`], fails with
/// [`Error::Configuration`] for a record whose phase tag is neither
/// `Solid` nor `Ion`.
pub fn build_diagram_from_records(
    records: &[EntryRecord],
    target: &CompositionTarget,
    config: &DiagramConfig,
) -> Result<PourbaixDiagram, Error> {
    let classified = Classified::from_records(records)?;
    run(classified, target, config, &IncrementalHull::default())
}

impl PourbaixDiagram {
    /// Builds a diagram; see [`build_diagram`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pourbaix_forge::{CompositionTarget, DiagramConfig, PourbaixDiagram, PourbaixEntry};
    ///
    /// let entries = vec![
    ///     PourbaixEntry::solid("Mn", 0.0).unwrap(),
    ///     PourbaixEntry::solid("MnO2", -4.8).unwrap(),
    ///     PourbaixEntry::ion("Mn[2+]", -2.3).unwrap(),
    /// ];
    /// let diagram =
    ///     PourbaixDiagram::new(&entries, &CompositionTarget::new(), &DiagramConfig::default())
    ///         .unwrap();
    /// assert_eq!(diagram.facets(), &[[0, 1, 2]]);
    /// assert_eq!(diagram.stable_entries().len(), 3);
    /// ```
    pub fn new(
        entries: &[PourbaixEntry],
        target: &CompositionTarget,
        config: &DiagramConfig,
    ) -> Result<Self, Error> {
        build_diagram(entries, target, config)
    }

    /// Builds a diagram with a caller-supplied hull primitive.
    pub fn with_hull(
        entries: &[PourbaixEntry],
        target: &CompositionTarget,
        config: &DiagramConfig,
        hull: &dyn ConvexHull,
    ) -> Result<Self, Error> {
        build_diagram_with_hull(entries, target, config, hull)
    }
}

fn solute_elements(elements: impl IntoIterator<Item = Element>) -> Vec<Element> {
    elements.into_iter().filter(|el| !el.is_solvent()).collect()
}

fn working_set(
    classified: Classified,
    target: &CompositionTarget,
    config: &DiagramConfig,
) -> Result<WorkingSet, Error> {
    let unprocessed = classified.into_unprocessed();

    if target.is_empty() {
        let pourbaix_elements = unprocessed
            .first()
            .map(|e| solute_elements(e.composition().elements()))
            .unwrap_or_default();
        let entries = unprocessed.iter().cloned().map(DiagramEntry::Single).collect();
        return Ok(WorkingSet {
            unprocessed,
            pourbaix_elements,
            element_fractions: None,
            entries,
        });
    }

    let fractions = solve_fractions(target)?;

    let required = combination_count(unprocessed.len(), fractions.len());
    if let Some(limit) = config.max_combinations {
        if required > u128::from(limit) {
            return Err(Error::CombinationLimit {
                required,
                limit: u128::from(limit),
            });
        }
    }
    log::debug!(
        "Enumerating {} combinations of {} entries",
        required,
        unprocessed.len()
    );

    let multis = Synthesizer::new(&unprocessed, &fractions).collect::<Result<Vec<_>, _>>()?;
    log::debug!("Synthesized {} multi-element entries", multis.len());

    Ok(WorkingSet {
        pourbaix_elements: solute_elements(fractions.iter().map(|&(el, _)| el)),
        element_fractions: Some(fractions),
        entries: multis.into_iter().map(DiagramEntry::Multi).collect(),
        unprocessed,
    })
}

fn run(
    classified: Classified,
    target: &CompositionTarget,
    config: &DiagramConfig,
    hull: &dyn ConvexHull,
) -> Result<PourbaixDiagram, Error> {
    log::debug!(
        "Building diagram from {} solid and {} ion entries",
        classified.solids.len(),
        classified.ions.len()
    );
    let working = working_set(classified, target, config)?;

    let (qhull_data, qhull_entries) = project::project_entries(&working.entries);

    let facets = envelope::select_lower_envelope(&qhull_data, hull, config)?;

    Ok(assemble::assemble(working, qhull_data, qhull_entries, facets))
}
