use crate::model::diagram::{DiagramEntry, PourbaixDiagram, ProjectedEntry};
use crate::model::entry::PourbaixEntry;
use crate::model::types::Element;
use std::collections::BTreeSet;

/// Entry sets fixed before the hull is built.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub unprocessed: Vec<PourbaixEntry>,
    pub pourbaix_elements: Vec<Element>,
    pub element_fractions: Option<Vec<(Element, f64)>>,
    pub entries: Vec<DiagramEntry>,
}

/// Indices referenced by at least one facet.
pub fn stable_vertices(facets: &[[usize; 3]]) -> BTreeSet<usize> {
    facets.iter().flatten().copied().collect()
}

pub fn assemble(
    working: WorkingSet,
    qhull_data: Vec<[f64; 3]>,
    qhull_entries: Vec<ProjectedEntry>,
    facets: Vec<[usize; 3]>,
) -> PourbaixDiagram {
    let vertices = stable_vertices(&facets);
    log::debug!(
        "{} of {} entries are stable",
        vertices.len(),
        qhull_entries.len()
    );

    PourbaixDiagram {
        unprocessed_entries: working.unprocessed,
        pourbaix_elements: working.pourbaix_elements,
        element_fractions: working.element_fractions,
        all_entries: working.entries,
        qhull_data,
        qhull_entries,
        facets,
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projected(index: usize, name: &str, g0: f64) -> ProjectedEntry {
        ProjectedEntry {
            entry_index: index,
            name: name.to_string(),
            n_ph: index as f64,
            n_phi: 0.0,
            n_h2o: 0.0,
            g0,
        }
    }

    #[test]
    fn vertices_are_unique_and_sorted() {
        let vertices = stable_vertices(&[[0, 2, 3], [2, 3, 5]]);
        assert_eq!(vertices.into_iter().collect::<Vec<_>>(), vec![0, 2, 3, 5]);
    }

    #[test]
    fn stable_entries_follow_facets() {
        let entries = vec![
            projected(0, "A", -1.0),
            projected(1, "B", -0.5),
            projected(2, "C", 0.0),
            projected(3, "D", 0.5),
        ];
        let points = entries.iter().map(ProjectedEntry::point).collect();
        let working = WorkingSet {
            unprocessed: Vec::new(),
            pourbaix_elements: Vec::new(),
            element_fractions: None,
            entries: Vec::new(),
        };
        let diagram = assemble(working, points, entries, vec![[0, 1, 3]]);

        let names: Vec<_> = diagram
            .stable_entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "D"]);
        assert_eq!(diagram.facets(), &[[0, 1, 3]]);
        assert!(!diagram.is_multielement());
    }
}
