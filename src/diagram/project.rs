use crate::model::diagram::{DiagramEntry, ProjectedEntry};
use crate::model::entry::{EntryView, MU_H2O};

/// Normalizes one working entry to a single solute atom.
///
/// The energy and the reaction coefficients are scaled by the entry's
/// normalization factor; the water term is added on the normalized water
/// count while the concentration term is added as is.
fn project_entry(entry_index: usize, entry: &DiagramEntry) -> ProjectedEntry {
    let f = entry.normalization_factor();
    let n_h2o = f * entry.n_h2o();
    let g0 = f * entry.energy() - MU_H2O * n_h2o + entry.conc_term();

    ProjectedEntry {
        entry_index,
        name: entry.name(),
        n_ph: f * entry.n_ph(),
        n_phi: f * entry.n_phi(),
        n_h2o,
        g0,
    }
}

/// Maps the working entries into stability space.
///
/// Returns the hull points and the projected entries, index-aligned and
/// stably sorted by ascending `g0`. The input entries are left untouched.
pub fn project_entries(entries: &[DiagramEntry]) -> (Vec<[f64; 3]>, Vec<ProjectedEntry>) {
    let mut projected: Vec<ProjectedEntry> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| project_entry(i, entry))
        .collect();
    projected.sort_by(|a, b| a.g0.total_cmp(&b.g0));

    let points = projected.iter().map(ProjectedEntry::point).collect();
    (points, projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{PREFAC, PourbaixEntry};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn single(entry: PourbaixEntry) -> DiagramEntry {
        DiagramEntry::Single(entry)
    }

    #[test]
    fn solid_projection_adds_water_term() {
        let entries = vec![single(PourbaixEntry::solid("MnO2", -4.8).unwrap())];
        let (points, projected) = project_entries(&entries);

        assert!(approx_eq(points[0][0], 4.0, 1e-12));
        assert!(approx_eq(points[0][1], 4.0, 1e-12));
        assert!(approx_eq(points[0][2], -4.8 - MU_H2O * 2.0, 1e-12));
        assert_eq!(projected[0].n_h2o, 2.0);
    }

    #[test]
    fn coefficients_are_normalized_per_solute_atom() {
        let entries = vec![single(PourbaixEntry::solid("Mn3O4", -13.3).unwrap())];
        let (points, projected) = project_entries(&entries);

        assert!(approx_eq(points[0][0], 8.0 / 3.0, 1e-12));
        assert!(approx_eq(projected[0].n_h2o, 4.0 / 3.0, 1e-12));
        let expected = -13.3 / 3.0 - MU_H2O * 4.0 / 3.0;
        assert!(approx_eq(points[0][2], expected, 1e-12));
    }

    #[test]
    fn concentration_term_is_not_scaled() {
        let entry = PourbaixEntry::ion("Mn2OH[-]", -0.4583).unwrap();
        let entries = vec![single(entry)];
        let (points, _) = project_entries(&entries);

        let expected = 0.5 * -0.4583 - MU_H2O * 0.5 + PREFAC * -6.0;
        assert!(approx_eq(points[0][2], expected, 1e-12));
    }

    #[test]
    fn output_is_sorted_and_index_aligned() {
        let entries = vec![
            single(PourbaixEntry::solid("Mn", 0.0).unwrap()),
            single(PourbaixEntry::solid("MnO", -3.8).unwrap()),
            single(PourbaixEntry::ion("Mn[2+]", -2.3).unwrap()),
        ];
        let (points, projected) = project_entries(&entries);

        assert_eq!(points.len(), projected.len());
        for (point, entry) in points.iter().zip(&projected) {
            assert_eq!(*point, entry.point());
        }
        assert!(points.windows(2).all(|w| w[0][2] <= w[1][2]));
        assert_eq!(projected[0].name, "Mn[2+]");
        assert_eq!(projected[0].entry_index, 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let entries = vec![
            single(PourbaixEntry::solid("Mn", 0.0).unwrap()),
            single(PourbaixEntry::ion("Mn[+]", 0.0).unwrap().with_concentration(1.0)),
        ];
        let (_, projected) = project_entries(&entries);
        assert_eq!(projected[0].entry_index, 0);
        assert_eq!(projected[1].entry_index, 1);
    }

    #[test]
    fn inputs_are_not_modified() {
        let entries = vec![single(PourbaixEntry::solid("Mn2O3", -9.1).unwrap())];
        let before = entries.clone();
        let _ = project_entries(&entries);
        let _ = project_entries(&entries);
        assert_eq!(entries, before);
    }
}
