//! Entry sets and geometric checks shared across integration tests.

#![allow(dead_code)]

use nalgebra::{Matrix3, Vector3};
use pourbaix_forge::{PourbaixDiagram, PourbaixEntry};

/// Manganese species with formation energies in eV per formula unit.
pub fn manganese_entries() -> Vec<PourbaixEntry> {
    vec![
        PourbaixEntry::solid("Mn", 0.0).unwrap(),
        PourbaixEntry::solid("MnO", -3.76).unwrap(),
        PourbaixEntry::solid("Mn3O4", -13.3).unwrap(),
        PourbaixEntry::solid("Mn2O3", -9.1).unwrap(),
        PourbaixEntry::solid("MnO2", -4.82).unwrap(),
        PourbaixEntry::solid("Mn(OH)2", -6.4).unwrap(),
        PourbaixEntry::ion("Mn[2+]", -2.36).unwrap(),
        PourbaixEntry::ion("MnO4[-]", -4.63).unwrap(),
    ]
}

/// Pool for a manganese-oxide composition target; solids come first so
/// unprocessed indices match positions here.
pub fn manganese_oxide_pool() -> Vec<PourbaixEntry> {
    vec![
        PourbaixEntry::solid("MnO2", -4.82).unwrap(),
        PourbaixEntry::solid("Mn2O3", -9.1).unwrap(),
        PourbaixEntry::solid("Mn", 0.0).unwrap(),
        PourbaixEntry::solid("MnO", -3.76).unwrap(),
        PourbaixEntry::ion("Mn[2+]", -2.36).unwrap(),
        PourbaixEntry::ion("MnO4[-]", -4.63).unwrap(),
    ]
}

/// Determinant of a facet's `[x y 1]` rows.
pub fn projected_determinant(points: &[[f64; 3]], facet: &[usize; 3]) -> f64 {
    let [a, b, c] = facet.map(|i| points[i]);
    Matrix3::new(a[0], a[1], 1.0, b[0], b[1], 1.0, c[0], c[1], 1.0).determinant()
}

/// Energy component of a facet normal pointing away from the centroid of
/// all hull points.
pub fn outward_normal_z(points: &[[f64; 3]], facet: &[usize; 3]) -> f64 {
    let centroid = points
        .iter()
        .map(|p| Vector3::from(*p))
        .sum::<Vector3<f64>>()
        / points.len() as f64;
    let [a, b, c] = facet.map(|i| Vector3::from(points[i]));
    let mut normal = (b - a).cross(&(c - a));
    if normal.dot(&(a - centroid)) < 0.0 {
        normal = -normal;
    }
    normal.z
}

/// Checks the structural guarantees every diagram must satisfy.
pub fn assert_diagram_invariants(diagram: &PourbaixDiagram) {
    let points = diagram.qhull_data();
    let entries = diagram.qhull_entries();
    assert_eq!(points.len(), entries.len());
    for (point, entry) in points.iter().zip(entries) {
        assert_eq!(*point, entry.point());
        assert!(entry.entry_index < diagram.all_entries().len());
    }
    assert!(points.windows(2).all(|w| w[0][2] <= w[1][2]));

    for facet in diagram.facets() {
        assert!(facet[0] < facet[1] && facet[1] < facet[2]);
        assert!(facet[2] < points.len());
        if points.len() > 3 {
            assert!(projected_determinant(points, facet).abs() > 1e-8);
            assert!(outward_normal_z(points, facet) <= 1e-12);
        }
    }

    let from_facets: Vec<&str> = diagram
        .facets()
        .iter()
        .flatten()
        .copied()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|v| entries[v].name.as_str())
        .collect();
    let stable: Vec<&str> = diagram
        .stable_entries()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(from_facets, stable);
}
