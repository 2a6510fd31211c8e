//! Selection of the lower convex hull in stability space.
//!
//! Only the lower envelope of the `(npH, nPhi, g0)` cloud carries stability
//! information: for every pH and potential it holds the minimum free
//! energy. Vertical facets, whose projection onto the pH/potential plane has
//! no area, and upper-hull facets are discarded.

use super::config::DiagramConfig;
use super::error::Error;
use super::hull::ConvexHull;
use nalgebra::{Matrix3, Vector3};
use std::collections::BTreeSet;

/// Dimension of the stability space.
const DIM: usize = 3;

/// Determinant of the facet's `[x y 1]` rows: twice the signed area of its
/// projection onto the pH/potential plane.
fn projected_determinant(points: &[[f64; 3]], facet: &[usize; 3]) -> f64 {
    let [a, b, c] = facet.map(|i| points[i]);
    Matrix3::new(
        a[0], a[1], 1.0, //
        b[0], b[1], 1.0, //
        c[0], c[1], 1.0,
    )
    .determinant()
}

/// Whether every triangle of `points` has `|det| <= tolerance`, measured
/// against the longest pH/potential baseline from the first point.
fn projects_onto_line(points: &[[f64; 3]], tolerance: f64) -> bool {
    let origin = points[0];
    let offset = |p: &[f64; 3]| (p[0] - origin[0], p[1] - origin[1]);
    let Some(far) = points
        .iter()
        .map(offset)
        .max_by(|a, b| a.0.hypot(a.1).total_cmp(&b.0.hypot(b.1)))
    else {
        return true;
    };
    points.iter().map(offset).all(|(x, y)| (far.0 * y - far.1 * x).abs() <= tolerance)
}

/// Returns the lower-envelope facets of `points` as ascending index triples.
///
/// With exactly three points the single facet `[0, 1, 2]` is returned as
/// is. Otherwise the hull facets are filtered: a facet is dropped when
/// `|det| <= config.vertical_tolerance` (vertical) or when its outward
/// normal, oriented away from the centroid of the surviving vertices, has
/// an energy component above `config.lower_hull_tolerance` (upper hull).
///
/// # Errors
///
/// Returns [`Error::InsufficientData`] for fewer than three points and
/// propagates failures of the hull primitive. A cloud whose projection onto
/// the pH/potential plane is a line has only vertical facets and yields an
/// empty list without consulting the hull.
pub fn select_lower_envelope(
    points: &[[f64; 3]],
    hull: &dyn ConvexHull,
    config: &DiagramConfig,
) -> Result<Vec<[usize; 3]>, Error> {
    if points.len() < DIM {
        return Err(Error::insufficient_data(DIM, points.len()));
    }
    if points.len() == DIM {
        return Ok(vec![[0, 1, 2]]);
    }

    if projects_onto_line(points, config.vertical_tolerance) {
        log::debug!("All points project onto one line; every facet is vertical");
        return Ok(Vec::new());
    }

    let mut facets = hull.facets(points)?;
    for facet in &mut facets {
        facet.sort_unstable();
    }
    log::debug!("Hull has {} facets over {} points", facets.len(), points.len());

    let (facets, vertical): (Vec<_>, Vec<_>) = facets.into_iter().partition(|facet| {
        projected_determinant(points, facet).abs() > config.vertical_tolerance
    });
    for facet in &vertical {
        log::debug!("Removed vertical facet {:?}", facet);
    }
    if facets.is_empty() {
        return Ok(facets);
    }

    let vertices: BTreeSet<usize> = facets.iter().flatten().copied().collect();
    let centroid = vertices
        .iter()
        .map(|&v| Vector3::from(points[v]))
        .sum::<Vector3<f64>>()
        / vertices.len() as f64;

    let lower = facets
        .into_iter()
        .filter(|facet| {
            let [v0, v1, v2] = facet.map(|i| Vector3::from(points[i]) - centroid);
            let mut normal = (v1 - v0).cross(&(v2 - v0));
            if normal.dot(&v0) < 0.0 {
                normal = -normal;
            }
            let keep = normal.z <= config.lower_hull_tolerance;
            if !keep {
                log::debug!("Removed upper facet {:?}", facet);
            }
            keep
        })
        .collect::<Vec<_>>();

    log::debug!("Lower envelope has {} facets", lower.len());
    Ok(lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::hull::IncrementalHull;

    /// Fixed facet list standing in for a hull computation.
    struct FixedHull(Vec<[usize; 3]>);

    impl ConvexHull for FixedHull {
        fn facets(&self, _points: &[[f64; 3]]) -> Result<Vec<[usize; 3]>, Error> {
            Ok(self.0.clone())
        }
    }

    fn outward_normal_z(points: &[[f64; 3]], facet: &[usize; 3]) -> f64 {
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

    fn paraboloid_with_caps() -> Vec<[f64; 3]> {
        let mut points: Vec<[f64; 3]> = (0..40)
            .map(|i| {
                let r = ((i as f64 + 0.5) / 40.0).sqrt();
                let theta = i as f64 * 2.399_963;
                let (x, y) = (r * theta.cos(), r * theta.sin());
                [x, y, x * x + y * y]
            })
            .collect();
        points.push([0.05, 0.02, 5.0]);
        points.push([-0.1, 0.03, 4.0]);
        points
    }

    #[test]
    fn fewer_than_three_points_is_insufficient() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let result =
            select_lower_envelope(&points, &IncrementalHull::new(), &DiagramConfig::default());
        assert!(matches!(
            result,
            Err(Error::InsufficientData {
                required: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn three_points_form_the_only_facet() {
        // Collinear in projection, yet returned unfiltered.
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 1.0]];
        let facets =
            select_lower_envelope(&points, &FixedHull(vec![]), &DiagramConfig::default()).unwrap();
        assert_eq!(facets, vec![[0, 1, 2]]);
    }

    #[test]
    fn vertical_and_upper_facets_are_removed() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.0, 1.0],
        ];
        let facets = select_lower_envelope(
            &points,
            &IncrementalHull::new(),
            &DiagramConfig::default(),
        )
        .unwrap();
        assert_eq!(facets, vec![[0, 1, 2]]);
    }

    #[test]
    fn facets_are_sorted() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.2, 0.2, 1.0],
        ];
        let hull = FixedHull(vec![[2, 1, 0], [3, 1, 0], [3, 2, 0], [3, 2, 1]]);
        let facets = select_lower_envelope(&points, &hull, &DiagramConfig::default()).unwrap();
        assert_eq!(facets, vec![[0, 1, 2]]);
    }

    #[test]
    fn all_vertical_facets_leave_nothing() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 1.0],
            [3.0, 0.0, 5.0],
        ];
        let hull = FixedHull(vec![[0, 1, 2], [1, 2, 3]]);
        let facets = select_lower_envelope(&points, &hull, &DiagramConfig::default()).unwrap();
        assert!(facets.is_empty());
    }

    #[test]
    fn vertical_tolerance_is_configurable() {
        // Facet [0, 1, 2] is a sliver with |det| = 1e-6.
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1e-6, 0.0],
            [0.3, 0.6, 2.0],
        ];
        let hull = FixedHull(vec![[0, 1, 2], [0, 1, 3]]);

        let strict = select_lower_envelope(&points, &hull, &DiagramConfig::default()).unwrap();
        assert_eq!(strict, vec![[0, 1, 2]]);

        let loose = DiagramConfig {
            vertical_tolerance: 1e-4,
            ..DiagramConfig::default()
        };
        assert!(select_lower_envelope(&points, &hull, &loose).unwrap().is_empty());
    }

    #[test]
    fn collinear_projection_skips_the_hull() {
        // Flat in three dimensions: a hull primitive would reject it.
        let points = vec![
            [1.0, 0.0, -1.0],
            [1.0, 1.0, 0.5],
            [1.0, 2.0, -0.2],
            [1.0, 3.0, 2.0],
        ];
        let facets = select_lower_envelope(
            &points,
            &IncrementalHull::new(),
            &DiagramConfig::default(),
        )
        .unwrap();
        assert!(facets.is_empty());
    }

    #[test]
    fn paraboloid_lower_surface_is_selected() {
        let points = paraboloid_with_caps();
        let facets = select_lower_envelope(
            &points,
            &IncrementalHull::new(),
            &DiagramConfig::default(),
        )
        .unwrap();

        let vertices: BTreeSet<usize> = facets.iter().flatten().copied().collect();
        assert_eq!(vertices, (0..40).collect());

        for facet in &facets {
            assert!(facet[0] < facet[1] && facet[1] < facet[2]);
            assert!(projected_determinant(&points, facet).abs() > 1e-8);
            assert!(outward_normal_z(&points, facet) <= 0.0);
        }
    }
}
