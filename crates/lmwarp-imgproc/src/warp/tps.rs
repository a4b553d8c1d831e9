use faer::prelude::SpSolver;
use faer::Mat;

use super::error::WarpError;
use super::landmarks::CorrespondenceSet;
use super::CoordinateMapping;

/// Default regularization added inside the logarithm of the radial basis.
pub const DEFAULT_TPS_REGULARIZATION: f64 = 1e-16;

/// Thin plate spline radial basis `r^2 * ln(r^2 + eps)` for a difference vector.
#[inline]
fn radial_basis(d: [f64; 2], eps: f64) -> f64 {
    let r2 = d[0] * d[0] + d[1] * d[1];
    r2 * (r2 + eps).ln()
}

/// A fitted thin plate spline mapping.
///
/// Evaluates `phi(v) = c + A^T v + W^T s(v)` with `s(v)_i = sigma(p_i - v)`, where
/// `p_i` are the control points.
#[derive(Debug, Clone)]
pub struct ThinPlateSpline {
    control: Vec<[f64; 2]>,
    weights: Vec<[f64; 2]>,
    offset: [f64; 2],
    // linear[k][j]: contribution of input axis k to output axis j
    linear: [[f64; 2]; 2],
    eps: f64,
}

impl ThinPlateSpline {
    /// Fit the spline that maps every control point onto its target.
    ///
    /// # Arguments
    ///
    /// * `correspondences` - The landmark pairs; reference landmarks are the control
    ///   points and source landmarks are the targets.
    /// * `eps` - Regularization inside the logarithm of the radial basis.
    ///
    /// # Errors
    ///
    /// [`WarpError::SingularSystem`] if the control points are fewer than three,
    /// contain duplicates, or are collinear, or if the solve is not finite.
    pub fn fit(correspondences: &CorrespondenceSet, eps: f64) -> Result<Self, WarpError> {
        let control = correspondences.control_points();
        let targets = correspondences.target_points();
        check_control_points(&control)?;

        let n = control.len();

        // gamma = [S 1 X Y; 1^T 0; X^T 0; Y^T 0]
        let mut gamma = Mat::<f64>::zeros(n + 3, n + 3);
        for (i, pi) in control.iter().enumerate() {
            for (j, pj) in control.iter().enumerate() {
                gamma[(i, j)] = radial_basis([pi[0] - pj[0], pi[1] - pj[1]], eps);
            }
            gamma[(i, n)] = 1.0;
            gamma[(i, n + 1)] = pi[0];
            gamma[(i, n + 2)] = pi[1];
            gamma[(n, i)] = 1.0;
            gamma[(n + 1, i)] = pi[0];
            gamma[(n + 2, i)] = pi[1];
        }

        // rhs = [X' Y'; 0 0; 0 0; 0 0]
        let mut rhs = Mat::<f64>::zeros(n + 3, 2);
        for (i, t) in targets.iter().enumerate() {
            rhs[(i, 0)] = t[0];
            rhs[(i, 1)] = t[1];
        }

        let params = gamma.partial_piv_lu().solve(rhs.as_ref());

        let finite = (0..n + 3).all(|i| params[(i, 0)].is_finite() && params[(i, 1)].is_finite());
        if !finite {
            return Err(WarpError::SingularSystem(
                "solution contains non-finite values".to_string(),
            ));
        }

        let weights = (0..n).map(|i| [params[(i, 0)], params[(i, 1)]]).collect();
        let offset = [params[(n, 0)], params[(n, 1)]];
        let linear = [
            [params[(n + 1, 0)], params[(n + 1, 1)]],
            [params[(n + 2, 0)], params[(n + 2, 1)]],
        ];

        log::debug!("fitted thin plate spline on {n} control points");

        Ok(Self {
            control,
            weights,
            offset,
            linear,
            eps,
        })
    }

    /// The affine part as `(offset, linear)`, with `linear[k][j]` mapping input axis
    /// `k` to output axis `j`.
    pub fn affine(&self) -> ([f64; 2], [[f64; 2]; 2]) {
        (self.offset, self.linear)
    }

    /// The non-affine weights, one pair per control point.
    pub fn weights(&self) -> &[[f64; 2]] {
        &self.weights
    }
}

impl CoordinateMapping for ThinPlateSpline {
    fn map(&self, v: [f64; 2]) -> [f64; 2] {
        let mut out = [
            self.offset[0] + self.linear[0][0] * v[0] + self.linear[1][0] * v[1],
            self.offset[1] + self.linear[0][1] * v[0] + self.linear[1][1] * v[1],
        ];

        for (p, w) in self.control.iter().zip(self.weights.iter()) {
            let s = radial_basis([p[0] - v[0], p[1] - v[1]], self.eps);
            out[0] += w[0] * s;
            out[1] += w[1] * s;
        }

        out
    }
}

/// Reject control point layouts for which the spline system is singular.
fn check_control_points(control: &[[f64; 2]]) -> Result<(), WarpError> {
    if control.len() < 3 {
        return Err(WarpError::SingularSystem(format!(
            "at least 3 control points are required, got {}",
            control.len()
        )));
    }

    for (i, a) in control.iter().enumerate() {
        if let Some(j) = control[i + 1..].iter().position(|b| b == a) {
            return Err(WarpError::SingularSystem(format!(
                "landmarks {} and {} share the reference position ({}, {})",
                i + 1,
                i + j + 2,
                a[0],
                a[1]
            )));
        }
    }

    let p0 = control[0];
    let p1 = control[1];
    let spans_plane = control[2..].iter().any(|p| {
        let cross = (p1[0] - p0[0]) * (p[1] - p0[1]) - (p1[1] - p0[1]) * (p[0] - p0[0]);
        cross != 0.0
    });
    if !spans_plane {
        return Err(WarpError::SingularSystem(
            "all control points are collinear".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::landmarks::Landmark;
    use approx::assert_relative_eq;

    fn landmarks(points: &[(i32, i32)]) -> Vec<Landmark> {
        points.iter().map(|&(r, c)| Landmark::new(r, c)).collect()
    }

    #[test]
    fn tps_exact_at_control_points() -> Result<(), WarpError> {
        let source = landmarks(&[(10, 12), (40, 8), (25, 30), (5, 45), (48, 50)]);
        let reference = landmarks(&[(12, 10), (38, 12), (27, 27), (8, 40), (45, 47)]);
        let set = CorrespondenceSet::new(&source, &reference)?;
        let tps = ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION)?;

        for pair in set.iter() {
            let mapped = tps.map(pair.reference.to_f64());
            let expected = pair.source.to_f64();
            assert_relative_eq!(mapped[0], expected[0], epsilon = 1e-6);
            assert_relative_eq!(mapped[1], expected[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn tps_identity() -> Result<(), WarpError> {
        let points = landmarks(&[(0, 0), (0, 20), (20, 0), (13, 17)]);
        let set = CorrespondenceSet::new(&points, &points)?;
        let tps = ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION)?;

        let (offset, linear) = tps.affine();
        assert_relative_eq!(offset[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(linear[0][0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(linear[0][1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(linear[1][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(linear[1][1], 1.0, epsilon = 1e-6);
        for w in tps.weights() {
            assert_relative_eq!(w[0], 0.0, epsilon = 1e-6);
            assert_relative_eq!(w[1], 0.0, epsilon = 1e-6);
        }

        for v in [[3.5, 7.25], [-4.0, 30.0], [19.0, 19.0]] {
            let mapped = tps.map(v);
            assert_relative_eq!(mapped[0], v[0], epsilon = 1e-6);
            assert_relative_eq!(mapped[1], v[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn tps_pure_translation_is_affine() -> Result<(), WarpError> {
        let reference = landmarks(&[(0, 0), (0, 10), (10, 0), (10, 10)]);
        let source = landmarks(&[(3, -2), (3, 8), (13, -2), (13, 8)]);
        let set = CorrespondenceSet::new(&source, &reference)?;
        let tps = ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION)?;

        let mapped = tps.map([4.5, 6.0]);
        assert_relative_eq!(mapped[0], 7.5, epsilon = 1e-6);
        assert_relative_eq!(mapped[1], 4.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn tps_rejects_degenerate_layouts() -> Result<(), WarpError> {
        let two = landmarks(&[(0, 0), (5, 5)]);
        let set = CorrespondenceSet::new(&two, &two)?;
        assert!(matches!(
            ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION),
            Err(WarpError::SingularSystem(_))
        ));

        let collinear = landmarks(&[(0, 0), (1, 1), (2, 2), (7, 7)]);
        let set = CorrespondenceSet::new(&collinear, &collinear)?;
        assert!(matches!(
            ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION),
            Err(WarpError::SingularSystem(_))
        ));

        let source = landmarks(&[(0, 0), (0, 9), (9, 0), (4, 4)]);
        let duplicated = landmarks(&[(0, 0), (0, 9), (9, 0), (0, 9)]);
        let set = CorrespondenceSet::new(&source, &duplicated)?;
        assert!(matches!(
            ThinPlateSpline::fit(&set, DEFAULT_TPS_REGULARIZATION),
            Err(WarpError::SingularSystem(_))
        ));
        Ok(())
    }

    #[test]
    fn radial_basis_vanishes_at_zero() {
        assert_eq!(radial_basis([0.0, 0.0], DEFAULT_TPS_REGULARIZATION), 0.0);
        assert_relative_eq!(
            radial_basis([3.0, 4.0], DEFAULT_TPS_REGULARIZATION),
            25.0 * 25f64.ln(),
            epsilon = 1e-9
        );
    }
}
