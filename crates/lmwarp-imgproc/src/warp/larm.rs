use super::landmarks::CorrespondenceSet;
use super::CoordinateMapping;

/// Default exponent of the inverse distance weights.
pub const DEFAULT_LARM_DISTANCE_EXPONENT: f64 = 2.0;

/// A fitted locally affine mapping.
///
/// Each landmark pair contributes a local 2x3 transform `[I | t]` that moves the
/// control point onto its target. Away from the control points the transforms are
/// blended with inverse distance weights `|g - p_i|^-e`.
///
/// Pairs sharing a control point are collapsed to the last one.
#[derive(Debug, Clone)]
pub struct LocallyAffine {
    control: Vec<[f64; 2]>,
    targets: Vec<[f64; 2]>,
    transforms: Vec<[[f64; 3]; 2]>,
    exponent: f64,
}

impl LocallyAffine {
    /// Build the local transforms for every landmark pair.
    ///
    /// # Arguments
    ///
    /// * `correspondences` - The landmark pairs; reference landmarks are the control
    ///   points and source landmarks are the targets.
    /// * `exponent` - Exponent of the inverse distance weights.
    pub fn fit(correspondences: &CorrespondenceSet, exponent: f64) -> Self {
        let all_control = correspondences.control_points();
        let all_targets = correspondences.target_points();

        // a later pair on the same control point replaces the earlier one
        let (control, targets): (Vec<_>, Vec<_>) = all_control
            .iter()
            .zip(all_targets.iter())
            .enumerate()
            .filter(|(i, (p, _))| !all_control[i + 1..].contains(*p))
            .map(|(_, (p, t))| (*p, *t))
            .unzip();
        if control.len() < all_control.len() {
            log::warn!(
                "{} landmark pairs share a reference point with a later pair and are ignored",
                all_control.len() - control.len()
            );
        }

        let transforms = control
            .iter()
            .zip(targets.iter())
            .map(|(p, t)| [[1.0, 0.0, t[0] - p[0]], [0.0, 1.0, t[1] - p[1]]])
            .collect();

        log::debug!(
            "built {} local affine transforms, distance exponent {exponent}",
            control.len()
        );

        Self {
            control,
            targets,
            transforms,
            exponent,
        }
    }

    /// The local 2x3 transform of every landmark pair.
    pub fn transforms(&self) -> &[[[f64; 3]; 2]] {
        &self.transforms
    }

    fn nearest(&self, g: [f64; 2]) -> usize {
        let dist2 = |p: &[f64; 2]| (g[0] - p[0]).powi(2) + (g[1] - p[1]).powi(2);
        self.control
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| dist2(a).total_cmp(&dist2(b)))
            .map(|(i, _)| i)
            .unwrap_or_default()
    }
}

impl CoordinateMapping for LocallyAffine {
    fn map(&self, g: [f64; 2]) -> [f64; 2] {
        // a control point hit has infinite weight
        if let Some(i) = self.control.iter().position(|p| *p == g) {
            return self.targets[i];
        }

        let mut blended = [[0.0; 3]; 2];
        let mut total = 0.0;
        for (p, m) in self.control.iter().zip(self.transforms.iter()) {
            let dist = ((g[0] - p[0]).powi(2) + (g[1] - p[1]).powi(2)).sqrt();
            let w = dist.powf(-self.exponent);
            total += w;
            for (row_b, row_m) in blended.iter_mut().zip(m.iter()) {
                for (b, v) in row_b.iter_mut().zip(row_m.iter()) {
                    *b += w * v;
                }
            }
        }

        if total > 0.0 && total.is_finite() {
            blended.iter_mut().flatten().for_each(|b| *b /= total);
        } else {
            // weights under- or overflowed: the nearest control point dominates
            blended = self.transforms[self.nearest(g)];
        }

        let apply = |row: &[f64; 3]| row[0] * g[0] + row[1] * g[1] + row[2];
        [apply(&blended[0]), apply(&blended[1])]
    }
}
