use serde::{Deserialize, Serialize};

use super::error::WarpError;
use super::larm::DEFAULT_LARM_DISTANCE_EXPONENT;
use super::resample::OutOfHullPolicy;
use super::tps::DEFAULT_TPS_REGULARIZATION;
use crate::interpolation::InterpolationMode;
use crate::parallel::ExecutionStrategy;

/// Tunable parameters of the fit, evaluate and resample stages.
///
/// Missing fields take their default when deserialized.
///
/// # Example
///
/// ```
/// use lmwarp_imgproc::warp::{OutOfHullPolicy, WarpConfig};
///
/// let config: WarpConfig = serde_json::from_str(r#"{"out_of_hull": {"fill": 0}}"#).unwrap();
/// assert_eq!(config.out_of_hull, OutOfHullPolicy::Fill(0));
/// assert_eq!(config.larm_distance_exponent, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Interpolation used to sample the source image.
    pub interpolation: InterpolationMode,
    /// What to do with output pixels mapped outside the source image.
    pub out_of_hull: OutOfHullPolicy,
    /// Regularization inside the logarithm of the thin plate spline basis.
    pub tps_regularization: f64,
    /// Exponent of the locally affine inverse distance weights.
    pub larm_distance_exponent: f64,
    /// How the per-row work is scheduled.
    pub execution: ExecutionStrategy,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::Bicubic,
            out_of_hull: OutOfHullPolicy::Clamp,
            tps_regularization: DEFAULT_TPS_REGULARIZATION,
            larm_distance_exponent: DEFAULT_LARM_DISTANCE_EXPONENT,
            execution: ExecutionStrategy::ParallelRows,
        }
    }
}

impl WarpConfig {
    /// Check the numeric model parameters.
    ///
    /// # Errors
    ///
    /// [`WarpError::InvalidParameter`] if the regularization is not a positive
    /// finite number, or the distance exponent is not a positive finite number.
    pub fn validate(&self) -> Result<(), WarpError> {
        let checks = [
            ("tps_regularization", self.tps_regularization),
            ("larm_distance_exponent", self.larm_distance_exponent),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(WarpError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
