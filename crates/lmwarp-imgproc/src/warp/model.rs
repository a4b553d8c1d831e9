use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::WarpConfig;
use super::error::WarpError;
use super::landmarks::CorrespondenceSet;
use super::larm::LocallyAffine;
use super::tps::ThinPlateSpline;
use super::CoordinateMapping;

/// The deformation model used to interpolate the landmark displacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeformationModel {
    /// Thin plate spline, smooth and exact at the control points.
    #[default]
    #[serde(rename = "tps")]
    ThinPlateSpline,
    /// Inverse distance blend of per-landmark translations.
    #[serde(rename = "larm")]
    LocallyAffine,
}

impl fmt::Display for DeformationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeformationModel::ThinPlateSpline => write!(f, "TPS"),
            DeformationModel::LocallyAffine => write!(f, "LARM"),
        }
    }
}

/// Error returned when parsing an unknown model tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deformation model '{0}', expected TPS or LARM")]
pub struct ParseModelError(String);

impl FromStr for DeformationModel {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tps" => Ok(DeformationModel::ThinPlateSpline),
            "larm" => Ok(DeformationModel::LocallyAffine),
            _ => Err(ParseModelError(s.to_string())),
        }
    }
}

/// A fitted deformation, one variant per model.
#[derive(Debug, Clone)]
pub enum MappingFunction {
    /// A fitted thin plate spline.
    ThinPlateSpline(ThinPlateSpline),
    /// A fitted locally affine blend.
    LocallyAffine(LocallyAffine),
}

impl MappingFunction {
    /// The model this function was fitted with.
    pub fn model(&self) -> DeformationModel {
        match self {
            MappingFunction::ThinPlateSpline(_) => DeformationModel::ThinPlateSpline,
            MappingFunction::LocallyAffine(_) => DeformationModel::LocallyAffine,
        }
    }
}

impl CoordinateMapping for MappingFunction {
    fn map(&self, v: [f64; 2]) -> [f64; 2] {
        match self {
            MappingFunction::ThinPlateSpline(tps) => tps.map(v),
            MappingFunction::LocallyAffine(larm) => larm.map(v),
        }
    }
}

/// Fit a deformation model with the default parameters.
///
/// # Arguments
///
/// * `correspondences` - The landmark pairs.
/// * `model` - The deformation model to fit.
///
/// # Returns
///
/// A function mapping reference coordinates to source coordinates.
pub fn fit(
    correspondences: &CorrespondenceSet,
    model: DeformationModel,
) -> Result<MappingFunction, WarpError> {
    fit_with_config(correspondences, model, &WarpConfig::default())
}

/// Fit a deformation model with the parameters of `config`.
///
/// # Errors
///
/// [`WarpError::InvalidParameter`] for an out of range regularization or
/// distance exponent, and [`WarpError::SingularSystem`] for a degenerate thin
/// plate spline layout.
pub fn fit_with_config(
    correspondences: &CorrespondenceSet,
    model: DeformationModel,
    config: &WarpConfig,
) -> Result<MappingFunction, WarpError> {
    config.validate()?;
    log::debug!("fitting {model} on {} landmark pairs", correspondences.len());
    match model {
        DeformationModel::ThinPlateSpline => Ok(MappingFunction::ThinPlateSpline(
            ThinPlateSpline::fit(correspondences, config.tps_regularization)?,
        )),
        DeformationModel::LocallyAffine => Ok(MappingFunction::LocallyAffine(
            LocallyAffine::fit(correspondences, config.larm_distance_exponent),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::landmarks::Landmark;

    #[test]
    fn parse_model_tags() {
        assert_eq!(
            "TPS".parse::<DeformationModel>(),
            Ok(DeformationModel::ThinPlateSpline)
        );
        assert_eq!(
            "larm".parse::<DeformationModel>(),
            Ok(DeformationModel::LocallyAffine)
        );
        assert!("affine".parse::<DeformationModel>().is_err());
        assert_eq!(DeformationModel::LocallyAffine.to_string(), "LARM");
    }

    #[test]
    fn model_serde() -> Result<(), serde_json::Error> {
        let model: DeformationModel = serde_json::from_str("\"larm\"")?;
        assert_eq!(model, DeformationModel::LocallyAffine);
        assert_eq!(serde_json::to_string(&DeformationModel::ThinPlateSpline)?, "\"tps\"");
        Ok(())
    }

    #[test]
    fn fit_dispatches_on_model() -> Result<(), WarpError> {
        let source = [Landmark::new(1, 1), Landmark::new(1, 8), Landmark::new(8, 1)];
        let reference = [Landmark::new(0, 0), Landmark::new(0, 7), Landmark::new(7, 0)];
        let set = CorrespondenceSet::new(&source, &reference)?;

        for model in [DeformationModel::ThinPlateSpline, DeformationModel::LocallyAffine] {
            let mapping = fit(&set, model)?;
            assert_eq!(mapping.model(), model);
            let p = mapping.map([3.0, 2.0]);
            assert!((p[0] - 4.0).abs() < 1e-6);
            assert!((p[1] - 3.0).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn fit_rejects_invalid_config() -> Result<(), WarpError> {
        let points = [Landmark::new(0, 0), Landmark::new(0, 7), Landmark::new(7, 0)];
        let set = CorrespondenceSet::new(&points, &points)?;
        let config = WarpConfig {
            tps_regularization: -1.0,
            ..Default::default()
        };
        let res = fit_with_config(&set, DeformationModel::ThinPlateSpline, &config);
        assert!(matches!(res, Err(WarpError::InvalidParameter { .. })));

        let config = WarpConfig {
            larm_distance_exponent: f64::NAN,
            ..Default::default()
        };
        let res = fit_with_config(&set, DeformationModel::LocallyAffine, &config);
        assert!(matches!(res, Err(WarpError::InvalidParameter { .. })));
        Ok(())
    }
}
