use std::time::{Duration, Instant};

use lmwarp_image::Image;
use lmwarp_imgproc::warp::{
    backward_warp, evaluate, fit_with_config, CorrespondenceSet, DeformationModel, Landmark,
    MappingField, WarpConfig, WarpError,
};

/// Result of a spatial transform.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The warped image, sized like the reference image.
    pub image: Image<u8, 3>,
    /// The lookup field used to sample the source image.
    pub field: MappingField,
    /// Wall-clock time spent in fit, evaluate and resample.
    pub elapsed: Duration,
}

/// A single transform request: warp `source` onto the grid of `reference`.
///
/// The request is validated on construction. [`SpatialTransform::run`] borrows it
/// and recomputes the fit on every call; no state is cached between runs.
///
/// # Example
///
/// ```
/// use lmwarp::image::{Image, ImageSize};
/// use lmwarp::imgproc::warp::{DeformationModel, Landmark};
/// use lmwarp::SpatialTransform;
///
/// let size = ImageSize { width: 8, height: 8 };
/// let source = Image::<u8, 3>::from_size_val(size, 100).unwrap();
/// let reference = Image::<u8, 3>::from_size_val(size, 0).unwrap();
///
/// let points = [Landmark::new(0, 0), Landmark::new(0, 7), Landmark::new(7, 0)];
/// let output = SpatialTransform::from_landmarks(
///     &source,
///     &reference,
///     &points,
///     &points,
///     DeformationModel::ThinPlateSpline,
/// )
/// .unwrap()
/// .run()
/// .unwrap();
///
/// assert_eq!(output.image.size(), size);
/// ```
#[derive(Debug)]
pub struct SpatialTransform<'a> {
    source: &'a Image<u8, 3>,
    reference: &'a Image<u8, 3>,
    correspondences: CorrespondenceSet,
    model: DeformationModel,
    config: WarpConfig,
}

impl<'a> SpatialTransform<'a> {
    /// Create a transform request from an already validated correspondence set.
    ///
    /// # Errors
    ///
    /// [`WarpError::EmptyImage`] if either image has no pixels.
    pub fn new(
        source: &'a Image<u8, 3>,
        reference: &'a Image<u8, 3>,
        correspondences: CorrespondenceSet,
        model: DeformationModel,
    ) -> Result<Self, WarpError> {
        check_images(source, reference)?;

        let outside = correspondences
            .iter()
            .filter(|p| !inside(&p.reference, reference) || !inside(&p.source, source))
            .count();
        if outside > 0 {
            log::warn!("{outside} landmark pairs lie outside their image");
        }

        Ok(Self {
            source,
            reference,
            correspondences,
            model,
            config: WarpConfig::default(),
        })
    }

    /// Create a transform request from the landmark lists of both images.
    ///
    /// # Errors
    ///
    /// Any precondition error: an empty image, unequal landmark counts, or no
    /// landmarks at all.
    pub fn from_landmarks(
        source: &'a Image<u8, 3>,
        reference: &'a Image<u8, 3>,
        source_landmarks: &[Landmark],
        reference_landmarks: &[Landmark],
        model: DeformationModel,
    ) -> Result<Self, WarpError> {
        check_images(source, reference)?;
        let correspondences = CorrespondenceSet::new(source_landmarks, reference_landmarks)?;
        Self::new(source, reference, correspondences, model)
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: WarpConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration the transform will run with.
    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Fit the deformation, evaluate it over the reference grid and resample the source.
    pub fn run(&self) -> Result<TransformOutput, WarpError> {
        let start = Instant::now();

        let mapping = fit_with_config(&self.correspondences, self.model, &self.config)?;
        let field = evaluate(&mapping, self.reference.size(), self.config.execution)?;
        let image = backward_warp(
            self.source,
            &field,
            self.config.interpolation,
            self.config.out_of_hull,
            self.config.execution,
        )?;

        let elapsed = start.elapsed();
        log::info!(
            "{} transform of {} onto {} with {} landmarks took {:.2?}",
            self.model,
            self.source.size(),
            self.reference.size(),
            self.correspondences.len(),
            elapsed
        );

        Ok(TransformOutput {
            image,
            field,
            elapsed,
        })
    }
}

fn check_images(source: &Image<u8, 3>, reference: &Image<u8, 3>) -> Result<(), WarpError> {
    if source.size().is_empty() {
        return Err(WarpError::EmptyImage("source"));
    }
    if reference.size().is_empty() {
        return Err(WarpError::EmptyImage("reference"));
    }
    Ok(())
}

fn inside(landmark: &Landmark, image: &Image<u8, 3>) -> bool {
    landmark.row >= 0
        && landmark.col >= 0
        && (landmark.row as usize) < image.rows()
        && (landmark.col as usize) < image.cols()
}
