use argh::FromArgs;
use std::path::{Path, PathBuf};

use lmwarp::image::{Image, ImageSize};
use lmwarp::imgproc::warp::{CorrespondenceSet, DeformationModel, WarpConfig};
use lmwarp::SpatialTransform;

mod landmarks;

use landmarks::LandmarkFile;

#[derive(FromArgs)]
/// Warp a source image onto a reference image from paired landmarks.
struct Args {
    /// path to the source image
    #[argh(option)]
    source: PathBuf,

    /// path to the reference image, its size is the output size
    #[argh(option)]
    reference: PathBuf,

    /// path to the landmark pairs json, points in (x, y) order
    #[argh(option)]
    landmarks: PathBuf,

    /// deformation model, TPS or LARM
    #[argh(option, default = "DeformationModel::ThinPlateSpline")]
    model: DeformationModel,

    /// path of the warped png to write
    #[argh(option, default = "PathBuf::from(\"warped.png\")")]
    output: PathBuf,

    /// optional warp configuration json
    #[argh(option)]
    config: Option<PathBuf>,

    /// factor applied to the landmark coordinates
    #[argh(option, default = "1.0")]
    scale: f64,

    /// resize both images to a square of this side before warping
    #[argh(option)]
    resize: Option<u32>,
}

fn read_rgb(
    path: &Path,
    resize: Option<u32>,
) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let mut img = image::open(path)?;
    if let Some(side) = resize {
        img = img.resize_exact(side, side, image::imageops::FilterType::Triangle);
    }
    let rgb = img.to_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };
    Ok(Image::new(size, rgb.into_raw())?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => serde_json::from_reader(std::fs::File::open(path)?)?,
        None => WarpConfig::default(),
    };

    let source = read_rgb(&args.source, args.resize)?;
    let reference = read_rgb(&args.reference, args.resize)?;
    log::info!(
        "source {}, reference {}",
        source.size(),
        reference.size()
    );

    let (source_log, reference_log) = LandmarkFile::read(&args.landmarks)?.into_logs(args.scale);
    let correspondences = CorrespondenceSet::from_logs(&source_log, &reference_log)?;

    let output = SpatialTransform::new(&source, &reference, correspondences, args.model)?
        .with_config(config)
        .run()?;

    let size = output.image.size();
    let buffer = image::RgbImage::from_raw(
        size.width as u32,
        size.height as u32,
        output.image.into_vec(),
    )
    .ok_or("warped buffer does not match its size")?;
    buffer.save(&args.output)?;

    println!(
        "Execute time: {:.2} s, written to {}",
        output.elapsed.as_secs_f64(),
        args.output.display()
    );

    Ok(())
}
