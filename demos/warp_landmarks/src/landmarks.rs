use std::path::Path;

use lmwarp::imgproc::warp::{Landmark, LandmarkLog};
use serde::Deserialize;

/// Landmarks as clicked on screen, in (x, y) order.
#[derive(Debug, Deserialize)]
pub struct LandmarkFile {
    pub source: Vec<[f64; 2]>,
    pub reference: Vec<[f64; 2]>,
}

impl LandmarkFile {
    pub fn read(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Scale the clicks and swap them into (row, col) landmark logs.
    pub fn into_logs(self, scale: f64) -> (LandmarkLog, LandmarkLog) {
        (to_log(&self.source, scale), to_log(&self.reference, scale))
    }
}

fn to_log(points: &[[f64; 2]], scale: f64) -> LandmarkLog {
    // truncate toward zero like the pixel grid of the canvas
    points
        .iter()
        .map(|p| Landmark::from_xy((p[0] * scale) as i32, (p[1] * scale) as i32))
        .collect()
}
