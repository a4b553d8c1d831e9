use super::error::WarpError;

/// An integer pixel coordinate in (row, col) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Landmark {
    /// Row (vertical) coordinate.
    pub row: i32,
    /// Column (horizontal) coordinate.
    pub col: i32,
}

impl Landmark {
    /// Create a landmark from (row, col).
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Create a landmark from screen (x, y) order, swapping to (row, col).
    ///
    /// # Example
    ///
    /// ```
    /// use lmwarp_imgproc::warp::Landmark;
    ///
    /// let lm = Landmark::from_xy(10, 3);
    /// assert_eq!((lm.row, lm.col), (3, 10));
    /// ```
    pub fn from_xy(x: i32, y: i32) -> Self {
        Self { row: y, col: x }
    }

    /// The coordinate as `[row, col]` in floating point.
    pub fn to_f64(self) -> [f64; 2] {
        [self.row as f64, self.col as f64]
    }
}

/// A source landmark paired with the reference landmark it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkPair {
    /// Landmark on the source image.
    pub source: Landmark,
    /// Landmark on the reference image.
    pub reference: Landmark,
}

/// A non-empty, positionally paired set of landmark correspondences.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceSet {
    pairs: Vec<LandmarkPair>,
}

impl CorrespondenceSet {
    /// Pair two landmark lists by position.
    ///
    /// # Errors
    ///
    /// * [`WarpError::LandmarkCountMismatch`] if the lists differ in length.
    /// * [`WarpError::NoLandmarks`] if both lists are empty.
    pub fn new(source: &[Landmark], reference: &[Landmark]) -> Result<Self, WarpError> {
        if source.len() != reference.len() {
            return Err(WarpError::LandmarkCountMismatch {
                source_count: source.len(),
                reference_count: reference.len(),
            });
        }

        let pairs = source
            .iter()
            .zip(reference.iter())
            .map(|(&source, &reference)| LandmarkPair { source, reference })
            .collect();

        Self::from_pairs(pairs)
    }

    /// Build the set from already paired landmarks.
    pub fn from_pairs(pairs: Vec<LandmarkPair>) -> Result<Self, WarpError> {
        if pairs.is_empty() {
            return Err(WarpError::NoLandmarks);
        }
        Ok(Self { pairs })
    }

    /// Pair the landmarks recorded in two logs.
    pub fn from_logs(source: &LandmarkLog, reference: &LandmarkLog) -> Result<Self, WarpError> {
        Self::new(source.as_slice(), reference.as_slice())
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false, the set holds at least one pair.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = &LandmarkPair> {
        self.pairs.iter()
    }

    /// Reference landmarks as `[row, col]`, the points the mapping is anchored on.
    pub fn control_points(&self) -> Vec<[f64; 2]> {
        self.pairs.iter().map(|p| p.reference.to_f64()).collect()
    }

    /// Source landmarks as `[row, col]`, the values the mapping reproduces.
    pub fn target_points(&self) -> Vec<[f64; 2]> {
        self.pairs.iter().map(|p| p.source.to_f64()).collect()
    }
}

/// Direction used to nudge a landmark by one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

/// Ordered record of the landmarks placed on one image.
///
/// Landmarks are identified by their 1-based position in the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkLog {
    landmarks: Vec<Landmark>,
}

impl LandmarkLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a landmark and return its 1-based id.
    pub fn push(&mut self, landmark: Landmark) -> usize {
        self.landmarks.push(landmark);
        self.landmarks.len()
    }

    /// Remove and return the last landmark.
    pub fn pop(&mut self) -> Option<Landmark> {
        self.landmarks.pop()
    }

    /// Remove all landmarks.
    pub fn clear(&mut self) {
        self.landmarks.clear();
    }

    /// Move the last landmark by one pixel. Does nothing on an empty log.
    pub fn nudge_last(&mut self, direction: Direction) {
        if let Some(last) = self.landmarks.last_mut() {
            match direction {
                Direction::Up => last.row -= 1,
                Direction::Down => last.row += 1,
                Direction::Left => last.col -= 1,
                Direction::Right => last.col += 1,
            }
        }
    }

    /// Landmark with the given 1-based id.
    pub fn get(&self, id: usize) -> Option<&Landmark> {
        id.checked_sub(1).and_then(|i| self.landmarks.get(i))
    }

    /// Number of landmarks.
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Iterate over the landmarks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// The landmarks as a slice.
    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl FromIterator<Landmark> for LandmarkLog {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}
