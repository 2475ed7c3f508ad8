//! Nearest-neighbour pairing of labels and markers.
//!
//! Labels and their circles are drawn in plan, so only the XY projection
//! takes part in matching. The matcher itself is stateless; callers keep
//! track of which candidates are already paired and leave them out of later
//! searches, which is what makes each pass a 1:1 pairing.

use borehole_core::geometry::Point2;

/// A candidate chosen by [`SpatialMatcher::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Caller-supplied index of the chosen candidate.
    pub index: usize,
    /// XY distance from the search origin.
    pub distance: f64,
}

/// Bounded nearest-neighbour search in the XY plane.
///
/// # Examples
///
/// ```
/// use borehole::matcher::SpatialMatcher;
/// use borehole_core::geometry::Point2;
///
/// let matcher = SpatialMatcher::default();
/// let circles = [Point2::new(100.0, 0.0), Point2::new(3.5, 4.2)];
///
/// let hit = matcher
///     .nearest(Point2::new(3.0, 4.0), circles.iter().copied().enumerate())
///     .unwrap();
/// assert_eq!(hit.index, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatcher {
    max_distance: f64,
}

impl Default for SpatialMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DISTANCE)
    }
}

impl SpatialMatcher {
    /// Default search radius, in drawing units
    pub const DEFAULT_MAX_DISTANCE: f64 = 50.0;

    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Returns the candidate closest to `origin` within the search radius.
    ///
    /// Candidates are scanned once in iteration order and the first one seen
    /// wins a tie. A candidate exactly at the radius still qualifies. Returns
    /// `None` for an empty candidate set or when every candidate is too far.
    pub fn nearest<I>(&self, origin: Point2, candidates: I) -> Option<Nearest>
    where
        I: IntoIterator<Item = (usize, Point2)>,
    {
        let mut best: Option<Nearest> = None;

        for (index, point) in candidates {
            let distance = origin.distance(point);
            if distance > self.max_distance || distance.is_nan() {
                continue;
            }
            if best.is_none_or(|current| distance < current.distance) {
                best = Some(Nearest { index, distance });
            }
        }

        best
    }

    /// Like [`nearest`](Self::nearest), over a slice of points, skipping
    /// indices already marked in `consumed`.
    pub fn nearest_available(
        &self,
        origin: Point2,
        points: &[Point2],
        consumed: &[bool],
    ) -> Option<Nearest> {
        if points.is_empty() {
            return None;
        }

        let available = points
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, _)| !consumed.get(*index).copied().unwrap_or(false));

        self.nearest(origin, available)
    }
}
