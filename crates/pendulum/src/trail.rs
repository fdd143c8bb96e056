//! Bounded trajectory history for rendering a fading trail.
//!
//! The trail is a strict FIFO of the most recent [`TRAIL_CAPACITY`] bob
//! positions. It stores rendering-space points exactly as the driver
//! projected them; it never projects, thins or deduplicates anything itself.

use core::fmt;

/// Maximum number of points kept in a [`Trail`].
pub const TRAIL_CAPACITY: usize = 50;

/// A point in rendering space (pixels, `y` growing downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin point (0, 0).
    #[inline]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Fixed-capacity ring buffer of [`Point`]s, oldest first.
///
/// Appending to a full trail evicts the oldest point, so after any number of
/// pushes the trail holds the last `min(n, TRAIL_CAPACITY)` points in the
/// order they were pushed.
///
/// # Example
///
/// ```rust
/// use pendulum::{Point, Trail, TRAIL_CAPACITY};
///
/// let mut trail = Trail::new();
/// for i in 0..60 {
///     trail.push(Point::new(f64::from(i), 0.0));
/// }
///
/// assert_eq!(trail.len(), TRAIL_CAPACITY);
/// assert_eq!(trail.oldest(), Some(Point::new(10.0, 0.0)));
/// assert_eq!(trail.latest(), Some(Point::new(59.0, 0.0)));
/// ```
#[derive(Clone)]
pub struct Trail {
    points: [Point; TRAIL_CAPACITY],
    head: usize,
    len: usize,
}

impl Trail {
    /// Creates an empty trail.
    pub const fn new() -> Self {
        Self {
            points: [Point::origin(); TRAIL_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    /// Appends a point at the tail, evicting the oldest one when full.
    pub fn push(&mut self, point: Point) {
        if self.len < TRAIL_CAPACITY {
            self.points[(self.head + self.len) % TRAIL_CAPACITY] = point;
            self.len += 1;
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % TRAIL_CAPACITY;
        }
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Number of points currently held.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the trail holds no points.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The oldest point still in the trail.
    pub fn oldest(&self) -> Option<Point> {
        self.get(0)
    }

    /// The most recently pushed point.
    pub fn latest(&self) -> Option<Point> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns the point at `index`, counting from the oldest.
    pub fn get(&self, index: usize) -> Option<Point> {
        (index < self.len).then(|| self.points[(self.head + index) % TRAIL_CAPACITY])
    }

    /// Iterates from the oldest point to the newest.
    pub fn iter(&self) -> TrailIter<'_> {
        TrailIter {
            trail: self,
            front: 0,
            back: self.len,
        }
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Trail {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Extend<Point> for Trail {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        for point in iter {
            self.push(point);
        }
    }
}

impl FromIterator<Point> for Trail {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut trail = Self::new();
        trail.extend(iter);
        trail
    }
}

impl<'a> IntoIterator for &'a Trail {
    type Item = Point;
    type IntoIter = TrailIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Trail`] in chronological order.
#[derive(Debug, Clone)]
pub struct TrailIter<'a> {
    trail: &'a Trail,
    front: usize,
    back: usize,
}

impl Iterator for TrailIter<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.front == self.back {
            return None;
        }
        let point = self.trail.get(self.front);
        self.front += 1;
        point
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for TrailIter<'_> {
    fn next_back(&mut self) -> Option<Point> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.trail.get(self.back)
    }
}

impl ExactSizeIterator for TrailIter<'_> {}

#[cfg(feature = "serde")]
impl serde::Serialize for Trail {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn point(i: usize) -> Point {
        Point::new(i as f64, -(i as f64))
    }

    #[test]
    fn test_new_is_empty() {
        let trail = Trail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
        assert_eq!(trail.oldest(), None);
        assert_eq!(trail.latest(), None);
        assert_eq!(trail.iter().count(), 0);
    }

    #[test]
    fn test_push_below_capacity_keeps_order() {
        let mut trail = Trail::new();
        for i in 0..10 {
            trail.push(point(i));
        }
        assert_eq!(trail.len(), 10);
        assert!(trail.iter().eq((0..10).map(point)));
    }

    #[test]
    fn test_push_past_capacity_evicts_oldest() {
        let mut trail = Trail::new();
        for i in 0..(TRAIL_CAPACITY + 7) {
            trail.push(point(i));
        }
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        assert_eq!(trail.oldest(), Some(point(7)));
        assert_eq!(trail.latest(), Some(point(TRAIL_CAPACITY + 6)));
        assert!(trail.iter().eq((7..TRAIL_CAPACITY + 7).map(point)));
    }

    #[test]
    fn test_no_deduplication() {
        let mut trail = Trail::new();
        trail.push(Point::new(1.0, 1.0));
        trail.push(Point::new(1.0, 1.0));
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut trail: Trail = (0..80).map(point).collect();
        trail.clear();
        assert!(trail.is_empty());

        trail.push(point(3));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.oldest(), Some(point(3)));
        assert_eq!(trail.latest(), Some(point(3)));
    }

    #[test]
    fn test_reverse_iteration() {
        let trail: Trail = (0..60).map(point).collect();
        let newest_first: Option<Point> = trail.iter().next_back();
        assert_eq!(newest_first, Some(point(59)));
        assert!(trail.iter().rev().eq((10..60).rev().map(point)));
    }

    #[test]
    fn test_equality_ignores_physical_layout() {
        // Same logical content, different head offsets.
        let wrapped: Trail = (0..(TRAIL_CAPACITY + 3)).map(point).collect();
        let straight: Trail = (3..(TRAIL_CAPACITY + 3)).map(point).collect();
        assert_eq!(wrapped, straight);

        let shorter: Trail = (4..(TRAIL_CAPACITY + 3)).map(point).collect();
        assert_ne!(wrapped, shorter);
    }

    #[test]
    fn test_exact_size() {
        let trail: Trail = (0..12).map(point).collect();
        let mut iter = trail.iter();
        assert_eq!(iter.len(), 12);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), 10);
    }
}
