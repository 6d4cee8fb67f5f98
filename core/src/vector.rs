//! Grid primitives shared by every spatial computation in the engine.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Position of a single map field expressed as 1-indexed coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    x: i32,
    y: i32,
}

impl Vector {
    /// Creates a new map position from 1-indexed components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub const fn distance(self, other: Vector) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Enumerates the four orthogonal neighbours in up, right, down, left
    /// order. The order is fixed so every caller iterating candidates makes
    /// identical decisions on identical input.
    #[must_use]
    pub const fn adjacent(self) -> [Vector; 4] {
        [
            Vector::new(self.x, self.y - 1),
            Vector::new(self.x + 1, self.y),
            Vector::new(self.x, self.y + 1),
            Vector::new(self.x - 1, self.y),
        ]
    }

    /// Expands a cross-shaped diamond of positions within the given
    /// Manhattan radius, including the origin itself.
    ///
    /// Rows are scanned top to bottom and columns left to right so the
    /// resulting order is deterministic.
    #[must_use]
    pub fn expand_star(self, radius: u32) -> Vec<Vector> {
        let radius = radius as i32;
        let mut positions = Vec::new();
        for dy in -radius..=radius {
            let span = radius - dy.abs();
            for dx in -span..=span {
                positions.push(Vector::new(self.x + dx, self.y + dy));
            }
        }
        positions
    }

    /// Reports whether the position lies within the 1-indexed bounds.
    #[must_use]
    pub const fn within(self, size: SizeVector) -> bool {
        self.x >= 1 && self.x <= size.width() && self.y >= 1 && self.y <= size.height()
    }
}

impl PartialOrd for Vector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vector {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

/// Bounds of a map measured in whole fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeVector {
    width: i32,
    height: i32,
}

impl SizeVector {
    /// Creates a new bounds descriptor.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of columns covered by the map.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows covered by the map.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of fields covered by the map.
    #[must_use]
    pub const fn area(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Reports whether the position lies within the bounds.
    #[must_use]
    pub const fn contains(&self, vector: Vector) -> bool {
        vector.within(*self)
    }
}

/// Mirror axes available when deriving symmetric positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symmetry {
    /// Mirror across the vertical centre line.
    Horizontal,
    /// Mirror across the horizontal centre line.
    Vertical,
    /// Mirror across both centre lines, including the diagonal reflection.
    HorizontalVertical,
}

/// Computes the mirrored counterparts of a position under the given
/// symmetry, excluding the origin itself and collapsing coincident mirrors.
#[must_use]
pub fn symmetric_positions(origin: Vector, symmetry: Symmetry, size: SizeVector) -> Vec<Vector> {
    let horizontal = Vector::new(size.width() + 1 - origin.x(), origin.y());
    let vertical = Vector::new(origin.x(), size.height() + 1 - origin.y());
    let diagonal = Vector::new(size.width() + 1 - origin.x(), size.height() + 1 - origin.y());

    let candidates: &[Vector] = match symmetry {
        Symmetry::Horizontal => &[horizontal],
        Symmetry::Vertical => &[vertical],
        Symmetry::HorizontalVertical => &[horizontal, vertical, diagonal],
    };

    let mut positions: Vec<Vector> = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        if candidate != origin && !positions.contains(&candidate) {
            positions.push(candidate);
        }
    }
    positions
}

/// Orders positions clockwise around their shared centroid.
///
/// Ties in angle break by squared distance from the centroid, closest
/// first. Callers that treat the result as a ring rely on this exact
/// ordering being stable across processes.
#[must_use]
pub fn clockwise_order(vectors: &[Vector]) -> Vec<Vector> {
    if vectors.len() < 2 {
        return vectors.to_vec();
    }

    let count = vectors.len() as f64;
    let cx = vectors.iter().map(|v| f64::from(v.x())).sum::<f64>() / count;
    let cy = vectors.iter().map(|v| f64::from(v.y())).sum::<f64>() / count;

    let mut ordered = vectors.to_vec();
    ordered.sort_by(|a, b| {
        let angle_a = (f64::from(a.y()) - cy).atan2(f64::from(a.x()) - cx);
        let angle_b = (f64::from(b.y()) - cy).atan2(f64::from(b.x()) - cx);
        let distance_a = (f64::from(a.x()) - cx).powi(2) + (f64::from(a.y()) - cy).powi(2);
        let distance_b = (f64::from(b.x()) - cx).powi(2) + (f64::from(b.y()) - cy).powi(2);
        angle_a
            .total_cmp(&angle_b)
            .then(distance_a.total_cmp(&distance_b))
            .then(a.cmp(b))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::{clockwise_order, symmetric_positions, SizeVector, Symmetry, Vector};

    #[test]
    fn distance_matches_expectation() {
        let origin = Vector::new(1, 1);
        let destination = Vector::new(4, 3);
        assert_eq!(origin.distance(destination), 5);
        assert_eq!(destination.distance(origin), 5);
    }

    #[test]
    fn adjacency_order_is_fixed() {
        let origin = Vector::new(3, 3);
        assert_eq!(
            origin.adjacent(),
            [
                Vector::new(3, 2),
                Vector::new(4, 3),
                Vector::new(3, 4),
                Vector::new(2, 3),
            ],
        );
    }

    #[test]
    fn star_expansion_covers_the_diamond() {
        let positions = Vector::new(5, 5).expand_star(2);
        assert_eq!(positions.len(), 13);
        assert!(positions.contains(&Vector::new(5, 3)));
        assert!(positions.contains(&Vector::new(3, 5)));
        assert!(positions.contains(&Vector::new(5, 5)));
        assert!(!positions.contains(&Vector::new(3, 3)));
    }

    #[test]
    fn within_respects_one_indexed_bounds() {
        let size = SizeVector::new(4, 3);
        assert!(Vector::new(1, 1).within(size));
        assert!(Vector::new(4, 3).within(size));
        assert!(!Vector::new(0, 1).within(size));
        assert!(!Vector::new(5, 1).within(size));
        assert!(!Vector::new(1, 4).within(size));
    }

    #[test]
    fn symmetric_positions_exclude_origin_and_duplicates() {
        let size = SizeVector::new(8, 6);
        let mirrors = symmetric_positions(Vector::new(2, 2), Symmetry::HorizontalVertical, size);
        assert_eq!(
            mirrors,
            vec![Vector::new(7, 2), Vector::new(2, 5), Vector::new(7, 5)],
        );
    }

    #[test]
    fn symmetric_positions_collapse_on_axis() {
        let size = SizeVector::new(5, 5);
        let mirrors = symmetric_positions(Vector::new(3, 2), Symmetry::HorizontalVertical, size);
        assert_eq!(mirrors, vec![Vector::new(3, 4)]);

        let centre = symmetric_positions(Vector::new(3, 3), Symmetry::HorizontalVertical, size);
        assert!(centre.is_empty());
    }

    #[test]
    fn clockwise_order_forms_a_ring() {
        let ring = clockwise_order(&[
            Vector::new(5, 1),
            Vector::new(1, 1),
            Vector::new(1, 5),
            Vector::new(5, 5),
        ]);
        let top_left = ring
            .iter()
            .position(|v| *v == Vector::new(1, 1))
            .expect("ring contains the corner");
        let rotated: Vec<_> = ring.iter().cycle().skip(top_left).take(4).copied().collect();
        assert_eq!(
            rotated,
            vec![
                Vector::new(1, 1),
                Vector::new(5, 1),
                Vector::new(5, 5),
                Vector::new(1, 5),
            ],
        );
    }

    #[test]
    fn ordering_is_row_major() {
        let mut positions = vec![Vector::new(2, 2), Vector::new(1, 1), Vector::new(3, 1)];
        positions.sort();
        assert_eq!(
            positions,
            vec![Vector::new(1, 1), Vector::new(3, 1), Vector::new(2, 2)],
        );
    }
}
