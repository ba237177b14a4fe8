use std::ops::{
    Bound,
    Range,
    RangeBounds,
};

use nalgebra::{
    Point3,
    Vector3,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    pub fn vector_index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two other axes in cyclic order, i.e. `(y, z)` for `x`, `(z, x)` for
    /// `y` and `(x, y)` for `z`.
    pub fn transverse(&self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Unit step along this axis, as a signed lattice offset.
    pub fn step(&self) -> Vector3<isize> {
        let mut e = Vector3::zeros();
        e[self.vector_index()] = 1;
        e
    }
}

pub fn iter_points(range: impl RangeBounds<Point3<usize>>, size: Vector3<usize>) -> PointIter {
    let Range { start, end } = normalize_point_bounds(range, size);

    PointIter {
        x0: start.coords,
        x1: end.coords,
        x: (start.coords.zip_map(&end.coords, |x0, x1| x0 < x1).iter().all(|x| *x))
            .then_some(start.coords),
    }
}

pub fn normalize_point_bounds(
    range: impl RangeBounds<Point3<usize>>,
    size: Vector3<usize>,
) -> Range<Point3<usize>> {
    let start = match range.start_bound() {
        Bound::Included(start) => *start,
        Bound::Excluded(start) => start + Vector3::repeat(1),
        Bound::Unbounded => Point3::origin(),
    };

    let end = match range.end_bound() {
        Bound::Included(end) => end + Vector3::repeat(1),
        Bound::Excluded(end) => *end,
        Bound::Unbounded => size.into(),
    };

    let end = start
        .coords
        .zip_map(&end.coords, |x0, x1| x0.max(x1))
        .into();

    Range { start, end }
}

#[derive(Clone, Copy, Debug)]
pub struct PointIter {
    x0: Vector3<usize>,
    x1: Vector3<usize>,
    x: Option<Vector3<usize>>,
}

impl Iterator for PointIter {
    type Item = Point3<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = |mut x_n: Vector3<usize>| {
            x_n.x += 1;
            if x_n.x >= self.x1.x {
                x_n.x = self.x0.x;
                x_n.y += 1;
                if x_n.y >= self.x1.y {
                    x_n.y = self.x0.y;
                    x_n.z += 1;
                    if x_n.z >= self.x1.z {
                        return None;
                    }
                }
            }
            Some(x_n)
        };

        let x = self.x?;
        self.x = next(x);
        Some(Point3::from(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if let Some(x) = self.x {
            let dx = self.x1 - self.x0;
            (self.x1.z - x.z - 1) * dx.y * dx.x + (self.x1.y - x.y - 1) * dx.x + (self.x1.x - x.x)
        }
        else {
            0
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for PointIter {}

#[cfg(test)]
mod tests {
    use nalgebra::{
        Point3,
        Vector3,
    };

    use crate::util::{
        Axis,
        iter_points,
    };

    #[test]
    fn it_iters_inclusive() {
        let x0 = Point3::new(1, 2, 3);
        let x1 = Point3::new(2, 3, 4);
        let points = iter_points(x0..=x1, x1.coords).collect::<Vec<_>>();
        assert_eq!(
            points,
            vec![
                Point3::new(1, 2, 3),
                Point3::new(2, 2, 3),
                Point3::new(1, 3, 3),
                Point3::new(2, 3, 3),
                Point3::new(1, 2, 4),
                Point3::new(2, 2, 4),
                Point3::new(1, 3, 4),
                Point3::new(2, 3, 4),
            ]
        );
    }

    #[test]
    fn it_iters_nothing_for_empty_range() {
        let size = Vector3::new(4, 0, 2);
        assert_eq!(iter_points(.., size).count(), 0);
    }

    #[test]
    fn it_reports_exact_size() {
        let mut points = iter_points(.., Vector3::new(3, 2, 2));
        assert_eq!(points.len(), 12);
        points.next();
        points.next();
        points.next();
        points.next();
        assert_eq!(points.len(), 8);
        assert_eq!(points.count(), 8);
    }

    #[test]
    fn it_cycles_transverse_axes() {
        assert_eq!(Axis::X.transverse(), (Axis::Y, Axis::Z));
        assert_eq!(Axis::Y.transverse(), (Axis::Z, Axis::X));
        assert_eq!(Axis::Z.transverse(), (Axis::X, Axis::Y));
    }
}
