use std::ops::{
    Index,
    IndexMut,
    RangeBounds,
};

use nalgebra::{
    Point3,
    Vector3,
    Vector4,
};

use crate::util::{
    PointIter,
    iter_points,
};

/// Maps lattice points to linear indices.
///
/// The interior of the lattice spans `0..size` along each axis. It is padded
/// by `ghost` layers on both sides of each axis, so points from `-ghost` to
/// `size + ghost` (exclusive) are addressable. Ghost values are owned by
/// whoever exchanges data between patches; the field updates only read them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strider {
    size: Vector3<usize>,
    ghost: Vector3<usize>,
    strides: Vector4<usize>,
    signed_strides: Vector3<isize>,
}

impl Strider {
    pub fn new(size: &Vector3<usize>, ghost: &Vector3<usize>) -> Self {
        let strides = strides_for_size(&(size + 2 * ghost));
        Self {
            size: *size,
            ghost: *ghost,
            strides,
            signed_strides: strides.xyz().map(|stride| stride as isize),
        }
    }

    /// Interior size.
    pub fn size(&self) -> &Vector3<usize> {
        &self.size
    }

    /// Number of ghost layers on each side, per axis.
    pub fn ghost(&self) -> &Vector3<usize> {
        &self.ghost
    }

    pub fn padded_size(&self) -> Vector3<usize> {
        self.size + 2 * self.ghost
    }

    pub fn strides(&self) -> &Vector4<usize> {
        &self.strides
    }

    /// Number of stored values, including ghost layers.
    pub fn len(&self) -> usize {
        self.strides.w
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_addressable(&self, point: &Point3<isize>) -> bool {
        (0..3).all(|i| {
            let ghost = self.ghost[i] as isize;
            point[i] >= -ghost && point[i] < self.size[i] as isize + ghost
        })
    }

    fn index_unchecked(&self, point: &Point3<isize>) -> usize {
        let padded = point.coords + self.ghost.map(|ghost| ghost as isize);
        padded.dot(&self.signed_strides) as usize
    }

    pub fn index(&self, point: &Point3<isize>) -> Option<usize> {
        self.is_addressable(point)
            .then(|| self.index_unchecked(point))
    }

    fn point_unchecked(&self, mut index: usize) -> Point3<isize> {
        let z = index / self.strides.z;
        index %= self.strides.z;
        let y = index / self.strides.y;
        index %= self.strides.y;
        let x = index / self.strides.x;
        Point3::new(
            x as isize - self.ghost.x as isize,
            y as isize - self.ghost.y as isize,
            z as isize - self.ghost.z as isize,
        )
    }

    /// Returns the point stored at `index`, which may lie in a ghost layer.
    pub fn point(&self, index: usize) -> Option<Point3<isize>> {
        (index < self.len()).then(|| self.point_unchecked(index))
    }

    /// Returns the point stored at `index` if it is an interior point.
    pub fn interior_point(&self, index: usize) -> Option<Point3<usize>> {
        let point = self.point(index)?;
        let inside = (0..3).all(|i| point[i] >= 0 && point[i] < self.size[i] as isize);
        inside.then(|| point.map(|x| x as usize))
    }

    /// Index of the point at `offset` from the point at `index`.
    ///
    /// The caller must make sure the neighbor is addressable, i.e. the offset
    /// doesn't reach further than the ghost layers.
    #[inline(always)]
    pub fn shift(&self, index: usize, offset: &Vector3<isize>) -> usize {
        (index as isize + offset.dot(&self.signed_strides)) as usize
    }

    /// Iterates over interior points in `range`.
    pub fn iter(&self, range: impl RangeBounds<Point3<usize>>) -> StriderIter {
        StriderIter {
            points: iter_points(range, self.size),
            strider: *self,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StriderIter {
    points: PointIter,
    strider: Strider,
}

impl Iterator for StriderIter {
    type Item = (usize, Point3<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.points.next()?;
        let index = self
            .strider
            .index_unchecked(&point.map(|x| x as isize));
        Some((index, point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

// the where bound is just so we get a compiler error if PointIter happens to be
// not an ExactSizeIterator anymore.
impl ExactSizeIterator for StriderIter where PointIter: ExactSizeIterator {}

pub fn strides_for_size(size: &Vector3<usize>) -> Vector4<usize> {
    let mut strides = Vector4::zeros();
    strides.x = 1;
    strides.y = strides.x * size.x;
    strides.z = strides.y * size.y;
    strides.w = strides.z * size.z;
    strides
}

/// Values stored on every point of a [`Strider`], ghost layers included.
#[derive(Clone, Debug)]
pub struct Lattice<T> {
    strider: Strider,
    data: Box<[T]>,
}

impl<T> Lattice<T>
where
    T: Default,
{
    pub fn from_default(strider: &Strider) -> Self {
        Self::from_fn(strider, |_| Default::default())
    }
}

impl<T> Lattice<T>
where
    T: Clone,
{
    pub fn from_value(strider: &Strider, value: T) -> Self {
        Self::from_fn(strider, |_| value.clone())
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Lattice<T> {
    /// Creates a lattice by evaluating `init` at every stored point, including
    /// points in the ghost layers.
    pub fn from_fn(strider: &Strider, mut init: impl FnMut(Point3<isize>) -> T) -> Self {
        let data = (0..strider.len())
            .map(|index| init(strider.point_unchecked(index)))
            .collect();
        Self {
            strider: *strider,
            data,
        }
    }

    pub fn strider(&self) -> &Strider {
        &self.strider
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, point: &Point3<isize>) -> Option<&T> {
        let index = self.strider.index(point)?;
        Some(&self.data[index])
    }

    pub fn get_mut(&mut self, point: &Point3<isize>) -> Option<&mut T> {
        let index = self.strider.index(point)?;
        Some(&mut self.data[index])
    }

    /// Value at `offset` from the point at `index`.
    #[inline(always)]
    pub fn neighbor(&self, index: usize, offset: &Vector3<isize>) -> &T {
        &self.data[self.strider.shift(index, offset)]
    }

    /// Iterates over interior points in `range`.
    pub fn iter(
        &self,
        range: impl RangeBounds<Point3<usize>>,
    ) -> impl Iterator<Item = (usize, Point3<usize>, &T)> {
        self.strider
            .iter(range)
            .map(|(index, point)| (index, point, &self.data[index]))
    }

    /// Iterates mutably over all interior points.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, Point3<usize>, &mut T)> {
        let strider = self.strider;
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, value)| Some((index, strider.interior_point(index)?, value)))
    }

    #[cfg(feature = "rayon")]
    pub fn par_iter_mut(
        &mut self,
    ) -> impl rayon::iter::ParallelIterator<Item = (usize, Point3<usize>, &mut T)>
    where
        T: Send,
    {
        use rayon::iter::{
            IndexedParallelIterator as _,
            IntoParallelRefMutIterator as _,
            ParallelIterator as _,
        };

        let strider = self.strider;
        self.data
            .par_iter_mut()
            .enumerate()
            .filter_map(move |(index, value)| Some((index, strider.interior_point(index)?, value)))
    }

    /// Overwrites the ghost layers with values from the opposite side of the
    /// interior, as a periodic exchange with itself would.
    #[cfg(test)]
    pub(crate) fn wrap_ghosts_periodic(&mut self)
    where
        T: Clone,
    {
        for index in 0..self.len() {
            if self.strider.interior_point(index).is_some() {
                continue;
            }
            let point = self.strider.point_unchecked(index);
            let wrapped = Point3::from(
                point
                    .coords
                    .zip_map(&self.strider.size, |x, n| x.rem_euclid(n as isize)),
            );
            let source = self.strider.index_unchecked(&wrapped);
            self.data[index] = self.data[source].clone();
        }
    }
}

impl<T> Index<usize> for Lattice<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Lattice<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
