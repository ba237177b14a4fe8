//! Field storage for a single patch.
//!
//! Every component lives in its own [`Lattice`]. Components are stored at their
//! staggered positions, but share the index layout, so the value of `Ex` at
//! `(i + 1/2, j, k)` has the same index as `Ey` at `(i, j + 1/2, k)`.

use nalgebra::{
    Vector2,
    Vector3,
};
use num::complex::Complex64;

use crate::{
    algorithm::CoordinateSystem,
    error::SolverError,
    lattice::{
        Lattice,
        Strider,
    },
    physics::PhysicalConstants,
};

/// Electric field, magnetic field and current density on a Cartesian patch,
/// indexed by [`Axis::vector_index`](crate::util::Axis::vector_index).
#[derive(Clone, Debug)]
pub struct CartesianFields {
    pub e: [Lattice<f64>; 3],
    pub b: [Lattice<f64>; 3],
    pub j: [Lattice<f64>; 3],
}

impl CartesianFields {
    /// Zero-initialized fields with `ghost` layers on every side.
    pub fn new(size: &Vector3<usize>, ghost: usize) -> Self {
        Self::from_strider(&Strider::new(size, &Vector3::repeat(ghost)))
    }

    pub fn from_strider(strider: &Strider) -> Self {
        let zeros = || std::array::from_fn(|_| Lattice::from_default(strider));
        Self {
            e: zeros(),
            b: zeros(),
            j: zeros(),
        }
    }

    pub fn strider(&self) -> &Strider {
        self.e[0].strider()
    }

    /// Checks that all components share the same layout and returns it.
    pub fn layout(&self) -> Result<&Strider, SolverError> {
        shared_layout(self.e.iter().chain(&self.b).chain(&self.j))
    }

    /// Total electromagnetic energy of the interior,
    /// `sum (eps_0 E^2 + B^2 / mu_0) / 2 dV`.
    pub fn energy(&self, physical_constants: &PhysicalConstants, cell_size: &Vector3<f64>) -> f64 {
        let squared_sum = |components: &[Lattice<f64>; 3]| -> f64 {
            components
                .iter()
                .map(|component| {
                    component
                        .iter(..)
                        .map(|(_, _, value)| value * value)
                        .sum::<f64>()
                })
                .sum()
        };

        let cell_volume = cell_size.product();
        0.5 * cell_volume
            * (physical_constants.vacuum_permittivity * squared_sum(&self.e)
                + squared_sum(&self.b) / physical_constants.vacuum_permeability)
    }
}

/// Azimuthal-mode amplitudes of the fields on a cylindrical patch. Components
/// are ordered `(r, theta, z)`.
///
/// The lattice axes are `(r, z, m)`. Only `r` and `z` carry ghost layers.
#[derive(Clone, Debug)]
pub struct CylindricalFields {
    pub e: [Lattice<Complex64>; 3],
    pub b: [Lattice<Complex64>; 3],
    pub j: [Lattice<Complex64>; 3],
}

impl CylindricalFields {
    /// Zero-initialized fields for `size = [nr, nz]` cells and `n_modes`
    /// azimuthal modes.
    pub fn new(size: &Vector2<usize>, n_modes: usize, ghost: usize) -> Self {
        Self::from_strider(&Strider::new(
            &Vector3::new(size.x, size.y, n_modes),
            &Vector3::new(ghost, ghost, 0),
        ))
    }

    pub fn from_strider(strider: &Strider) -> Self {
        let zeros = || std::array::from_fn(|_| Lattice::from_default(strider));
        Self {
            e: zeros(),
            b: zeros(),
            j: zeros(),
        }
    }

    pub fn strider(&self) -> &Strider {
        self.e[0].strider()
    }

    pub fn n_modes(&self) -> usize {
        self.strider().size().z
    }

    pub fn layout(&self) -> Result<&Strider, SolverError> {
        shared_layout(self.e.iter().chain(&self.b).chain(&self.j))
    }

    /// Electromagnetic energy of the interior mode amplitudes,
    /// `sum (eps_0 |E|^2 + |B|^2 / mu_0) / 2 dr dz`.
    ///
    /// The sum is not weighted by radius, so nodes on the axis count like any
    /// other node.
    pub fn energy(&self, physical_constants: &PhysicalConstants, cell_size: &Vector2<f64>) -> f64 {
        let squared_sum = |components: &[Lattice<Complex64>; 3]| -> f64 {
            components
                .iter()
                .map(|component| {
                    component
                        .iter(..)
                        .map(|(_, _, value)| value.norm_sqr())
                        .sum::<f64>()
                })
                .sum()
        };

        let cell_area = cell_size.product();
        0.5 * cell_area
            * (physical_constants.vacuum_permittivity * squared_sum(&self.e)
                + squared_sum(&self.b) / physical_constants.vacuum_permeability)
    }
}

/// Mutable fields of either coordinate system.
#[derive(Debug)]
pub enum FieldsMut<'a> {
    Cartesian(&'a mut CartesianFields),
    Cylindrical(&'a mut CylindricalFields),
}

impl FieldsMut<'_> {
    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Self::Cartesian(_) => CoordinateSystem::Cartesian,
            Self::Cylindrical(_) => CoordinateSystem::Cylindrical,
        }
    }
}

impl<'a> From<&'a mut CartesianFields> for FieldsMut<'a> {
    fn from(value: &'a mut CartesianFields) -> Self {
        Self::Cartesian(value)
    }
}

impl<'a> From<&'a mut CylindricalFields> for FieldsMut<'a> {
    fn from(value: &'a mut CylindricalFields) -> Self {
        Self::Cylindrical(value)
    }
}

fn shared_layout<'a, T: 'a>(
    mut components: impl Iterator<Item = &'a Lattice<T>>,
) -> Result<&'a Strider, SolverError> {
    let first = components
        .next()
        .ok_or(SolverError::FieldLayoutMismatch)?
        .strider();
    if components.all(|component| component.strider() == first) {
        Ok(first)
    }
    else {
        Err(SolverError::FieldLayoutMismatch)
    }
}
