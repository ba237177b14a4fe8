use nalgebra::Vector3;

use crate::{
    algorithm::{
        CartesianStencil,
        inverse_cell_size,
    },
    error::SolverError,
    lattice::Lattice,
    stencil::StencilCoefficients,
    util::Axis,
};

/// Second-order centered differences on the staggered Yee grid.
///
/// Coefficients per axis: `[1/d]`.
pub fn initialize_stencil_coefficients(
    cell_size: &Vector3<f64>,
) -> Result<StencilCoefficients, SolverError> {
    let inv_cell_size = inverse_cell_size(&cell_size.data.0[0], ["x", "y", "z"])?;
    StencilCoefficients::from_axes(inv_cell_size.map(|inv_d| [inv_d]))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianYee {
    inv_cell_size: Vector3<f64>,
}

impl CartesianYee {
    pub fn from_coefficients(coefficients: &StencilCoefficients) -> Result<Self, SolverError> {
        let [[inv_dx], [inv_dy], [inv_dz]] = coefficients.to_arrays::<3, 1>("cartesian yee")?;
        Ok(Self {
            inv_cell_size: Vector3::new(inv_dx, inv_dy, inv_dz),
        })
    }

    pub fn inv_cell_size(&self) -> &Vector3<f64> {
        &self.inv_cell_size
    }

    pub fn max_time_step(&self, speed_of_light: f64) -> f64 {
        1.0 / (speed_of_light * self.inv_cell_size.norm())
    }
}

impl CartesianStencil for CartesianYee {
    #[inline]
    fn upward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        let inv_d = self.inv_cell_size[axis.vector_index()];
        inv_d * (field.neighbor(index, &axis.step()) - field[index])
    }

    #[inline]
    fn downward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        let inv_d = self.inv_cell_size[axis.vector_index()];
        inv_d * (field[index] - field.neighbor(index, &-axis.step()))
    }
}
