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

/// Centered differences for a grid on which all components are co-located.
///
/// Coefficients per axis: `[1/d]`. The stencil spans two cells, so the
/// difference is halved.
pub fn initialize_stencil_coefficients(
    cell_size: &Vector3<f64>,
) -> Result<StencilCoefficients, SolverError> {
    let inv_cell_size = inverse_cell_size(&cell_size.data.0[0], ["x", "y", "z"])?;
    StencilCoefficients::from_axes(inv_cell_size.map(|inv_d| [inv_d]))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianNodal {
    inv_cell_size: Vector3<f64>,
}

impl CartesianNodal {
    pub fn from_coefficients(coefficients: &StencilCoefficients) -> Result<Self, SolverError> {
        let [[inv_dx], [inv_dy], [inv_dz]] =
            coefficients.to_arrays::<3, 1>("cartesian nodal")?;
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

    #[inline]
    fn centered(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        let inv_d = self.inv_cell_size[axis.vector_index()];
        let e = axis.step();
        0.5 * inv_d * (field.neighbor(index, &e) - field.neighbor(index, &-e))
    }
}

impl CartesianStencil for CartesianNodal {
    fn upward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        self.centered(axis, field, index)
    }

    fn downward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        self.centered(axis, field, index)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{
        Point3,
        Vector3,
    };

    use crate::{
        algorithm::{
            CartesianStencil,
            nodal::{
                CartesianNodal,
                initialize_stencil_coefficients,
            },
        },
        lattice::{
            Lattice,
            Strider,
        },
        util::Axis,
    };

    #[test]
    fn it_ignores_the_point_itself() {
        let nodal = CartesianNodal::from_coefficients(
            &initialize_stencil_coefficients(&Vector3::repeat(1.0)).unwrap(),
        )
        .unwrap();

        let strider = Strider::new(&Vector3::new(3, 3, 3), &Vector3::repeat(1));
        let center = Point3::new(1, 1, 1);
        // spike in the center, flat elsewhere
        let field = Lattice::from_fn(&strider, |point| if point == center { 1.0 } else { 0.0 });
        let index = strider.index(&center).unwrap();

        for axis in Axis::ALL {
            assert_eq!(nodal.upward(axis, &field, index), 0.0);
            assert_eq!(nodal.downward(axis, &field, index), 0.0);
        }
    }

    #[test]
    fn it_scales_inversely_with_cell_size() {
        let coarse = initialize_stencil_coefficients(&Vector3::new(0.2, 0.4, 0.1)).unwrap();
        let fine = initialize_stencil_coefficients(&Vector3::new(0.1, 0.4, 0.1)).unwrap();
        let ratio = fine.axis(0).unwrap()[0] / coarse.axis(0).unwrap()[0];
        assert!((ratio - 2.0).abs() < 1e-12);
        assert_eq!(fine.axis(1), coarse.axis(1));
        assert_eq!(fine.axis(2), coarse.axis(2));
    }

    #[test]
    fn it_differentiates_linear_fields_exactly() {
        let cell_size = Vector3::new(0.2, 0.4, 0.1);
        let nodal = CartesianNodal::from_coefficients(
            &initialize_stencil_coefficients(&cell_size).unwrap(),
        )
        .unwrap();

        let strider = Strider::new(&Vector3::new(3, 3, 3), &Vector3::repeat(1));
        let field = Lattice::from_fn(&strider, |point| {
            point.x as f64 * cell_size.x + 2.0 * point.y as f64 * cell_size.y
                - 5.0 * point.z as f64 * cell_size.z
        });
        let index = strider.index(&Point3::new(0, 1, 2)).unwrap();

        for (axis, expected) in Axis::ALL.into_iter().zip([1.0, 2.0, -5.0]) {
            assert!((nodal.upward(axis, &field, index) - expected).abs() < 1e-12);
        }
    }
}
