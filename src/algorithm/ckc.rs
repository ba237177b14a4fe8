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

/// Cole-Karkkainen-Cowan coefficients (Cowan, PRST-AB 16, 041303, 2013).
///
/// Coefficients per axis `a`, with `b` and `c` the next two axes in cyclic
/// order: `[1/d_a, alpha_a, beta_ab, beta_ac, gamma_a]`. All but the first are
/// scaled by `1/d_a` and sum up to it, so a linear field is differentiated
/// exactly.
pub fn initialize_stencil_coefficients(
    cell_size: &Vector3<f64>,
) -> Result<StencilCoefficients, SolverError> {
    let inv_cell_size = inverse_cell_size(&cell_size.data.0[0], ["x", "y", "z"])?;

    let delta = inv_cell_size.iter().copied().fold(f64::MIN, f64::max);
    let r = inv_cell_size.map(|inv_d| (inv_d / delta).powi(2));
    let r_sum = r[0] * r[1] + r[1] * r[2] + r[2] * r[0];
    let beta = 0.125 * (1.0 - r[0] * r[1] * r[2] / r_sum);

    StencilCoefficients::from_axes(Axis::ALL.map(|axis| {
        let (b, c) = axis.transverse();
        let inv_d = inv_cell_size[axis.vector_index()];
        let r_b = r[b.vector_index()];
        let r_c = r[c.vector_index()];

        let beta_ab = r_b * beta;
        let beta_ac = r_c * beta;
        let gamma = r_b * r_c * (1.0 / 16.0 - 0.125 * r_b * r_c / r_sum);
        let alpha = 1.0 - 2.0 * beta_ab - 2.0 * beta_ac - 4.0 * gamma;

        [
            inv_d,
            alpha * inv_d,
            beta_ab * inv_d,
            beta_ac * inv_d,
            gamma * inv_d,
        ]
    }))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CkcAxis {
    pub inv_d: f64,
    pub alpha: f64,
    pub beta_ab: f64,
    pub beta_ac: f64,
    pub gamma: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianCkc {
    axes: [CkcAxis; 3],
}

impl CartesianCkc {
    pub fn from_coefficients(coefficients: &StencilCoefficients) -> Result<Self, SolverError> {
        let arrays = coefficients.to_arrays::<3, 5>("cartesian ckc")?;
        Ok(Self {
            axes: arrays.map(|[inv_d, alpha, beta_ab, beta_ac, gamma]| {
                CkcAxis {
                    inv_d,
                    alpha,
                    beta_ab,
                    beta_ac,
                    gamma,
                }
            }),
        })
    }

    pub fn axis(&self, axis: Axis) -> &CkcAxis {
        &self.axes[axis.vector_index()]
    }

    /// CKC is stable up to `c dt = min(dx, dy, dz)`.
    pub fn max_time_step(&self, speed_of_light: f64) -> f64 {
        let max_inv_d = self
            .axes
            .iter()
            .map(|axis| axis.inv_d)
            .fold(f64::MIN, f64::max);
        1.0 / (speed_of_light * max_inv_d)
    }
}

impl CartesianStencil for CartesianCkc {
    /// Extended stencil: the difference along `axis` is smoothed over the
    /// neighbors in the transverse plane.
    fn upward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        let coefficients = self.axis(axis);
        let (b, c) = axis.transverse();
        let e_a = axis.step();
        let e_b = b.step();
        let e_c = c.step();

        let difference = |offset: Vector3<isize>| {
            field.neighbor(index, &(offset + e_a)) - field.neighbor(index, &offset)
        };

        coefficients.alpha * difference(Vector3::zeros())
            + coefficients.beta_ab * (difference(e_b) + difference(-e_b))
            + coefficients.beta_ac * (difference(e_c) + difference(-e_c))
            + coefficients.gamma
                * (difference(e_b + e_c)
                    + difference(e_b - e_c)
                    + difference(-e_b + e_c)
                    + difference(-e_b - e_c))
    }

    /// The E update uses the plain Yee difference.
    fn downward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64 {
        let inv_d = self.axis(axis).inv_d;
        inv_d * (field[index] - field.neighbor(index, &-axis.step()))
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
            ckc::{
                CartesianCkc,
                initialize_stencil_coefficients,
            },
        },
        lattice::{
            Lattice,
            Strider,
        },
        util::Axis,
    };

    fn ckc(cell_size: Vector3<f64>) -> CartesianCkc {
        CartesianCkc::from_coefficients(&initialize_stencil_coefficients(&cell_size).unwrap())
            .unwrap()
    }

    #[test]
    fn it_matches_known_coefficients_for_cubic_cells() {
        let ckc = ckc(Vector3::repeat(0.5));
        for axis in Axis::ALL {
            let coefficients = ckc.axis(axis);
            assert!((coefficients.inv_d - 2.0).abs() < 1e-12);
            assert!((coefficients.alpha - 2.0 * 7.0 / 12.0).abs() < 1e-12);
            assert!((coefficients.beta_ab - 2.0 / 12.0).abs() < 1e-12);
            assert!((coefficients.beta_ac - 2.0 / 12.0).abs() < 1e-12);
            assert!((coefficients.gamma - 2.0 / 48.0).abs() < 1e-12);
        }
    }

    #[test]
    fn it_is_consistent_for_anisotropic_cells() {
        let ckc = ckc(Vector3::new(0.1, 0.3, 0.07));
        for axis in Axis::ALL {
            let c = ckc.axis(axis);
            let sum = c.alpha + 2.0 * c.beta_ab + 2.0 * c.beta_ac + 4.0 * c.gamma;
            assert!((sum - c.inv_d).abs() < 1e-9 * c.inv_d, "{axis}");
        }
    }

    #[test]
    fn it_is_not_reducible_to_yee() {
        let coefficients = initialize_stencil_coefficients(&Vector3::new(0.1, 0.1, 0.05)).unwrap();
        for axis in coefficients.iter() {
            assert_eq!(axis.len(), 5);
            assert!((axis[1] - axis[0]).abs() > 1e-6);
            assert!(axis[2] != 0.0 || axis[3] != 0.0);
        }
    }

    #[test]
    fn it_scales_dominant_term_inversely_with_cell_size() {
        let coarse = initialize_stencil_coefficients(&Vector3::new(0.2, 0.2, 0.2)).unwrap();
        let fine = initialize_stencil_coefficients(&Vector3::new(0.1, 0.2, 0.2)).unwrap();
        let ratio = fine.axis(0).unwrap()[0] / coarse.axis(0).unwrap()[0];
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn it_differentiates_linear_fields_exactly() {
        let cell_size = Vector3::new(0.5, 0.25, 2.0);
        let ckc = ckc(cell_size);

        let strider = Strider::new(&Vector3::new(4, 4, 4), &Vector3::repeat(1));
        let field = Lattice::from_fn(&strider, |point| {
            -2.0 * point.x as f64 * cell_size.x
                + 4.0 * point.y as f64 * cell_size.y
                + point.z as f64 * cell_size.z
        });

        let index = strider.index(&Point3::new(2, 1, 2)).unwrap();
        for (axis, expected) in Axis::ALL.into_iter().zip([-2.0, 4.0, 1.0]) {
            assert!((ckc.upward(axis, &field, index) - expected).abs() < 1e-9);
            assert!((ckc.downward(axis, &field, index) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn it_allows_larger_time_steps_than_yee() {
        let ckc = ckc(Vector3::new(1.0, 2.0, 4.0));
        assert!((ckc.max_time_step(1.0) - 1.0).abs() < 1e-12);
    }
}
