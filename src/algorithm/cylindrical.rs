use nalgebra::{
    Vector2,
    Vector3,
};
use num::complex::Complex64;

use crate::{
    algorithm::{
        CylindricalModes,
        inverse_cell_size,
    },
    error::SolverError,
    lattice::Lattice,
    stencil::StencilCoefficients,
};

/// Empirical coefficients for the stability limit with `n_modes` azimuthal
/// modes, for `n_modes` from 1 to 6.
const MULTIMODE_ALPHA: [f64; 6] = [0.2105, 1.0, 3.5234, 8.5104, 15.5059, 24.5037];

/// Yee differences along `r` and `z` for azimuthal-mode fields.
///
/// Coefficients: `[[1/dr], [1/dz]]`.
pub fn initialize_stencil_coefficients(
    cell_size: &Vector2<f64>,
) -> Result<StencilCoefficients, SolverError> {
    let inv_cell_size = inverse_cell_size(&cell_size.data.0[0], ["r", "z"])?;
    StencilCoefficients::from_axes(inv_cell_size.map(|inv_d| [inv_d]))
}

/// Fields are stored in a lattice indexed by `(i_r, i_z, m)`, where `m` is
/// the azimuthal mode. Each value is the complex amplitude of that mode, so
/// `d/dtheta` becomes a multiplication by `-i m`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylindricalYee {
    inv_dr: f64,
    inv_dz: f64,
    modes: CylindricalModes,
}

impl CylindricalYee {
    pub fn from_coefficients(
        coefficients: &StencilCoefficients,
        modes: CylindricalModes,
    ) -> Result<Self, SolverError> {
        modes.validate()?;
        let [[inv_dr], [inv_dz]] = coefficients.to_arrays::<2, 1>("cylindrical yee")?;
        Ok(Self {
            inv_dr,
            inv_dz,
            modes,
        })
    }

    pub fn modes(&self) -> &CylindricalModes {
        &self.modes
    }

    pub fn n_modes(&self) -> usize {
        self.modes.n_modes
    }

    pub fn dr(&self) -> f64 {
        1.0 / self.inv_dr
    }

    pub fn inv_dr(&self) -> f64 {
        self.inv_dr
    }

    pub fn inv_dz(&self) -> f64 {
        self.inv_dz
    }

    /// Radius of radial node `i`.
    pub fn nodal_radius(&self, i: usize) -> f64 {
        self.modes.r_min + i as f64 * self.dr()
    }

    /// Radius of the cell center between radial nodes `i` and `i + 1`.
    pub fn centered_radius(&self, i: usize) -> f64 {
        self.modes.r_min + (i as f64 + 0.5) * self.dr()
    }

    /// Whether radial node `i` lies on the axis.
    pub fn is_on_axis(&self, i: usize) -> bool {
        i == 0 && self.modes.r_min == 0.0
    }

    pub fn max_time_step(&self, speed_of_light: f64) -> f64 {
        let n_modes = self.modes.n_modes;
        let alpha = if n_modes <= MULTIMODE_ALPHA.len() {
            MULTIMODE_ALPHA[n_modes - 1]
        }
        else {
            ((n_modes - 1) * (n_modes - 1)) as f64 - 0.4
        };
        1.0 / (speed_of_light
            * ((1.0 + alpha) * self.inv_dr.powi(2) + self.inv_dz.powi(2)).sqrt())
    }

    #[inline]
    pub fn upward_dr(&self, field: &Lattice<Complex64>, index: usize) -> Complex64 {
        (*field.neighbor(index, &R) - field[index]) * self.inv_dr
    }

    #[inline]
    pub fn downward_dr(&self, field: &Lattice<Complex64>, index: usize) -> Complex64 {
        (field[index] - *field.neighbor(index, &-R)) * self.inv_dr
    }

    #[inline]
    pub fn upward_dz(&self, field: &Lattice<Complex64>, index: usize) -> Complex64 {
        (*field.neighbor(index, &Z) - field[index]) * self.inv_dz
    }

    #[inline]
    pub fn downward_dz(&self, field: &Lattice<Complex64>, index: usize) -> Complex64 {
        (field[index] - *field.neighbor(index, &-Z)) * self.inv_dz
    }

    /// `(1/r) d(r F)/dr` at radius `r`, from `F` half a cell below and above.
    #[inline]
    pub fn upward_drr_over_r(
        &self,
        field: &Lattice<Complex64>,
        index: usize,
        r: f64,
    ) -> Complex64 {
        let dr = self.dr();
        (*field.neighbor(index, &R) * (r + 0.5 * dr) - field[index] * (r - 0.5 * dr))
            * (self.inv_dr / r)
    }

    /// Same as [`Self::upward_drr_over_r`], but with `F` at `index` being half
    /// a cell above `r`.
    #[inline]
    pub fn downward_drr_over_r(
        &self,
        field: &Lattice<Complex64>,
        index: usize,
        r: f64,
    ) -> Complex64 {
        let dr = self.dr();
        (field[index] * (r + 0.5 * dr) - *field.neighbor(index, &-R) * (r - 0.5 * dr))
            * (self.inv_dr / r)
    }
}

/// Lattice step along `r`.
pub(crate) const R: Vector3<isize> = Vector3::new(1, 0, 0);

/// Lattice step along `z`.
pub(crate) const Z: Vector3<isize> = Vector3::new(0, 1, 0);

#[cfg(test)]
mod tests {
    use nalgebra::{
        Point3,
        Vector2,
        Vector3,
    };
    use num::complex::Complex64;

    use crate::{
        algorithm::{
            CylindricalModes,
            cylindrical::{
                CylindricalYee,
                initialize_stencil_coefficients,
            },
        },
        error::SolverError,
        lattice::{
            Lattice,
            Strider,
        },
    };

    fn cylindrical(cell_size: Vector2<f64>, n_modes: usize, r_min: f64) -> CylindricalYee {
        CylindricalYee::from_coefficients(
            &initialize_stencil_coefficients(&cell_size).unwrap(),
            CylindricalModes { n_modes, r_min },
        )
        .unwrap()
    }

    #[test]
    fn it_stores_radial_and_longitudinal_coefficients() {
        let coefficients = initialize_stencil_coefficients(&Vector2::new(0.5, 0.25)).unwrap();
        assert_eq!(coefficients.len(), 2);
        assert_eq!(coefficients.axis(0), Some(&[2.0][..]));
        assert_eq!(coefficients.axis(1), Some(&[4.0][..]));
    }

    #[test]
    fn it_rejects_cartesian_coefficients() {
        let cartesian = crate::algorithm::yee::initialize_stencil_coefficients(&Vector3::repeat(
            1.0,
        ))
        .unwrap();
        let result = CylindricalYee::from_coefficients(
            &cartesian,
            CylindricalModes {
                n_modes: 1,
                r_min: 0.0,
            },
        );
        assert!(matches!(
            result,
            Err(SolverError::MalformedCoefficients {
                expected_axes: 2,
                ..
            })
        ));
    }

    #[test]
    fn it_limits_the_time_step_depending_on_modes() {
        let single = cylindrical(Vector2::new(1.0, 1.0), 1, 0.0);
        assert!((single.max_time_step(1.0) - 1.0 / (2.2105f64).sqrt()).abs() < 1e-12);

        let two = cylindrical(Vector2::new(1.0, 1.0), 2, 0.0);
        assert!((two.max_time_step(1.0) - 1.0 / 3.0f64.sqrt()).abs() < 1e-12);

        // beyond the table: alpha = (n - 1)^2 - 0.4
        let many = cylindrical(Vector2::new(1.0, 1.0), 8, 0.0);
        assert!((many.max_time_step(1.0) - 1.0 / (50.6f64).sqrt()).abs() < 1e-12);

        assert!(many.max_time_step(1.0) < two.max_time_step(1.0));
    }

    #[test]
    fn it_locates_radii() {
        let cylindrical = cylindrical(Vector2::new(0.5, 1.0), 1, 2.0);
        assert_eq!(cylindrical.nodal_radius(2), 3.0);
        assert_eq!(cylindrical.centered_radius(2), 3.25);
        assert!(!cylindrical.is_on_axis(0));

        let on_axis = CylindricalYee::from_coefficients(
            &initialize_stencil_coefficients(&Vector2::new(0.5, 1.0)).unwrap(),
            CylindricalModes {
                n_modes: 1,
                r_min: 0.0,
            },
        )
        .unwrap();
        assert!(on_axis.is_on_axis(0));
        assert!(!on_axis.is_on_axis(1));
    }

    #[test]
    fn it_differentiates_r_times_field() {
        // F = 1/r has r F = 1, so (1/r) d(r F)/dr vanishes
        let dr = 0.1;
        let cylindrical = cylindrical(Vector2::new(dr, 1.0), 1, 0.0);
        let strider = Strider::new(&Vector3::new(8, 2, 1), &Vector3::new(1, 1, 0));
        // nodal values at r = i dr
        let field = Lattice::from_fn(&strider, |point| {
            let r = point.x as f64 * dr;
            Complex64::new(if r > 0.0 { 1.0 / r } else { 0.0 }, 0.0)
        });

        let index = strider.index(&Point3::new(3, 0, 0)).unwrap();
        let r = cylindrical.centered_radius(3);
        assert!(cylindrical.upward_drr_over_r(&field, index, r).norm() < 1e-9);

        let index = strider.index(&Point3::new(4, 0, 0)).unwrap();
        let r = cylindrical.centered_radius(3);
        assert!(cylindrical.downward_drr_over_r(&field, index, r).norm() < 1e-9);
    }
}
