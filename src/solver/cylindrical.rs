//! Curl updates for azimuthal modes in `(r, theta, z)`.
//!
//! Positions within a cell `(i, j)`:
//!
//! | component | E              | B                    |
//! |-----------|----------------|----------------------|
//! | r         | `(i + 1/2, j)` | `(i, j + 1/2)`       |
//! | theta     | `(i, j)`       | `(i + 1/2, j + 1/2)` |
//! | z         | `(i, j + 1/2)` | `(i + 1/2, j)`       |
//!
//! Radial node `i = 0` lies on the axis when `r_min = 0`. There, components
//! whose radius would be zero are regularized per mode.

use num::complex::Complex64;

use crate::{
    algorithm::{
        CylindricalYee,
        cylindrical::R,
    },
    field::CylindricalFields,
    physics::PhysicalConstants,
    threading::LatticeForEach,
};

/// `B -= dt curl E`
pub(super) fn evolve_b<Threading>(
    stencil: &CylindricalYee,
    threading: &Threading,
    fields: &mut CylindricalFields,
    time_step: f64,
) where
    Threading: LatticeForEach,
{
    let i = Complex64::i();
    let CylindricalFields { e, b, .. } = fields;
    let [e_r, e_t, e_z] = &*e;
    let [b_r, b_t, b_z] = b;

    threading.for_each(b_r, |index, point, value| {
        let m = point.z as f64;
        if stencil.is_on_axis(point.x) {
            if point.z == 1 {
                // Ez / r with Ez taken one node off the axis
                let e_z_over_r = *e_z.neighbor(index, &R) * stencil.inv_dr();
                *value += time_step * (stencil.upward_dz(e_t, index) + i * m * e_z_over_r);
            }
            else {
                *value = Complex64::default();
            }
        }
        else {
            let r = stencil.nodal_radius(point.x);
            *value += time_step * (stencil.upward_dz(e_t, index) + i * m * e_z[index] / r);
        }
    });

    threading.for_each(b_t, |index, _point, value| {
        *value += time_step * (stencil.upward_dr(e_z, index) - stencil.upward_dz(e_r, index));
    });

    threading.for_each(b_z, |index, point, value| {
        let m = point.z as f64;
        let r = stencil.centered_radius(point.x);
        *value += time_step
            * (-i * m * e_r[index] / r - stencil.upward_drr_over_r(e_t, index, r));
    });
}

/// `E += c^2 dt (curl B - mu_0 J)`
///
/// `Er` is updated first, since `Et` on the axis is derived from it.
pub(super) fn evolve_e<Threading>(
    stencil: &CylindricalYee,
    threading: &Threading,
    physical_constants: &PhysicalConstants,
    fields: &mut CylindricalFields,
    time_step: f64,
) where
    Threading: LatticeForEach,
{
    let i = Complex64::i();
    let c2_dt = physical_constants.speed_of_light_squared() * time_step;
    let mu_0 = physical_constants.vacuum_permeability;
    let CylindricalFields { e, b, j } = fields;
    let [b_r, b_t, b_z] = &*b;
    let [j_r, j_t, j_z] = &*j;
    let [e_r, e_t, e_z] = e;

    threading.for_each(e_r, |index, point, value| {
        let m = point.z as f64;
        let r = stencil.centered_radius(point.x);
        let curl = -stencil.downward_dz(b_t, index) - i * m * b_z[index] / r;
        *value += c2_dt * (curl - mu_0 * j_r[index]);
    });

    let e_r = &*e_r;
    threading.for_each(e_t, |index, point, value| {
        if stencil.is_on_axis(point.x) {
            // a uniform transverse field has Et = -i Er in mode 1
            *value = if point.z == 1 {
                -i * e_r[index]
            }
            else {
                Complex64::default()
            };
        }
        else {
            let curl = stencil.downward_dz(b_r, index) - stencil.downward_dr(b_z, index);
            *value += c2_dt * (curl - mu_0 * j_t[index]);
        }
    });

    threading.for_each(e_z, |index, point, value| {
        if stencil.is_on_axis(point.x) {
            if point.z == 0 {
                // flux of Bt through the disc of radius dr/2 around the axis
                let curl = 4.0 * b_t[index] * stencil.inv_dr();
                *value += c2_dt * (curl - mu_0 * j_z[index]);
            }
            else {
                *value = Complex64::default();
            }
        }
        else {
            let m = point.z as f64;
            let r = stencil.nodal_radius(point.x);
            let curl = stencil.downward_drr_over_r(b_t, index, r) + i * m * b_r[index] / r;
            *value += c2_dt * (curl - mu_0 * j_z[index]);
        }
    });
}
