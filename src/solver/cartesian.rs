use crate::{
    algorithm::CartesianStencil,
    field::CartesianFields,
    lattice::Lattice,
    physics::PhysicalConstants,
    threading::LatticeForEach,
    util::Axis,
};

/// `B -= dt curl E`
///
/// `B_a` sits half a cell above `E_b` and `E_c` along the transverse axes, so
/// the curl uses upward derivatives.
pub(super) fn evolve_b<Stencil, Threading>(
    stencil: &Stencil,
    threading: &Threading,
    fields: &mut CartesianFields,
    time_step: f64,
) where
    Stencil: CartesianStencil,
    Threading: LatticeForEach,
{
    let CartesianFields { e, b, .. } = fields;

    for (axis, b) in Axis::ALL.into_iter().zip(b.iter_mut()) {
        let (u, v) = axis.transverse();
        let e_u = &e[u.vector_index()];
        let e_v = &e[v.vector_index()];

        threading.for_each(b, |index, _point, value| {
            let curl = stencil.upward(u, e_v, index) - stencil.upward(v, e_u, index);
            *value -= time_step * curl;
        });
    }
}

/// `E += c^2 dt (curl B - mu_0 J)`
///
/// `E_a` sits half a cell below `B_b` and `B_c` along the transverse axes, so
/// the curl uses downward derivatives.
pub(super) fn evolve_e<Stencil, Threading>(
    stencil: &Stencil,
    threading: &Threading,
    physical_constants: &PhysicalConstants,
    fields: &mut CartesianFields,
    time_step: f64,
) where
    Stencil: CartesianStencil,
    Threading: LatticeForEach,
{
    let c2_dt = physical_constants.speed_of_light_squared() * time_step;
    let mu_0 = physical_constants.vacuum_permeability;
    let CartesianFields { e, b, j } = fields;

    for ((axis, e), j) in Axis::ALL.into_iter().zip(e.iter_mut()).zip(j.iter()) {
        let (u, v) = axis.transverse();
        let b_u = &b[u.vector_index()];
        let b_v = &b[v.vector_index()];

        threading.for_each(e, |index, _point, value| {
            let curl = stencil.downward(u, b_v, index) - stencil.downward(v, b_u, index);
            *value += c2_dt * (curl - mu_0 * j[index]);
        });
    }
}

/// Divergence of E at the nodes, i.e. where the charge density lives.
pub(super) fn compute_div_e<Stencil, Threading>(
    stencil: &Stencil,
    threading: &Threading,
    fields: &CartesianFields,
    div_e: &mut Lattice<f64>,
) where
    Stencil: CartesianStencil,
    Threading: LatticeForEach,
{
    threading.for_each(div_e, |index, _point, value| {
        *value = Axis::ALL
            .into_iter()
            .map(|axis| stencil.downward(axis, &fields.e[axis.vector_index()], index))
            .sum();
    });
}
