//! The finite-difference Maxwell solver.
//!
//! Fields are advanced with a leapfrog scheme: the driver calls
//! [`FiniteDifferenceSolver::evolve_b`] and [`FiniteDifferenceSolver::evolve_e`]
//! alternately, with whatever (half) time steps its scheme needs. Ghost layers
//! must be up to date before each call.

mod cartesian;
mod cylindrical;

use crate::{
    algorithm::{
        AlgorithmFamily,
        AlgorithmIdentifier,
        CoordinateSystem,
        CylindricalYee,
        Geometry,
        STENCIL_REACH,
        StencilAlgorithm,
    },
    error::SolverError,
    field::{
        CartesianFields,
        CylindricalFields,
        FieldsMut,
    },
    lattice::{
        Lattice,
        Strider,
    },
    physics::PhysicalConstants,
    stencil::StencilCoefficients,
    threading::{
        LatticeForEach,
        SingleThreaded,
    },
};

/// Advances E and B on a single patch.
///
/// The stencil coefficients are derived once on construction and never change
/// afterwards. The solver itself is immutable, so it can be shared between
/// threads updating different patches.
#[derive(Clone, derive_more::Debug)]
pub struct FiniteDifferenceSolver<Threading = SingleThreaded> {
    algorithm: AlgorithmIdentifier,
    nodal: bool,
    geometry: Geometry,
    coefficients: StencilCoefficients,
    stencil: StencilAlgorithm,
    physical_constants: PhysicalConstants,

    #[debug(ignore)]
    threading: Threading,
}

impl FiniteDifferenceSolver {
    /// Selects the algorithm family and derives its stencil coefficients.
    ///
    /// Fails for unknown or unsupported algorithm choices and invalid cell
    /// sizes. Uses SI units and single-threading by default.
    pub fn new(
        algorithm: AlgorithmIdentifier,
        geometry: &Geometry,
        nodal: bool,
    ) -> Result<Self, SolverError> {
        let family = AlgorithmFamily::select(algorithm, geometry.coordinate_system(), nodal)?;
        let coefficients = family.initialize_stencil_coefficients(geometry)?;
        let stencil = StencilAlgorithm::from_coefficients(family, &coefficients, geometry.modes())?;

        tracing::debug!(
            %algorithm,
            nodal,
            %family,
            ?coefficients,
            "selected finite-difference algorithm"
        );

        Ok(Self {
            algorithm,
            nodal,
            geometry: *geometry,
            coefficients,
            stencil,
            physical_constants: Default::default(),
            threading: SingleThreaded,
        })
    }
}

impl<Threading> FiniteDifferenceSolver<Threading> {
    pub fn with_threading<T>(self, threading: T) -> FiniteDifferenceSolver<T> {
        FiniteDifferenceSolver {
            algorithm: self.algorithm,
            nodal: self.nodal,
            geometry: self.geometry,
            coefficients: self.coefficients,
            stencil: self.stencil,
            physical_constants: self.physical_constants,
            threading,
        }
    }

    pub fn with_physical_constants(mut self, physical_constants: PhysicalConstants) -> Self {
        self.physical_constants = physical_constants;
        self
    }

    /// The identifier the solver was configured with. See [`Self::family`]
    /// for the algorithm actually in use.
    pub fn algorithm(&self) -> AlgorithmIdentifier {
        self.algorithm
    }

    pub fn is_nodal(&self) -> bool {
        self.nodal
    }

    pub fn family(&self) -> AlgorithmFamily {
        self.stencil.family()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.geometry.coordinate_system()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn coefficients(&self) -> &StencilCoefficients {
        &self.coefficients
    }

    pub fn stencil(&self) -> &StencilAlgorithm {
        &self.stencil
    }

    pub fn physical_constants(&self) -> &PhysicalConstants {
        &self.physical_constants
    }

    pub fn threading(&self) -> &Threading {
        &self.threading
    }

    /// Largest stable time step for the selected algorithm and cell size.
    pub fn max_time_step(&self) -> f64 {
        self.stencil
            .max_time_step(self.physical_constants.speed_of_light())
    }

    /// Checks `time_step` against the stability limit.
    pub fn check_time_step(&self, time_step: f64) -> Result<(), SolverError> {
        validate_time_step(time_step)?;
        let max_time_step = self.max_time_step();
        if time_step > max_time_step {
            Err(SolverError::TimeStepTooLarge {
                time_step,
                max_time_step,
            })
        }
        else {
            Ok(())
        }
    }

    fn mismatch(&self, found: CoordinateSystem) -> SolverError {
        SolverError::CoordinateSystemMismatch {
            expected: self.coordinate_system(),
            found,
        }
    }

    fn cylindrical_stencil(
        &self,
        fields: &CylindricalFields,
    ) -> Result<&CylindricalYee, SolverError> {
        let StencilAlgorithm::CylindricalYee(stencil) = &self.stencil
        else {
            return Err(self.mismatch(CoordinateSystem::Cylindrical));
        };

        let strider = fields.layout()?;
        check_ghost_layers(strider.ghost().x.min(strider.ghost().y))?;

        if strider.size().z != stencil.n_modes() {
            return Err(SolverError::ModeCountMismatch {
                expected: stencil.n_modes(),
                found: strider.size().z,
            });
        }

        Ok(stencil)
    }
}

impl<Threading> FiniteDifferenceSolver<Threading>
where
    Threading: LatticeForEach,
{
    /// Advances the magnetic field by `time_step` from the curl of E.
    pub fn evolve_b<'a>(
        &self,
        fields: impl Into<FieldsMut<'a>>,
        time_step: f64,
    ) -> Result<(), SolverError> {
        validate_time_step(time_step)?;
        tracing::trace!(family = %self.family(), time_step, "evolve B");

        match fields.into() {
            FieldsMut::Cartesian(fields) => {
                check_cartesian_layout(fields)?;
                match &self.stencil {
                    StencilAlgorithm::Yee(stencil) => {
                        cartesian::evolve_b(stencil, &self.threading, fields, time_step)
                    }
                    StencilAlgorithm::Ckc(stencil) => {
                        cartesian::evolve_b(stencil, &self.threading, fields, time_step)
                    }
                    StencilAlgorithm::Nodal(stencil) => {
                        cartesian::evolve_b(stencil, &self.threading, fields, time_step)
                    }
                    StencilAlgorithm::CylindricalYee(_) => {
                        return Err(self.mismatch(CoordinateSystem::Cartesian));
                    }
                }
            }
            FieldsMut::Cylindrical(fields) => {
                let stencil = self.cylindrical_stencil(fields)?;
                cylindrical::evolve_b(stencil, &self.threading, fields, time_step);
            }
        }

        Ok(())
    }

    /// Advances the electric field by `time_step` from the curl of B and the
    /// current density.
    pub fn evolve_e<'a>(
        &self,
        fields: impl Into<FieldsMut<'a>>,
        time_step: f64,
    ) -> Result<(), SolverError> {
        validate_time_step(time_step)?;
        tracing::trace!(family = %self.family(), time_step, "evolve E");

        let physical_constants = &self.physical_constants;
        match fields.into() {
            FieldsMut::Cartesian(fields) => {
                check_cartesian_layout(fields)?;
                match &self.stencil {
                    StencilAlgorithm::Yee(stencil) => {
                        cartesian::evolve_e(
                            stencil,
                            &self.threading,
                            physical_constants,
                            fields,
                            time_step,
                        )
                    }
                    StencilAlgorithm::Ckc(stencil) => {
                        cartesian::evolve_e(
                            stencil,
                            &self.threading,
                            physical_constants,
                            fields,
                            time_step,
                        )
                    }
                    StencilAlgorithm::Nodal(stencil) => {
                        cartesian::evolve_e(
                            stencil,
                            &self.threading,
                            physical_constants,
                            fields,
                            time_step,
                        )
                    }
                    StencilAlgorithm::CylindricalYee(_) => {
                        return Err(self.mismatch(CoordinateSystem::Cartesian));
                    }
                }
            }
            FieldsMut::Cylindrical(fields) => {
                let stencil = self.cylindrical_stencil(fields)?;
                cylindrical::evolve_e(
                    stencil,
                    &self.threading,
                    physical_constants,
                    fields,
                    time_step,
                );
            }
        }

        Ok(())
    }

    /// Writes the divergence of E into `div_e`, which must have the same
    /// layout as the fields.
    pub fn compute_div_e(
        &self,
        fields: &CartesianFields,
        div_e: &mut Lattice<f64>,
    ) -> Result<(), SolverError> {
        let strider = check_cartesian_layout(fields)?;
        if div_e.strider() != strider {
            return Err(SolverError::FieldLayoutMismatch);
        }

        match &self.stencil {
            StencilAlgorithm::Yee(stencil) => {
                cartesian::compute_div_e(stencil, &self.threading, fields, div_e)
            }
            StencilAlgorithm::Ckc(stencil) => {
                cartesian::compute_div_e(stencil, &self.threading, fields, div_e)
            }
            StencilAlgorithm::Nodal(stencil) => {
                cartesian::compute_div_e(stencil, &self.threading, fields, div_e)
            }
            StencilAlgorithm::CylindricalYee(_) => {
                return Err(self.mismatch(CoordinateSystem::Cartesian));
            }
        }

        Ok(())
    }
}

fn validate_time_step(time_step: f64) -> Result<(), SolverError> {
    if time_step.is_finite() && time_step > 0.0 {
        Ok(())
    }
    else {
        Err(SolverError::InvalidTimeStep { time_step })
    }
}

fn check_ghost_layers(found: usize) -> Result<(), SolverError> {
    if found < STENCIL_REACH {
        Err(SolverError::InsufficientGhostCells {
            required: STENCIL_REACH,
            found,
        })
    }
    else {
        Ok(())
    }
}

fn check_cartesian_layout(fields: &CartesianFields) -> Result<&Strider, SolverError> {
    let strider = fields.layout()?;
    check_ghost_layers(strider.ghost().min())?;
    Ok(strider)
}
