use crate::algorithm::{
    AlgorithmIdentifier,
    CoordinateSystem,
};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("Unknown algorithm: {name}")]
    UnknownAlgorithm { name: String },

    #[error("Algorithm {algorithm} is not available in {coordinate_system} coordinates")]
    UnsupportedAlgorithm {
        algorithm: AlgorithmIdentifier,
        coordinate_system: CoordinateSystem,
    },

    #[error("Algorithm nodal is not supported on a staggered grid")]
    NodalAlgorithmOnStaggeredGrid,

    #[error("Invalid cell size along {axis}: {value} (must be positive and finite)")]
    InvalidCellSize { axis: &'static str, value: f64 },

    #[error("Number of azimuthal modes must be at least 1")]
    InvalidModeCount,

    #[error("Invalid minimum radius: {r_min} (must be non-negative and finite)")]
    InvalidMinimumRadius { r_min: f64 },

    #[error(
        "Malformed stencil coefficients for {family}: expected {expected_axes} axes with {expected_per_axis} coefficients each"
    )]
    MalformedCoefficients {
        family: &'static str,
        expected_axes: usize,
        expected_per_axis: usize,
    },

    #[error(
        "Stencil coefficients with {axes} axes and up to {per_axis} coefficients per axis don't fit: at most {max_axes} axes with {max_per_axis} coefficients each"
    )]
    TooManyCoefficients {
        axes: usize,
        per_axis: usize,
        max_axes: usize,
        max_per_axis: usize,
    },

    #[error("Solver uses {expected} coordinates, but fields are {found}")]
    CoordinateSystemMismatch {
        expected: CoordinateSystem,
        found: CoordinateSystem,
    },

    #[error("Field components don't share the same lattice layout")]
    FieldLayoutMismatch,

    #[error("Fields have {found} ghost layers, but the stencil needs {required}")]
    InsufficientGhostCells { required: usize, found: usize },

    #[error("Solver was built for {expected} azimuthal modes, but fields have {found}")]
    ModeCountMismatch { expected: usize, found: usize },

    #[error("Invalid time step: {time_step}")]
    InvalidTimeStep { time_step: f64 },

    #[error("Time step {time_step} exceeds the stability limit {max_time_step}")]
    TimeStepTooLarge { time_step: f64, max_time_step: f64 },
}
