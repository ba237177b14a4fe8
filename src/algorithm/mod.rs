//! Finite-difference stencil algorithms and their selection.
//!
//! Each family derives its [`StencilCoefficients`] from the cell size with a
//! pure function and turns them into a typed stencil that the curl updates in
//! [`crate::solver`] evaluate.

pub mod ckc;
pub mod cylindrical;
pub mod nodal;
pub mod yee;

use std::str::FromStr;

use nalgebra::{
    Vector2,
    Vector3,
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::VariantArray;

pub use self::{
    ckc::CartesianCkc,
    cylindrical::CylindricalYee,
    nodal::CartesianNodal,
    yee::CartesianYee,
};
use crate::{
    error::SolverError,
    lattice::Lattice,
    stencil::StencilCoefficients,
    util::Axis,
};

/// How many cells a stencil reaches from the point it is evaluated at. Fields
/// need at least this many ghost layers.
pub const STENCIL_REACH: usize = 1;

/// Algorithm choice as it appears in configuration.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::VariantArray,
)]
#[serde(try_from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum AlgorithmIdentifier {
    Yee,
    Ckc,
    Nodal,
}

impl FromStr for AlgorithmIdentifier {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .iter()
            .find(|known| known.to_string().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                SolverError::UnknownAlgorithm {
                    name: s.to_owned(),
                }
            })
    }
}

impl TryFrom<String> for AlgorithmIdentifier {
    type Error = SolverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlgorithmIdentifier> for String {
    fn from(value: AlgorithmIdentifier) -> Self {
        value.to_string()
    }
}

/// Numeric identifiers: Yee = 0, CKC = 1, Nodal = 2.
impl TryFrom<i32> for AlgorithmIdentifier {
    type Error = SolverError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Yee),
            1 => Ok(Self::Ckc),
            2 => Ok(Self::Nodal),
            _ => {
                Err(SolverError::UnknownAlgorithm {
                    name: value.to_string(),
                })
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CoordinateSystem {
    Cartesian,
    Cylindrical,
}

/// Azimuthal decomposition of a cylindrical domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CylindricalModes {
    /// Number of retained azimuthal Fourier modes, including `m = 0`.
    pub n_modes: usize,
    /// Lower radial bound of the domain.
    pub r_min: f64,
}

impl CylindricalModes {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.n_modes == 0 {
            return Err(SolverError::InvalidModeCount);
        }
        if !(self.r_min.is_finite() && self.r_min >= 0.0) {
            return Err(SolverError::InvalidMinimumRadius { r_min: self.r_min });
        }
        Ok(())
    }
}

/// Grid spacing of a refinement level, together with the coordinate system it
/// lives in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Cartesian {
        /// `[dx, dy, dz]`
        cell_size: Vector3<f64>,
    },
    Cylindrical {
        /// `[dr, dz]`
        cell_size: Vector2<f64>,
        n_modes: usize,
        r_min: f64,
    },
}

impl Geometry {
    pub fn cartesian(cell_size: Vector3<f64>) -> Self {
        Self::Cartesian { cell_size }
    }

    pub fn cylindrical(cell_size: Vector2<f64>, modes: CylindricalModes) -> Self {
        Self::Cylindrical {
            cell_size,
            n_modes: modes.n_modes,
            r_min: modes.r_min,
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Geometry::Cartesian { .. } => CoordinateSystem::Cartesian,
            Geometry::Cylindrical { .. } => CoordinateSystem::Cylindrical,
        }
    }

    pub fn modes(&self) -> Option<CylindricalModes> {
        match self {
            Geometry::Cartesian { .. } => None,
            Geometry::Cylindrical { n_modes, r_min, .. } => {
                Some(CylindricalModes {
                    n_modes: *n_modes,
                    r_min: *r_min,
                })
            }
        }
    }
}

/// The stencil family picked for a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::VariantArray)]
pub enum AlgorithmFamily {
    CartesianYee,
    CartesianCkc,
    CartesianNodal,
    CylindricalYee,
}

impl AlgorithmFamily {
    /// Picks the stencil family.
    ///
    /// Cylindrical coordinates only support Yee. Otherwise a nodal grid always
    /// uses the nodal stencil, whatever the identifier says. On a staggered
    /// grid the identifier decides, and the nodal identifier is rejected.
    pub fn select(
        algorithm: AlgorithmIdentifier,
        coordinate_system: CoordinateSystem,
        nodal: bool,
    ) -> Result<Self, SolverError> {
        match coordinate_system {
            CoordinateSystem::Cylindrical => {
                match algorithm {
                    AlgorithmIdentifier::Yee => Ok(Self::CylindricalYee),
                    _ => {
                        Err(SolverError::UnsupportedAlgorithm {
                            algorithm,
                            coordinate_system,
                        })
                    }
                }
            }
            CoordinateSystem::Cartesian if nodal => {
                if algorithm != AlgorithmIdentifier::Nodal {
                    tracing::warn!(%algorithm, "nodal grid overrides the configured algorithm");
                }
                Ok(Self::CartesianNodal)
            }
            CoordinateSystem::Cartesian => {
                match algorithm {
                    AlgorithmIdentifier::Yee => Ok(Self::CartesianYee),
                    AlgorithmIdentifier::Ckc => Ok(Self::CartesianCkc),
                    AlgorithmIdentifier::Nodal => Err(SolverError::NodalAlgorithmOnStaggeredGrid),
                }
            }
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Self::CartesianYee | Self::CartesianCkc | Self::CartesianNodal => {
                CoordinateSystem::Cartesian
            }
            Self::CylindricalYee => CoordinateSystem::Cylindrical,
        }
    }

    /// Derives the stencil coefficients for this family from the grid spacing.
    pub fn initialize_stencil_coefficients(
        &self,
        geometry: &Geometry,
    ) -> Result<StencilCoefficients, SolverError> {
        match (self, geometry) {
            (Self::CartesianYee, Geometry::Cartesian { cell_size }) => {
                yee::initialize_stencil_coefficients(cell_size)
            }
            (Self::CartesianCkc, Geometry::Cartesian { cell_size }) => {
                ckc::initialize_stencil_coefficients(cell_size)
            }
            (Self::CartesianNodal, Geometry::Cartesian { cell_size }) => {
                nodal::initialize_stencil_coefficients(cell_size)
            }
            (Self::CylindricalYee, Geometry::Cylindrical { cell_size, .. }) => {
                cylindrical::initialize_stencil_coefficients(cell_size)
            }
            _ => {
                Err(SolverError::CoordinateSystemMismatch {
                    expected: self.coordinate_system(),
                    found: geometry.coordinate_system(),
                })
            }
        }
    }
}

/// A resolved stencil, holding the typed coefficients of one family.
#[derive(Clone, Debug, PartialEq)]
pub enum StencilAlgorithm {
    Yee(CartesianYee),
    Ckc(CartesianCkc),
    Nodal(CartesianNodal),
    CylindricalYee(CylindricalYee),
}

impl StencilAlgorithm {
    pub fn from_coefficients(
        family: AlgorithmFamily,
        coefficients: &StencilCoefficients,
        modes: Option<CylindricalModes>,
    ) -> Result<Self, SolverError> {
        let stencil = match family {
            AlgorithmFamily::CartesianYee => {
                Self::Yee(CartesianYee::from_coefficients(coefficients)?)
            }
            AlgorithmFamily::CartesianCkc => {
                Self::Ckc(CartesianCkc::from_coefficients(coefficients)?)
            }
            AlgorithmFamily::CartesianNodal => {
                Self::Nodal(CartesianNodal::from_coefficients(coefficients)?)
            }
            AlgorithmFamily::CylindricalYee => {
                let modes = modes.ok_or(SolverError::CoordinateSystemMismatch {
                    expected: CoordinateSystem::Cylindrical,
                    found: CoordinateSystem::Cartesian,
                })?;
                Self::CylindricalYee(CylindricalYee::from_coefficients(coefficients, modes)?)
            }
        };
        Ok(stencil)
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            Self::Yee(_) => AlgorithmFamily::CartesianYee,
            Self::Ckc(_) => AlgorithmFamily::CartesianCkc,
            Self::Nodal(_) => AlgorithmFamily::CartesianNodal,
            Self::CylindricalYee(_) => AlgorithmFamily::CylindricalYee,
        }
    }

    /// Largest time step for which the scheme is stable, given the speed of
    /// light.
    pub fn max_time_step(&self, speed_of_light: f64) -> f64 {
        match self {
            Self::Yee(yee) => yee.max_time_step(speed_of_light),
            Self::Ckc(ckc) => ckc.max_time_step(speed_of_light),
            Self::Nodal(nodal) => nodal.max_time_step(speed_of_light),
            Self::CylindricalYee(cylindrical) => cylindrical.max_time_step(speed_of_light),
        }
    }
}

/// Spatial derivatives on a Cartesian grid.
///
/// `upward` evaluates the derivative half a cell above the position of the
/// differentiated component along `axis` (used by the B update), `downward`
/// half a cell below (used by the E update). On a nodal grid both are
/// centered on the point itself.
pub trait CartesianStencil: Send + Sync {
    fn upward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64;

    fn downward(&self, axis: Axis, field: &Lattice<f64>, index: usize) -> f64;
}

/// Checks that every cell size is usable and returns the inverse cell sizes.
pub(crate) fn inverse_cell_size<const N: usize>(
    cell_size: &[f64; N],
    axis_names: [&'static str; N],
) -> Result<[f64; N], SolverError> {
    for (value, axis) in cell_size.iter().zip(axis_names) {
        if !(value.is_finite() && *value > 0.0) {
            return Err(SolverError::InvalidCellSize {
                axis,
                value: *value,
            });
        }
    }
    Ok(cell_size.map(|d| 1.0 / d))
}

#[cfg(test)]
mod tests {
    use nalgebra::{
        Vector2,
        Vector3,
    };
    use strum::VariantArray;

    use crate::{
        algorithm::{
            AlgorithmFamily,
            AlgorithmIdentifier,
            CoordinateSystem,
            CylindricalModes,
            Geometry,
            StencilAlgorithm,
        },
        error::SolverError,
    };

    fn cartesian() -> Geometry {
        Geometry::cartesian(Vector3::new(0.1, 0.1, 0.05))
    }

    fn cylindrical() -> Geometry {
        Geometry::cylindrical(
            Vector2::new(0.1, 0.05),
            CylindricalModes {
                n_modes: 2,
                r_min: 0.0,
            },
        )
    }

    #[test]
    fn it_selects_by_identifier_on_staggered_grids() {
        assert_eq!(
            AlgorithmFamily::select(AlgorithmIdentifier::Yee, CoordinateSystem::Cartesian, false),
            Ok(AlgorithmFamily::CartesianYee)
        );
        assert_eq!(
            AlgorithmFamily::select(AlgorithmIdentifier::Ckc, CoordinateSystem::Cartesian, false),
            Ok(AlgorithmFamily::CartesianCkc)
        );
        assert_eq!(
            AlgorithmFamily::select(
                AlgorithmIdentifier::Nodal,
                CoordinateSystem::Cartesian,
                false
            ),
            Err(SolverError::NodalAlgorithmOnStaggeredGrid)
        );
        assert_eq!(
            SolverError::NodalAlgorithmOnStaggeredGrid.to_string(),
            "Algorithm nodal is not supported on a staggered grid"
        );
    }

    #[test]
    fn it_forces_nodal_on_nodal_grids() {
        for algorithm in AlgorithmIdentifier::VARIANTS {
            assert_eq!(
                AlgorithmFamily::select(*algorithm, CoordinateSystem::Cartesian, true),
                Ok(AlgorithmFamily::CartesianNodal)
            );
        }
    }

    #[test]
    fn it_only_allows_yee_in_cylindrical_coordinates() {
        for nodal in [false, true] {
            assert_eq!(
                AlgorithmFamily::select(
                    AlgorithmIdentifier::Yee,
                    CoordinateSystem::Cylindrical,
                    nodal
                ),
                Ok(AlgorithmFamily::CylindricalYee)
            );
            for algorithm in [AlgorithmIdentifier::Ckc, AlgorithmIdentifier::Nodal] {
                assert_eq!(
                    AlgorithmFamily::select(algorithm, CoordinateSystem::Cylindrical, nodal),
                    Err(SolverError::UnsupportedAlgorithm {
                        algorithm,
                        coordinate_system: CoordinateSystem::Cylindrical,
                    })
                );
            }
        }
    }

    #[test]
    fn it_selects_deterministically() {
        for algorithm in AlgorithmIdentifier::VARIANTS {
            for coordinate_system in [CoordinateSystem::Cartesian, CoordinateSystem::Cylindrical] {
                for nodal in [false, true] {
                    let first = AlgorithmFamily::select(*algorithm, coordinate_system, nodal);
                    let second = AlgorithmFamily::select(*algorithm, coordinate_system, nodal);
                    assert_eq!(first, second);
                    if let Ok(family) = first {
                        assert_eq!(family.coordinate_system(), coordinate_system);
                    }
                }
            }
        }
    }

    #[test]
    fn it_parses_identifiers() {
        assert_eq!("yee".parse::<AlgorithmIdentifier>(), Ok(AlgorithmIdentifier::Yee));
        assert_eq!("CKC".parse::<AlgorithmIdentifier>(), Ok(AlgorithmIdentifier::Ckc));
        assert_eq!("Nodal".parse::<AlgorithmIdentifier>(), Ok(AlgorithmIdentifier::Nodal));
        assert_eq!(
            "psatd".parse::<AlgorithmIdentifier>(),
            Err(SolverError::UnknownAlgorithm {
                name: "psatd".to_owned()
            })
        );
    }

    #[test]
    fn it_rejects_unknown_numeric_identifiers() {
        assert_eq!(AlgorithmIdentifier::try_from(0), Ok(AlgorithmIdentifier::Yee));
        assert_eq!(AlgorithmIdentifier::try_from(1), Ok(AlgorithmIdentifier::Ckc));
        assert_eq!(AlgorithmIdentifier::try_from(2), Ok(AlgorithmIdentifier::Nodal));
        for value in [-1, 3, 42] {
            assert_eq!(
                AlgorithmIdentifier::try_from(value),
                Err(SolverError::UnknownAlgorithm {
                    name: value.to_string()
                })
            );
        }
    }

    #[test]
    fn it_derives_coefficients_with_the_right_number_of_axes() {
        for family in AlgorithmFamily::VARIANTS {
            let (geometry, axes) = match family.coordinate_system() {
                CoordinateSystem::Cartesian => (cartesian(), 3),
                CoordinateSystem::Cylindrical => (cylindrical(), 2),
            };
            let coefficients = family.initialize_stencil_coefficients(&geometry).unwrap();
            assert_eq!(coefficients.len(), axes, "{family}");
            assert!(coefficients.is_finite(), "{family}");

            let stencil =
                StencilAlgorithm::from_coefficients(*family, &coefficients, geometry.modes())
                    .unwrap();
            assert_eq!(stencil.family(), *family);
        }
    }

    #[test]
    fn it_rejects_geometry_of_the_wrong_coordinate_system() {
        assert_eq!(
            AlgorithmFamily::CartesianYee.initialize_stencil_coefficients(&cylindrical()),
            Err(SolverError::CoordinateSystemMismatch {
                expected: CoordinateSystem::Cartesian,
                found: CoordinateSystem::Cylindrical,
            })
        );
    }

    #[test]
    fn it_rejects_zero_cell_size_for_every_family() {
        for family in AlgorithmFamily::VARIANTS {
            let geometries = match family.coordinate_system() {
                CoordinateSystem::Cartesian => {
                    vec![
                        Geometry::cartesian(Vector3::new(0.0, 0.1, 0.1)),
                        Geometry::cartesian(Vector3::new(0.1, 0.0, 0.1)),
                        Geometry::cartesian(Vector3::new(0.1, 0.1, 0.0)),
                    ]
                }
                CoordinateSystem::Cylindrical => {
                    let modes = CylindricalModes {
                        n_modes: 1,
                        r_min: 0.0,
                    };
                    vec![
                        Geometry::cylindrical(Vector2::new(0.0, 0.1), modes),
                        Geometry::cylindrical(Vector2::new(0.1, 0.0), modes),
                    ]
                }
            };
            for geometry in geometries {
                let result = family.initialize_stencil_coefficients(&geometry);
                assert!(
                    matches!(
                        result,
                        Err(SolverError::InvalidCellSize { value, .. }) if value == 0.0
                    ),
                    "{family}: {result:?}"
                );
            }
        }
    }

    #[test]
    fn it_rejects_negative_and_non_finite_cell_sizes() {
        for cell_size in [
            Vector3::new(-0.1, 0.1, 0.1),
            Vector3::new(0.1, f64::NAN, 0.1),
            Vector3::new(0.1, 0.1, f64::INFINITY),
        ] {
            assert!(matches!(
                AlgorithmFamily::CartesianYee
                    .initialize_stencil_coefficients(&Geometry::cartesian(cell_size)),
                Err(SolverError::InvalidCellSize { .. })
            ));
        }
    }

    #[test]
    fn it_validates_cylindrical_modes() {
        assert_eq!(
            CylindricalModes {
                n_modes: 0,
                r_min: 0.0
            }
            .validate(),
            Err(SolverError::InvalidModeCount)
        );
        assert!(matches!(
            CylindricalModes {
                n_modes: 1,
                r_min: -1.0
            }
            .validate(),
            Err(SolverError::InvalidMinimumRadius { .. })
        ));
        assert!(
            CylindricalModes {
                n_modes: 3,
                r_min: 2.0
            }
            .validate()
            .is_ok()
        );
    }
}
