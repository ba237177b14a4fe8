use arrayvec::ArrayVec;

use crate::error::SolverError;

/// Largest number of axes a stencil carries coefficients for.
pub const MAX_AXES: usize = 3;

/// Largest number of coefficients per axis (CKC has 5).
pub const MAX_COEFFICIENTS_PER_AXIS: usize = 5;

pub type AxisCoefficients = ArrayVec<f64, MAX_COEFFICIENTS_PER_AXIS>;

/// Finite-difference weights, one sequence per axis of the coordinate system.
///
/// Cartesian families store `x`, `y`, `z`; the cylindrical family stores `r`
/// and `z`. The first weight on every axis is the inverse cell size along that
/// axis. How the remaining weights are laid out is fixed by the family that
/// derived them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StencilCoefficients {
    axes: ArrayVec<AxisCoefficients, MAX_AXES>,
}

impl StencilCoefficients {
    /// Collects one coefficient sequence per axis.
    ///
    /// Fails if there are more than [`MAX_AXES`] axes or more than
    /// [`MAX_COEFFICIENTS_PER_AXIS`] coefficients on any axis.
    pub fn from_axes<A>(axes: impl IntoIterator<Item = A>) -> Result<Self, SolverError>
    where
        A: AsRef<[f64]>,
    {
        let axes = axes
            .into_iter()
            .map(|axis| axis.as_ref().to_vec())
            .collect::<Vec<_>>();
        let too_many = || {
            SolverError::TooManyCoefficients {
                axes: axes.len(),
                per_axis: axes.iter().map(Vec::len).max().unwrap_or_default(),
                max_axes: MAX_AXES,
                max_per_axis: MAX_COEFFICIENTS_PER_AXIS,
            }
        };

        let mut coefficients = Self::default();
        for axis in &axes {
            let axis = AxisCoefficients::try_from(axis.as_slice()).map_err(|_| too_many())?;
            coefficients.axes.try_push(axis).map_err(|_| too_many())?;
        }
        Ok(coefficients)
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axis(&self, axis: usize) -> Option<&[f64]> {
        self.axes.get(axis).map(|axis| axis.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.axes.iter().map(|axis| axis.as_slice())
    }

    pub fn is_finite(&self) -> bool {
        self.iter().flatten().all(|coefficient| coefficient.is_finite())
    }

    /// Returns the coefficients as fixed-size arrays, if they have exactly the
    /// shape a family expects.
    pub(crate) fn to_arrays<const AXES: usize, const PER_AXIS: usize>(
        &self,
        family: &'static str,
    ) -> Result<[[f64; PER_AXIS]; AXES], SolverError> {
        let malformed = || {
            SolverError::MalformedCoefficients {
                family,
                expected_axes: AXES,
                expected_per_axis: PER_AXIS,
            }
        };

        if self.len() != AXES {
            return Err(malformed());
        }

        let mut arrays = [[0.0; PER_AXIS]; AXES];
        for (array, axis) in arrays.iter_mut().zip(self.iter()) {
            *array = axis.try_into().map_err(|_| malformed())?;
        }
        Ok(arrays)
    }
}
