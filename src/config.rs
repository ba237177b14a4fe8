use std::path::{
    Path,
    PathBuf,
};

use nalgebra::Vector3;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    algorithm::{
        AlgorithmIdentifier,
        Geometry,
    },
    error::SolverError,
    physics::PhysicalConstants,
    solver::FiniteDifferenceSolver,
    threading::{
        AnyThreading,
        Parallelization,
        ThreadingError,
    },
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverConfig {
    pub algorithm: AlgorithmIdentifier,

    /// Co-locate all field components. Forces the nodal algorithm.
    #[serde(default)]
    pub nodal: bool,

    /// Fixed time step. If not set, `cfl` times the stability limit is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_step: Option<f64>,

    /// Fraction of the stability limit used when no time step is set.
    #[serde(default = "default_cfl")]
    pub cfl: f64,

    pub geometry: Geometry,

    #[serde(default)]
    pub physical_constants: PhysicalConstants,

    #[serde(default)]
    pub parallelization: Parallelization,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmIdentifier::Yee,
            nodal: false,
            time_step: None,
            cfl: default_cfl(),
            geometry: Geometry::cartesian(Vector3::repeat(1e-3)),
            physical_constants: Default::default(),
            parallelization: Default::default(),
        }
    }
}

fn default_cfl() -> f64 {
    0.99
}

impl SolverConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading config file");

        let toml = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::Io {
                path: path.to_owned(),
                source,
            }
        })?;
        Self::from_toml_str(&toml)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Builds the solver and checks the time step against its stability limit.
    pub fn build(&self) -> Result<FiniteDifferenceSolver<AnyThreading>, ConfigError> {
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(ConfigError::InvalidCfl { cfl: self.cfl });
        }

        let threading = AnyThreading::new(&self.parallelization)?;
        let solver = FiniteDifferenceSolver::new(self.algorithm, &self.geometry, self.nodal)?
            .with_physical_constants(self.physical_constants)
            .with_threading(threading);

        let time_step = self.time_step(&solver)?;
        tracing::debug!(
            time_step,
            max_time_step = solver.max_time_step(),
            num_threads = solver.threading().num_threads(),
            "solver ready"
        );

        Ok(solver)
    }

    /// The configured time step, or `cfl` times the solver's stability limit.
    pub fn time_step<Threading>(
        &self,
        solver: &FiniteDifferenceSolver<Threading>,
    ) -> Result<f64, ConfigError> {
        if let Some(time_step) = self.time_step {
            solver.check_time_step(time_step)?;
            Ok(time_step)
        }
        else {
            Ok(self.cfl * solver.max_time_step())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid solver configuration")]
    Solver(#[from] SolverError),

    #[error("CFL factor must be in (0, 1], but is {cfl}")]
    InvalidCfl { cfl: f64 },

    #[error("Could not set up threading")]
    Threading(#[from] ThreadingError),
}
