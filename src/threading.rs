use nalgebra::Point3;
use serde::{
    Deserialize,
    Serialize,
};

use crate::lattice::Lattice;

/// Defines how a single/multi-threading iterates over the lattice in the field
/// updates.
pub trait LatticeForEach: Send + Sync + 'static {
    fn for_each<T, F>(&self, lattice: &mut Lattice<T>, f: F)
    where
        T: Send + Sync,
        F: Fn(usize, Point3<usize>, &mut T) + Send + Sync;
}

/// Use single-threading
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleThreaded;

impl LatticeForEach for SingleThreaded {
    fn for_each<T, F>(&self, lattice: &mut Lattice<T>, f: F)
    where
        T: Send + Sync,
        F: Fn(usize, Point3<usize>, &mut T) + Send + Sync,
    {
        lattice
            .iter_mut()
            .for_each(|(index, point, value)| f(index, point, value))
    }
}

/// Use multi-threading
#[cfg(feature = "rayon")]
#[derive(Clone, Debug)]
pub struct MultiThreaded {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "rayon")]
impl LatticeForEach for MultiThreaded {
    fn for_each<T, F>(&self, lattice: &mut Lattice<T>, f: F)
    where
        T: Send + Sync,
        F: Fn(usize, Point3<usize>, &mut T) + Send + Sync,
    {
        use rayon::iter::ParallelIterator as _;

        let mut f = || {
            lattice
                .par_iter_mut()
                .for_each(|(index, point, value)| f(index, point, value))
        };

        if let Some(thread_pool) = &self.thread_pool {
            thread_pool.install(f);
        }
        else {
            f();
        }
    }
}

#[cfg(feature = "rayon")]
impl MultiThreaded {
    /// Use default number of threads (see [`rayon::current_num_threads`])
    pub fn from_default_thread_pool() -> Self {
        Self { thread_pool: None }
    }

    pub fn from_num_threads(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        Ok(Self::from_thread_pool(
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()?,
        ))
    }

    pub fn from_thread_pool(thread_pool: rayon::ThreadPool) -> Self {
        Self {
            thread_pool: Some(std::sync::Arc::new(thread_pool)),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |thread_pool| {
                thread_pool.current_num_threads()
            })
    }
}

#[cfg(feature = "rayon")]
impl Default for MultiThreaded {
    fn default() -> Self {
        Self::from_default_thread_pool()
    }
}

/// How the field updates should be parallelized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parallelization {
    #[default]
    SingleThreaded,
    MultiThreaded {
        /// Defaults to rayon's global thread pool.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_threads: Option<usize>,
    },
}

/// Threading chosen at runtime from a [`Parallelization`].
#[derive(Clone, Debug)]
pub enum AnyThreading {
    SingleThreaded(SingleThreaded),
    #[cfg(feature = "rayon")]
    MultiThreaded(MultiThreaded),
}

impl Default for AnyThreading {
    fn default() -> Self {
        Self::SingleThreaded(SingleThreaded)
    }
}

impl AnyThreading {
    pub fn new(parallelization: &Parallelization) -> Result<Self, ThreadingError> {
        match parallelization {
            Parallelization::SingleThreaded => Ok(Self::SingleThreaded(SingleThreaded)),
            #[cfg(feature = "rayon")]
            Parallelization::MultiThreaded { num_threads } => {
                let threading = if let Some(num_threads) = num_threads {
                    MultiThreaded::from_num_threads(*num_threads)?
                }
                else {
                    MultiThreaded::from_default_thread_pool()
                };
                Ok(Self::MultiThreaded(threading))
            }
            #[cfg(not(feature = "rayon"))]
            Parallelization::MultiThreaded { .. } => Err(ThreadingError::MultiThreadingDisabled),
        }
    }

    pub fn num_threads(&self) -> usize {
        match self {
            Self::SingleThreaded(_) => 1,
            #[cfg(feature = "rayon")]
            Self::MultiThreaded(threading) => threading.num_threads(),
        }
    }
}

impl LatticeForEach for AnyThreading {
    fn for_each<T, F>(&self, lattice: &mut Lattice<T>, f: F)
    where
        T: Send + Sync,
        F: Fn(usize, Point3<usize>, &mut T) + Send + Sync,
    {
        match self {
            Self::SingleThreaded(threading) => threading.for_each(lattice, f),
            #[cfg(feature = "rayon")]
            Self::MultiThreaded(threading) => threading.for_each(lattice, f),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThreadingError {
    #[cfg(feature = "rayon")]
    #[error("failed to build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[cfg(not(feature = "rayon"))]
    #[error("multi-threading requires the `rayon` feature")]
    MultiThreadingDisabled,
}
