//! Finite-difference field solver for electromagnetic particle-in-cell codes.
//!
//! Picks a stencil algorithm (Yee, CKC, nodal or cylindrical Yee) from the
//! configuration, derives its coefficients from the cell size, and advances E
//! and B with the discrete curl equations.

#![warn(unused_qualifications)]

pub mod algorithm;
pub mod config;
pub mod error;
pub mod field;
pub mod lattice;
pub mod physics;
pub mod solver;
pub mod stencil;
pub mod threading;
pub mod util;
