#![allow(non_snake_case)]

//! Tools to reduce quantum systems to a low-dimensional subspace of a larger
//! Hilbert space and to lift one- and two-body operators into
//! occupation-number bases for identical particles.

pub mod error;
pub mod utils;
pub mod spin;
pub mod hilbert;
pub mod state;
pub mod operator;
pub mod ops;
pub mod subspace;
pub mod manybody;
pub mod systems;

#[doc(hidden)]
pub use ndarray_npy;

pub use error::{ SimError, SimResult };
pub use hilbert::{ Basis, PositionBasis };
pub use state::Ket;
pub use operator::Operator;
pub use subspace::{ Projector, SubspaceBasis };
pub use manybody::{ ManyBodyBasis, Statistics };
