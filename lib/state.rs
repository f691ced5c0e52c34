//! Pure states represented as complex amplitude vectors over a [`Basis`].

use ndarray::{ self as nd, linalg::kron };
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    error::{ SimError, SimResult },
    hilbert::{ Basis, outer_prod },
    operator::Operator,
};

/// A state vector `|ψ⟩` tied to the basis that indexes its amplitudes.
#[derive(Clone, Debug, PartialEq)]
pub struct Ket {
    basis: Basis,
    data: nd::Array1<C64>,
}

impl Ket {
    /// Create a new ket, checking that the number of amplitudes matches the
    /// basis dimension.
    pub fn new(basis: Basis, data: nd::Array1<C64>) -> SimResult<Self> {
        if data.len() != basis.dim() {
            return Err(SimError::IncompatibleShape {
                context: "Ket::new",
                expected: vec![basis.dim()],
                found: vec![data.len()],
            });
        }
        Ok(Self { basis, data })
    }

    /// Construct without checking shapes; only for internal callers that
    /// derive `data` from `basis`.
    pub(crate) fn new_unchecked(basis: Basis, data: nd::Array1<C64>) -> Self {
        Self { basis, data }
    }

    /// Create the `index`-th basis state.
    pub fn basis_state(basis: &Basis, index: usize) -> SimResult<Self> {
        let data = basis.get_vector_index(index)
            .ok_or_else(|| {
                SimError::Configuration(format!(
                    "basis state index {} out of range for dimension {}",
                    index, basis.dim(),
                ))
            })?;
        Ok(Self { basis: basis.clone(), data })
    }

    /// Create a state from a weighting function evaluated at each basis index.
    ///
    /// The result is not normalized.
    pub fn from_fn<F>(basis: &Basis, amplitude: F) -> Self
    where F: Fn(usize) -> C64
    {
        let data: nd::Array1<C64> = (0..basis.dim()).map(amplitude).collect();
        Self { basis: basis.clone(), data }
    }

    /// Create a normalized state with amplitudes drawn uniformly from the unit
    /// square in the complex plane.
    pub fn random<R>(basis: &Basis, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        let data: nd::Array1<C64>
            = (0..basis.dim())
            .map(|_| C64::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5))
            .collect();
        Self { basis: basis.clone(), data }.normalized()
    }

    /// Get a reference to the basis.
    pub fn basis(&self) -> &Basis { &self.basis }

    /// Get a reference to the amplitudes.
    pub fn data(&self) -> &nd::Array1<C64> { &self.data }

    /// Consume `self`, returning the amplitudes.
    pub fn into_data(self) -> nd::Array1<C64> { self.data }

    /// Number of amplitudes.
    pub fn len(&self) -> usize { self.data.len() }

    /// Return `true` if the basis is zero-dimensional.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Quadrature sum of all amplitudes.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Return a normalized copy of `self`.
    ///
    /// A zero vector is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let n = self.norm();
        if n > 0.0 { self.data /= C64::from(n); }
        self
    }

    /// Inner product `⟨self|other⟩`.
    pub fn inner(&self, other: &Self) -> SimResult<C64> {
        self.basis.check(&other.basis, "Ket::inner")?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a.conj() * b).sum())
    }

    /// Linear combination `a * self + b * other`.
    pub fn superpose(&self, a: C64, other: &Self, b: C64) -> SimResult<Self> {
        self.basis.check(&other.basis, "Ket::superpose")?;
        let data = self.data.mapv(|x| a * x) + other.data.mapv(|x| b * x);
        Ok(Self { basis: self.basis.clone(), data })
    }

    /// Tensor product `|self⟩ ⊗ |rhs⟩`.
    pub fn tensor(&self, rhs: &Self) -> Self {
        let a = self.data.view().insert_axis(nd::Axis(1));
        let b = rhs.data.view().insert_axis(nd::Axis(1));
        let data = kron(&a, &b).remove_axis(nd::Axis(1));
        Self { basis: self.basis.tensor(&rhs.basis), data }
    }

    /// Density matrix `|self⟩⟨self|`.
    pub fn dm(&self) -> Operator {
        Operator::new_unchecked(
            self.basis.clone(),
            self.basis.clone(),
            outer_prod(&self.data, &self.data),
        )
    }
}
