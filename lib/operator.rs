//! Dense linear operators between two [`Basis`]es.
//!
//! All algebra is exposed through named methods that check basis
//! compatibility before touching any data, returning
//! [`SimError::BasisMismatch`] on failure.

use ndarray::{ self as nd, linalg::kron };
use ndarray_linalg::{ EighInto, UPLO };
use num_complex::Complex64 as C64;
use crate::{
    error::{ SimError, SimResult },
    hilbert::Basis,
    state::Ket,
};

/// Relative tolerance used by [`Operator::eigh`] to decide whether an
/// operator needs to be symmetrized.
pub const HERMITIAN_TOL: f64 = 1e-12;

/// A complex matrix indexed by a left (row) and right (column) basis.
#[derive(Clone, Debug, PartialEq)]
pub struct Operator {
    left: Basis,
    right: Basis,
    data: nd::Array2<C64>,
}

impl Operator {
    /// Create a new operator, checking that the matrix shape matches the basis
    /// dimensions.
    pub fn new(left: Basis, right: Basis, data: nd::Array2<C64>)
        -> SimResult<Self>
    {
        let expected = [left.dim(), right.dim()];
        if data.shape() != expected.as_slice() {
            return Err(SimError::IncompatibleShape {
                context: "Operator::new",
                expected: expected.to_vec(),
                found: data.shape().to_vec(),
            });
        }
        Ok(Self { left, right, data })
    }

    /// Like [`Self::new`], with the same basis on both sides.
    pub fn square(basis: Basis, data: nd::Array2<C64>) -> SimResult<Self> {
        Self::new(basis.clone(), basis, data)
    }

    pub(crate) fn new_unchecked(
        left: Basis,
        right: Basis,
        data: nd::Array2<C64>,
    ) -> Self
    {
        Self { left, right, data }
    }

    /// Zero operator.
    pub fn zeros(left: &Basis, right: &Basis) -> Self {
        let data = nd::Array2::zeros((left.dim(), right.dim()));
        Self { left: left.clone(), right: right.clone(), data }
    }

    /// Identity operator.
    pub fn identity(basis: &Basis) -> Self {
        let data = nd::Array2::eye(basis.dim());
        Self { left: basis.clone(), right: basis.clone(), data }
    }

    /// Diagonal operator with entries given by a function of the basis index.
    pub fn diagonal<F>(basis: &Basis, f: F) -> Self
    where F: Fn(usize) -> C64
    {
        let diag: nd::Array1<C64> = (0..basis.dim()).map(f).collect();
        let data = nd::Array2::from_diag(&diag);
        Self { left: basis.clone(), right: basis.clone(), data }
    }

    /// Projector `|psi⟩⟨phi|`.
    pub fn transition(psi: &Ket, phi: &Ket) -> Self {
        let data = crate::hilbert::outer_prod(psi.data(), phi.data());
        Self {
            left: psi.basis().clone(),
            right: phi.basis().clone(),
            data,
        }
    }

    /// Get a reference to the left (row) basis.
    pub fn left(&self) -> &Basis { &self.left }

    /// Get a reference to the right (column) basis.
    pub fn right(&self) -> &Basis { &self.right }

    /// Get a reference to the matrix.
    pub fn data(&self) -> &nd::Array2<C64> { &self.data }

    /// Consume `self`, returning the matrix.
    pub fn into_data(self) -> nd::Array2<C64> { self.data }

    /// Return `true` if the left and right bases are equal.
    pub fn is_square(&self) -> bool { self.left == self.right }

    /// Get a single matrix element.
    pub fn get(&self, i: usize, j: usize) -> Option<C64> {
        self.data.get((i, j)).copied()
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        Self {
            left: self.right.clone(),
            right: self.left.clone(),
            data: self.data.t().mapv(|a| a.conj()),
        }
    }

    fn check_same(&self, other: &Self, context: &'static str)
        -> SimResult<()>
    {
        self.left.check(&other.left, context)?;
        self.right.check(&other.right, context)
    }

    /// Sum of two operators.
    pub fn add(&self, other: &Self) -> SimResult<Self> {
        self.check_same(other, "Operator::add")?;
        Ok(Self {
            left: self.left.clone(),
            right: self.right.clone(),
            data: &self.data + &other.data,
        })
    }

    /// Difference of two operators.
    pub fn sub(&self, other: &Self) -> SimResult<Self> {
        self.check_same(other, "Operator::sub")?;
        Ok(Self {
            left: self.left.clone(),
            right: self.right.clone(),
            data: &self.data - &other.data,
        })
    }

    /// Multiply by a scalar.
    pub fn scale<A>(&self, a: A) -> Self
    where A: Into<C64>
    {
        let a: C64 = a.into();
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            data: self.data.mapv(|x| a * x),
        }
    }

    /// Matrix product `self · other`.
    pub fn compose(&self, other: &Self) -> SimResult<Self> {
        self.right.check(&other.left, "Operator::compose")?;
        Ok(Self {
            left: self.left.clone(),
            right: other.right.clone(),
            data: self.data.dot(&other.data),
        })
    }

    /// Tensor product `self ⊗ rhs`, with `self` indexing the slower-varying
    /// factor.
    pub fn tensor(&self, rhs: &Self) -> Self {
        Self {
            left: self.left.tensor(&rhs.left),
            right: self.right.tensor(&rhs.right),
            data: kron(&self.data, &rhs.data),
        }
    }

    /// Apply to a ket.
    pub fn apply(&self, psi: &Ket) -> SimResult<Ket> {
        self.right.check(psi.basis(), "Operator::apply")?;
        Ok(Ket::new_unchecked(self.left.clone(), self.data.dot(psi.data())))
    }

    /// Expectation value `⟨psi|self|psi⟩`.
    pub fn expect(&self, psi: &Ket) -> SimResult<C64> {
        self.left.check(psi.basis(), "Operator::expect")?;
        self.apply(psi)
            .map(|a_psi| {
                psi.data().iter().zip(a_psi.data())
                    .map(|(l, r)| l.conj() * r)
                    .sum()
            })
    }

    /// Expectation value `Tr(self · rho)` for a density operator.
    pub fn expect_dm(&self, rho: &Self) -> SimResult<C64> {
        self.compose(rho)?.trace()
    }

    /// Sum of the main diagonal.
    ///
    /// Fails for non-square operators.
    pub fn trace(&self) -> SimResult<C64> {
        self.left.check(&self.right, "Operator::trace")?;
        Ok(self.data.diag().sum())
    }

    /// Return `true` if `self` equals its conjugate transpose to within
    /// `tol` relative to its largest element.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        if !self.is_square() { return false; }
        let scale = self.data.iter().map(|a| a.norm()).fold(0.0, f64::max);
        let thresh = tol * scale.max(1.0);
        self.data.indexed_iter()
            .all(|((i, j), a)| (*a - self.data[[j, i]].conj()).norm() <= thresh)
    }

    /// Return `(self + self†) / 2`.
    pub fn hermitian_part(&self) -> SimResult<Self> {
        self.left.check(&self.right, "Operator::hermitian_part")?;
        let data
            = (&self.data + &self.data.t().mapv(|a| a.conj()))
            .mapv(|a| a / 2.0);
        Ok(Self { left: self.left.clone(), right: self.right.clone(), data })
    }

    /// Diagonalize, returning eigenvalues in ascending order and the matrix
    /// of eigenvectors as columns.
    ///
    /// A non-Hermitian operator is replaced by its [Hermitian
    /// part][Self::hermitian_part] with a logged warning.
    pub fn eigh(&self) -> SimResult<(nd::Array1<f64>, nd::Array2<C64>)> {
        self.left.check(&self.right, "Operator::eigh")?;
        let data
            = if self.is_hermitian(HERMITIAN_TOL) {
                self.data.clone()
            } else {
                log::warn!(
                    "Operator::eigh: operator of dimension {} is not \
                    Hermitian; symmetrizing",
                    self.left.dim(),
                );
                self.hermitian_part()?.into_data()
            };
        let (E, V) = data.eigh_into(UPLO::Lower)?;
        Ok((E, V))
    }

    /// Return the `n` lowest eigenvalues and their eigenstates.
    pub fn eigenstates(&self, n: usize) -> SimResult<(Vec<f64>, Vec<Ket>)> {
        let (E, V) = self.eigh()?;
        let n = n.min(E.len());
        let energies: Vec<f64> = E.iter().take(n).copied().collect();
        let states: Vec<Ket>
            = V.columns().into_iter().take(n)
            .map(|v| Ket::new_unchecked(self.left.clone(), v.to_owned()))
            .collect();
        Ok((energies, states))
    }

    /// Compute `exp(-i t self)` by diagonalization.
    pub fn expm_hermitian(&self, t: f64) -> SimResult<Self> {
        let (E, V) = self.eigh()?;
        let phases: nd::Array1<C64>
            = E.mapv(|e| (-C64::i() * e * t).exp());
        let V_dag = V.t().mapv(|a| a.conj());
        let data = (&V * &phases.insert_axis(nd::Axis(0))).dot(&V_dag);
        Ok(Self { left: self.left.clone(), right: self.right.clone(), data })
    }
}
