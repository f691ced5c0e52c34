//! Definitions to describe bases and combinations thereof.
//!
//! A [`Basis`] only carries enough information to fix the dimension and
//! meaning of the index into a state vector or operator matrix. Compatibility
//! between two bases is plain equality: operators and states can only be
//! combined when they are indexed by equal bases.

use std::sync::Arc;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ SimError, SimResult },
    manybody::ManyBodyBasis,
    spin::SpinTotal,
    subspace::SubspaceBasis,
};

/// Compute the outer product `|a⟩⟨b|` of two state vectors.
pub fn outer_prod(a: &nd::Array1<C64>, b: &nd::Array1<C64>)
    -> nd::Array2<C64>
{
    nd::Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j].conj())
}

/* Position grid **************************************************************/

/// A uniform, periodic grid of `n` points on `[xmin, xmax)`.
///
/// Grid points are `x_k = xmin + k * dx` with `dx = (xmax - xmin) / n`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionBasis {
    pub xmin: f64,
    pub xmax: f64,
    pub n: usize,
}

impl PositionBasis {
    /// Create a new position grid.
    ///
    /// Fails if `n == 0` or the interval is empty.
    pub fn new(xmin: f64, xmax: f64, n: usize) -> SimResult<Self> {
        if n == 0 {
            return Err(SimError::Configuration(
                "position basis requires at least one point".into()));
        }
        if !(xmax > xmin) {
            return Err(SimError::Configuration(
                format!("empty position interval [{}, {})", xmin, xmax)));
        }
        Ok(Self { xmin, xmax, n })
    }

    /// Grid spacing.
    pub fn dx(&self) -> f64 { (self.xmax - self.xmin) / self.n as f64 }

    /// Position of the `k`-th grid point.
    pub fn point(&self, k: usize) -> f64 { self.xmin + k as f64 * self.dx() }

    /// All grid points.
    pub fn points(&self) -> nd::Array1<f64> {
        (0..self.n).map(|k| self.point(k)).collect()
    }
}

/* Bases **********************************************************************/

/// An ordered, finite-dimensional labeling of quantum states.
#[derive(Clone, Debug)]
pub enum Basis {
    /// Unlabeled basis of fixed dimension.
    Generic(usize),
    /// Position grid.
    Position(PositionBasis),
    /// Harmonic-oscillator Fock states `|0⟩, ..., |nmax⟩`.
    Fock(usize),
    /// Spin projections for total spin `j`, ordered from `m = +j` down.
    Spin(SpinTotal),
    /// Tensor product of two or more bases, with the first factor varying
    /// slowest.
    Composite(Vec<Basis>),
    /// Span of a set of states in a parent basis.
    Subspace(Arc<SubspaceBasis>),
    /// Occupation-number basis for a fixed number of identical particles.
    ManyBody(Arc<ManyBodyBasis>),
}

impl PartialEq for Basis {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Generic(a), Self::Generic(b)) => a == b,
            (Self::Position(a), Self::Position(b)) => a == b,
            (Self::Fock(a), Self::Fock(b)) => a == b,
            (Self::Spin(a), Self::Spin(b)) => a == b,
            (Self::Composite(a), Self::Composite(b)) => a == b,
            (Self::Subspace(a), Self::Subspace(b))
                => Arc::ptr_eq(a, b) || a == b,
            (Self::ManyBody(a), Self::ManyBody(b))
                => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl From<SubspaceBasis> for Basis {
    fn from(sub: SubspaceBasis) -> Self { Self::Subspace(Arc::new(sub)) }
}

impl From<ManyBodyBasis> for Basis {
    fn from(mb: ManyBodyBasis) -> Self { Self::ManyBody(Arc::new(mb)) }
}

impl From<PositionBasis> for Basis {
    fn from(pos: PositionBasis) -> Self { Self::Position(pos) }
}

impl From<SpinTotal> for Basis {
    fn from(j: SpinTotal) -> Self { Self::Spin(j) }
}

impl Basis {
    /// Number of states in the basis.
    pub fn dim(&self) -> usize {
        match self {
            Self::Generic(n) => *n,
            Self::Position(pos) => pos.n,
            Self::Fock(nmax) => nmax + 1,
            Self::Spin(j) => j.dim(),
            Self::Composite(factors) => factors.iter().map(Self::dim).product(),
            Self::Subspace(sub) => sub.len(),
            Self::ManyBody(mb) => mb.len(),
        }
    }

    /// Return the factors of a composite basis, or `self` as a single factor
    /// otherwise.
    pub fn factors(&self) -> &[Basis] {
        match self {
            Self::Composite(factors) => factors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Create the tensor product of `self` on the left with another basis on
    /// the right.
    ///
    /// Composite operands are flattened, so the result never contains a
    /// nested [`Basis::Composite`].
    pub fn tensor(&self, rhs: &Self) -> Self {
        Self::Composite(
            self.factors().iter().chain(rhs.factors()).cloned().collect())
    }

    /// Create the tensor product of several bases.
    ///
    /// Returns `None` if no bases are given.
    pub fn from_tensor<'a, I>(bases: I) -> Option<Self>
    where I: IntoIterator<Item = &'a Basis>
    {
        bases.into_iter()
            .fold(None, |acc: Option<Self>, b| {
                Some(acc.map_or_else(|| b.clone(), |a| a.tensor(b)))
            })
    }

    /// Return `Ok` if `self` equals `other`, otherwise a
    /// [`SimError::BasisMismatch`] tagged with `context`.
    pub fn check(&self, other: &Self, context: &'static str) -> SimResult<()> {
        if self == other {
            Ok(())
        } else {
            Err(SimError::BasisMismatch(context))
        }
    }

    /// Return the subspace description if `self` is a subspace basis.
    pub fn as_subspace(&self) -> Option<&Arc<SubspaceBasis>> {
        match self {
            Self::Subspace(sub) => Some(sub),
            _ => None,
        }
    }

    /// Return the many-body description if `self` is a many-body basis.
    pub fn as_manybody(&self) -> Option<&Arc<ManyBodyBasis>> {
        match self {
            Self::ManyBody(mb) => Some(mb),
            _ => None,
        }
    }

    /// Get an array representation of the `index`-th basis state.
    pub fn get_vector_index(&self, index: usize) -> Option<nd::Array1<C64>> {
        let n = self.dim();
        (index < n).then(|| {
            let mut v: nd::Array1<C64> = nd::Array1::zeros(n);
            v[index] = C64::from(1.0);
            v
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tensor_flattens() {
        let a = Basis::Generic(2);
        let b = Basis::Fock(2);
        let c = Basis::Spin(SpinTotal::new(1));
        let ab = a.tensor(&b);
        let abc = ab.tensor(&c);
        assert_eq!(abc.factors().len(), 3);
        assert_eq!(abc.dim(), 2 * 3 * 2);
        assert_eq!(Basis::from_tensor([&a, &b, &c]), Some(abc));
        assert_eq!(Basis::from_tensor(std::iter::empty()), None);
    }

    #[test]
    fn position_grid() {
        let pos = PositionBasis::new(-1.0, 1.0, 4).unwrap();
        assert_eq!(pos.dx(), 0.5);
        assert_eq!(pos.points().to_vec(), vec![-1.0, -0.5, 0.0, 0.5]);
        assert!(PositionBasis::new(1.0, 1.0, 4).is_err());
        assert!(PositionBasis::new(0.0, 1.0, 0).is_err());
    }

    #[test]
    fn check_mismatch() {
        let a = Basis::Generic(3);
        assert!(a.check(&Basis::Generic(3), "test").is_ok());
        assert!(matches!(
            a.check(&Basis::Fock(2), "test"),
            Err(SimError::BasisMismatch("test")),
        ));
    }
}
