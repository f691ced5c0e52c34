//! Truncation of a basis to the span of a chosen set of states, and the
//! projection operator that carries states and operators between the two.
//!
//! For a subspace spanned by `|u_0⟩, ..., |u_{K-1}⟩` in a parent basis of
//! dimension `N`, the projector `P` is the `K × N` operator whose `i`-th row
//! is `⟨u_i|`. States and operators move into the subspace as `P|ψ⟩` and
//! `P A P†`, and back out as `P†|φ⟩` and `P† B P`. The round trip is only
//! lossless for orthonormal `|u_i⟩` (see [`orthonormalize`]).

use std::ops::Deref;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ SimError, SimResult },
    hilbert::Basis,
    operator::Operator,
    state::Ket,
};

/// Relative norm below which a Gram-Schmidt residual counts as linearly
/// dependent.
const DEPENDENCE_TOL: f64 = 1e-10;

/// Orthonormalize a set of states by modified Gram-Schmidt, preserving their
/// order.
///
/// Fails if the states are not all in the same basis or are linearly
/// dependent.
pub fn orthonormalize(states: &[Ket]) -> SimResult<Vec<Ket>> {
    let mut acc: Vec<Ket> = Vec::with_capacity(states.len());
    for (k, psi) in states.iter().enumerate() {
        let norm0 = psi.norm();
        let mut v = psi.clone();
        for u in acc.iter() {
            let ov = u.inner(&v)?;
            v = v.superpose(C64::from(1.0), u, -ov)?;
        }
        let norm = v.norm();
        if norm0 == 0.0 || norm <= DEPENDENCE_TOL * norm0 {
            return Err(SimError::Configuration(format!(
                "state {} is linearly dependent on the preceding states", k)));
        }
        acc.push(v.normalized());
    }
    Ok(acc)
}

/// A basis spanned by an ordered list of states in a parent basis.
///
/// The parent is held only to look up dimensions and check compatibility.
#[derive(Clone, Debug, PartialEq)]
pub struct SubspaceBasis {
    parent: Basis,
    states: Vec<Ket>,
}

impl Deref for SubspaceBasis {
    type Target = [Ket];

    fn deref(&self) -> &Self::Target { &self.states }
}

impl SubspaceBasis {
    /// Create a new subspace basis from defining states, which are used as
    /// given.
    ///
    /// Fails if no states are given or any state is not in `parent`.
    pub fn new(parent: &Basis, states: Vec<Ket>) -> SimResult<Self> {
        if states.is_empty() {
            return Err(SimError::Configuration(
                "a subspace basis requires at least one state".into()));
        }
        states.iter()
            .try_for_each(|psi| psi.basis().check(parent, "SubspaceBasis::new"))?;
        log::debug!(
            "subspace basis: {} states in a parent of dimension {}",
            states.len(), parent.dim(),
        );
        Ok(Self { parent: parent.clone(), states })
    }

    /// Like [`Self::new`], but [orthonormalizes][orthonormalize] the states
    /// first.
    pub fn orthonormal(parent: &Basis, states: Vec<Ket>) -> SimResult<Self> {
        states.iter()
            .try_for_each(|psi| {
                psi.basis().check(parent, "SubspaceBasis::orthonormal")
            })?;
        let states = orthonormalize(&states)?;
        Self::new(parent, states)
    }

    /// Get a reference to the parent basis.
    pub fn parent(&self) -> &Basis { &self.parent }

    /// Get a reference to the defining states.
    pub fn states(&self) -> &[Ket] { &self.states }

    /// Return `true` if all defining states are orthonormal to within `tol`.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        self.states.iter().enumerate()
            .all(|(i, u)| {
                self.states.iter().enumerate()
                    .all(|(j, v)| {
                        let target = if i == j { 1.0 } else { 0.0 };
                        u.inner(v)
                            .map(|ov| (ov - target).norm() <= tol)
                            .unwrap_or(false)
                    })
            })
    }
}

/// Construct the projection operator between a subspace and its parent.
///
/// With `(subspace, parent)` this is `P`; with `(parent, subspace)` it is
/// `P†`. Any other pairing fails with [`SimError::BasisMismatch`].
pub fn projector(left: &Basis, right: &Basis) -> SimResult<Operator> {
    if let Ok(P) = Projector::new(left, right) {
        Ok(P.op)
    } else if let Ok(P) = Projector::new(right, left) {
        Ok(P.op.dagger())
    } else {
        Err(SimError::BasisMismatch("projector"))
    }
}

/// Projection operator `P` from a parent basis into a subspace, together with
/// its adjoint.
///
/// Derefs to the underlying `P` as an [`Operator`].
#[derive(Clone, Debug, PartialEq)]
pub struct Projector {
    op: Operator,
    op_dag: Operator,
}

impl Deref for Projector {
    type Target = Operator;

    fn deref(&self) -> &Self::Target { &self.op }
}

impl Projector {
    /// Build `P` for a subspace basis and its parent.
    ///
    /// Fails if `subspace` is not a [`Basis::Subspace`] or was not built
    /// from `parent`.
    pub fn new(subspace: &Basis, parent: &Basis) -> SimResult<Self> {
        let sub
            = subspace.as_subspace()
            .ok_or(SimError::BasisMismatch("Projector::new"))?;
        sub.parent().check(parent, "Projector::new")?;
        let P: nd::Array2<C64>
            = nd::Array2::from_shape_fn(
                (sub.len(), parent.dim()),
                |(i, j)| sub.states()[i].data()[j].conj(),
            );
        let op = Operator::new(subspace.clone(), parent.clone(), P)?;
        let op_dag = op.dagger();
        Ok(Self { op, op_dag })
    }

    /// Get a reference to `P`.
    pub fn operator(&self) -> &Operator { &self.op }

    /// Get a reference to `P†`.
    pub fn adjoint(&self) -> &Operator { &self.op_dag }

    /// The subspace (row) basis.
    pub fn subspace(&self) -> &Basis { self.op.left() }

    /// The parent (column) basis.
    pub fn parent(&self) -> &Basis { self.op.right() }

    /// Tensor product `P ⊗ Q`, mapping `parent ⊗ parent'` into
    /// `subspace ⊗ subspace'`.
    ///
    /// Two-particle operators are projected with `self.tensor(self)`.
    pub fn tensor(&self, rhs: &Self) -> Self {
        Self {
            op: self.op.tensor(&rhs.op),
            op_dag: self.op_dag.tensor(&rhs.op_dag),
        }
    }

    /// `P|ψ⟩`.
    pub fn project_state(&self, psi: &Ket) -> SimResult<Ket> {
        self.op.apply(psi)
    }

    /// `P†|φ⟩`.
    pub fn embed_state(&self, phi: &Ket) -> SimResult<Ket> {
        self.op_dag.apply(phi)
    }

    /// `P A P†` for an operator `A` on the parent basis.
    pub fn project_operator(&self, A: &Operator) -> SimResult<Operator> {
        self.op.compose(A)?.compose(&self.op_dag)
    }

    /// `P† B P` for an operator `B` on the subspace.
    pub fn embed_operator(&self, B: &Operator) -> SimResult<Operator> {
        self.op_dag.compose(B)?.compose(&self.op)
    }

    /// Project a two-particle operator that is diagonal in `parent ⊗ parent`,
    /// given as `v[[i, j]]` for the first particle at `i` and the second at
    /// `j`, onto `subspace ⊗ subspace` without building the full product
    /// matrix.
    ///
    /// Equivalent to `self.tensor(self).project_operator(V)` where `V` is the
    /// diagonal operator built from `v`. Only valid for a single-factor
    /// projector.
    pub fn project_pair_diagonal(&self, v: &nd::Array2<C64>)
        -> SimResult<Operator>
    {
        if self.subspace().factors().len() != 1 {
            return Err(SimError::BasisMismatch(
                "Projector::project_pair_diagonal"));
        }
        let K = self.subspace().dim();
        let N = self.parent().dim();
        if v.shape() != [N, N].as_slice() {
            return Err(SimError::IncompatibleShape {
                context: "Projector::project_pair_diagonal",
                expected: vec![N, N],
                found: v.shape().to_vec(),
            });
        }
        let P = self.op.data();
        // W[(s, k), i] = ⟨u_s|i⟩⟨i|u_k⟩
        let W: nd::Array2<C64>
            = nd::Array2::from_shape_fn(
                (K * K, N),
                |(sk, i)| P[[sk / K, i]] * P[[sk % K, i]].conj(),
            );
        // M[(s, k), (t, l)] = Σ_ij W[(s, k), i] v[i, j] W[(t, l), j]
        let M: nd::Array2<C64> = W.dot(v).dot(&W.t());
        let V_sub: nd::Array2<C64>
            = nd::Array2::from_shape_fn(
                (K * K, K * K),
                |(st, kl)| {
                    let (s, t) = (st / K, st % K);
                    let (k, l) = (kl / K, kl % K);
                    M[[s * K + k, t * K + l]]
                },
            );
        let pair = self.subspace().tensor(self.subspace());
        Operator::square(pair, V_sub)
    }
}
