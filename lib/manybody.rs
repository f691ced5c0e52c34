//! Occupation-number bases for identical particles and the second-quantized
//! lift of one- and two-body operators into them.
//!
//! A one-body operator `A` on a basis of `M` modes becomes
//! ```text
//! Ã = Σ_{s,t} A_{s,t} c†_s c_t
//! ```
//! and a two-body operator `V` on the product of two copies of that basis,
//! with `⟨s t|V|k l⟩` stored at row `s * M + t` and column `k * M + l`,
//! becomes
//! ```text
//! Ṽ = Σ_{s,t,k,l} ⟨s t|V|k l⟩ c†_s c†_t c_l c_k
//! ```
//! No factor of 1/2 is applied to `Ṽ`; callers lifting a pair interaction
//! should scale the result themselves.
//!
//! Matrix elements are computed by acting with ladder operators on each
//! occupation tuple and looking up the resulting tuple, so only pairs of
//! many-body states connected by the operator are ever visited.

use std::{ hash::BuildHasherDefault, sync::Arc };
use indexmap::IndexSet;
use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use rustc_hash::FxHasher;
use serde::Deserialize;
use crate::{
    error::{ SimError, SimResult, config_err },
    hilbert::Basis,
    operator::Operator,
    state::Ket,
};

/// A single many-body basis element: the number of particles in each mode.
pub type Occupation = Vec<usize>;

type OccupationSet = IndexSet<Occupation, BuildHasherDefault<FxHasher>>;

/// Exchange statistics of the particles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistics {
    /// Any number of particles per mode.
    Bosons,
    /// At most one particle per mode; states are antisymmetric under exchange.
    Fermions,
}

impl Statistics {
    /// Maximum occupation of a single mode for `n_particles` total particles.
    pub fn max_occupation(&self, n_particles: usize) -> usize {
        match self {
            Self::Bosons => n_particles,
            Self::Fermions => n_particles.min(1),
        }
    }
}

/// Enumerate all occupation tuples of `n_modes` modes holding `n_particles`
/// particles.
///
/// Tuples are returned in descending lexicographic order, so that the state
/// with all particles in the first available modes comes first. The ordering
/// is fixed: equal arguments always give equal lists.
pub fn occupations(n_modes: usize, n_particles: usize, statistics: Statistics)
    -> Vec<Occupation>
{
    let to_occupation = |modes: Vec<usize>| -> Occupation {
        let mut occ: Occupation = vec![0; n_modes];
        modes.into_iter().for_each(|k| { occ[k] += 1; });
        occ
    };
    if n_particles == 0 { return vec![vec![0; n_modes]]; }
    if n_modes == 0 { return Vec::new(); }
    match statistics {
        Statistics::Bosons => {
            (0..n_modes).combinations_with_replacement(n_particles)
                .map(to_occupation)
                .collect()
        },
        Statistics::Fermions => {
            (0..n_modes).combinations(n_particles)
                .map(to_occupation)
                .collect()
        },
    }
}

/// `c_mode` acting on `occ` in place, returning the matrix element.
fn annihilate(occ: &mut [usize], mode: usize, statistics: Statistics)
    -> Option<f64>
{
    let n = occ[mode];
    if n == 0 { return None; }
    let factor
        = match statistics {
            Statistics::Bosons => (n as f64).sqrt(),
            Statistics::Fermions => fermion_sign(occ, mode),
        };
    occ[mode] -= 1;
    Some(factor)
}

/// `c†_mode` acting on `occ` in place, returning the matrix element.
fn create(occ: &mut [usize], mode: usize, statistics: Statistics)
    -> Option<f64>
{
    let n = occ[mode];
    let factor
        = match statistics {
            Statistics::Bosons => ((n + 1) as f64).sqrt(),
            Statistics::Fermions => {
                if n > 0 { return None; }
                fermion_sign(occ, mode)
            },
        };
    occ[mode] += 1;
    Some(factor)
}

/// `(-1)^n`, where `n` counts the particles in modes before `mode`.
fn fermion_sign(occ: &[usize], mode: usize) -> f64 {
    if occ[..mode].iter().sum::<usize>() % 2 == 0 { 1.0 } else { -1.0 }
}

/* Many-body basis ************************************************************/

/// Occupation-number basis for a fixed number of identical particles
/// distributed over the modes of a one-body basis.
#[derive(Clone, Debug)]
pub struct ManyBodyBasis {
    onebody: Basis,
    statistics: Statistics,
    n_particles: usize,
    occupations: OccupationSet,
}

impl PartialEq for ManyBodyBasis {
    fn eq(&self, other: &Self) -> bool {
        self.statistics == other.statistics
            && self.n_particles == other.n_particles
            && self.onebody == other.onebody
            && self.occupations.iter().eq(other.occupations.iter())
    }
}

impl ManyBodyBasis {
    /// Create a new many-body basis containing every occupation tuple for
    /// `n_particles` particles in the modes of `onebody`.
    ///
    /// Fails if no such tuple exists, e.g. for more fermions than modes.
    pub fn new(onebody: &Basis, n_particles: usize, statistics: Statistics)
        -> SimResult<Self>
    {
        let occs = occupations(onebody.dim(), n_particles, statistics);
        Self::from_occupations(onebody, n_particles, statistics, occs)
    }

    /// Create a new many-body basis from an explicit list of occupation
    /// tuples, kept in the given order.
    ///
    /// Fails if the list is empty or any tuple has the wrong length, does not
    /// sum to `n_particles`, violates `statistics`, or is repeated.
    pub fn from_occupations<I>(
        onebody: &Basis,
        n_particles: usize,
        statistics: Statistics,
        occupations: I,
    ) -> SimResult<Self>
    where I: IntoIterator<Item = Occupation>
    {
        let n_modes = onebody.dim();
        let max_occ = statistics.max_occupation(n_particles);
        let mut set = OccupationSet::default();
        for occ in occupations.into_iter() {
            if occ.len() != n_modes {
                return Err(config_err!(
                    "occupation {:?} has {} modes; expected {}",
                    occ, occ.len(), n_modes,
                ));
            }
            let total: usize = occ.iter().sum();
            if total != n_particles {
                return Err(config_err!(
                    "occupation {:?} holds {} particles; expected {}",
                    occ, total, n_particles,
                ));
            }
            if occ.iter().any(|n| *n > max_occ) {
                return Err(config_err!(
                    "occupation {:?} is not allowed for {:?}", occ, statistics,
                ));
            }
            if let (k, false) = set.insert_full(occ) {
                return Err(config_err!(
                    "occupation {:?} is repeated", set[k],
                ));
            }
        }
        if set.is_empty() {
            return Err(config_err!(
                "no {:?} states for {} particles in {} modes",
                statistics, n_particles, n_modes,
            ));
        }
        log::debug!(
            "many-body basis: {} {:?} states for {} particles in {} modes",
            set.len(), statistics, n_particles, n_modes,
        );
        Ok(Self {
            onebody: onebody.clone(),
            statistics,
            n_particles,
            occupations: set,
        })
    }

    /// Get a reference to the one-body basis.
    pub fn onebody(&self) -> &Basis { &self.onebody }

    /// Number of modes.
    pub fn n_modes(&self) -> usize { self.onebody.dim() }

    /// Number of particles.
    pub fn n_particles(&self) -> usize { self.n_particles }

    /// Exchange statistics.
    pub fn statistics(&self) -> Statistics { self.statistics }

    /// Number of many-body states.
    pub fn len(&self) -> usize { self.occupations.len() }

    /// Always `false` for a successfully constructed basis.
    pub fn is_empty(&self) -> bool { self.occupations.is_empty() }

    /// Iterate over occupation tuples in basis order.
    pub fn occupations(&self) -> impl Iterator<Item = &Occupation> + '_ {
        self.occupations.iter()
    }

    /// Get the occupation tuple of the `index`-th basis state.
    pub fn occupation(&self, index: usize) -> Option<&Occupation> {
        self.occupations.get_index(index)
    }

    /// Get the basis index of an occupation tuple.
    pub fn index_of(&self, occ: &[usize]) -> Option<usize> {
        self.occupations.get_index_of(occ)
    }

    /// Act on the `n`-th basis state with a string of ladder operators,
    /// annihilators first in the order of `ann`, then creators in the order
    /// of `cre`, returning the index of the resulting state and the matrix
    /// element. `scratch` is overwritten.
    fn act(
        &self,
        n: usize,
        ann: &[usize],
        cre: &[usize],
        scratch: &mut Occupation,
    ) -> Option<(usize, f64)>
    {
        let stats = self.statistics;
        scratch.clone_from(&self.occupations[n]);
        let mut factor: f64 = 1.0;
        for &k in ann.iter() { factor *= annihilate(scratch, k, stats)?; }
        for &k in cre.iter() { factor *= create(scratch, k, stats)?; }
        self.index_of(scratch.as_slice()).map(|m| (m, factor))
    }

    /// For every basis state `|n⟩`, collect the nonzero `⟨m|X|n⟩` where `X`
    /// is a sum of ladder-operator strings. `terms` pairs a coefficient with
    /// the string's annihilated and created modes, as passed to `act`.
    fn ladder_elements(&self, terms: &[(C64, Vec<usize>, Vec<usize>)])
        -> Vec<Vec<(usize, C64)>>
    {
        (0..self.len()).into_par_iter()
            .map(|n| {
                let mut scratch: Occupation = Vec::with_capacity(self.n_modes());
                terms.iter()
                    .filter_map(|(a, ann, cre)| {
                        self.act(n, ann, cre, &mut scratch)
                            .map(|(m, f)| (m, *a * f))
                    })
                    .collect()
            })
            .collect()
    }

    fn assemble(&self, terms: &[(C64, Vec<usize>, Vec<usize>)])
        -> nd::Array2<C64>
    {
        let n = self.len();
        let mut data: nd::Array2<C64> = nd::Array2::zeros((n, n));
        self.ladder_elements(terms).into_iter().enumerate()
            .for_each(|(col, elems)| {
                elems.into_iter()
                    .for_each(|(row, x)| { data[[row, col]] += x; });
            });
        data
    }
}

fn manybody_of<'a>(basis: &'a Basis, context: &'static str)
    -> SimResult<&'a Arc<ManyBodyBasis>>
{
    basis.as_manybody().ok_or(SimError::BasisMismatch(context))
}

/// Get the basis state with the given occupation tuple.
pub fn basis_state(basis: &Basis, occ: &[usize]) -> SimResult<Ket> {
    let mb = manybody_of(basis, "manybody::basis_state")?;
    let index
        = mb.index_of(occ)
        .ok_or_else(|| config_err!("occupation {:?} is not in the basis", occ))?;
    Ket::basis_state(basis, index)
}

/// Particle number operator `n_mode` for a single mode.
pub fn number(basis: &Basis, mode: usize) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::number")?;
    if mode >= mb.n_modes() {
        return Err(config_err!(
            "mode {} out of range for {} modes", mode, mb.n_modes()));
    }
    Ok(Operator::diagonal(basis, |k| (mb.occupations[k][mode] as f64).into()))
}

/// Total particle number operator.
pub fn total_number(basis: &Basis) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::total_number")?;
    Ok(Operator::diagonal(basis, |k| {
        (mb.occupations[k].iter().sum::<usize>() as f64).into()
    }))
}

/// Single-particle transition operator `c†_to c_from`.
pub fn transition(basis: &Basis, to: usize, from: usize)
    -> SimResult<Operator>
{
    let mb = manybody_of(basis, "manybody::transition")?;
    if to >= mb.n_modes() || from >= mb.n_modes() {
        return Err(config_err!(
            "modes ({}, {}) out of range for {} modes",
            to, from, mb.n_modes(),
        ));
    }
    let terms = [(C64::from(1.0), vec![from], vec![to])];
    Operator::square(basis.clone(), mb.assemble(&terms))
}

/// Lift a one-body operator on the basis's one-body modes to
/// `Σ_{s,t} A_{s,t} c†_s c_t`.
pub fn lift_one_body(basis: &Basis, op: &Operator) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::lift_one_body")?;
    op.left().check(mb.onebody(), "manybody::lift_one_body")?;
    op.right().check(mb.onebody(), "manybody::lift_one_body")?;
    let terms: Vec<(C64, Vec<usize>, Vec<usize>)>
        = op.data().indexed_iter()
        .filter(|(_, a)| !a.is_zero())
        .map(|((s, t), a)| (*a, vec![t], vec![s]))
        .collect();
    log::debug!(
        "lifting one-body operator: {} terms onto {} states",
        terms.len(), mb.len(),
    );
    Operator::square(basis.clone(), mb.assemble(&terms))
}

/// Lift a two-body operator on two copies of the basis's one-body modes to
/// `Σ ⟨s t|V|k l⟩ c†_s c†_t c_l c_k`.
pub fn lift_two_body(basis: &Basis, op: &Operator) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::lift_two_body")?;
    let pair = mb.onebody().tensor(mb.onebody());
    op.left().check(&pair, "manybody::lift_two_body")?;
    op.right().check(&pair, "manybody::lift_two_body")?;
    let M = mb.n_modes();
    let terms: Vec<(C64, Vec<usize>, Vec<usize>)>
        = op.data().indexed_iter()
        .filter(|(_, a)| !a.is_zero())
        .map(|((st, kl), a)| {
            let (s, t) = (st / M, st % M);
            let (k, l) = (kl / M, kl % M);
            (*a, vec![k, l], vec![t, s])
        })
        .collect();
    log::debug!(
        "lifting two-body operator: {} terms onto {} states",
        terms.len(), mb.len(),
    );
    Operator::square(basis.clone(), mb.assemble(&terms))
}

/// Lift an operator into the many-body basis, choosing the one- or two-body
/// form from the operator's basis.
///
/// Fails with [`SimError::BasisMismatch`] if the operator is neither on the
/// one-body basis nor on the product of two copies of it.
pub fn lift(basis: &Basis, op: &Operator) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::lift")?;
    op.left().check(op.right(), "manybody::lift")?;
    if op.left() == mb.onebody() {
        lift_one_body(basis, op)
    } else if op.left() == &mb.onebody().tensor(mb.onebody()) {
        lift_two_body(basis, op)
    } else {
        Err(SimError::BasisMismatch("manybody::lift"))
    }
}

/// One-body reduced density matrix `ρ` with `ρ_{s,t} = ⟨ψ|c†_t c_s|ψ⟩`, as an
/// operator on the one-body basis.
///
/// `ρ` is Hermitian with trace equal to the number of particles.
pub fn one_body_density(basis: &Basis, psi: &Ket) -> SimResult<Operator> {
    let mb = manybody_of(basis, "manybody::one_body_density")?;
    psi.basis().check(basis, "manybody::one_body_density")?;
    let M = mb.n_modes();
    let amps = psi.data();
    let contributions: Vec<Vec<(usize, usize, C64)>>
        = (0..mb.len()).into_par_iter()
        .map(|n| {
            if amps[n].is_zero() { return Vec::new(); }
            let mut scratch: Occupation = Vec::with_capacity(M);
            (0..M).cartesian_product(0..M)
                .filter_map(|(s, t)| {
                    mb.act(n, &[s], &[t], &mut scratch)
                        .map(|(m, f)| (s, t, amps[m].conj() * f * amps[n]))
                })
                .collect()
        })
        .collect();
    let mut rho: nd::Array2<C64> = nd::Array2::zeros((M, M));
    contributions.into_iter().flatten()
        .for_each(|(s, t, x)| { rho[[s, t]] += x; });
    Operator::square(mb.onebody().clone(), rho)
}

/// Expectation value `⟨ψ|Σ_{s,t} A_{s,t} c†_s c_t|ψ⟩` of a one-body operator,
/// computed as `Tr(A ρ)` with the [one-body density][one_body_density].
pub fn one_body_expect(basis: &Basis, op: &Operator, psi: &Ket)
    -> SimResult<C64>
{
    let rho = one_body_density(basis, psi)?;
    op.expect_dm(&rho)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{ SeedableRng, rngs::StdRng };

    fn close(a: &Operator, b: &Operator, tol: f64) -> bool {
        a.sub(b).unwrap().data().iter().all(|x| x.norm() < tol)
    }

    fn mb_basis(m: usize, n: usize, stats: Statistics) -> Basis {
        ManyBodyBasis::new(&Basis::Generic(m), n, stats).unwrap().into()
    }

    fn random_op(basis: &Basis, rng: &mut StdRng) -> Operator {
        let cols: Vec<Ket>
            = (0..basis.dim()).map(|_| Ket::random(basis, rng)).collect();
        let data = nd::Array2::from_shape_fn(
            (basis.dim(), basis.dim()), |(i, j)| cols[j].data()[i]);
        Operator::square(basis.clone(), data).unwrap()
    }

    #[test]
    fn enumeration_counts() {
        let bosons = occupations(4, 2, Statistics::Bosons);
        assert_eq!(bosons.len(), 10);
        let fermions = occupations(4, 2, Statistics::Fermions);
        assert_eq!(fermions.len(), 6);
        for occ in bosons.iter().chain(fermions.iter()) {
            assert_eq!(occ.iter().sum::<usize>(), 2);
            assert_eq!(occ.len(), 4);
        }
        assert!(fermions.iter().all(|occ| occ.iter().all(|n| *n <= 1)));
        assert_eq!(bosons.iter().unique().count(), 10);
        assert_eq!(occupations(3, 4, Statistics::Fermions).len(), 0);
        assert_eq!(occupations(3, 0, Statistics::Bosons), vec![vec![0, 0, 0]]);
    }

    #[test]
    fn enumeration_order() {
        assert_eq!(
            occupations(2, 2, Statistics::Bosons),
            vec![vec![2, 0], vec![1, 1], vec![0, 2]],
        );
        assert_eq!(
            occupations(3, 2, Statistics::Fermions),
            vec![vec![1, 1, 0], vec![1, 0, 1], vec![0, 1, 1]],
        );
        let occs = occupations(5, 3, Statistics::Bosons);
        assert!(occs.iter().tuple_windows().all(|(a, b)| a > b));
        assert_eq!(occs, occupations(5, 3, Statistics::Bosons));
    }

    #[test]
    fn from_occupations_checks() {
        let b = Basis::Generic(3);
        let stats = Statistics::Bosons;
        assert!(ManyBodyBasis::from_occupations(
            &b, 2, stats, vec![vec![1, 1, 0], vec![2, 0, 0]]).is_ok());
        let res = ManyBodyBasis::from_occupations(&b, 2, stats, vec![vec![1, 1, 1]]);
        assert!(matches!(res, Err(SimError::Configuration(_))));
        let res = ManyBodyBasis::from_occupations(&b, 2, stats, vec![vec![1, 1]]);
        assert!(matches!(res, Err(SimError::Configuration(_))));
        let res = ManyBodyBasis::from_occupations(
            &b, 2, stats, vec![vec![1, 1, 0], vec![1, 1, 0]]);
        assert!(matches!(res, Err(SimError::Configuration(_))));
        let res = ManyBodyBasis::from_occupations(
            &b, 2, Statistics::Fermions, vec![vec![2, 0, 0]]);
        assert!(matches!(res, Err(SimError::Configuration(_))));
        let res = ManyBodyBasis::new(&b, 4, Statistics::Fermions);
        assert!(matches!(res, Err(SimError::Configuration(_))));
    }

    #[test]
    fn identity_lifts_to_particle_number() {
        for stats in [Statistics::Bosons, Statistics::Fermions] {
            let onebody = Basis::Generic(4);
            let mb: Basis = ManyBodyBasis::new(&onebody, 2, stats).unwrap().into();
            let lifted = lift(&mb, &Operator::identity(&onebody)).unwrap();
            assert!(close(&lifted, &Operator::identity(&mb).scale(2.0), 1e-14));
            assert!(close(&lifted, &total_number(&mb).unwrap(), 1e-14));
        }
    }

    #[test]
    fn single_particle_lift_is_identity_map() {
        let mut rng = StdRng::seed_from_u64(8128);
        for stats in [Statistics::Bosons, Statistics::Fermions] {
            let onebody = Basis::Generic(5);
            let A = random_op(&onebody, &mut rng);
            let mb = mb_basis(5, 1, stats);
            let lifted = lift(&mb, &A).unwrap();
            assert_eq!(lifted.data(), A.data());
        }
    }

    #[test]
    fn mode_number_diagonal() {
        let onebody = Basis::Generic(4);
        let mb: Basis
            = ManyBodyBasis::new(&onebody, 2, Statistics::Bosons).unwrap().into();
        assert_eq!(mb.dim(), 10);
        let n0 = Operator::diagonal(&onebody, |k| if k == 0 { 1.0.into() } else { 0.0.into() });
        let lifted = lift(&mb, &n0).unwrap();
        let occs = mb.as_manybody().unwrap();
        for ((i, j), x) in lifted.data().indexed_iter() {
            if i == j {
                let expected = occs.occupation(i).unwrap()[0] as f64;
                assert!((x - C64::from(expected)).norm() < 1e-14);
            } else {
                assert_eq!(*x, C64::from(0.0));
            }
        }
        assert!(close(&lifted, &number(&mb, 0).unwrap(), 1e-14));
        assert!(number(&mb, 4).is_err());
    }

    #[test]
    fn bosonic_hopping_factor() {
        let mb = mb_basis(2, 2, Statistics::Bosons);
        let hop = transition(&mb, 1, 0).unwrap();
        // c†_1 c_0 |2, 0⟩ = √2 |1, 1⟩
        assert!((hop.get(1, 0).unwrap() - C64::from(2.0_f64.sqrt())).norm() < 1e-14);
        // c†_1 c_0 |1, 1⟩ = √2 |0, 2⟩
        assert!((hop.get(2, 1).unwrap() - C64::from(2.0_f64.sqrt())).norm() < 1e-14);
        assert_eq!(hop.get(0, 0).unwrap(), C64::from(0.0));
    }

    #[test]
    fn fermionic_hopping_sign() {
        let mb = mb_basis(3, 2, Statistics::Fermions);
        let hop = transition(&mb, 2, 0).unwrap();
        // c†_2 c_0 |1, 1, 0⟩ = -|0, 1, 1⟩
        let m = mb.as_manybody().unwrap();
        let i = m.index_of(&[0, 1, 1]).unwrap();
        let j = m.index_of(&[1, 1, 0]).unwrap();
        assert_eq!(hop.get(i, j), Some(C64::from(-1.0)));
        // c†_2 c_0 |1, 0, 1⟩ = 0 (mode 2 already occupied)
        let k = m.index_of(&[1, 0, 1]).unwrap();
        assert!(hop.data().column(k).iter().all(|x| *x == C64::from(0.0)));
    }

    #[test]
    fn two_body_identity() {
        for stats in [Statistics::Bosons, Statistics::Fermions] {
            let onebody = Basis::Generic(4);
            let mb: Basis = ManyBodyBasis::new(&onebody, 3, stats).unwrap().into();
            let pair = onebody.tensor(&onebody);
            let lifted = lift(&mb, &Operator::identity(&pair)).unwrap();
            assert!(close(&lifted, &Operator::identity(&mb).scale(6.0), 1e-13));
        }
    }

    #[test]
    fn two_body_density_density() {
        // V = n ⊗ n on a single mode of interest counts ordered pairs there
        let onebody = Basis::Generic(3);
        let mb: Basis
            = ManyBodyBasis::new(&onebody, 3, Statistics::Bosons).unwrap().into();
        let n0 = Operator::diagonal(&onebody, |k| if k == 0 { 1.0.into() } else { 0.0.into() });
        let lifted = lift(&mb, &n0.tensor(&n0)).unwrap();
        let m = mb.as_manybody().unwrap();
        for (i, occ) in m.occupations().enumerate() {
            let n = occ[0] as f64;
            assert!((lifted.get(i, i).unwrap() - C64::from(n * (n - 1.0))).norm() < 1e-13);
        }
    }

    #[test]
    fn composite_onebody_pair_lift() {
        // spin-orbital modes: two orbitals times a two-level internal state
        let onebody = Basis::Generic(2).tensor(&Basis::Fock(1));
        let mb: Basis
            = ManyBodyBasis::new(&onebody, 2, Statistics::Fermions).unwrap().into();
        let pair = onebody.tensor(&onebody);
        assert_eq!(pair.factors().len(), 4);
        let V = Operator::identity(&pair);
        let auto = lift(&mb, &V).unwrap();
        let direct = lift_two_body(&mb, &V).unwrap();
        assert_eq!(auto, direct);
        assert!(close(&auto, &Operator::identity(&mb).scale(2.0), 1e-13));
        let one = lift(&mb, &Operator::identity(&onebody)).unwrap();
        assert!(close(&one, &Operator::identity(&mb).scale(2.0), 1e-13));
    }

    #[test]
    fn product_of_lifts() {
        // Ã B̃ = (AB)~ + (A ⊗ B)~ for both statistics
        let mut rng = StdRng::seed_from_u64(2718);
        for (m, n, stats) in [
            (3, 3, Statistics::Bosons),
            (4, 2, Statistics::Fermions),
            (5, 3, Statistics::Fermions),
        ] {
            let onebody = Basis::Generic(m);
            let mb = mb_basis(m, n, stats);
            let A = random_op(&onebody, &mut rng);
            let B = random_op(&onebody, &mut rng);
            let lhs
                = lift(&mb, &A).unwrap()
                .compose(&lift(&mb, &B).unwrap()).unwrap();
            let rhs
                = lift(&mb, &A.compose(&B).unwrap()).unwrap()
                .add(&lift(&mb, &A.tensor(&B)).unwrap()).unwrap();
            assert!(close(&lhs, &rhs, 1e-12));
        }
    }

    #[test]
    fn fermionic_pair_hopping_sign() {
        let onebody = Basis::Generic(4);
        let mb = mb_basis(4, 2, Statistics::Fermions);
        let pair = onebody.tensor(&onebody);
        let m = mb.as_manybody().unwrap();
        let from = m.index_of(&[0, 0, 1, 1]).unwrap();
        let to = m.index_of(&[1, 1, 0, 0]).unwrap();
        let single = |s: usize, t: usize, k: usize, l: usize| -> Operator {
            let mut data: nd::Array2<C64> = nd::Array2::zeros((16, 16));
            data[[s * 4 + t, k * 4 + l]] = C64::from(1.0);
            Operator::square(pair.clone(), data).unwrap()
        };
        // c†_0 c†_1 c_3 c_2 |0, 0, 1, 1⟩ = +|1, 1, 0, 0⟩
        let V = lift(&mb, &single(0, 1, 2, 3)).unwrap();
        assert_eq!(V.get(to, from), Some(C64::from(1.0)));
        // c†_0 c†_1 c_2 c_3 |0, 0, 1, 1⟩ = -|1, 1, 0, 0⟩
        let V = lift(&mb, &single(0, 1, 3, 2)).unwrap();
        assert_eq!(V.get(to, from), Some(C64::from(-1.0)));
        // c†_1 c†_0 c_3 c_2 |0, 0, 1, 1⟩ = -|1, 1, 0, 0⟩
        let V = lift(&mb, &single(1, 0, 2, 3)).unwrap();
        assert_eq!(V.get(to, from), Some(C64::from(-1.0)));
        // c†_0 c†_2 c_1 c_3 |0, 1, 0, 1⟩ = -|1, 0, 1, 0⟩
        let V = lift(&mb, &single(0, 2, 3, 1)).unwrap();
        let from = m.index_of(&[0, 1, 0, 1]).unwrap();
        let to = m.index_of(&[1, 0, 1, 0]).unwrap();
        assert_eq!(V.get(to, from), Some(C64::from(-1.0)));
    }

    #[test]
    fn lift_rejects_foreign_operators() {
        let mb = mb_basis(3, 2, Statistics::Bosons);
        let wrong = Operator::identity(&Basis::Generic(4));
        assert!(matches!(lift(&mb, &wrong), Err(SimError::BasisMismatch(_))));
        let triple = Basis::from_tensor(
            [&Basis::Generic(3), &Basis::Generic(3), &Basis::Generic(3)]).unwrap();
        let wrong = Operator::identity(&triple);
        assert!(matches!(lift(&mb, &wrong), Err(SimError::BasisMismatch(_))));
        let rect = Operator::zeros(&Basis::Generic(3), &Basis::Generic(2));
        assert!(lift(&mb, &rect).is_err());
        assert!(lift(&Basis::Generic(6), &Operator::identity(&Basis::Generic(3))).is_err());
    }

    #[test]
    fn one_body_expectation_agrees() {
        let mut rng = StdRng::seed_from_u64(4669);
        for stats in [Statistics::Bosons, Statistics::Fermions] {
            let onebody = Basis::Generic(4);
            let mb: Basis = ManyBodyBasis::new(&onebody, 2, stats).unwrap().into();
            let A = random_op(&onebody, &mut rng);
            let psi = Ket::random(&mb, &mut rng);
            let direct = lift(&mb, &A).unwrap().expect(&psi).unwrap();
            let reduced = one_body_expect(&mb, &A, &psi).unwrap();
            assert!((direct - reduced).norm() < 1e-12);
            let rho = one_body_density(&mb, &psi).unwrap();
            assert!((rho.trace().unwrap() - C64::from(2.0)).norm() < 1e-12);
            assert!(rho.is_hermitian(1e-12));
            for (s, t) in (0..4).cartesian_product(0..4) {
                let hop = transition(&mb, t, s).unwrap().expect(&psi).unwrap();
                assert!((rho.get(s, t).unwrap() - hop).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn basis_state_lookup() {
        let mb = mb_basis(4, 2, Statistics::Bosons);
        let psi = basis_state(&mb, &[0, 2, 0, 0]).unwrap();
        let n1 = number(&mb, 1).unwrap();
        assert!((n1.expect(&psi).unwrap() - C64::from(2.0)).norm() < 1e-14);
        assert!(basis_state(&mb, &[1, 2, 0, 0]).is_err());
    }
}
