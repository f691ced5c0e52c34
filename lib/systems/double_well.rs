//! Identical particles in a one-dimensional quartic double well, reduced to
//! the lowest few single-particle eigenstates and interacting through a
//! softened Coulomb repulsion.
//!
//! The one-body Hamiltonian is `p^2 / 2m + depth * ((x / a)^2 - 1)^2` on a
//! position grid. Its lowest `n_modes` eigenstates span the mode subspace,
//! into which the one-body Hamiltonian, the position operator, and the pair
//! interaction `g / |x_1 - x_2|` are projected before lifting into the
//! occupation-number basis:
//! ```text
//! H = lift(H1) + 1/2 lift(V)
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use crate::{
    error::{ SimResult, config_err },
    hilbert::{ Basis, PositionBasis },
    manybody::{ self, ManyBodyBasis, Statistics },
    operator::Operator,
    ops,
    state::Ket,
    subspace::{ Projector, SubspaceBasis },
    systems::SystemParams,
};

/// Parameters for [`DoubleWell`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoubleWellParams {
    /// Left edge of the position grid.
    pub xmin: f64,
    /// Right edge of the position grid.
    pub xmax: f64,
    /// Number of grid points.
    pub n_grid: usize,
    /// Particle mass.
    pub mass: f64,
    /// Height of the barrier between the wells.
    pub depth: f64,
    /// Distance from the origin to the bottom of either well.
    pub a: f64,
    /// Number of single-particle eigenstates kept as modes.
    pub n_modes: usize,
    /// Number of particles.
    pub n_particles: usize,
    /// Particle exchange statistics.
    pub statistics: Statistics,
    /// Strength `g` of the pair interaction `g / |x_1 - x_2|`.
    pub coupling: f64,
}

impl Default for DoubleWellParams {
    fn default() -> Self {
        Self {
            xmin: -3.0,
            xmax: 3.0,
            n_grid: 128,
            mass: 1.0,
            depth: 4.0,
            a: 1.0,
            n_modes: 4,
            n_particles: 2,
            statistics: Statistics::Bosons,
            coupling: 1.0,
        }
    }
}

impl SystemParams for DoubleWellParams {
    fn check(&self) -> SimResult<()> {
        if !(self.xmax > self.xmin) {
            return Err(config_err!(
                "xmax ({}) must exceed xmin ({})", self.xmax, self.xmin));
        }
        if !(self.mass > 0.0) {
            return Err(config_err!("mass must be positive, got {}", self.mass));
        }
        if self.a == 0.0 {
            return Err(config_err!("well position a must be nonzero"));
        }
        if self.n_modes == 0 || self.n_modes > self.n_grid {
            return Err(config_err!(
                "n_modes must be between 1 and n_grid ({}), got {}",
                self.n_grid, self.n_modes,
            ));
        }
        if self.statistics == Statistics::Fermions
            && self.n_particles > self.n_modes
        {
            return Err(config_err!(
                "cannot place {} fermions in {} modes",
                self.n_particles, self.n_modes,
            ));
        }
        Ok(())
    }
}

/// Coulomb pair interaction `g / |x_i - x_j|` between grid points, with the
/// coincident-point value replaced by that at one grid spacing.
pub fn coulomb_pairs(grid: &PositionBasis, g: f64) -> nd::Array2<C64> {
    let dx = grid.dx();
    nd::Array2::from_shape_fn(
        (grid.n, grid.n),
        |(i, j)| {
            let r = (grid.point(i) - grid.point(j)).abs();
            C64::from(g / r.max(dx))
        },
    )
}

/// All operators of the reduced double-well problem.
#[derive(Clone, Debug)]
pub struct DoubleWell {
    pub params: DoubleWellParams,
    /// Position grid.
    pub grid: Basis,
    /// Lowest single-particle energies, ascending.
    pub energies: Vec<f64>,
    /// Projector from the grid onto the mode subspace.
    pub projector: Projector,
    /// Occupation-number basis over the modes.
    pub manybody: Basis,
    /// One-body Hamiltonian on the mode subspace.
    pub H1: Operator,
    /// Position operator on the mode subspace.
    pub X: Operator,
    /// Pair interaction on the product of two mode subspaces.
    pub V: Operator,
    /// Many-body Hamiltonian.
    pub H: Operator,
}

impl DoubleWell {
    pub fn new(params: &DoubleWellParams) -> SimResult<Self> {
        params.check()?;
        let pos = PositionBasis::new(params.xmin, params.xmax, params.n_grid)?;
        let grid: Basis = pos.into();
        let (depth, a) = (params.depth, params.a);
        let H1_grid
            = ops::kinetic(&grid, params.mass)?
            .add(&ops::potential(&grid, |x| depth * ((x / a).powi(2) - 1.0).powi(2))?)?;

        let (energies, modes) = H1_grid.eigenstates(params.n_modes)?;
        log::info!("double well: lowest mode energies {:?}", energies);
        let subspace: Basis = SubspaceBasis::new(&grid, modes)?.into();
        let projector = Projector::new(&subspace, &grid)?;

        let H1 = projector.project_operator(&H1_grid)?;
        let X = projector.project_operator(&ops::position(&grid)?)?;
        let V = projector.project_pair_diagonal(&coulomb_pairs(&pos, params.coupling))?;

        let manybody: Basis
            = ManyBodyBasis::new(&subspace, params.n_particles, params.statistics)?
            .into();
        log::info!(
            "double well: {} many-body states for {} {:?}",
            manybody.dim(), params.n_particles, params.statistics,
        );
        let H
            = manybody::lift(&manybody, &H1)?
            .add(&manybody::lift(&manybody, &V)?.scale(0.5))?;

        Ok(Self {
            params: params.clone(),
            grid,
            energies,
            projector,
            manybody,
            H1,
            X,
            V,
            H,
        })
    }

    /// Mode subspace basis.
    pub fn subspace(&self) -> &Basis { self.projector.subspace() }

    /// Lowest `n` many-body energies and eigenstates.
    pub fn spectrum(&self, n: usize) -> SimResult<(Vec<f64>, Vec<Ket>)> {
        self.H.eigenstates(n)
    }

    /// Many-body position operator `Σ x_i`.
    pub fn total_position(&self) -> SimResult<Operator> {
        manybody::lift(&self.manybody, &self.X)
    }

    /// Particle density on the position grid for a many-body state,
    /// normalized to the number of particles.
    pub fn density(&self, psi: &Ket) -> SimResult<nd::Array1<f64>> {
        let rho = manybody::one_body_density(&self.manybody, psi)?;
        let rho_grid = self.projector.embed_operator(&rho)?;
        Ok(rho_grid.into_data().diag().mapv(|n| n.re))
    }
}
