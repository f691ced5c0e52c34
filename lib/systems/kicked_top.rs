//! Quantum kicked top: a spin `j` rotated about `y` and then twisted about
//! `z` once per period.
//!
//! The Floquet operator is
//! ```text
//! U = exp(-i k/(2j) Jz^2) exp(-i p Jy)
//! ```

use std::f64::consts::FRAC_PI_2;
use ndarray as nd;
use rayon::iter::{ IntoParallelRefIterator, ParallelIterator };
use serde::Deserialize;
use crate::{
    error::{ SimResult, config_err },
    hilbert::Basis,
    operator::Operator,
    ops,
    spin::SpinTotal,
    state::Ket,
    systems::SystemParams,
};

/// Parameters for [`KickedTop`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KickedTopParams {
    /// Total spin; must be a positive multiple of 1/2.
    pub j: f64,
    /// Rotation angle about `y` per period.
    pub p: f64,
    /// Twist strength.
    pub k: f64,
    /// Polar angle of the initial coherent state.
    pub theta: f64,
    /// Azimuthal angle of the initial coherent state.
    pub phi: f64,
    /// Number of periods to evolve through.
    pub n_kicks: usize,
}

impl Default for KickedTopParams {
    fn default() -> Self {
        Self {
            j: 10.0,
            p: FRAC_PI_2,
            k: 3.0,
            theta: 2.25,
            phi: 0.63,
            n_kicks: 100,
        }
    }
}

impl SystemParams for KickedTopParams {
    fn check(&self) -> SimResult<()> {
        let twice = 2.0 * self.j;
        if !(self.j > 0.0) || (twice - twice.round()).abs() > 1e-9 {
            return Err(config_err!(
                "j must be a positive multiple of 1/2, got {}", self.j));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct KickedTop {
    pub params: KickedTopParams,
    pub basis: Basis,
    pub Jx: Operator,
    pub Jy: Operator,
    pub Jz: Operator,
    /// One-period evolution operator.
    pub floquet: Operator,
}

impl KickedTop {
    pub fn new(params: &KickedTopParams) -> SimResult<Self> {
        params.check()?;
        let basis: Basis = SpinTotal::from_f64(params.j).into();
        let Jx = ops::jx(&basis)?;
        let Jy = ops::jy(&basis)?;
        let Jz = ops::jz(&basis)?;
        let twist = Jz.compose(&Jz)?.expm_hermitian(params.k / (2.0 * params.j))?;
        let rotation = Jy.expm_hermitian(params.p)?;
        let floquet = twist.compose(&rotation)?;
        log::debug!("kicked top: Floquet operator of dimension {}", basis.dim());
        Ok(Self { params: params.clone(), basis, Jx, Jy, Jz, floquet })
    }

    /// Spin coherent state pointing along `(sinθ cosφ, sinθ sinφ, cosθ)`.
    pub fn coherent_state(&self, theta: f64, phi: f64) -> SimResult<Ket> {
        let up = Ket::basis_state(&self.basis, 0)?;
        let generator
            = self.Jy.scale(phi.cos())
            .sub(&self.Jx.scale(phi.sin()))?;
        generator.expm_hermitian(theta)?.apply(&up)
    }

    /// Stroboscopic evolution through `n_kicks` periods, returning
    /// `n_kicks + 1` states starting with `psi0`.
    pub fn evolve(&self, psi0: &Ket, n_kicks: usize) -> SimResult<Vec<Ket>> {
        let mut states: Vec<Ket> = Vec::with_capacity(n_kicks + 1);
        states.push(psi0.clone());
        for _ in 0..n_kicks {
            let next = self.floquet.apply(&states[states.len() - 1])?;
            states.push(next);
        }
        Ok(states)
    }

    /// `⟨J⟩ / j` for each state, as rows of `(x, y, z)` components.
    pub fn trajectory(&self, states: &[Ket]) -> SimResult<nd::Array2<f64>> {
        let j = self.params.j;
        let rows: Vec<[f64; 3]>
            = states.par_iter()
            .map(|psi| -> SimResult<[f64; 3]> {
                Ok([
                    self.Jx.expect(psi)?.re / j,
                    self.Jy.expect(psi)?.re / j,
                    self.Jz.expect(psi)?.re / j,
                ])
            })
            .collect::<SimResult<Vec<_>>>()?;
        Ok(nd::Array2::from_shape_fn((rows.len(), 3), |(t, a)| rows[t][a]))
    }

    /// Evolve the configured coherent state and return its trajectory.
    pub fn run(&self) -> SimResult<nd::Array2<f64>> {
        let psi0 = self.coherent_state(self.params.theta, self.params.phi)?;
        let states = self.evolve(&psi0, self.params.n_kicks)?;
        self.trajectory(&states)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_complex::Complex64 as C64;

    fn top(j: f64) -> KickedTop {
        KickedTop::new(&KickedTopParams { j, ..KickedTopParams::default() })
            .unwrap()
    }

    #[test]
    fn floquet_is_unitary() {
        let kt = top(4.5);
        let U = &kt.floquet;
        let UU = U.dagger().compose(U).unwrap();
        let diff = UU.sub(&Operator::identity(&kt.basis)).unwrap();
        assert!(diff.data().iter().all(|a| a.norm() < 1e-10));
    }

    #[test]
    fn coherent_state_direction() {
        let kt = top(5.0);
        let (theta, phi) = (1.1, 0.7);
        let psi = kt.coherent_state(theta, phi).unwrap();
        assert!((psi.norm() - 1.0).abs() < 1e-12);
        let traj = kt.trajectory(std::slice::from_ref(&psi)).unwrap();
        let expected = [
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        ];
        for (a, e) in traj.row(0).iter().zip(expected) {
            assert!((a - e).abs() < 1e-10);
        }
        let jz = kt.Jz.expect(&psi).unwrap();
        assert!((jz - C64::from(5.0 * theta.cos())).norm() < 1e-10);
    }

    #[test]
    fn evolution_preserves_norm() {
        let kt = top(3.0);
        let psi0 = kt.coherent_state(0.4, 1.9).unwrap();
        let states = kt.evolve(&psi0, 25).unwrap();
        assert_eq!(states.len(), 26);
        assert!(states.iter().all(|psi| (psi.norm() - 1.0).abs() < 1e-10));
        let traj = kt.trajectory(&states).unwrap();
        assert_eq!(traj.shape(), &[26, 3]);
        // |⟨J⟩| / j never exceeds one
        assert!(traj.rows().into_iter()
            .all(|r| r.iter().map(|x| x * x).sum::<f64>() <= 1.0 + 1e-9));
    }

    #[test]
    fn params_checked() {
        assert!(KickedTopParams::from_toml_str("j = 2.5\nk = 6.0").is_ok());
        assert!(KickedTopParams::from_toml_str("j = 0.3").is_err());
        assert!(KickedTop::new(&KickedTopParams { j: -1.0, ..Default::default() }).is_err());
    }
}
