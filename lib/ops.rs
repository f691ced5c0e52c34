//! Constructors for common operators on position, Fock, and spin bases.
//!
//! Units are such that `ħ = 1`.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ SimError, SimResult },
    hilbert::{ Basis, PositionBasis },
    operator::Operator,
    spin::SpinTotal,
};

fn position_basis(basis: &Basis, context: &'static str)
    -> SimResult<PositionBasis>
{
    match basis {
        Basis::Position(pos) => Ok(*pos),
        _ => Err(SimError::BasisMismatch(context)),
    }
}

fn fock_cutoff(basis: &Basis, context: &'static str) -> SimResult<usize> {
    match basis {
        Basis::Fock(nmax) => Ok(*nmax),
        _ => Err(SimError::BasisMismatch(context)),
    }
}

fn spin_total(basis: &Basis, context: &'static str) -> SimResult<SpinTotal> {
    match basis {
        Basis::Spin(j) => Ok(*j),
        _ => Err(SimError::BasisMismatch(context)),
    }
}

/* Position grid **************************************************************/

/// Position operator `x` on a grid.
pub fn position(basis: &Basis) -> SimResult<Operator> {
    let pos = position_basis(basis, "ops::position")?;
    Ok(Operator::diagonal(basis, |k| pos.point(k).into()))
}

/// Diagonal potential `V(x)` on a grid.
pub fn potential<F>(basis: &Basis, V: F) -> SimResult<Operator>
where F: Fn(f64) -> f64
{
    let pos = position_basis(basis, "ops::potential")?;
    Ok(Operator::diagonal(basis, |k| V(pos.point(k)).into()))
}

/// Kinetic energy `p^2 / 2m` on a grid, using the periodic three-point
/// finite-difference Laplacian.
pub fn kinetic(basis: &Basis, mass: f64) -> SimResult<Operator> {
    let pos = position_basis(basis, "ops::kinetic")?;
    if !(mass > 0.0) {
        return Err(SimError::Configuration(
            format!("kinetic energy requires positive mass, got {}", mass)));
    }
    let n = pos.n;
    let t = 1.0 / (2.0 * mass * pos.dx().powi(2));
    let mut T: nd::Array2<C64> = nd::Array2::zeros((n, n));
    for k in 0..n {
        T[[k, k]] += 2.0 * t;
        T[[k, (k + 1) % n]] -= t;
        T[[k, (k + n - 1) % n]] -= t;
    }
    Operator::square(basis.clone(), T)
}

/* Fock ***********************************************************************/

/// Annihilation operator `a` truncated at the basis cutoff.
pub fn destroy(basis: &Basis) -> SimResult<Operator> {
    let nmax = fock_cutoff(basis, "ops::destroy")?;
    let mut a: nd::Array2<C64> = nd::Array2::zeros((nmax + 1, nmax + 1));
    (1..=nmax).for_each(|n| { a[[n - 1, n]] = (n as f64).sqrt().into(); });
    Operator::square(basis.clone(), a)
}

/// Creation operator `a†` truncated at the basis cutoff.
pub fn create(basis: &Basis) -> SimResult<Operator> {
    fock_cutoff(basis, "ops::create")?;
    destroy(basis).map(|a| a.dagger())
}

/// Number operator `a† a`.
pub fn number(basis: &Basis) -> SimResult<Operator> {
    fock_cutoff(basis, "ops::number")?;
    Ok(Operator::diagonal(basis, |n| (n as f64).into()))
}

/* Spin ***********************************************************************/

/// `J_z` for total spin `j`.
pub fn jz(basis: &Basis) -> SimResult<Operator> {
    let j = spin_total(basis, "ops::jz")?;
    Ok(Operator::diagonal(basis, |k| {
        j.proj_at(k).map(|m| m.f()).unwrap_or(0.0).into()
    }))
}

/// Raising operator `J_+`.
pub fn jp(basis: &Basis) -> SimResult<Operator> {
    let j = spin_total(basis, "ops::jp")?;
    let n = j.dim();
    let mut J: nd::Array2<C64> = nd::Array2::zeros((n, n));
    // index k + 1 holds m - 1, so J+ fills the first superdiagonal
    for (k, m) in j.projections().enumerate().skip(1) {
        J[[k - 1, k]] = j.raising_coeff(m).into();
    }
    Operator::square(basis.clone(), J)
}

/// Lowering operator `J_-`.
pub fn jm(basis: &Basis) -> SimResult<Operator> {
    let j = spin_total(basis, "ops::jm")?;
    let n = j.dim();
    let mut J: nd::Array2<C64> = nd::Array2::zeros((n, n));
    for (k, m) in j.projections().enumerate().take(n - 1) {
        J[[k + 1, k]] = j.lowering_coeff(m).into();
    }
    Operator::square(basis.clone(), J)
}

/// `J_x = (J_+ + J_-) / 2`.
pub fn jx(basis: &Basis) -> SimResult<Operator> {
    jp(basis)?.add(&jm(basis)?).map(|J| J.scale(0.5))
}

/// `J_y = (J_+ - J_-) / 2i`.
pub fn jy(basis: &Basis) -> SimResult<Operator> {
    jp(basis)?.sub(&jm(basis)?).map(|J| J.scale(C64::new(0.0, -0.5)))
}

/// Pauli `σ_x` on a spin-1/2 basis.
pub fn sigmax(basis: &Basis) -> SimResult<Operator> {
    require_half(basis, "ops::sigmax")?;
    jx(basis).map(|J| J.scale(2.0))
}

/// Pauli `σ_y` on a spin-1/2 basis.
pub fn sigmay(basis: &Basis) -> SimResult<Operator> {
    require_half(basis, "ops::sigmay")?;
    jy(basis).map(|J| J.scale(2.0))
}

/// Pauli `σ_z` on a spin-1/2 basis.
pub fn sigmaz(basis: &Basis) -> SimResult<Operator> {
    require_half(basis, "ops::sigmaz")?;
    jz(basis).map(|J| J.scale(2.0))
}

fn require_half(basis: &Basis, context: &'static str) -> SimResult<()> {
    if spin_total(basis, context)?.halves() == 1 {
        Ok(())
    } else {
        Err(SimError::BasisMismatch(context))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: &Operator, b: &Operator) -> bool {
        a.sub(b).unwrap().data().iter().all(|x| x.norm() < 1e-12)
    }

    #[test]
    fn spin_commutator() {
        let b = Basis::Spin(SpinTotal::from_f64(1.5));
        let (Jx, Jy, Jz) = (jx(&b).unwrap(), jy(&b).unwrap(), jz(&b).unwrap());
        let comm
            = Jx.compose(&Jy).unwrap()
            .sub(&Jy.compose(&Jx).unwrap()).unwrap();
        assert!(close(&comm, &Jz.scale(C64::i())));
        let J2
            = Jx.compose(&Jx).unwrap()
            .add(&Jy.compose(&Jy).unwrap()).unwrap()
            .add(&Jz.compose(&Jz).unwrap()).unwrap();
        assert!(close(&J2, &Operator::identity(&b).scale(1.5 * 2.5)));
    }

    #[test]
    fn ladder_adjoint() {
        let b = Basis::Spin(SpinTotal::new(5));
        let Jp = jp(&b).unwrap();
        let Jm = jm(&b).unwrap();
        assert!(close(&Jm, &Jp.dagger()));
        // [J+, J-] = 2 Jz
        let comm
            = Jp.compose(&Jm).unwrap()
            .sub(&Jm.compose(&Jp).unwrap()).unwrap();
        assert!(close(&comm, &jz(&b).unwrap().scale(2.0)));
    }

    #[test]
    fn pauli() {
        let b = Basis::Spin(SpinTotal::new(1));
        let sz = sigmaz(&b).unwrap();
        assert_eq!(sz.get(0, 0), Some(C64::from(1.0)));
        assert_eq!(sz.get(1, 1), Some(C64::from(-1.0)));
        let sx = sigmax(&b).unwrap();
        assert!(close(&sx.compose(&sx).unwrap(), &Operator::identity(&b)));
        assert!(sigmax(&Basis::Spin(SpinTotal::new(2))).is_err());
    }

    #[test]
    fn fock_ladder() {
        let b = Basis::Fock(4);
        let a = destroy(&b).unwrap();
        let n = create(&b).unwrap().compose(&a).unwrap();
        assert!(close(&n, &number(&b).unwrap()));
        assert!(destroy(&Basis::Generic(5)).is_err());
    }

    #[test]
    fn kinetic_plane_wave() {
        let pos = PositionBasis::new(0.0, 1.0, 64).unwrap();
        let b = Basis::Position(pos);
        let T = kinetic(&b, 1.0).unwrap();
        assert!(T.is_hermitian(1e-14));
        // constant function is annihilated by a periodic Laplacian
        let flat = crate::state::Ket::from_fn(&b, |_| 1.0.into()).normalized();
        assert!(T.expect(&flat).unwrap().norm() < 1e-9);
    }
}
