//! Definitions for angular momentum quantum numbers used to label spin bases.

/// A single spin-projection quantum number.
///
/// This type is backed by a single `i32` representing the number of halves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinProj(i32);

impl SpinProj {
    /// Create a new spin projection from a number of halves.
    pub fn new(m: i32) -> Self { Self(m) }

    /// Return the projection quantum number as an `f64`, i.e. half the
    /// stored number of halves.
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }
}

/// A single total-spin quantum number.
///
/// This type is backed by a single `u32` representing the number of halves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinTotal(u32);

impl SpinTotal {
    /// Create a new total spin from a number of halves.
    pub fn new(j: u32) -> Self { Self(j) }

    /// Return `self` as a bare number of halves.
    pub fn halves(self) -> u32 { self.0 }

    /// Return `self` as an `f64`.
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }

    /// Create a new total-spin quantum number from a `f64` value, rounding to
    /// the nearest half-integer.
    ///
    /// Negative inputs are passed through [`f64::abs`] before rounding.
    pub fn from_f64(f: f64) -> Self { Self((2.0 * f.abs()).round() as u32) }

    /// Number of projection states, `2j + 1`.
    pub fn dim(self) -> usize { self.0 as usize + 1 }

    /// Return the projection number labeling the `index`-th basis state.
    ///
    /// Projections are ordered by descending value, so index 0 is `m = +j`.
    pub fn proj_at(self, index: usize) -> Option<SpinProj> {
        (index < self.dim())
            .then(|| SpinProj(self.0 as i32 - 2 * index as i32))
    }

    /// Return an iterator over available projections by descending value.
    pub fn projections(self) -> SpinProjections {
        SpinProjections { j: self, next: 0 }
    }

    /// Matrix element `⟨j, m + 1| J+ |j, m⟩ = sqrt(j(j + 1) - m(m + 1))`.
    ///
    /// Returns zero if `m` is stretched.
    pub fn raising_coeff(self, m: SpinProj) -> f64 {
        let j = self.f();
        let m = m.f();
        (j * (j + 1.0) - m * (m + 1.0)).max(0.0).sqrt()
    }

    /// Matrix element `⟨j, m - 1| J- |j, m⟩ = sqrt(j(j + 1) - m(m - 1))`.
    ///
    /// Returns zero if `m` is stretched.
    pub fn lowering_coeff(self, m: SpinProj) -> f64 {
        let j = self.f();
        let m = m.f();
        (j * (j + 1.0) - m * (m - 1.0)).max(0.0).sqrt()
    }
}

/// Iterator over spin projection states for a fixed total spin magnitude.
///
/// Projection states are visited in descending order.
#[derive(Copy, Clone, Debug)]
pub struct SpinProjections {
    j: SpinTotal,
    next: usize,
}

impl Iterator for SpinProjections {
    type Item = SpinProj;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.j.proj_at(self.next)?;
        self.next += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.j.dim().saturating_sub(self.next);
        (n, Some(n))
    }
}

impl ExactSizeIterator for SpinProjections { }
