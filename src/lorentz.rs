//! # Relativistic four-momentum
//!
//! [`FourMomentum`] stores the energy and the Cartesian three-momentum of a particle in natural
//! units (`c = 1`, GeV) and derives the collider coordinates used by the acceptance and
//! resolution model:
//!
//! * transverse momentum `pt = √(px² + py²)`,
//! * pseudorapidity `η = asinh(pz / pt)`,
//! * azimuthal angle `φ = atan2(py, px)`,
//! * invariant mass `m² = E² − |p|²`.
//!
//! Two constructive operations are provided, matching what the smearing formulas need:
//!
//! * [`FourMomentum::from_vector_and_energy`] – scaled direction + energy (calorimeter path),
//! * [`FourMomentum::from_pt_eta_phi_m`] – collider coordinates (tracker / muon path).
//!
//! Values are `Copy` and never mutated in place: every transformation yields a new momentum.
use std::fmt;

use nalgebra::{Unit, Vector3};

use crate::constants::{Eta, GeV, Radian};

/// Four-momentum `p^μ = (E, px, py, pz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourMomentum {
    energy: GeV,
    momentum: Vector3<GeV>,
}

impl FourMomentum {
    /// Build a four-momentum from its Cartesian components.
    pub fn new(px: GeV, py: GeV, pz: GeV, energy: GeV) -> Self {
        Self {
            energy,
            momentum: Vector3::new(px, py, pz),
        }
    }

    /// Build a four-momentum from a three-momentum vector and an energy.
    pub fn from_vector_and_energy(momentum: Vector3<GeV>, energy: GeV) -> Self {
        Self { energy, momentum }
    }

    /// Build a four-momentum from collider coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `pt`: transverse momentum `[GeV]`.
    /// * `eta`: pseudorapidity.
    /// * `phi`: azimuthal angle `[rad]`.
    /// * `mass`: invariant mass `[GeV]`. A negative mass is read as `m² < 0`.
    ///
    /// Return
    /// ----------
    /// * The four-momentum with `E = √(|p|² + m²)`, floored at zero for spacelike input.
    pub fn from_pt_eta_phi_m(pt: GeV, eta: Eta, phi: Radian, mass: GeV) -> Self {
        let pt = pt.abs();
        let momentum = Vector3::new(pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
        let p2 = momentum.norm_squared();
        let energy = if mass >= 0.0 {
            (p2 + mass * mass).sqrt()
        } else {
            (p2 - mass * mass).max(0.0).sqrt()
        };
        Self { energy, momentum }
    }

    pub fn energy(&self) -> GeV {
        self.energy
    }

    pub fn px(&self) -> GeV {
        self.momentum.x
    }

    pub fn py(&self) -> GeV {
        self.momentum.y
    }

    pub fn pz(&self) -> GeV {
        self.momentum.z
    }

    /// Three-momentum vector.
    pub fn vect(&self) -> &Vector3<GeV> {
        &self.momentum
    }

    /// Magnitude of the three-momentum `|p|`.
    pub fn p(&self) -> GeV {
        self.momentum.norm()
    }

    pub fn pt(&self) -> GeV {
        self.momentum.x.hypot(self.momentum.y)
    }

    /// Pseudorapidity `η = asinh(pz / pt)`.
    ///
    /// Along the beam axis (`pt = 0`) this is `±∞` following the sign of `pz`, and `0` for a
    /// particle at rest.
    pub fn eta(&self) -> Eta {
        let pt = self.pt();
        let pz = self.pz();
        if pt == 0.0 {
            if pz == 0.0 {
                0.0
            } else {
                pz.signum() * f64::INFINITY
            }
        } else {
            (pz / pt).asinh()
        }
    }

    pub fn phi(&self) -> Radian {
        if self.momentum.x == 0.0 && self.momentum.y == 0.0 {
            0.0
        } else {
            self.momentum.y.atan2(self.momentum.x)
        }
    }

    /// Invariant mass squared `m² = E² − |p|²`.
    pub fn m2(&self) -> f64 {
        self.energy * self.energy - self.momentum.norm_squared()
    }

    /// Invariant mass, negative when the momentum is spacelike.
    pub fn m(&self) -> GeV {
        let m2 = self.m2();
        if m2 < 0.0 {
            -(-m2).sqrt()
        } else {
            m2.sqrt()
        }
    }

    /// Unit direction of flight, `None` for a vanishing three-momentum.
    pub fn direction(&self) -> Option<Unit<Vector3<GeV>>> {
        Unit::try_new(self.momentum, 0.0)
    }
}

impl fmt::Display for FourMomentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(E = {:.6}, px = {:.6}, py = {:.6}, pz = {:.6})",
            self.energy, self.momentum.x, self.momentum.y, self.momentum.z
        )
    }
}
