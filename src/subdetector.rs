//! # Sub-detector acceptance and resolution
//!
//! A [`SubDetector`] stands for one detection sub-element (tracker, calorimeter layer, muon
//! system). It answers three questions about a particle of given species and true momentum:
//!
//! 1. **Acceptance** – [`SubDetector::inside`]: is the species measured here, and do |η| and pt
//!    fall in an enabled step of the [`RangeTable`]s?
//! 2. **Resolution** – [`SubDetector::sigma`]: the expected measurement uncertainty, selected by
//!    the [`ResolutionModel`]:
//!
//! | model         | smeared variable | σ                              |
//! |---------------|------------------|--------------------------------|
//! | `Calorimeter` | E                | `√(a²/E + b²) · E`             |
//! | `Tracker`     | pt               | `√(a²·pt² + b²)`               |
//! | `MuonSystem`  | pt               | `a · pt`                       |
//! | `None`        | –                | [`UNCONFIGURED_SIGMA`]         |
//!
//! 3. **Measurement** – [`SubDetector::smear`]: one Gaussian draw `N(0, σ)` from the
//!    sub-detector's own seeded generator, applied to the smeared variable.
//!
//! ## Random source
//!
//! Each sub-detector owns a [`StdRng`] seeded from a fixed value ([`DEFAULT_SEED`] unless
//! configured). Sequences are reproducible for identical configuration and seed, and
//! independent across instances. Smearing borrows the sub-detector mutably, so one instance is
//! never sampled from two threads at once.
//!
//! ## Domain errors
//!
//! Smearing never clamps: a draw pushing the energy below the rest mass, or the transverse
//! momentum below zero, is reported as a [`DetectorError`].
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Normal, NormalError};

use crate::constants::{
    ParticleId, DEFAULT_CONSTANT_TERM, DEFAULT_SEED, DEFAULT_STOCHASTIC_TERM, UNCONFIGURED_SIGMA,
};
use crate::detector_errors::DetectorError;
use crate::lorentz::FourMomentum;
use crate::range_table::RangeTable;

/// Resolution formula family of a sub-detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionModel {
    Tracker,
    Calorimeter,
    MuonSystem,
    /// Unconfigured element: infinite uncertainty, smearing is the identity.
    None,
}

impl fmt::Display for ResolutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionModel::Tracker => "tracker",
            ResolutionModel::Calorimeter => "calorimeter",
            ResolutionModel::MuonSystem => "muon",
            ResolutionModel::None => "none",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ResolutionModel {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tracker" => Ok(ResolutionModel::Tracker),
            "calorimeter" | "calo" => Ok(ResolutionModel::Calorimeter),
            "muon" | "muonsystem" => Ok(ResolutionModel::MuonSystem),
            "none" => Ok(ResolutionModel::None),
            _ => Err(DetectorError::GeometryParsingError(format!(
                "Unknown resolution model: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubDetector {
    name: String,
    model: ResolutionModel,
    stochastic_term: f64,
    constant_term: f64,
    species: BTreeSet<ParticleId>,
    eta_table: RangeTable,
    pt_table: RangeTable,
    seed: u64,
    rng: StdRng,
}

impl SubDetector {
    /// Create a sub-detector accepting no species yet.
    ///
    /// The |η| table starts enabled from 0 and the pt table disabled from 0; populate species and
    /// thresholds through [`SubDetector::builder`] for anything beyond a bare element.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: label used in diagnostics only.
    /// * `model`: the resolution formula family.
    /// * `stochastic_term`: coefficient `a` of the resolution formula.
    /// * `constant_term`: coefficient `b` of the resolution formula.
    ///
    /// Return
    /// ----------
    /// * The sub-detector, or [`DetectorError::InvalidResolutionCoefficient`] when a coefficient is
    ///   negative or not finite.
    pub fn new(
        name: impl Into<String>,
        model: ResolutionModel,
        stochastic_term: f64,
        constant_term: f64,
    ) -> Result<Self, DetectorError> {
        Self::builder(name, model)
            .stochastic_term(stochastic_term)
            .constant_term(constant_term)
            .build()
    }

    /// Fluent, validating constructor.
    ///
    /// ```
    /// use detsmear::subdetector::{ResolutionModel, SubDetector};
    ///
    /// let muons = SubDetector::builder("Muon spectrometer", ResolutionModel::MuonSystem)
    ///     .stochastic_term(0.1)
    ///     .species([13, -13])
    ///     .eta_step(2.7, false)
    ///     .pt_step(10.0, true)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(muons.accepts_species(-13));
    /// ```
    pub fn builder(name: impl Into<String>, model: ResolutionModel) -> SubDetectorBuilder {
        SubDetectorBuilder::new(name, model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> ResolutionModel {
        self.model
    }

    pub fn stochastic_term(&self) -> f64 {
        self.stochastic_term
    }

    pub fn constant_term(&self) -> f64 {
        self.constant_term
    }

    pub fn species(&self) -> &BTreeSet<ParticleId> {
        &self.species
    }

    pub fn eta_table(&self) -> &RangeTable {
        &self.eta_table
    }

    pub fn pt_table(&self) -> &RangeTable {
        &self.pt_table
    }

    /// Seed the random source was last initialised with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn accepts_species(&self, particle_id: ParticleId) -> bool {
        self.species.contains(&particle_id)
    }

    /// Restart the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Geometric and species acceptance.
    ///
    /// True iff the species is measured by this element, `|η|` falls in an enabled step of the
    /// η table and `pt` in an enabled step of the pt table. Resolution plays no role here.
    pub fn inside(&self, particle_id: ParticleId, momentum: &FourMomentum) -> bool {
        self.accepts_species(particle_id)
            && self.eta_table.allows(momentum.eta().abs())
            && self.pt_table.allows(momentum.pt())
    }

    /// Expected measurement uncertainty for a particle of true momentum `momentum`.
    ///
    /// Return
    /// ----------
    /// * `σ ≥ 0` in GeV, on E for a calorimeter and on pt for a tracker or muon system.
    /// * [`UNCONFIGURED_SIGMA`] for [`ResolutionModel::None`].
    /// * [`DetectorError::NonPositiveEnergy`] if a calorimeter is asked about `E ≤ 0`.
    pub fn sigma(&self, momentum: &FourMomentum) -> Result<f64, DetectorError> {
        let a = self.stochastic_term;
        let b = self.constant_term;
        match self.model {
            ResolutionModel::Calorimeter => {
                let energy = momentum.energy();
                if !(energy > 0.0 && energy.is_finite()) {
                    return Err(DetectorError::NonPositiveEnergy(energy));
                }
                Ok((a * a / energy + b * b).sqrt() * energy)
            }
            ResolutionModel::Tracker => {
                let pt = momentum.pt();
                Ok((a * a * pt * pt + b * b).sqrt())
            }
            ResolutionModel::MuonSystem => Ok(a * momentum.pt()),
            ResolutionModel::None => Ok(UNCONFIGURED_SIGMA),
        }
    }

    /// Measured momentum after one random resolution draw.
    ///
    /// * Calorimeter: `E' = E + ΔE`, direction and invariant mass kept, `|p'| = √(E'² − m²)`.
    /// * Tracker / muon system: `pt' = pt + Δpt`, `pz`, `φ` and `m` kept, `η' = asinh(pz / pt')`.
    /// * None: the input is returned and the generator does not advance.
    ///
    /// Errors
    /// ----------
    /// * [`DetectorError::UndefinedDirection`] – calorimeter input with a null three-momentum.
    /// * [`DetectorError::UnphysicalEnergy`] – `E' ≤ 0` or `E'² < m²`.
    /// * [`DetectorError::NonPositiveTransverseMomentum`] – `pt' ≤ 0`.
    /// * any error of [`SubDetector::sigma`].
    pub fn smear(&mut self, momentum: &FourMomentum) -> Result<FourMomentum, DetectorError> {
        match self.model {
            ResolutionModel::Calorimeter => {
                let direction = momentum
                    .direction()
                    .ok_or(DetectorError::UndefinedDirection)?;
                let sigma = self.sigma(momentum)?;
                let delta = self.draw(sigma)?;
                let energy = momentum.energy() + delta;
                let mass_squared = momentum.m2();

                trace!("{}: ΔE = {delta} (σ = {sigma})", self.name);

                if !(energy > 0.0) || energy * energy < mass_squared {
                    return Err(DetectorError::UnphysicalEnergy {
                        energy,
                        mass_squared,
                    });
                }
                let p = (energy * energy - mass_squared).sqrt();
                Ok(FourMomentum::from_vector_and_energy(
                    direction.into_inner() * p,
                    energy,
                ))
            }
            ResolutionModel::Tracker | ResolutionModel::MuonSystem => {
                let sigma = self.sigma(momentum)?;
                let delta = self.draw(sigma)?;
                let pt = momentum.pt() + delta;

                trace!("{}: Δpt = {delta} (σ = {sigma})", self.name);

                if !(pt > 0.0) {
                    return Err(DetectorError::NonPositiveTransverseMomentum(pt));
                }
                // pz is held fixed, so η follows the new pt with the sign of pz
                let eta = (momentum.pz() / pt).asinh();
                Ok(FourMomentum::from_pt_eta_phi_m(
                    pt,
                    eta,
                    momentum.phi(),
                    momentum.m(),
                ))
            }
            ResolutionModel::None => Ok(*momentum),
        }
    }

    fn draw(&mut self, sigma: f64) -> Result<f64, DetectorError> {
        if !sigma.is_finite() {
            return Err(NormalError::BadVariance.into());
        }
        let normal = Normal::new(0.0, sigma)?;
        Ok(self.rng.sample(normal))
    }
}

impl fmt::Display for SubDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} @ {}, {} | ids: {} | eta: {} | pt: {}",
            self.name,
            self.model,
            self.stochastic_term,
            self.constant_term,
            self.species.iter().join(" "),
            self.eta_table,
            self.pt_table
        )
    }
}

/// Builder for [`SubDetector`], validated on [`SubDetectorBuilder::build`].
#[derive(Debug, Clone)]
pub struct SubDetectorBuilder {
    name: String,
    model: ResolutionModel,
    stochastic_term: f64,
    constant_term: f64,
    species: BTreeSet<ParticleId>,
    eta_floor: bool,
    eta_steps: Vec<(f64, bool)>,
    pt_floor: bool,
    pt_steps: Vec<(f64, bool)>,
    seed: u64,
}

impl SubDetectorBuilder {
    pub fn new(name: impl Into<String>, model: ResolutionModel) -> Self {
        Self {
            name: name.into(),
            model,
            stochastic_term: DEFAULT_STOCHASTIC_TERM,
            constant_term: DEFAULT_CONSTANT_TERM,
            species: BTreeSet::new(),
            eta_floor: true,
            eta_steps: Vec::new(),
            pt_floor: false,
            pt_steps: Vec::new(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn stochastic_term(mut self, value: f64) -> Self {
        self.stochastic_term = value;
        self
    }

    pub fn constant_term(mut self, value: f64) -> Self {
        self.constant_term = value;
        self
    }

    /// Add one accepted species.
    pub fn particle(mut self, particle_id: ParticleId) -> Self {
        self.species.insert(particle_id);
        self
    }

    /// Add several accepted species; duplicates collapse.
    pub fn species<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ParticleId>,
    {
        self.species.extend(ids);
        self
    }

    /// Flag applied on |η| from 0 up to the first explicit threshold (default: enabled).
    pub fn eta_floor(mut self, flag: bool) -> Self {
        self.eta_floor = flag;
        self
    }

    pub fn eta_step(mut self, threshold: f64, flag: bool) -> Self {
        self.eta_steps.push((threshold, flag));
        self
    }

    /// Flag applied on pt from 0 up to the first explicit threshold (default: disabled).
    pub fn pt_floor(mut self, flag: bool) -> Self {
        self.pt_floor = flag;
        self
    }

    pub fn pt_step(mut self, threshold: f64, flag: bool) -> Self {
        self.pt_steps.push((threshold, flag));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn valid_coefficient(x: f64) -> bool {
        x.is_finite() && x >= 0.0
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * [`DetectorError::InvalidResolutionCoefficient`] for a negative or non-finite coefficient.
    /// * [`DetectorError::InvalidThreshold`] for a negative or non-finite threshold.
    pub fn build(self) -> Result<SubDetector, DetectorError> {
        if !Self::valid_coefficient(self.stochastic_term) {
            return Err(DetectorError::InvalidResolutionCoefficient(format!(
                "{}: stochastic term must be finite and >= 0, got {}",
                self.name, self.stochastic_term
            )));
        }
        if !Self::valid_coefficient(self.constant_term) {
            return Err(DetectorError::InvalidResolutionCoefficient(format!(
                "{}: constant term must be finite and >= 0, got {}",
                self.name, self.constant_term
            )));
        }

        let eta_table = RangeTable::from_steps(self.eta_floor, self.eta_steps)?;
        let pt_table = RangeTable::from_steps(self.pt_floor, self.pt_steps)?;

        Ok(SubDetector {
            name: self.name,
            model: self.model,
            stochastic_term: self.stochastic_term,
            constant_term: self.constant_term,
            species: self.species,
            eta_table,
            pt_table,
            seed: self.seed,
            rng: StdRng::seed_from_u64(self.seed),
        })
    }
}
