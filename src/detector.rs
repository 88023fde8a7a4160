//! # Detector: acceptance and best-resolution smearing
//!
//! A [`Detector`] owns an ordered list of [`SubDetector`]s and combines them:
//!
//! - **Acceptance** – [`Detector::inside_acceptance`] is true as soon as one sub-detector accepts
//!   the particle; [`Detector::efficiency`] is the same answer as `1.0` / `0.0`.
//! - **Measurement** – [`Detector::smear`] delegates to the accepting sub-detector with the
//!   strictly smallest [`SubDetector::sigma`] for the particle. On equal resolutions the first one
//!   in detector order wins.
//!
//! A particle that no sub-detector accepts is returned unchanged by [`Detector::smear`]: nothing
//! measures it, so nothing perturbs it.
//!
//! ## Typical usage
//!
//! ```rust
//! use detsmear::detector::Detector;
//! use detsmear::geometry::Geometry;
//! use detsmear::lorentz::FourMomentum;
//!
//! let mut atlas = Detector::new(Geometry::Atlas).unwrap();
//!
//! // 50 GeV photon in the barrel
//! let photon = FourMomentum::from_pt_eta_phi_m(50.0, 0.5, 1.0, 0.0);
//! assert!(atlas.inside_acceptance(22, &photon));
//!
//! let measured = atlas.smear(22, &photon).unwrap();
//! assert_ne!(measured.energy(), photon.energy());
//! ```
//!
//! ## Concurrency
//!
//! Queries borrow the detector immutably and can run from several threads. Smearing advances the
//! chosen sub-detector's random source and therefore needs `&mut self`; give each thread its own
//! detector (see [`Detector::reseed`]) or share one behind a lock.
use std::fmt;

use log::debug;

use crate::{
    constants::ParticleId,
    detector_errors::DetectorError,
    geometry::{parse_geometry, Geometry},
    lorentz::FourMomentum,
    subdetector::SubDetector,
};

#[derive(Debug, Clone, Default)]
pub struct Detector {
    subdetectors: Vec<SubDetector>,
}

impl Detector {
    /// Build a detector from a named geometry.
    ///
    /// [`Geometry::Custom`] yields an empty detector to be filled with [`Detector::push`].
    pub fn new(geometry: Geometry) -> Result<Self, DetectorError> {
        Ok(Self {
            subdetectors: geometry.subdetectors()?,
        })
    }

    /// Build a detector from a geometry description.
    ///
    /// See [`crate::geometry`] for the text format.
    pub fn from_geometry_str(description: &str) -> Result<Self, DetectorError> {
        Ok(Self {
            subdetectors: parse_geometry(description)?,
        })
    }

    /// Append a sub-detector; it comes last in detector order.
    pub fn push(&mut self, subdetector: SubDetector) {
        self.subdetectors.push(subdetector);
    }

    pub fn subdetectors(&self) -> &[SubDetector] {
        &self.subdetectors
    }

    /// First sub-detector carrying `name`.
    pub fn get(&self, name: &str) -> Option<&SubDetector> {
        self.subdetectors.iter().find(|sub| sub.name() == name)
    }

    pub fn len(&self) -> usize {
        self.subdetectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subdetectors.is_empty()
    }

    /// Reseed every sub-detector, the n-th one (from 0) with `seed + n`.
    pub fn reseed(&mut self, seed: u64) {
        for (index, sub) in self.subdetectors.iter_mut().enumerate() {
            sub.reseed(seed.wrapping_add(index as u64));
        }
    }

    /// Sub-detectors that accept the particle, in detector order.
    pub fn accepting_subdetectors<'a>(
        &'a self,
        particle_id: ParticleId,
        momentum: &'a FourMomentum,
    ) -> impl Iterator<Item = &'a SubDetector> + 'a {
        self.subdetectors
            .iter()
            .filter(move |sub| sub.inside(particle_id, momentum))
    }

    /// Is the particle inside the acceptance of at least one sub-detector?
    pub fn inside_acceptance(&self, particle_id: ParticleId, momentum: &FourMomentum) -> bool {
        self.subdetectors
            .iter()
            .any(|sub| sub.inside(particle_id, momentum))
    }

    /// Binary detection efficiency: `1.0` inside the acceptance, `0.0` outside.
    pub fn efficiency(&self, particle_id: ParticleId, momentum: &FourMomentum) -> f64 {
        if self.inside_acceptance(particle_id, momentum) {
            1.0
        } else {
            0.0
        }
    }

    fn best_index(
        &self,
        particle_id: ParticleId,
        momentum: &FourMomentum,
    ) -> Result<Option<usize>, DetectorError> {
        let mut best: Option<(usize, f64)> = None;
        for (index, sub) in self.subdetectors.iter().enumerate() {
            if !sub.inside(particle_id, momentum) {
                continue;
            }
            let sigma = sub.sigma(momentum)?;
            if best.map_or(true, |(_, min_sigma)| sigma < min_sigma) {
                best = Some((index, sigma));
            }
        }
        Ok(best.map(|(index, _)| index))
    }

    /// Sub-detector that would measure the particle: the accepting one with the smallest
    /// resolution, first in detector order on ties.
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` when no sub-detector accepts the particle.
    /// * An error of [`SubDetector::sigma`] raised by an accepting sub-detector.
    pub fn measuring_subdetector(
        &self,
        particle_id: ParticleId,
        momentum: &FourMomentum,
    ) -> Result<Option<&SubDetector>, DetectorError> {
        Ok(self
            .best_index(particle_id, momentum)?
            .map(|index| &self.subdetectors[index]))
    }

    /// Measured momentum of the particle.
    ///
    /// The particle is smeared by the sub-detector returned by
    /// [`Detector::measuring_subdetector`]. When none accepts it the true momentum is returned
    /// and no random number is consumed.
    ///
    /// Arguments
    /// -----------------
    /// * `particle_id`: PDG code of the particle.
    /// * `momentum`: true four-momentum.
    ///
    /// Return
    /// ----------
    /// * The smeared four-momentum, or the [`DetectorError`] raised by the resolution formula or
    ///   the smearing draw.
    pub fn smear(
        &mut self,
        particle_id: ParticleId,
        momentum: &FourMomentum,
    ) -> Result<FourMomentum, DetectorError> {
        match self.best_index(particle_id, momentum)? {
            Some(index) => {
                let sub = &mut self.subdetectors[index];
                debug!("Particle {particle_id} smeared by {}", sub.name());
                sub.smear(momentum)
            }
            None => {
                debug!("Particle {particle_id} outside acceptance, left unsmeared");
                Ok(*momentum)
            }
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sub in &self.subdetectors {
            writeln!(f, "{sub}")?;
        }
        Ok(())
    }
}
