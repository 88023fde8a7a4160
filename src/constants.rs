//! # Constants and type definitions for detsmear
//!
//! This module centralizes the **particle identifiers**, **numerical sentinels**, and **common
//! type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - PDG Monte Carlo numbering of the species the preset geometries know about
//! - Default random seed, resolution sentinel and preset thresholds
//! - Unit aliases for kinematic quantities (natural units, GeV)

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Signed PDG Monte Carlo particle code (negative for antiparticles)
pub type ParticleId = i32;

/// Energy, momentum or mass in GeV (natural units, c = 1)
pub type GeV = f64;

/// Pseudorapidity (dimensionless)
pub type Eta = f64;

/// Azimuthal angle in radians
pub type Radian = f64;

// -------------------------------------------------------------------------------------------------
// PDG particle codes
// -------------------------------------------------------------------------------------------------

pub const ELECTRON: ParticleId = 11;
pub const MUON: ParticleId = 13;
pub const PHOTON: ParticleId = 22;
pub const PION_PLUS: ParticleId = 211;
pub const KAON_PLUS: ParticleId = 321;
pub const KAON_LONG: ParticleId = 130;
pub const PROTON: ParticleId = 2212;
pub const NEUTRON: ParticleId = 2112;

// -------------------------------------------------------------------------------------------------
// Parameterization defaults
// -------------------------------------------------------------------------------------------------

/// Seed given to every sub-detector random source unless configured otherwise
pub const DEFAULT_SEED: u64 = 11027;

/// Resolution reported by an unconfigured sub-detector; never preferred during selection
pub const UNCONFIGURED_SIGMA: f64 = 1e10;

/// Default stochastic term of a freshly built sub-detector
pub const DEFAULT_STOCHASTIC_TERM: f64 = 1.0;

/// Default constant term of a freshly built sub-detector
pub const DEFAULT_CONSTANT_TERM: f64 = 0.1;

/// pt threshold `[GeV]` of the ATLAS electromagnetic calorimeter.
///
/// Two values circulate for this preset (10 and 25 GeV). The embedded ATLAS geometry writes
/// `pt: 0 off, 10 on` for the ECAL; this is the value that table is checked against.
pub const ATLAS_ECAL_PT_THRESHOLD: GeV = 10.0;
