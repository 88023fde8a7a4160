//! # detsmear
//!
//! Fast, formula-based detector response for particle-physics studies: decide whether a
//! particle is seen (**acceptance**) and how its measured momentum deviates from the true one
//! (**smearing**), without a full detector simulation.
//!
//! - [`subdetector::SubDetector`] – one detection element: species set, |η| and pt step tables,
//!   resolution formula, own seeded random source.
//! - [`detector::Detector`] – ordered set of sub-detectors; any-accepts acceptance and
//!   best-resolution smearing.
//! - [`geometry::Geometry`] – ATLAS-like and D0-like presets stored as embedded data.
//! - [`lorentz::FourMomentum`] – the kinematics the model reads and produces.
pub mod constants;
pub mod detector;
pub mod detector_errors;
pub mod geometry;
pub mod lorentz;
pub mod range_table;
pub mod subdetector;
