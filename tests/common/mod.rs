#![allow(dead_code)]

use approx::assert_relative_eq;
use detsmear::constants::ParticleId;
use detsmear::detector::Detector;
use detsmear::lorentz::FourMomentum;

pub fn assert_momentum_close(actual: &FourMomentum, expected: &FourMomentum, epsilon: f64) {
    assert_relative_eq!(actual.energy(), expected.energy(), epsilon = epsilon);
    assert_relative_eq!(actual.px(), expected.px(), epsilon = epsilon);
    assert_relative_eq!(actual.py(), expected.py(), epsilon = epsilon);
    assert_relative_eq!(actual.pz(), expected.pz(), epsilon = epsilon);
}

/// Names of the sub-detectors accepting the particle, in detector order.
pub fn accepting_names(
    detector: &Detector,
    particle_id: ParticleId,
    momentum: &FourMomentum,
) -> Vec<String> {
    detector
        .accepting_subdetectors(particle_id, momentum)
        .map(|sub| sub.name().to_string())
        .collect()
}

pub fn sample_mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}
