use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Calorimeter resolution requires a strictly positive energy, got {0}")]
    NonPositiveEnergy(f64),

    #[error("Smeared energy {energy} is below the rest-mass floor (m² = {mass_squared})")]
    UnphysicalEnergy { energy: f64, mass_squared: f64 },

    #[error("Smeared transverse momentum is not strictly positive: {0}")]
    NonPositiveTransverseMomentum(f64),

    #[error("Momentum direction is undefined for a vanishing three-momentum")]
    UndefinedDirection,

    #[error("Gaussian noise generation failed: {0:?}")]
    NoiseInjectionError(rand_distr::NormalError),

    #[error("Invalid range table threshold: {0}")]
    InvalidThreshold(f64),

    #[error("Invalid resolution coefficient: {0}")]
    InvalidResolutionCoefficient(String),

    #[error("Invalid detector geometry: {0}")]
    InvalidGeometry(String),

    #[error("Error during the geometry description parsing: {0}")]
    GeometryParsingError(String),
}

impl From<rand_distr::NormalError> for DetectorError {
    fn from(err: rand_distr::NormalError) -> Self {
        DetectorError::NoiseInjectionError(err)
    }
}

impl PartialEq for DetectorError {
    fn eq(&self, other: &Self) -> bool {
        use DetectorError::*;
        match (self, other) {
            (NonPositiveEnergy(a), NonPositiveEnergy(b)) => a == b,
            (
                UnphysicalEnergy {
                    energy: e1,
                    mass_squared: m1,
                },
                UnphysicalEnergy {
                    energy: e2,
                    mass_squared: m2,
                },
            ) => e1 == e2 && m1 == m2,
            (NonPositiveTransverseMomentum(a), NonPositiveTransverseMomentum(b)) => a == b,
            (NoiseInjectionError(a), NoiseInjectionError(b)) => a == b,
            (InvalidThreshold(a), InvalidThreshold(b)) => a == b,
            (InvalidResolutionCoefficient(a), InvalidResolutionCoefficient(b)) => a == b,
            (InvalidGeometry(a), InvalidGeometry(b)) => a == b,
            (GeometryParsingError(a), GeometryParsingError(b)) => a == b,

            (UndefinedDirection, UndefinedDirection) => true,

            _ => false,
        }
    }
}
