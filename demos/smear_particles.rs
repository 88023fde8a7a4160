//! Smear a batch of random particles through a preset detector.
//!
//! ```text
//! cargo run --example smear_particles -- [atlas|d0] [count] [seed]
//! RUST_LOG=debug cargo run --example smear_particles -- d0 5
//! ```
use std::env;
use std::error::Error;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use detsmear::constants::{ELECTRON, MUON, NEUTRON, PHOTON, PION_PLUS};
use detsmear::detector::Detector;
use detsmear::geometry::Geometry;
use detsmear::lorentz::FourMomentum;

const SPECIES: [(i32, f64); 5] = [
    (ELECTRON, 0.000511),
    (MUON, 0.105_658),
    (PHOTON, 0.0),
    (PION_PLUS, 0.139_570),
    (NEUTRON, 0.939_565),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let geometry: Geometry = args.next().as_deref().unwrap_or("atlas").parse()?;
    let count: usize = args.next().map_or(Ok(10), |s| s.parse())?;
    let seed: u64 = args.next().map_or(Ok(42), |s| s.parse())?;

    let mut detector = Detector::new(geometry)?;
    info!("{geometry} detector:\n{detector}");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut accepted = 0usize;

    for _ in 0..count {
        let (id, mass) = SPECIES[rng.random_range(0..SPECIES.len())];
        let truth = FourMomentum::from_pt_eta_phi_m(
            rng.random_range(1.0..100.0),
            rng.random_range(-4.0..4.0),
            rng.random_range(-std::f64::consts::PI..std::f64::consts::PI),
            mass,
        );

        let measured_by = detector
            .measuring_subdetector(id, &truth)?
            .map(|sub| sub.name().to_string());

        match measured_by {
            Some(name) => {
                accepted += 1;
                match detector.smear(id, &truth) {
                    Ok(smeared) => println!("{id:>6} {truth}\n       -> {smeared} [{name}]"),
                    Err(err) => println!("{id:>6} {truth}\n       -> {err} [{name}]"),
                }
            }
            None => println!("{id:>6} {truth}\n       -> not detected"),
        }
    }

    println!("{accepted}/{count} particles inside the {geometry} acceptance");
    Ok(())
}
