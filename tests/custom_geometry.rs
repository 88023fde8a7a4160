mod common;

use std::thread;

use approx::assert_relative_eq;
use detsmear::constants::{ELECTRON, MUON, PHOTON};
use detsmear::detector::Detector;
use detsmear::detector_errors::DetectorError;
use detsmear::geometry::Geometry;
use detsmear::lorentz::FourMomentum;
use detsmear::subdetector::{ResolutionModel, SubDetector};

use crate::common::{accepting_names, assert_momentum_close};

const TOY_GEOMETRY: &str = "
! toy layout used by the integration tests
[Inner] tracker @ 0.001, 0.02
ids: 13 -13 11 -11
eta: 0 on, 2 off
pt: 0 off, 1 on
seed: 7

[Calo] calo @ 0.2
ids: 22 11 -11
eta: 0 on, 3 off
pt: 0 off, 5 on
";

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_detector_is_send_and_sync() {
    assert_send_sync::<Detector>();
    assert_send_sync::<SubDetector>();
}

#[test]
fn test_custom_layout_from_text() {
    let detector = Detector::from_geometry_str(TOY_GEOMETRY).unwrap();
    assert_eq!(detector.len(), 2);

    let inner = detector.get("Inner").unwrap();
    assert_eq!(inner.model(), ResolutionModel::Tracker);
    assert_eq!(inner.seed(), 7);

    let calo = detector.get("Calo").unwrap();
    assert_eq!(calo.model(), ResolutionModel::Calorimeter);
    assert_eq!(calo.constant_term(), 0.1);

    let electron = FourMomentum::from_pt_eta_phi_m(20.0, 1.0, 0.0, 0.000511);
    assert_eq!(
        accepting_names(&detector, ELECTRON, &electron),
        ["Inner", "Calo"]
    );
    assert_eq!(
        detector
            .measuring_subdetector(ELECTRON, &electron)
            .unwrap()
            .unwrap()
            .name(),
        "Inner"
    );

    let forward_electron = FourMomentum::from_pt_eta_phi_m(20.0, -2.5, 0.0, 0.000511);
    assert_eq!(
        accepting_names(&detector, ELECTRON, &forward_electron),
        ["Calo"]
    );

    let muon = FourMomentum::from_pt_eta_phi_m(0.5, 0.0, 0.0, 0.105);
    assert!(!detector.inside_acceptance(MUON, &muon));
}

#[test]
fn test_rejected_descriptions() {
    let orphan = Detector::from_geometry_str("ids: 11\n[Calo] calo @ 0.1");
    assert!(matches!(
        orphan,
        Err(DetectorError::GeometryParsingError(_))
    ));

    let unknown_model = Detector::from_geometry_str("[Calo] silicon @ 0.1");
    assert!(matches!(
        unknown_model,
        Err(DetectorError::GeometryParsingError(_))
    ));

    let bad_threshold = Detector::from_geometry_str("[Calo] calo @ 0.1\neta: 0 on, 2 maybe");
    assert!(matches!(
        bad_threshold,
        Err(DetectorError::GeometryParsingError(_))
    ));

    assert_eq!(
        "CMS".parse::<Geometry>(),
        Err(DetectorError::InvalidGeometry(
            "Unknown geometry: CMS".to_string()
        ))
    );
}

#[test]
fn test_programmatic_layout_matches_text_layout() {
    let mut built = Detector::new(Geometry::Custom).unwrap();
    built.push(
        SubDetector::builder("Calo", ResolutionModel::Calorimeter)
            .stochastic_term(0.2)
            .species([PHOTON, ELECTRON, -ELECTRON])
            .eta_step(3.0, false)
            .pt_step(5.0, true)
            .seed(3)
            .build()
            .unwrap(),
    );

    let mut parsed =
        Detector::from_geometry_str("[Calo] calo @ 0.2, 0.1\nids: 22 11 -11\neta: 3 off\npt: 5 on\nseed: 3")
            .unwrap();

    let photon = FourMomentum::from_pt_eta_phi_m(30.0, 0.8, -2.0, 0.0);
    for _ in 0..5 {
        assert_momentum_close(
            &built.smear(PHOTON, &photon).unwrap(),
            &parsed.smear(PHOTON, &photon).unwrap(),
            1e-12,
        );
    }
}

#[test]
fn test_one_detector_per_thread() {
    let template = Detector::new(Geometry::Atlas).unwrap();
    let photon = FourMomentum::from_pt_eta_phi_m(50.0, 0.5, 1.0, 0.0);

    let run = |seed: u64| {
        let mut detector = template.clone();
        detector.reseed(seed);
        (0..100)
            .map(|_| detector.smear(PHOTON, &photon).unwrap().energy())
            .sum::<f64>()
    };

    let (first, second) = thread::scope(|scope| {
        let first = scope.spawn(|| run(1000));
        let second = scope.spawn(|| run(2000));
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_relative_eq!(first, run(1000));
    assert_relative_eq!(second, run(2000));
    assert!(first != second);
}
