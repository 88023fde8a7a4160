mod common;

use detsmear::constants::{DEFAULT_SEED, ELECTRON, MUON, PHOTON, PION_PLUS};
use detsmear::detector::Detector;
use detsmear::geometry::Geometry;
use detsmear::lorentz::FourMomentum;
use detsmear::subdetector::ResolutionModel;

use crate::common::accepting_names;

fn d0() -> Detector {
    Detector::new("d0".parse::<Geometry>().unwrap()).unwrap()
}

#[test]
fn test_d0_configuration() {
    let detector = d0();

    let names: Vec<&str> = detector.subdetectors().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Tracker", "ECAL", "HCAL", "Muon system"]);

    let muon = detector.get("Muon system").unwrap();
    assert_eq!(muon.model(), ResolutionModel::MuonSystem);
    assert_eq!(muon.stochastic_term(), 0.005);

    let ecal = detector.get("ECAL").unwrap();
    assert_eq!(ecal.stochastic_term(), 0.16);
    assert_eq!(ecal.constant_term(), 0.003);
    assert_eq!(ecal.eta_table().to_string(), "0 on, 0.9 off, 1.1 on, 4 off");
    assert_eq!(ecal.pt_table().to_string(), "0 off, 15 on");

    assert_eq!(detector.subdetectors()[3].seed(), DEFAULT_SEED + 3);
}

#[test]
fn test_central_crack() {
    let detector = d0();

    let electron = FourMomentum::from_pt_eta_phi_m(20.0, 1.0, 0.0, 0.000511);
    assert_eq!(accepting_names(&detector, ELECTRON, &electron), ["Tracker"]);

    let pion = FourMomentum::from_pt_eta_phi_m(20.0, -1.0, 0.0, 0.1396);
    assert_eq!(accepting_names(&detector, PION_PLUS, &pion), ["Tracker"]);

    let photon = FourMomentum::from_pt_eta_phi_m(20.0, 1.0, 0.0, 0.0);
    assert!(!detector.inside_acceptance(PHOTON, &photon));
}

#[test]
fn test_calorimeter_threshold() {
    let mut detector = d0();

    let soft = FourMomentum::from_pt_eta_phi_m(10.0, 0.0, 0.0, 0.0);
    assert!(!detector.inside_acceptance(PHOTON, &soft));
    assert_eq!(detector.smear(PHOTON, &soft).unwrap(), soft);

    let forward = FourMomentum::from_pt_eta_phi_m(20.0, 3.5, 0.0, 0.0);
    assert_eq!(accepting_names(&detector, PHOTON, &forward), ["ECAL"]);
    assert_ne!(detector.smear(PHOTON, &forward).unwrap(), forward);
}

#[test]
fn test_muon_system_edge() {
    let detector = d0();
    let muon_system = detector.get("Muon system").unwrap();

    let inside = FourMomentum::from_pt_eta_phi_m(10.0, 1.9, 0.0, 0.105);
    assert!(muon_system.inside(MUON, &inside));

    let edge = FourMomentum::from_pt_eta_phi_m(10.0, 2.0, 0.0, 0.105);
    assert!(!muon_system.inside(-MUON, &edge));

    let slow = FourMomentum::from_pt_eta_phi_m(2.0, 0.5, 0.0, 0.105);
    assert!(!muon_system.inside(MUON, &slow));
    assert_eq!(accepting_names(&detector, MUON, &slow), ["Tracker"]);

    let lost = FourMomentum::from_pt_eta_phi_m(10.0, 3.5, 0.0, 0.105);
    assert_eq!(detector.efficiency(MUON, &lost), 0.0);
}

#[test]
fn test_tracker_beats_muon_system() {
    let detector = d0();
    let muon = FourMomentum::from_pt_eta_phi_m(40.0, 0.5, 0.0, 0.105);

    // 0.005 * 40 = 0.2 GeV against √((0.002 * 40)² + 0.035²) ≈ 0.087 GeV
    let chosen = detector
        .measuring_subdetector(MUON, &muon)
        .unwrap()
        .unwrap();
    assert_eq!(chosen.name(), "Tracker");
}
