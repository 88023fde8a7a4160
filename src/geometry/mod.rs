//! # Detector geometry descriptions
//!
//! This module turns **geometry descriptions** into ordered lists of
//! [`SubDetector`](crate::subdetector::SubDetector)s. The named presets shipped with the crate
//! are stored in the same text format and embedded at compile time, so a preset is pure data.
//!
//! ## Public API
//!
//! ### [`crate::geometry::Geometry`]
//!
//! - `Geometry::Atlas` – ATLAS-like tracker, ECAL, HCAL, FCAL and muon spectrometer
//! - `Geometry::D0` – D0-like tracker, ECAL, HCAL and muon system
//! - `Geometry::Custom` – no sub-detector, populated by the caller
//!
//! ```rust
//! use detsmear::geometry::Geometry;
//!
//! let geometry: Geometry = "ATLAS".parse().unwrap();
//! assert_eq!(geometry.subdetectors().unwrap().len(), 5);
//! ```
//!
//! ### [`crate::geometry::parse_geometry`]
//!
//! Parses a description written in the following line format:
//!
//! ```text
//! ! comment until end of line
//! [Name] model @ stochastic, constant   ! opens a sub-detector, constant term optional
//! ids: 11 -11 13                        ! accepted PDG codes
//! eta: 0 on, 2.5 off                    ! |eta| step function
//! pt: 0 off, 0.1 on                     ! pt step function [GeV]
//! seed: 42                              ! optional random seed
//! ```
//!
//! `model` is one of `tracker`, `calorimeter` (`calo`), `muon`, `none`. Sub-detectors keep the
//! order in which they appear. Without a `seed:` line the n-th sub-detector (from 0) is seeded
//! with `DEFAULT_SEED + n`, so every random stream is reproducible and distinct.
use std::fmt;
use std::str::FromStr;

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, char, i32 as parse_i32, space0, space1, u64 as parse_u64},
    combinator::{all_consuming, map, opt, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use crate::{
    constants::{ParticleId, DEFAULT_SEED},
    detector_errors::DetectorError,
    subdetector::{ResolutionModel, SubDetector, SubDetectorBuilder},
};

static ATLAS_GEOMETRY: &str = include_str!("data/atlas.geom");
static D0_GEOMETRY: &str = include_str!("data/d0.geom");

/// Named detector layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Geometry {
    #[default]
    Atlas,
    D0,
    Custom,
}

impl Geometry {
    /// Embedded description of the preset, `None` for [`Geometry::Custom`].
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Geometry::Atlas => Some(ATLAS_GEOMETRY),
            Geometry::D0 => Some(D0_GEOMETRY),
            Geometry::Custom => None,
        }
    }

    /// Build the sub-detectors of this layout, in detector order.
    pub fn subdetectors(&self) -> Result<Vec<SubDetector>, DetectorError> {
        let subdetectors = match self.description() {
            Some(text) => parse_geometry(text)?,
            None => Vec::new(),
        };
        debug!(
            "Geometry {}: {} sub-detector(s) loaded",
            self,
            subdetectors.len()
        );
        Ok(subdetectors)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Geometry::Atlas => "ATLAS",
            Geometry::D0 => "D0",
            Geometry::Custom => "Custom",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Geometry {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ATLAS" => Ok(Geometry::Atlas),
            "D0" => Ok(Geometry::D0),
            "CUSTOM" => Ok(Geometry::Custom),
            _ => Err(DetectorError::InvalidGeometry(format!(
                "Unknown geometry: {s}"
            ))),
        }
    }
}

impl TryFrom<&str> for Geometry {
    type Error = DetectorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Setting {
    Ids(Vec<ParticleId>),
    Eta(Vec<(f64, bool)>),
    Pt(Vec<(f64, bool)>),
    Seed(u64),
}

impl Setting {
    fn apply(self, builder: SubDetectorBuilder) -> SubDetectorBuilder {
        match self {
            Setting::Ids(ids) => builder.species(ids),
            Setting::Eta(steps) => steps
                .into_iter()
                .fold(builder, |b, (x, flag)| b.eta_step(x, flag)),
            Setting::Pt(steps) => steps
                .into_iter()
                .fold(builder, |b, (x, flag)| b.pt_step(x, flag)),
            Setting::Seed(seed) => builder.seed(seed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum GeometryLine<'a> {
    Header {
        name: &'a str,
        model: &'a str,
        stochastic: f64,
        constant: Option<f64>,
    },
    Setting(Setting),
}

fn parse_flag(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("on")), value(false, tag("off")))).parse(input)
}

fn parse_steps(input: &str) -> IResult<&str, Vec<(f64, bool)>> {
    separated_list1(
        delimited(space0, char(','), space0),
        separated_pair(double, space1, parse_flag),
    )
    .parse(input)
}

fn parse_header(input: &str) -> IResult<&str, GeometryLine<'_>> {
    map(
        (
            delimited(char('['), take_until("]"), char(']')),
            preceded(space1, alpha1),
            preceded((space0, char('@'), space0), double),
            opt(preceded((space0, char(','), space0), double)),
        ),
        |(name, model, stochastic, constant): (&str, &str, f64, Option<f64>)| {
            GeometryLine::Header {
                name: name.trim(),
                model,
                stochastic,
                constant,
            }
        },
    )
    .parse(input)
}

fn parse_setting(input: &str) -> IResult<&str, GeometryLine<'_>> {
    map(
        alt((
            map(
                preceded((tag("ids:"), space0), separated_list1(space1, parse_i32)),
                Setting::Ids,
            ),
            map(preceded((tag("eta:"), space0), parse_steps), Setting::Eta),
            map(preceded((tag("pt:"), space0), parse_steps), Setting::Pt),
            map(preceded((tag("seed:"), space0), parse_u64), Setting::Seed),
        )),
        GeometryLine::Setting,
    )
    .parse(input)
}

fn parse_line(input: &str) -> IResult<&str, GeometryLine<'_>> {
    all_consuming(alt((parse_header, parse_setting))).parse(input)
}

fn strip_comment(line: &str) -> &str {
    line.split_once('!').map_or(line, |(head, _)| head).trim()
}

/// Parse a geometry description into its sub-detectors.
///
/// Arguments
/// -----------------
/// * `text`: description in the line format documented at module level.
///
/// Return
/// ----------
/// * The sub-detectors in order of appearance.
/// * [`DetectorError::GeometryParsingError`] for a malformed line, an unknown model, or a setting
///   that appears before any `[Name]` header.
/// * Any validation error of [`SubDetectorBuilder::build`].
pub fn parse_geometry(text: &str) -> Result<Vec<SubDetector>, DetectorError> {
    let mut builders: Vec<SubDetectorBuilder> = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }

        let (_, parsed) = parse_line(line).map_err(|_| {
            DetectorError::GeometryParsingError(format!("line {}: {}", number + 1, raw.trim()))
        })?;

        match parsed {
            GeometryLine::Header {
                name,
                model,
                stochastic,
                constant,
            } => {
                let model: ResolutionModel = model.parse()?;
                let mut builder = SubDetector::builder(name, model)
                    .stochastic_term(stochastic)
                    .seed(DEFAULT_SEED.wrapping_add(builders.len() as u64));
                if let Some(constant) = constant {
                    builder = builder.constant_term(constant);
                }
                builders.push(builder);
            }
            GeometryLine::Setting(setting) => {
                let current = builders.pop().ok_or_else(|| {
                    DetectorError::GeometryParsingError(format!(
                        "line {}: setting before any sub-detector header: {line}",
                        number + 1
                    ))
                })?;
                builders.push(setting.apply(current));
            }
        }
    }

    builders.into_iter().map(SubDetectorBuilder::build).collect()
}
