//! Mission requirements and objectives catalogs, plus the performance
//! requirements checked by the monitor.
//!
//! The catalogs are static and read-only; the core only uses them to label
//! compliance results when reporting.

use crate::config::GncConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    Functional,
    Operational,
    Performance,
    Interface,
    Safety,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationMethod {
    Test,
    Analysis,
    Review,
    Inspection,
}

/// One catalog entry. All entries are mandatory ("shall").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub id: &'static str,
    pub text: &'static str,
    pub kind: RequirementKind,
    pub verification: VerificationMethod,
    pub parent: Option<&'static str>,
}

const fn req(
    id: &'static str,
    text: &'static str,
    kind: RequirementKind,
    verification: VerificationMethod,
) -> Requirement {
    Requirement {
        id,
        text,
        kind,
        verification,
        parent: None,
    }
}

use RequirementKind::{Functional, Operational, Performance, Safety};
use VerificationMethod::{Analysis, Test};

pub static REQUIREMENTS: &[Requirement] = &[
    req(
        "R-AUTO-01",
        "The GNC system shall autonomously place the S/C in the appropriate trajectory around the orbit with an injection error that ensures no collisions and uses the least amount of fuel possible.",
        Functional,
        Analysis,
    ),
    Requirement {
        parent: Some("R-AUTO-01"),
        ..req(
            "R-AUTO-02",
            "The GNC system shall achieve accurate S/C state estimation relative to the target to compute and execute necessary maneuvers to cancel deviations in the nominal trajectory.",
            Functional,
            Test,
        )
    },
    req(
        "R-AUTO-03",
        "The onboard system shall function independently and produce safe, accurate, and verifiable optimal plans for escape safety in the event of landing hazards.",
        Safety,
        Test,
    ),
    Requirement {
        parent: Some("R-AUTO-03"),
        ..req(
            "R-AUTO-04",
            "The GNC system shall manage resources, schedule and replay onboard activities, and avoid safety constraint breaches during descent.",
            Operational,
            Test,
        )
    },
    req(
        "R-SYS-01",
        "The GNC system shall provide attitude estimation with accuracy better than 0.1 degrees (3σ).",
        Performance,
        Analysis,
    ),
    req(
        "R-SYS-02",
        "The GNC system shall provide attitude control with stability margin of at least 6 dB.",
        Performance,
        Analysis,
    ),
    req(
        "R-SYS-03",
        "The navigation system shall estimate translational orbital states with position accuracy of 25 m (3σ) and velocity accuracy of 2.5 cm/s (3σ).",
        Performance,
        Test,
    ),
    req(
        "R-SYS-04",
        "The GNC system shall execute autonomous orbit insertion with delta-V accuracy of ±5%.",
        Performance,
        Test,
    ),
    req(
        "R-SYS-05",
        "The control system shall limit steady-state pointing error to less than 0.5 degrees.",
        Performance,
        Test,
    ),
    req(
        "R-RDV-01",
        "The spacecraft shall approach from initial position [2500, 200, -50] km to final position [20, 0, 0] km within 24 days.",
        Operational,
        Analysis,
    ),
    req(
        "R-RDV-02",
        "The spacecraft shall arrive at home position (20 km) with position accuracy of ±2.4 km (3σ).",
        Performance,
        Analysis,
    ),
    req(
        "R-RDV-03",
        "The spacecraft shall arrive at home position with velocity accuracy of ±0.12 m/s (3σ).",
        Performance,
        Analysis,
    ),
    req(
        "R-RDV-04",
        "The spacecraft shall remain within the approach cone with 1° half-angle and 1800 km length during rendezvous.",
        Operational,
        Analysis,
    ),
    req(
        "R-RDV-05",
        "The total delta-V for rendezvous shall not exceed 3.0 m/s.",
        Performance,
        Analysis,
    ),
    req(
        "R-TAG-01",
        "The GNC system shall deliver the spacecraft to within 25 meters of the TAG site with 98.3% confidence (2.85σ for 2D Gaussian).",
        Performance,
        Test,
    ),
    req(
        "R-TAG-02",
        "The spacecraft attitude shall be aligned with local vertical within 10 degrees before touchdown.",
        Operational,
        Test,
    ),
    req(
        "R-TAG-03",
        "The vertical velocity shall be 10 ± 5 cm/s at touchdown.",
        Performance,
        Test,
    ),
    req(
        "R-TAG-04",
        "The horizontal velocity shall be less than 5 cm/s at touchdown.",
        Performance,
        Test,
    ),
    req(
        "R-TAG-05",
        "The GNC system shall allow for three TAG attempts within the propellant budget.",
        Operational,
        Analysis,
    ),
    req(
        "R-GNC-01",
        "The navigation system shall estimate the full relative state (position, velocity, attitude, angular rates) in real-time.",
        Functional,
        Test,
    ),
    req(
        "R-GNC-02",
        "Visual information from optical sensors shall be incorporated into the navigation system to improve state estimation accuracy.",
        Functional,
        Test,
    ),
    req(
        "R-GNC-10",
        "The guidance system shall generate safe trajectories avoiding obstacles with clearance margin of at least 5 meters.",
        Safety,
        Analysis,
    ),
    req(
        "R-GNC-11",
        "The guidance system shall recompute trajectories autonomously when deviations exceed 10% of nominal values.",
        Operational,
        Test,
    ),
    req(
        "R-GNC-20",
        "The control system shall maintain attitude within ±1 degree of commanded orientation during thrusting.",
        Performance,
        Test,
    ),
    req(
        "R-GNC-21",
        "The control system shall execute maneuvers with thrust vector pointing error less than 2 degrees.",
        Performance,
        Test,
    ),
    req(
        "R-GNC-48",
        "The GNC system shall guide the S/C to the landing point without hitting any obstacles.",
        Safety,
        Test,
    ),
    req(
        "R-GNC-49",
        "The asteroid shall remain within the field-of-view (FOV) during Target Detection and Identification with 99.7% probability.",
        Operational,
        Test,
    ),
    req(
        "R-GNC-50",
        "The maximum approach velocity shall ensure that during TDI phase, considering position uncertainty, the asteroid remains within FOV.",
        Operational,
        Analysis,
    ),
    req(
        "R-GNC-51",
        "The estimated position and velocity error during descent shall not exceed 25 m vertical position, 25 mm/s vertical velocity, 30 m horizontal position and 30 mm/s horizontal velocity.",
        Performance,
        Test,
    ),
    req(
        "R-GNC-52",
        "Visual information collected from optical sensors shall be incorporated in the navigation system to improve state estimation.",
        Functional,
        Test,
    ),
    req(
        "R-GNC-53",
        "The S/C attitude shall be aligned with the local vertical before touchdown.",
        Operational,
        Test,
    ),
    req(
        "R-GNC-54",
        "The S/C velocity shall be within ±8 cm/s horizontal and 10±5 cm/s vertical before touchdown.",
        Performance,
        Test,
    ),
];

/// Looks up a catalog requirement by identifier.
pub fn requirement(id: &str) -> Option<&'static Requirement> {
    REQUIREMENTS.iter().find(|r| r.id == id)
}

pub fn requirements_of_kind(kind: RequirementKind) -> impl Iterator<Item = &'static Requirement> {
    REQUIREMENTS.iter().filter(move |r| r.kind == kind)
}

/// Node of the mission objectives tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub id: &'static str,
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub requirements: &'static [&'static str],
}

const fn obj(
    id: &'static str,
    name: &'static str,
    parent: Option<&'static str>,
    requirements: &'static [&'static str],
) -> Objective {
    Objective {
        id,
        name,
        parent,
        requirements,
    }
}

pub static OBJECTIVES: &[Objective] = &[
    obj("OBJ-0", "Asteroid Sample Return Mission", None, &[]),
    obj("OBJ-1", "Rendezvous and Orbiting/Hovering", Some("OBJ-0"), &[]),
    obj("OBJ-2", "Touch-And-Go Approach", Some("OBJ-0"), &[]),
    obj("OBJ-3", "Departure and Earth Return", Some("OBJ-0"), &[]),
    obj("OBJ-4", "Scientific Data Collection", Some("OBJ-0"), &[]),
    obj("OBJ-1.1", "Manipulate Trajectory Autonomously", Some("OBJ-1"), &[]),
    obj(
        "OBJ-1.1.1",
        "Process Environment Knowledge",
        Some("OBJ-1.1"),
        &["R-GNC-01", "R-GNC-02"],
    ),
    obj("OBJ-1.1.2", "Absorb Perturbation Torques", Some("OBJ-1.1"), &[]),
    obj("OBJ-1.1.3", "Encode Recovery Plans", Some("OBJ-1.1"), &[]),
    obj("OBJ-1.2", "Optimize Trajectory", Some("OBJ-1"), &[]),
    obj(
        "OBJ-2.1",
        "Perform Soft Touchdown",
        Some("OBJ-2"),
        &["R-GNC-48", "R-GNC-49", "R-GNC-50"],
    ),
    obj("OBJ-2.1.2", "Controlled Descent", Some("OBJ-2.1"), &[]),
    obj(
        "OBJ-2.1.2.1",
        "Obtain Terrain Information",
        Some("OBJ-2.1.2"),
        &["R-GNC-51"],
    ),
    obj(
        "OBJ-2.1.2.3",
        "Control Position and Attitude",
        Some("OBJ-2.1.2"),
        &["R-GNC-52"],
    ),
    obj(
        "OBJ-2.1.2.4",
        "Guide Without Hitting Obstacles",
        Some("OBJ-2.1.2"),
        &["R-GNC-48"],
    ),
    obj(
        "OBJ-2.1.2.5",
        "Stabilize at Touchdown Point",
        Some("OBJ-2.1.2"),
        &["R-GNC-53"],
    ),
    obj(
        "OBJ-2.1.2.6",
        "Control Vertical/Horizontal Velocity",
        Some("OBJ-2.1.2"),
        &["R-GNC-54"],
    ),
];

pub fn objective(id: &str) -> Option<&'static Objective> {
    OBJECTIVES.iter().find(|o| o.id == id)
}

/// Objectives traced to the given requirement identifier.
pub fn objectives_for(requirement_id: &str) -> impl Iterator<Item = &'static Objective> + '_ {
    OBJECTIVES
        .iter()
        .filter(move |o| o.requirements.iter().any(|r| *r == requirement_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceRequirement {
    /// R-SYS-01: attitude estimation better than 0.1 deg (3-sigma).
    AttitudeAccuracy,
    /// R-SYS-03: position estimation within 25 m (3-sigma).
    PositionAccuracy,
    /// R-SYS-03: velocity estimation within 2.5 cm/s (3-sigma).
    VelocityAccuracy,
}

impl PerformanceRequirement {
    pub const ALL: [PerformanceRequirement; 3] = [
        PerformanceRequirement::AttitudeAccuracy,
        PerformanceRequirement::PositionAccuracy,
        PerformanceRequirement::VelocityAccuracy,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PerformanceRequirement::AttitudeAccuracy => "R-SYS-01",
            PerformanceRequirement::PositionAccuracy => "R-SYS-03-position",
            PerformanceRequirement::VelocityAccuracy => "R-SYS-03-velocity",
        }
    }

    /// Parent catalog entry.
    pub fn catalog_entry(self) -> Option<&'static Requirement> {
        match self {
            PerformanceRequirement::AttitudeAccuracy => requirement("R-SYS-01"),
            PerformanceRequirement::PositionAccuracy
            | PerformanceRequirement::VelocityAccuracy => requirement("R-SYS-03"),
        }
    }

    /// 3-sigma bound in SI units (attitude in radians).
    pub fn threshold(self, config: &GncConfig) -> f64 {
        match self {
            PerformanceRequirement::AttitudeAccuracy => config.attitude_accuracy_rad(),
            PerformanceRequirement::PositionAccuracy => config.position_accuracy,
            PerformanceRequirement::VelocityAccuracy => config.velocity_accuracy,
        }
    }
}

impl fmt::Display for PerformanceRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
