//! The topology model: everything that is fixed for the lifetime of a
//! `Railroad` and never mutated by `update()`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::general::{JunctionId, Joint, PositionId, SectionId, StationId, StopId, TrainId};

/// A junction's three joints, each wired to the section that attaches there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunctionConfig {
    joints: HashMap<Joint, SectionId>,
}

impl JunctionConfig {
    pub fn new() -> Self {
        JunctionConfig {
            joints: HashMap::new(),
        }
    }

    pub fn add_joint(&mut self, joint: Joint, section: SectionId) {
        self.joints.insert(joint, section);
    }

    pub fn section_at(&self, joint: Joint) -> Option<&SectionId> {
        self.joints.get(&joint)
    }

    /// The joint by which `section` attaches to this junction, if any.
    pub fn joint_of(&self, section: &SectionId) -> Option<Joint> {
        self.joints
            .iter()
            .find(|(_, s)| *s == section)
            .map(|(joint, _)| *joint)
    }
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A section: a length of track between two junction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub junction_0: JunctionId,
    pub junction_1: JunctionId,
    pub length: f64,
}

impl SectionConfig {
    /// The endpoint opposite to `junction`, or `None` if `junction` is not
    /// one of this section's two endpoints.
    pub fn opposite(&self, junction: &JunctionId) -> Option<JunctionId> {
        if *junction == self.junction_0 {
            Some(self.junction_1.clone())
        } else if *junction == self.junction_1 {
            Some(self.junction_0.clone())
        } else {
            None
        }
    }
}

/// A train's motor characteristics, used only by `calc_input`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainConfig {
    pub min_input: i32,
    pub max_input: i32,
    pub max_speed: f64,
    pub delta_per_motor_rotation: f64,
}

impl TrainConfig {
    /// Maps a commanded speed to the motor input byte an adapter would send
    /// downstream, matching `railway_config.py::TrainConfig.calc_input`:
    /// zero speed maps to zero input, speeds at or above `max_speed` clamp
    /// to `max_input`, everything in between is a linear interpolation
    /// between `min_input` and `max_input`.
    pub fn calc_input(&self, speed: f64) -> i32 {
        if speed <= 0.0 {
            0
        } else if speed >= self.max_speed {
            self.max_input
        } else {
            (self.min_input as f64
                + (self.max_input - self.min_input) as f64 * speed / self.max_speed)
                .floor() as i32
        }
    }
}

/// A single stop a train can be routed to halt at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopConfig {
    pub section: SectionId,
    pub target_junction: JunctionId,
    pub mileage: f64,
}

/// An ordered sequence of stops serving one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub stops: Vec<StopId>,
}

/// A named track location trains can be jumped to via `put_train`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    pub section: SectionId,
    pub target_junction: JunctionId,
    pub mileage: f64,
}

/// The complete, immutable topology and rolling-stock description a
/// `Railroad` is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RailwayConfig {
    pub junctions: HashMap<JunctionId, JunctionConfig>,
    pub sections: HashMap<SectionId, SectionConfig>,
    pub trains: HashMap<TrainId, TrainConfig>,
    pub stations: HashMap<StationId, StationConfig>,
    pub stops: HashMap<StopId, StopConfig>,
    pub positions: HashMap<PositionId, PositionConfig>,
}

impl RailwayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares junctions by ID, each starting with no joints wired.
    /// Joints are then wired as a side effect of [`RailwayConfig::define_sections`].
    pub fn define_junctions(&mut self, ids: &[JunctionId]) {
        for id in ids {
            self.junctions
                .entry(id.clone())
                .or_insert_with(JunctionConfig::new);
        }
    }

    /// Declares sections and wires each endpoint's joint on the
    /// corresponding junction, mirroring `railway_config.py::define_sections`
    /// / `SectionConfig.__init__`'s implicit two-way wiring.
    #[allow(clippy::type_complexity)]
    pub fn define_sections(
        &mut self,
        defs: &[(SectionId, JunctionId, Joint, JunctionId, Joint, f64)],
    ) {
        for (section, junction_0, joint_0, junction_1, joint_1, length) in defs {
            self.sections.insert(
                section.clone(),
                SectionConfig {
                    junction_0: junction_0.clone(),
                    junction_1: junction_1.clone(),
                    length: *length,
                },
            );
            self.junctions
                .entry(junction_0.clone())
                .or_insert_with(JunctionConfig::new)
                .add_joint(*joint_0, section.clone());
            self.junctions
                .entry(junction_1.clone())
                .or_insert_with(JunctionConfig::new)
                .add_joint(*joint_1, section.clone());
        }
    }

    /// Declares trains and their motor characteristics.
    pub fn define_trains(&mut self, defs: &[(TrainId, i32, i32, f64, f64)]) {
        for (id, min_input, max_input, max_speed, delta_per_motor_rotation) in defs {
            self.trains.insert(
                id.clone(),
                TrainConfig {
                    min_input: *min_input,
                    max_input: *max_input,
                    max_speed: *max_speed,
                    delta_per_motor_rotation: *delta_per_motor_rotation,
                },
            );
        }
    }

    pub fn define_stops(&mut self, defs: &[(StopId, SectionId, JunctionId, f64)]) {
        for (id, section, target_junction, mileage) in defs {
            self.stops.insert(
                id.clone(),
                StopConfig {
                    section: section.clone(),
                    target_junction: target_junction.clone(),
                    mileage: *mileage,
                },
            );
        }
    }

    pub fn define_stations(&mut self, defs: &[(StationId, Vec<StopId>)]) {
        for (id, stops) in defs {
            self.stations.insert(
                id.clone(),
                StationConfig {
                    stops: stops.clone(),
                },
            );
        }
    }

    pub fn define_positions(&mut self, defs: &[(PositionId, SectionId, JunctionId, f64)]) {
        for (id, section, target_junction, mileage) in defs {
            self.positions.insert(
                id.clone(),
                PositionConfig {
                    section: section.clone(),
                    target_junction: target_junction.clone(),
                    mileage: *mileage,
                },
            );
        }
    }

    /// The six-section, four-junction, two-train default topology from
    /// `original_source/ptcs/ptcs_control/railway_config.py::init_config`,
    /// with section lengths collapsed to round numbers (the original's
    /// rail-piece unit arithmetic is presentation detail of one physical
    /// layout, not part of the topology model).
    pub fn default_layout() -> Self {
        let mut config = RailwayConfig::new();

        let j0 = JunctionId::new("j0");
        let j1 = JunctionId::new("j1");
        let j2 = JunctionId::new("j2");
        let j3 = JunctionId::new("j3");
        config.define_junctions(&[j0.clone(), j1.clone(), j2.clone(), j3.clone()]);

        config.define_sections(&[
            (
                SectionId::new("s0"),
                j0.clone(),
                Joint::Converging,
                j1.clone(),
                Joint::Through,
                100.0,
            ),
            (
                SectionId::new("s1"),
                j1.clone(),
                Joint::Converging,
                j3.clone(),
                Joint::Converging,
                200.0,
            ),
            (
                SectionId::new("s2"),
                j3.clone(),
                Joint::Through,
                j2.clone(),
                Joint::Converging,
                100.0,
            ),
            (
                SectionId::new("s3"),
                j2.clone(),
                Joint::Through,
                j0.clone(),
                Joint::Through,
                150.0,
            ),
            (
                SectionId::new("s4"),
                j0.clone(),
                Joint::Diverging,
                j1.clone(),
                Joint::Diverging,
                120.0,
            ),
            (
                SectionId::new("s5"),
                j2.clone(),
                Joint::Diverging,
                j3.clone(),
                Joint::Diverging,
                120.0,
            ),
        ]);

        config.define_trains(&[
            (TrainId::new("t0"), 30, 126, 40.0, 2.0),
            (TrainId::new("t1"), 30, 126, 40.0, 2.0),
        ]);

        config.define_stops(&[
            (
                StopId::new("stop_0"),
                SectionId::new("s0"),
                j1.clone(),
                80.0,
            ),
            (
                StopId::new("stop_1"),
                SectionId::new("s3"),
                j0.clone(),
                60.0,
            ),
            (
                StopId::new("stop_2"),
                SectionId::new("s2"),
                j2.clone(),
                80.0,
            ),
            (
                StopId::new("stop_3"),
                SectionId::new("s4"),
                j1.clone(),
                60.0,
            ),
            (
                StopId::new("stop_4"),
                SectionId::new("s5"),
                j3.clone(),
                60.0,
            ),
        ]);

        config.define_stations(&[
            (
                StationId::new("station_0"),
                vec![StopId::new("stop_0"), StopId::new("stop_1")],
            ),
            (
                StationId::new("station_1"),
                vec![
                    StopId::new("stop_2"),
                    StopId::new("stop_3"),
                    StopId::new("stop_4"),
                ],
            ),
        ]);

        config.define_positions(&[
            (
                PositionId::new("position_0"),
                SectionId::new("s0"),
                j1.clone(),
                10.0,
            ),
            (
                PositionId::new("position_1"),
                SectionId::new("s3"),
                j0.clone(),
                10.0,
            ),
        ]);

        config
    }
}
