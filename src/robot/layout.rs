//! Fixed geometry of the cell and the motion requests derived from it.

use super::command::WareKind;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// World up direction.
pub const UP: Vec3 = Vec3::Y;

/// Conveyor end points and the standby pose of the tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellLayout {
    pub conveyors: HashMap<WareKind, Vec3>,
    pub standby: Vec3,
}

impl Default for CellLayout {
    fn default() -> Self {
        let conveyors = HashMap::from([
            (WareKind::Pickup, Vec3::new(6.0, 1.0, 0.0)),
            (WareKind::Brick, Vec3::new(0.0, 1.0, 6.0)),
            (WareKind::Wood, Vec3::new(0.0, 1.0, -6.0)),
        ]);
        Self {
            conveyors,
            standby: Vec3::new(-2.5, 6.0, 0.0),
        }
    }
}

impl CellLayout {
    pub fn conveyor_position(&self, kind: WareKind) -> Option<Vec3> {
        self.conveyors.get(&kind).copied()
    }

    /// Horizontal direction from the cell origin out to the conveyor point.
    ///
    /// A conveyor straight above the origin has no direction and yields zero.
    pub fn conveyor_direction(&self, kind: WareKind) -> Option<Vec3> {
        self.conveyor_position(kind)
            .map(|p| Vec3::new(p.x, 0.0, p.z).normalize_or_zero())
    }
}

/// How a waypoint's point is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Destination {
    /// Fixed point, computed once when the graph is built.
    Absolute(Vec3),

    /// Relative to the active ware kind's conveyor:
    /// `position + direction * approach + offset`.
    WareRelative { offset: Vec3, approach: f32 },
}

/// Where to move the tool and how fast.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionRequest {
    pub destination: Destination,
    pub speed_percent: f32,
}

impl MotionRequest {
    pub fn absolute(point: Vec3, speed_percent: f32) -> Self {
        Self {
            destination: Destination::Absolute(point),
            speed_percent,
        }
    }

    pub fn ware_relative(offset: Vec3, approach: f32, speed_percent: f32) -> Self {
        Self {
            destination: Destination::WareRelative { offset, approach },
            speed_percent,
        }
    }

    /// The point to send to the solver, `None` if `ware` has no conveyor.
    pub fn resolve(&self, layout: &CellLayout, ware: WareKind) -> Option<Vec3> {
        match self.destination {
            Destination::Absolute(point) => Some(point),
            Destination::WareRelative { offset, approach } => {
                let position = layout.conveyor_position(ware)?;
                let direction = layout.conveyor_direction(ware)?;
                Some(position + direction * approach + offset)
            }
        }
    }
}
