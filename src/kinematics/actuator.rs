//! Actuator capabilities consumed by the controllers.
//!
//! An [`Actuator`] is a single rotational joint. A [`Manipulator`] is the
//! ordered chain of joints that moves the tool, plus the ability to report
//! where the tool point currently is. Hosts implement these on top of their
//! own scene or hardware; [`RevoluteJoint`] is a reference implementation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A rotational joint driven by rate-scaled rotation commands.
///
/// Angles are euler readings in degrees. `rotate(delta, fraction)` turns the
/// joint by `delta * max_rate() * fraction` about its own axis, so a positive
/// command increases the reading on that axis.
pub trait Actuator {
    /// Current local orientation, euler angles in degrees.
    fn angle(&self) -> Vec3;

    /// Maximum rotation per unit of command.
    fn max_rate(&self) -> f32;

    /// Rotate by `delta` at `rate_fraction` of the maximum rate (0 to 1).
    fn rotate(&mut self, delta: f32, rate_fraction: f32);
}

/// An ordered joint chain carrying the tool point.
pub trait Manipulator {
    fn joint_count(&self) -> usize;

    fn joint_mut(&mut self, index: usize) -> Option<&mut dyn Actuator>;

    /// World position of the tool point.
    fn tool_position(&self) -> Vec3;
}

/// Principal axis of a single-axis joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// The component of `v` along this axis.
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// A single-axis revolute joint.
///
/// Rate fractions outside `[0, 1]` are clamped. The reported reading is
/// wrapped into `[0, 360)` like a scene transform's euler angles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevoluteJoint {
    axis: Axis,
    angle: f32,
    max_rate: f32,
}

impl RevoluteJoint {
    pub fn new(axis: Axis, max_rate: f32) -> Self {
        Self {
            axis,
            angle: 0.0,
            max_rate,
        }
    }

    /// Start the joint at `degrees`.
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Accumulated joint angle in degrees, not wrapped.
    pub fn degrees(&self) -> f32 {
        self.angle
    }

    /// Local rotation of the joint.
    pub fn rotation(&self) -> glam::Quat {
        glam::Quat::from_axis_angle(self.axis.unit(), self.angle.to_radians())
    }
}

impl Actuator for RevoluteJoint {
    fn angle(&self) -> Vec3 {
        self.axis.unit() * self.angle.rem_euclid(360.0)
    }

    fn max_rate(&self) -> f32 {
        self.max_rate
    }

    fn rotate(&mut self, delta: f32, rate_fraction: f32) {
        self.angle += delta * self.max_rate * rate_fraction.clamp(0.0, 1.0);
    }
}
