//! Forward kinematics of a serial chain of revolute joints.

use super::actuator::{Actuator, Axis, Manipulator, RevoluteJoint};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One joint of the chain and the rigid link that follows it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub joint: RevoluteJoint,
    /// Offset from this joint to the next one, in the joint's rotated frame.
    pub link: Vec3,
}

/// A serial arm: base point, joints with link offsets, tool offset.
///
/// The pose is accumulated joint by joint: each joint's rotation is
/// composed onto the frame, then the link offset is applied in that frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerialChain {
    base: Vec3,
    links: Vec<ChainLink>,
    tool_offset: Vec3,
}

impl SerialChain {
    pub fn new(base: Vec3) -> Self {
        Self {
            base,
            links: Vec::new(),
            tool_offset: Vec3::ZERO,
        }
    }

    /// Append a joint rotating about `axis`, starting at `degrees`, followed by `link`.
    pub fn with_joint(mut self, axis: Axis, max_rate: f32, degrees: f32, link: Vec3) -> Self {
        self.links.push(ChainLink {
            joint: RevoluteJoint::new(axis, max_rate).with_angle(degrees),
            link,
        });
        self
    }

    /// Offset of the tool point from the last joint frame.
    pub fn with_tool_offset(mut self, offset: Vec3) -> Self {
        self.tool_offset = offset;
        self
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// World position and orientation of the last frame.
    pub fn end_frame(&self) -> (Vec3, Quat) {
        self.links
            .iter()
            .fold((self.base, Quat::IDENTITY), |(position, rotation), link| {
                let rotation = rotation * link.joint.rotation();
                (position + rotation * link.link, rotation)
            })
    }
}

impl Manipulator for SerialChain {
    fn joint_count(&self) -> usize {
        self.links.len()
    }

    fn joint_mut(&mut self, index: usize) -> Option<&mut dyn Actuator> {
        self.links
            .get_mut(index)
            .map(|link| &mut link.joint as &mut dyn Actuator)
    }

    fn tool_position(&self) -> Vec3 {
        let (position, rotation) = self.end_frame();
        position + rotation * self.tool_offset
    }
}
