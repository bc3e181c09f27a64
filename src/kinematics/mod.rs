//! Joint capabilities, forward kinematics and the inverse-kinematics solver.

mod actuator;
mod chain;
mod solver;

pub use actuator::{wrap_degrees, Actuator, Axis, Manipulator, RevoluteJoint};
pub use chain::{ChainLink, SerialChain};
pub use solver::{
    speed_fraction, InverseKinematics, MotionEvent, MovementController, SolverConfig,
    MIN_SPEED_FRACTION, MIN_SPEED_PERCENT,
};
