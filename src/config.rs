//! Cell configuration.
//!
//! Every section falls back to its defaults, so a configuration file only
//! needs to name what differs:
//!
//! ```rust
//! use cellsort::config::RobotConfig;
//!
//! let config = RobotConfig::from_json(r#"{"solver": {"movement_threshold": 0.05}}"#).unwrap();
//! assert_eq!(config.solver.movement_threshold, 0.05);
//! assert_eq!(config.gripper.angle_threshold, 0.5);
//! ```

use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::kinematics::SolverConfig;
use crate::robot::{CellLayout, WareKind};
use crate::tool::GripperConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a cell configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No conveyor configured for {0:?}")]
    MissingConveyor(WareKind),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Complete cell configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub layout: CellLayout,
    pub solver: SolverConfig,
    pub gripper: GripperConfig,
    pub history_capacity: usize,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            layout: CellLayout::default(),
            solver: SolverConfig::default(),
            gripper: GripperConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl RobotConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.conveyor_position(WareKind::Pickup).is_none() {
            return Err(ConfigError::MissingConveyor(WareKind::Pickup));
        }
        positive("solver.movement_threshold", self.solver.movement_threshold)?;
        positive("gripper.angle_threshold", self.gripper.angle_threshold)?;
        positive("gripper.fork_rate", self.gripper.fork_rate)?;

        let probe = self.solver.probe_angle;
        if !probe.is_finite() || probe == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "solver.probe_angle",
                value: probe,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn default_config_is_valid() {
        assert!(RobotConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = RobotConfig::from_json("{}").unwrap();
        assert_eq!(config, RobotConfig::default());
        assert_eq!(config.history_capacity, 64);
    }

    #[test]
    fn json_round_trip_keeps_layout() {
        let mut config = RobotConfig::default();
        config.layout.standby = Vec3::new(0.0, 7.0, 1.0);
        config.gripper.fork_rate = 0.4;

        let json = config.to_json().unwrap();
        let parsed = RobotConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            RobotConfig::from_json("{\"solver\": 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_pickup_conveyor_is_rejected() {
        let json = r#"{"layout": {"conveyors": {"Brick": [0.0, 1.0, 6.0]}}}"#;
        assert!(matches!(
            RobotConfig::from_json(json),
            Err(ConfigError::MissingConveyor(WareKind::Pickup))
        ));
    }

    #[test]
    fn non_positive_thresholds_are_rejected() {
        let mut config = RobotConfig::default();
        config.solver.movement_threshold = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "solver.movement_threshold", .. })
        ));

        let mut config = RobotConfig::default();
        config.gripper.angle_threshold = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = RobotConfig::default();
        config.solver.probe_angle = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "solver.probe_angle", .. })
        ));
    }
}
