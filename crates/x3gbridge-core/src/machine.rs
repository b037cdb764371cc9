//! Machine configuration model
//!
//! Describes the physical machine the session is connected to: per-axis
//! step scaling and feed limits plus the extruder count. The session
//! takes a snapshot of these values at connect time; the response
//! translator uses them to convert raw step counts into millimetres and
//! to decide whether extruder identities appear in temperature replies.

use serde::{Deserialize, Serialize};

/// Configuration for a single motion axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Motor steps per millimetre of travel
    pub steps_per_mm: f64,

    /// Maximum feed rate in mm/min
    pub max_feedrate: f64,
}

impl Axis {
    /// Create an axis configuration
    pub fn new(steps_per_mm: f64, max_feedrate: f64) -> Self {
        Self {
            steps_per_mm,
            max_feedrate,
        }
    }

    /// Convert a raw step count to millimetres
    pub fn steps_to_mm(&self, steps: i32) -> f64 {
        f64::from(steps) / self.steps_per_mm
    }
}

/// Snapshot of one machine definition
///
/// Immutable for the life of a connection. Starts from a built-in preset
/// and may be adjusted by an overrides file before the port is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Preset identifier (e.g. "r2", "r2x")
    pub machine_type: String,

    /// X axis configuration
    pub x: Axis,
    /// Y axis configuration
    pub y: Axis,
    /// Z axis configuration
    pub z: Axis,
    /// A axis (first extruder) configuration
    pub a: Axis,
    /// B axis (second extruder) configuration
    pub b: Axis,

    /// Number of installed extruders
    pub extruder_count: u32,
}

impl Machine {
    /// Look up a built-in machine preset by identifier
    ///
    /// Known presets:
    /// - `r1` / `r1d`: Replicator 1, single / dual extruder
    /// - `r2`: Replicator 2 (the default machine)
    /// - `r2x`: Replicator 2X, dual extruder
    pub fn preset(machine_type: &str) -> Option<Machine> {
        let extruder_axis = Axis::new(96.275_202, 1600.0);
        match machine_type {
            "r1" | "r1d" => Some(Machine {
                machine_type: machine_type.to_string(),
                x: Axis::new(94.139_704, 18000.0),
                y: Axis::new(94.139_704, 18000.0),
                z: Axis::new(400.0, 1170.0),
                a: extruder_axis,
                b: extruder_axis,
                extruder_count: if machine_type == "r1d" { 2 } else { 1 },
            }),
            "r2" | "r2x" => Some(Machine {
                machine_type: machine_type.to_string(),
                x: Axis::new(88.888_889, 18000.0),
                y: Axis::new(88.888_889, 18000.0),
                z: Axis::new(400.0, 1170.0),
                a: extruder_axis,
                b: extruder_axis,
                extruder_count: if machine_type == "r2x" { 2 } else { 1 },
            }),
            _ => None,
        }
    }

    /// Whether replies must carry extruder identities
    pub fn has_multiple_extruders(&self) -> bool {
        self.extruder_count > 1
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::preset("r2").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_machine_is_replicator_2() {
        let machine = Machine::default();
        assert_eq!(machine.machine_type, "r2");
        assert_eq!(machine.extruder_count, 1);
        assert_eq!(machine.z.steps_per_mm, 400.0);
    }

    #[test]
    fn test_dual_extruder_presets() {
        assert_eq!(Machine::preset("r2x").unwrap().extruder_count, 2);
        assert_eq!(Machine::preset("r1d").unwrap().extruder_count, 2);
        assert!(Machine::preset("r2x").unwrap().has_multiple_extruders());
        assert!(!Machine::preset("r2").unwrap().has_multiple_extruders());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Machine::preset("ultimaker").is_none());
    }

    #[test]
    fn test_steps_to_mm() {
        let axis = Axis::new(400.0, 1170.0);
        assert_eq!(axis.steps_to_mm(1000), 2.5);
        assert_eq!(axis.steps_to_mm(0), 0.0);
        assert_eq!(axis.steps_to_mm(-400), -1.0);
    }
}
