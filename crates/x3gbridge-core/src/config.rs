//! Machine overrides file loading
//!
//! Parses the INI-style configuration file that adjusts a machine
//! definition before a connection is opened:
//!
//! ```ini
//! [machine]
//! machine_type = r2x
//! extruder_count = 2
//!
//! [x]
//! steps_per_mm = 88.888889
//! max_feedrate = 18000
//! ```
//!
//! Entries are applied in file order, so a `machine_type` line replaces
//! the whole definition and later entries override the chosen preset.
//! Parsing stops at the first malformed line; everything applied up to
//! that point stays in effect.

use crate::error::ConfigError;
use crate::machine::Machine;
use std::fs;
use std::path::Path;

/// Section of the overrides file currently being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Machine,
    X,
    Y,
    Z,
    A,
    B,
}

impl Section {
    fn parse(name: &str) -> Option<Section> {
        match name {
            // [printer] is the historical spelling of [machine]
            "machine" | "printer" => Some(Section::Machine),
            "x" => Some(Section::X),
            "y" => Some(Section::Y),
            "z" => Some(Section::Z),
            "a" => Some(Section::A),
            "b" => Some(Section::B),
            _ => None,
        }
    }
}

/// Load an overrides file and apply it to `machine`
///
/// Returns the first error encountered; entries preceding the offending
/// line remain applied. A missing or unreadable file surfaces as
/// [`ConfigError::Io`].
pub fn load_machine_config(path: &Path, machine: &mut Machine) -> Result<(), ConfigError> {
    let contents = fs::read_to_string(path)?;
    apply_machine_config(&contents, machine)
}

/// Apply overrides file contents to `machine`
pub fn apply_machine_config(contents: &str, machine: &mut Machine) -> Result<(), ConfigError> {
    let mut section = Section::None;

    for (index, raw_line) in contents.lines().enumerate() {
        let line_number = index as u32 + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Section::parse(name.trim()).ok_or(ConfigError::Syntax { line: line_number })?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or(ConfigError::Syntax { line: line_number })?;

        apply_entry(machine, section, key, value, line_number)?;
    }

    Ok(())
}

fn apply_entry(
    machine: &mut Machine,
    section: Section,
    key: &str,
    value: &str,
    line: u32,
) -> Result<(), ConfigError> {
    match section {
        Section::Machine => match key {
            "machine_type" => {
                let preset = Machine::preset(value).ok_or_else(|| ConfigError::UnknownMachine {
                    machine: value.to_string(),
                    line,
                })?;
                *machine = preset;
                Ok(())
            }
            "extruder_count" => {
                machine.extruder_count = parse_value(value, line)?;
                Ok(())
            }
            _ => Err(ConfigError::Syntax { line }),
        },
        Section::X => apply_axis_entry(&mut machine.x, key, value, line),
        Section::Y => apply_axis_entry(&mut machine.y, key, value, line),
        Section::Z => apply_axis_entry(&mut machine.z, key, value, line),
        Section::A => apply_axis_entry(&mut machine.a, key, value, line),
        Section::B => apply_axis_entry(&mut machine.b, key, value, line),
        Section::None => Err(ConfigError::Syntax { line }),
    }
}

fn apply_axis_entry(
    axis: &mut crate::machine::Axis,
    key: &str,
    value: &str,
    line: u32,
) -> Result<(), ConfigError> {
    match key {
        "steps_per_mm" => {
            axis.steps_per_mm = parse_value(value, line)?;
            Ok(())
        }
        "max_feedrate" => {
            axis.max_feedrate = parse_value(value, line)?;
            Ok(())
        }
        _ => Err(ConfigError::Syntax { line }),
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, line: u32) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Syntax { line })
}
