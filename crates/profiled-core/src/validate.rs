// ── Name and content validation ──
//
// Profile names are checked here; config/device content goes through
// the pluggable `ContentValidator`, which deployments may replace.

use crate::error::CoreError;
use crate::model::{ConfigMap, DeviceMap};

/// Validate a profile name for create and rename.
///
/// Names must be non-empty, contain no `/`, and not be `.` or `..`.
pub fn validate_profile_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::bad_request("No name provided"));
    }
    if name.contains('/') {
        return Err(CoreError::bad_request("Profile names may not contain slashes"));
    }
    if name == "." || name == ".." {
        return Err(CoreError::bad_request(format!("Invalid profile name '{name}'")));
    }
    Ok(())
}

/// Pure content validation for profile config and devices.
pub trait ContentValidator: Send + Sync {
    fn validate_config(&self, config: &ConfigMap) -> Result<(), CoreError>;
    fn validate_devices(&self, devices: &DeviceMap) -> Result<(), CoreError>;
}

/// Structural checks that hold for every deployment.
///
/// Config keys must be non-empty without whitespace; device names must be
/// non-empty without `/`; every device declares a non-empty `type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl ContentValidator for StandardValidator {
    fn validate_config(&self, config: &ConfigMap) -> Result<(), CoreError> {
        for key in config.keys() {
            if key.is_empty() {
                return Err(CoreError::bad_request("Empty config key"));
            }
            if key.chars().any(char::is_whitespace) {
                return Err(CoreError::bad_request(format!(
                    "Invalid config key '{key}': whitespace not allowed"
                )));
            }
        }
        Ok(())
    }

    fn validate_devices(&self, devices: &DeviceMap) -> Result<(), CoreError> {
        for (name, attrs) in devices {
            if name.is_empty() {
                return Err(CoreError::bad_request("Device name may not be empty"));
            }
            if name.contains('/') {
                return Err(CoreError::bad_request(format!(
                    "Invalid device name '{name}': slashes not allowed"
                )));
            }
            match attrs.get("type") {
                Some(kind) if !kind.is_empty() => {}
                _ => {
                    return Err(CoreError::bad_request(format!(
                        "Missing device type for device '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}
