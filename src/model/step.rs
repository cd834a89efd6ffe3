//! Step types: one timed phase of a roast.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RecipeError;

/// Temperature every new step starts at.
pub const DEFAULT_TARGET_TEMP: u16 = 150;

/// Fan speed every new step starts at.
pub const DEFAULT_FAN_SPEED: FanSpeed = FanSpeed(5);

/// Roaster fan speed, always within `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(9);

    /// Creates a fan speed, rejecting values outside `1..=9`.
    pub fn new(value: u8) -> Result<Self, RecipeError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RecipeError::FanSpeedOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = RecipeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FanSpeed> for u8 {
    fn from(speed: FanSpeed) -> Self {
        speed.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One phase of a roast: a duration, a fan speed, and either a heating
/// setpoint or cooling.
///
/// On disk a step is a flat object carrying `targetTemp` or `cooling: true`,
/// never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StepRecord", into = "StepRecord")]
pub enum Step {
    /// Hold the roaster at a target temperature.
    Heating {
        target_temp: u16,
        fan_speed: FanSpeed,
        section_time: u32,
    },

    /// Run the fan with the heater off.
    Cooling { fan_speed: FanSpeed, section_time: u32 },
}

impl Step {
    pub fn fan_speed(&self) -> FanSpeed {
        match self {
            Self::Heating { fan_speed, .. } | Self::Cooling { fan_speed, .. } => *fan_speed,
        }
    }

    /// Duration of the step in seconds.
    pub fn section_time(&self) -> u32 {
        match self {
            Self::Heating { section_time, .. } | Self::Cooling { section_time, .. } => {
                *section_time
            }
        }
    }

    /// The heating setpoint, or `None` for a cooling step.
    pub fn target_temp(&self) -> Option<u16> {
        match self {
            Self::Heating { target_temp, .. } => Some(*target_temp),
            Self::Cooling { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn is_cooling(&self) -> bool {
        matches!(self, Self::Cooling { .. })
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Heating {
            target_temp: DEFAULT_TARGET_TEMP,
            fan_speed: DEFAULT_FAN_SPEED,
            section_time: 0,
        }
    }
}

/// Wire shape of a step.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepRecord {
    section_time: u32,
    fan_speed: FanSpeed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cooling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_temp: Option<u16>,
}

impl TryFrom<StepRecord> for Step {
    type Error = RecipeError;

    fn try_from(record: StepRecord) -> Result<Self, Self::Error> {
        let StepRecord {
            section_time,
            fan_speed,
            cooling,
            target_temp,
        } = record;
        match (target_temp, cooling.unwrap_or(false)) {
            (Some(_), true) => Err(RecipeError::HeatingAndCooling),
            (Some(target_temp), false) => Ok(Self::Heating {
                target_temp,
                fan_speed,
                section_time,
            }),
            (None, true) => Ok(Self::Cooling {
                fan_speed,
                section_time,
            }),
            (None, false) => Err(RecipeError::MissingTargetTemp),
        }
    }
}

impl From<Step> for StepRecord {
    fn from(step: Step) -> Self {
        match step {
            Step::Heating {
                target_temp,
                fan_speed,
                section_time,
            } => Self {
                section_time,
                fan_speed,
                cooling: None,
                target_temp: Some(target_temp),
            },
            Step::Cooling {
                fan_speed,
                section_time,
            } => Self {
                section_time,
                fan_speed,
                cooling: Some(true),
                target_temp: None,
            },
        }
    }
}
