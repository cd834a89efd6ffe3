//! Core data model for roastbook.
//!
//! A recipe is plain metadata plus an ordered list of steps. The JSON shape
//! matches the Openroast recipe format: camelCase keys, and each step
//! carries either `targetTemp` or `cooling: true`.

mod recipe;
mod step;

pub use recipe::{Bean, BeanSource, Recipe, RoastDescription};
pub use step::{FanSpeed, Step};

/// Errors raised when a value does not fit the recipe model.
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("fan speed {0} is outside 1-9")]
    FanSpeedOutOfRange(u8),

    #[error("step has both targetTemp and cooling")]
    HeatingAndCooling,

    #[error("step has neither targetTemp nor cooling")]
    MissingTargetTemp,
}
