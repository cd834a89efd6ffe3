//! Step commands: row operations on a saved recipe.
//!
//! Rows are numbered from 1, matching `roastbook show`.

use std::path::Path;

use clap::Subcommand;

use crate::editor::RecipeEditor;
use crate::model::{FanSpeed, Step};
use crate::storage::RecipeStore;
use crate::table::{StepRow, parse_duration};

use super::format::format_step;

#[derive(Debug, Subcommand)]
pub enum StepAction {
    /// Swap a step with the one above it. No-op on the first step.
    Up {
        /// Step number, starting at 1.
        row: usize,
    },

    /// Swap a step with the one below it. No-op on the last step.
    Down {
        /// Step number, starting at 1.
        row: usize,
    },

    /// Delete a step. The last remaining step cannot be deleted.
    Delete {
        /// Step number, starting at 1.
        row: usize,
    },

    /// Insert a default step (150°, fan 5, 00:00) below a step.
    Insert {
        /// Step number, starting at 1.
        row: usize,
    },

    /// Change the values of one step.
    Set {
        /// Step number, starting at 1.
        row: usize,

        /// Target temperature in degrees.
        #[arg(long, conflicts_with = "cooling")]
        temp: Option<u16>,

        /// Make this a cooling step.
        #[arg(long)]
        cooling: bool,

        /// Fan speed, 1-9.
        #[arg(long)]
        fan: Option<u8>,

        /// Section time as `mm:ss` or seconds.
        #[arg(long)]
        time: Option<String>,
    },
}

/// Apply a step action to the recipe at `path` and save it in place.
pub(super) fn cmd_step(store: &RecipeStore, path: &Path, action: &StepAction) -> Result<(), String> {
    let mut editor = RecipeEditor::open(path)
        .map_err(|e| format!("failed to load {}: {e}", path.display()))?;

    let result = match action {
        StepAction::Up { row } => editor.move_step_up(index(*row)?),
        StepAction::Down { row } => editor.move_step_down(index(*row)?),
        StepAction::Delete { row } => editor.delete_step(index(*row)?),
        StepAction::Insert { row } => editor.insert_step_below(index(*row)?),
        StepAction::Set {
            row,
            temp,
            cooling,
            fan,
            time,
        } => {
            let i = index(*row)?;
            let current = editor
                .steps()
                .get(i)
                .copied()
                .ok_or_else(|| format!("no step {row}"))?;
            let step = updated_step(current, *temp, *cooling, *fan, time.as_deref())?;
            editor.edit_row(i, |r| *r = StepRow::from_step(&step))
        }
    };
    result.map_err(|e| e.to_string())?;

    let saved = editor
        .save(store)
        .map_err(|e| format!("failed to save {}: {e}", path.display()))?;

    for (i, step) in editor.steps().iter().enumerate() {
        println!("{:>2}. {}", i + 1, format_step(step));
    }
    eprintln!("Saved {}", saved.display());
    Ok(())
}

/// Convert a 1-based step number to a table index.
fn index(row: usize) -> Result<usize, String> {
    row.checked_sub(1)
        .ok_or_else(|| "step numbers start at 1".to_string())
}

fn updated_step(
    current: Step,
    temp: Option<u16>,
    cooling: bool,
    fan: Option<u8>,
    time: Option<&str>,
) -> Result<Step, String> {
    let fan_speed = match fan {
        Some(f) => FanSpeed::new(f).map_err(|e| e.to_string())?,
        None => current.fan_speed(),
    };
    let section_time = match time {
        Some(t) => parse_duration(t).map_err(|e| e.to_string())?,
        None => current.section_time(),
    };

    let step = if cooling {
        Step::Cooling {
            fan_speed,
            section_time,
        }
    } else {
        match temp.or(current.target_temp()) {
            Some(target_temp) => Step::Heating {
                target_temp,
                fan_speed,
                section_time,
            },
            None => Step::Cooling {
                fan_speed,
                section_time,
            },
        }
    };
    Ok(step)
}
