//! The steps table: an ordered list of step rows and the row operations.
//!
//! Every row operation reads the whole table back into steps, transforms
//! that list, and rebuilds the table from it. Rows are addressed by index,
//! passed in explicitly by the caller.

mod selectors;

use tracing::debug;

use crate::model::Step;

pub use selectors::{StepRow, format_duration, parse_duration};

/// Warning shown when an edit would leave the recipe without steps.
pub const LAST_STEP_WARNING: &str = "You must have at least one step!";

/// Errors from editing the steps table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{}", LAST_STEP_WARNING)]
    LastStep,

    #[error("no step at row {row} (table has {len} rows)")]
    NoSuchRow { row: usize, len: usize },

    #[error("invalid duration '{0}': expected mm:ss")]
    InvalidDuration(String),
}

pub type Result<T> = core::result::Result<T, TableError>;

/// Rendered step rows. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTable {
    rows: Vec<StepRow>,
}

impl StepTable {
    /// Renders a table from steps. Refuses an empty list.
    pub fn from_steps(steps: &[Step]) -> Result<Self> {
        if steps.is_empty() {
            return Err(TableError::LastStep);
        }
        Ok(Self {
            rows: steps.iter().map(StepRow::from_step).collect(),
        })
    }

    pub fn rows(&self) -> &[StepRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn row_mut(&mut self, row: usize) -> Result<&mut StepRow> {
        let len = self.rows.len();
        self.rows.get_mut(row).ok_or(TableError::NoSuchRow { row, len })
    }

    /// Reads every row, in order, back into steps.
    pub fn read(&self) -> Vec<Step> {
        self.rows.iter().map(StepRow::to_step).collect()
    }

    /// Replaces all rows with rows rendered from `steps`.
    ///
    /// An empty list is refused and the table is left untouched.
    pub fn rebuild(&mut self, steps: &[Step]) -> Result<()> {
        *self = Self::from_steps(steps)?;
        Ok(())
    }

    /// Swaps `row` with the row above it. No-op on the first row.
    pub fn move_up(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        if row == 0 {
            return Ok(());
        }
        let mut steps = self.read();
        steps.swap(row, row - 1);
        debug!(row, "moving step up");
        self.rebuild(&steps)
    }

    /// Swaps `row` with the row below it. No-op on the last row.
    pub fn move_down(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        if row + 1 == self.rows.len() {
            return Ok(());
        }
        let mut steps = self.read();
        steps.swap(row, row + 1);
        debug!(row, "moving step down");
        self.rebuild(&steps)
    }

    /// Removes `row`. Fails with [`TableError::LastStep`] if it is the only one.
    pub fn delete(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        let mut steps = self.read();
        steps.remove(row);
        debug!(row, "deleting step");
        self.rebuild(&steps)
    }

    /// Inserts a default step directly below `row`.
    pub fn insert_below(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        let mut steps = self.read();
        steps.insert(row + 1, Step::default());
        debug!(row, "inserting step");
        self.rebuild(&steps)
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::NoSuchRow {
                row,
                len: self.rows.len(),
            })
        }
    }
}

impl Default for StepTable {
    fn default() -> Self {
        Self {
            rows: vec![StepRow::from_step(&Step::default())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::FanSpeed;

    fn step(target_temp: u16, section_time: u32) -> Step {
        Step::Heating {
            target_temp,
            fan_speed: FanSpeed::new(5).unwrap(),
            section_time,
        }
    }

    fn sample_table() -> StepTable {
        StepTable::from_steps(&[step(150, 30), step(300, 45), step(420, 125)]).unwrap()
    }

    fn temps(table: &StepTable) -> Vec<Option<u16>> {
        table.read().iter().map(Step::target_temp).collect()
    }

    #[test]
    fn default_table_has_placeholder_step() {
        let table = StepTable::default();
        assert_eq!(table.read(), vec![Step::default()]);
    }

    #[test]
    fn empty_steps_are_refused() {
        assert!(matches!(
            StepTable::from_steps(&[]),
            Err(TableError::LastStep)
        ));
    }

    #[test]
    fn move_up_swaps_with_previous() {
        let mut table = sample_table();
        table.move_up(2).unwrap();
        assert_eq!(temps(&table), vec![Some(150), Some(420), Some(300)]);
    }

    #[test]
    fn move_up_first_row_is_noop() {
        let mut table = sample_table();
        table.move_up(0).unwrap();
        assert_eq!(table, sample_table());
    }

    #[test]
    fn move_down_last_row_is_noop() {
        let mut table = sample_table();
        table.move_down(2).unwrap();
        assert_eq!(table, sample_table());
    }

    #[test]
    fn move_up_then_down_restores_order() {
        for i in 1..3 {
            let mut table = sample_table();
            table.move_up(i).unwrap();
            table.move_down(i - 1).unwrap();
            assert_eq!(table.read(), sample_table().read());
        }
    }

    #[test]
    fn reorder_preserves_step_content() {
        let mut table = sample_table();
        table.move_down(0).unwrap();
        let steps = table.read();
        assert_eq!(steps[1], step(150, 30));
        assert_eq!(steps[0], step(300, 45));
    }

    #[test]
    fn delete_removes_row() {
        let mut table = sample_table();
        table.delete(1).unwrap();
        assert_eq!(temps(&table), vec![Some(150), Some(420)]);
    }

    #[test]
    fn delete_last_remaining_step_is_refused() {
        let mut table = StepTable::default();
        let err = table.delete(0).unwrap_err();

        assert!(matches!(err, TableError::LastStep));
        assert_eq!(err.to_string(), LAST_STEP_WARNING);
        assert_eq!(table.read(), vec![Step::default()]);
    }

    #[test]
    fn insert_below_adds_default_step() {
        let mut table = sample_table();
        table.insert_below(0).unwrap();

        let steps = table.read();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[1], Step::default());
        assert_eq!(steps[2], step(300, 45));
    }

    #[test]
    fn insert_below_last_row_appends() {
        let mut table = sample_table();
        table.insert_below(2).unwrap();
        assert_eq!(table.read().last(), Some(&Step::default()));
    }

    #[test]
    fn row_out_of_range_is_an_error() {
        let mut table = sample_table();
        assert!(matches!(
            table.move_up(3),
            Err(TableError::NoSuchRow { row: 3, len: 3 })
        ));
        assert!(table.delete(7).is_err());
        assert!(table.insert_below(3).is_err());
        assert!(table.row_mut(3).is_err());
        assert_eq!(table, sample_table());
    }

    #[test]
    fn rebuild_reflects_exactly_the_new_list() {
        let mut table = sample_table();
        let steps = vec![step(500, 10)];
        table.rebuild(&steps).unwrap();
        assert_eq!(table.read(), steps);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn off_grid_temperature_survives_row_operations() {
        let mut table = StepTable::from_steps(&[step(155, 30), step(150, 0)]).unwrap();
        table.move_down(0).unwrap();
        assert_eq!(temps(&table), vec![Some(150), Some(155)]);
    }

    #[test]
    fn cell_edits_are_read_back() {
        let mut table = sample_table();
        let row = table.row_mut(1).unwrap();
        row.temperature.select_cooling();
        row.fan.select(FanSpeed::MAX);
        row.duration.set_text("01:30").unwrap();

        assert_eq!(
            table.read()[1],
            Step::Cooling {
                fan_speed: FanSpeed::MAX,
                section_time: 90,
            }
        );
    }
}
