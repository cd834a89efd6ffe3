//! Cell selectors for a single step row.
//!
//! Each selector owns the value shown in one column of the steps table and
//! knows how to step through its choices. A row reads back into a [`Step`]
//! exactly: odd temperatures survive because they get their own option.

use std::fmt;
use std::iter;

use crate::model::{FanSpeed, Step};

use super::TableError;

/// First temperature on the standard grid.
pub const GRID_START: u16 = 150;

/// Last temperature on the standard grid.
pub const GRID_END: u16 = 550;

/// Spacing of the standard grid.
pub const GRID_STEP: u16 = 10;

/// Longest duration reachable by adjusting a duration cell (99:59).
pub const MAX_ADJUSTED_SECONDS: u32 = 99 * 60 + 59;

/// The standard temperature options, coolest first.
pub fn temperature_grid() -> impl Iterator<Item = u16> {
    (GRID_START..=GRID_END).step_by(usize::from(GRID_STEP))
}

/// One entry of the temperature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempChoice {
    Cooling,
    Degrees(u16),
}

impl fmt::Display for TempChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooling => write!(f, "Cooling"),
            Self::Degrees(d) => write!(f, "{d}"),
        }
    }
}

/// Temperature-or-cooling column: `Cooling`, then the grid, plus at most one
/// synthetic option holding an off-grid temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureSelector {
    options: Vec<TempChoice>,
    selected: usize,
}

impl TemperatureSelector {
    pub fn for_step(step: &Step) -> Self {
        let mut options: Vec<TempChoice> = iter::once(TempChoice::Cooling)
            .chain(temperature_grid().map(TempChoice::Degrees))
            .collect();

        let selected = match step.target_temp() {
            None => 0,
            Some(temp) => {
                let wanted = TempChoice::Degrees(temp);
                if let Some(i) = options.iter().position(|o| *o == wanted) {
                    i
                } else {
                    // Sorted position: right after the grid value it rounds down to.
                    let at = options
                        .iter()
                        .position(|o| matches!(o, TempChoice::Degrees(d) if *d > temp))
                        .unwrap_or(options.len());
                    options.insert(at, wanted);
                    at
                }
            }
        };

        Self { options, selected }
    }

    #[cfg(test)]
    pub fn options(&self) -> &[TempChoice] {
        &self.options
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> TempChoice {
        self.options[self.selected]
    }

    /// Moves to the next hotter option. Stays put on the last one.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    /// Moves to the next cooler option, ending at `Cooling`.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_cooling(&mut self) {
        self.selected = 0;
    }

    /// Selects the option matching `choice`. Returns `false` if there is none.
    #[cfg(test)]
    pub fn select(&mut self, choice: TempChoice) -> bool {
        match self.options.iter().position(|o| *o == choice) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }
}

/// Fan-speed column: speeds 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanSelector {
    speed: FanSpeed,
}

impl FanSelector {
    pub fn new(speed: FanSpeed) -> Self {
        Self { speed }
    }

    pub fn selected(self) -> FanSpeed {
        self.speed
    }

    pub fn select(&mut self, speed: FanSpeed) {
        self.speed = speed;
    }

    pub fn select_next(&mut self) {
        if let Ok(next) = FanSpeed::new(self.speed.get() + 1) {
            self.speed = next;
        }
    }

    pub fn select_previous(&mut self) {
        if let Ok(previous) = FanSpeed::new(self.speed.get().saturating_sub(1)) {
            self.speed = previous;
        }
    }
}

/// Section-time column, shown as `mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSelector {
    seconds: u32,
}

impl DurationSelector {
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn seconds(self) -> u32 {
        self.seconds
    }

    /// Shifts the duration by `delta` seconds, clamped to `0..=99:59`.
    ///
    /// A stored value already above the cap is only ever lowered.
    pub fn adjust(&mut self, delta: i64) {
        let current = i64::from(self.seconds);
        let ceiling = current.max(i64::from(MAX_ADJUSTED_SECONDS));
        let next = (current + delta).clamp(0, ceiling);
        self.seconds = u32::try_from(next).unwrap_or(self.seconds);
    }

    /// Sets the duration from `mm:ss` text.
    pub fn set_text(&mut self, text: &str) -> Result<(), TableError> {
        self.seconds = parse_duration(text)?;
        Ok(())
    }
}

impl fmt::Display for DurationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(u64::from(self.seconds)))
    }
}

/// Formats seconds as `mm:ss`. Minutes are not wrapped at an hour.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parses `mm:ss` (or a bare number of seconds) into seconds.
pub fn parse_duration(text: &str) -> Result<u32, TableError> {
    let invalid = || TableError::InvalidDuration(text.to_string());
    let text = text.trim();

    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
            let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(invalid)
        }
        None => text.parse().map_err(|_| invalid()),
    }
}

/// All three selectors of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    pub temperature: TemperatureSelector,
    pub fan: FanSelector,
    pub duration: DurationSelector,
}

impl StepRow {
    /// Renders a step into preset selectors.
    pub fn from_step(step: &Step) -> Self {
        Self {
            temperature: TemperatureSelector::for_step(step),
            fan: FanSelector::new(step.fan_speed()),
            duration: DurationSelector::new(step.section_time()),
        }
    }

    /// Reads the selectors back into a step.
    pub fn to_step(&self) -> Step {
        let fan_speed = self.fan.selected();
        let section_time = self.duration.seconds();
        match self.temperature.selected() {
            TempChoice::Cooling => Step::Cooling {
                fan_speed,
                section_time,
            },
            TempChoice::Degrees(target_temp) => Step::Heating {
                target_temp,
                fan_speed,
                section_time,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heating(target_temp: u16) -> Step {
        Step::Heating {
            target_temp,
            fan_speed: FanSpeed::new(5).unwrap(),
            section_time: 0,
        }
    }

    #[test]
    fn grid_spans_150_to_550() {
        let grid: Vec<u16> = temperature_grid().collect();
        assert_eq!(grid.first(), Some(&150));
        assert_eq!(grid.last(), Some(&550));
        assert_eq!(grid.len(), 41);
    }

    #[test]
    fn on_grid_temperature_adds_no_option() {
        let selector = TemperatureSelector::for_step(&heating(200));
        assert_eq!(selector.options().len(), 42);
        assert_eq!(selector.options()[0], TempChoice::Cooling);
        assert_eq!(selector.selected(), TempChoice::Degrees(200));
    }

    #[test]
    fn off_grid_temperature_gets_synthetic_option() {
        let selector = TemperatureSelector::for_step(&heating(155));
        assert_eq!(selector.options().len(), 43);
        assert_eq!(selector.selected(), TempChoice::Degrees(155));

        let i = selector.selected_index();
        assert_eq!(selector.options()[i - 1], TempChoice::Degrees(150));
        assert_eq!(selector.options()[i + 1], TempChoice::Degrees(160));
    }

    #[test]
    fn temperatures_outside_grid_are_kept() {
        let low = TemperatureSelector::for_step(&heating(100));
        assert_eq!(low.selected(), TempChoice::Degrees(100));
        assert_eq!(low.selected_index(), 1);

        let high = TemperatureSelector::for_step(&heating(600));
        assert_eq!(high.selected(), TempChoice::Degrees(600));
        assert_eq!(high.selected_index(), high.options().len() - 1);
    }

    #[test]
    fn cooling_step_selects_first_option() {
        let step = Step::Cooling {
            fan_speed: FanSpeed::MAX,
            section_time: 30,
        };
        let selector = TemperatureSelector::for_step(&step);
        assert_eq!(selector.selected_index(), 0);
        assert_eq!(selector.selected(), TempChoice::Cooling);
    }

    #[test]
    fn temperature_navigation_saturates() {
        let mut selector = TemperatureSelector::for_step(&heating(150));
        selector.select_previous();
        assert_eq!(selector.selected(), TempChoice::Cooling);
        selector.select_previous();
        assert_eq!(selector.selected(), TempChoice::Cooling);

        assert!(selector.select(TempChoice::Degrees(550)));
        selector.select_next();
        assert_eq!(selector.selected(), TempChoice::Degrees(550));
        assert!(!selector.select(TempChoice::Degrees(555)));
    }

    #[test]
    fn fan_navigation_stays_in_range() {
        let mut fan = FanSelector::new(FanSpeed::MIN);
        fan.select_previous();
        assert_eq!(fan.selected(), FanSpeed::MIN);

        fan.select(FanSpeed::MAX);
        fan.select_next();
        assert_eq!(fan.selected(), FanSpeed::MAX);
    }

    #[test]
    fn duration_formats_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(125), "02:05");
        assert_eq!(format_duration(4500), "75:00");
    }

    #[test]
    fn parse_duration_accepts_both_forms() {
        assert_eq!(parse_duration("02:05").unwrap(), 125);
        assert_eq!(parse_duration(" 90 ").unwrap(), 90);
        assert!(matches!(
            parse_duration("1:75"),
            Err(TableError::InvalidDuration(_))
        ));
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn duration_adjust_clamps() {
        let mut duration = DurationSelector::new(10);
        duration.adjust(-30);
        assert_eq!(duration.seconds(), 0);

        duration.adjust(i64::from(MAX_ADJUSTED_SECONDS) + 100);
        assert_eq!(duration.seconds(), MAX_ADJUSTED_SECONDS);

        let mut long = DurationSelector::new(7200);
        long.adjust(5);
        assert_eq!(long.seconds(), 7200);
        long.adjust(-60);
        assert_eq!(long.seconds(), 7140);
    }

    #[test]
    fn row_round_trips_off_grid_temperature() {
        let step = Step::Heating {
            target_temp: 155,
            fan_speed: FanSpeed::new(3).unwrap(),
            section_time: 45,
        };
        assert_eq!(StepRow::from_step(&step).to_step(), step);
    }

    #[test]
    fn row_round_trips_cooling() {
        let step = Step::Cooling {
            fan_speed: FanSpeed::MAX,
            section_time: 120,
        };
        let read = StepRow::from_step(&step).to_step();
        assert_eq!(read, step);
        assert_eq!(read.target_temp(), None);
    }
}
