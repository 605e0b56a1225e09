use crate::errors::Rejected;
use crate::models::{DEFAULT_STATION, Entry, PassengerCommand, PassengerState, Theme};
use chrono::{DateTime, Utc};

pub const QUICK_ADD_STEP: u64 = 5;
pub const MIN_GOAL: f64 = 10.0;

impl PassengerState {
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn decrement(&mut self) {
        if self.count == 0 {
            return;
        }
        self.count -= 1;
    }

    pub fn quick_add(&mut self) {
        self.count = self.count.saturating_add(QUICK_ADD_STEP);
    }

    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    pub fn commit(&mut self) {
        self.commit_at(Utc::now());
    }

    /// Moves the in-progress count into the log. A zero count records nothing.
    pub fn commit_at(&mut self, now: DateTime<Utc>) {
        if self.count == 0 {
            return;
        }
        self.entries.push(Entry {
            value: self.count,
            station: self.station.clone(),
            line: self.line.clone(),
            time: now,
        });
        self.total = self.total.saturating_add(self.count);
        self.count = 0;
    }

    /// Un-commits the most recent entry, handing its value back to `count`.
    pub fn undo(&mut self) {
        let Some(entry) = self.entries.pop() else {
            return;
        };
        self.total = self.total.saturating_sub(entry.value);
        self.count = entry.value;
    }

    pub fn clear_history(&mut self) {
        self.entries.clear();
        self.total = 0;
    }

    pub fn set_station(&mut self, value: &str) {
        let trimmed = value.trim();
        self.station = if trimmed.is_empty() {
            DEFAULT_STATION.to_string()
        } else {
            trimmed.to_string()
        };
    }

    pub fn set_goal(&mut self, value: &str) -> Result<(), Rejected> {
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| Rejected::new("goal", format!("'{}' is not a number", value.trim())))?;
        if !parsed.is_finite() {
            return Err(Rejected::new("goal", "must be finite"));
        }
        if parsed < MIN_GOAL {
            return Err(Rejected::new("goal", format!("must be at least {MIN_GOAL}")));
        }
        self.goal = parsed;
        Ok(())
    }

    pub fn set_line(&mut self, value: &str) -> Result<(), Rejected> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Rejected::new("line", "must not be empty"));
        }
        self.line = trimmed.to_string();
        Ok(())
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    /// Brings `total` back in line with the log after loading an older snapshot.
    pub fn recompute_total(&mut self) {
        self.total = self
            .entries
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.value));
    }
}

impl PassengerCommand {
    pub fn apply(self, state: &mut PassengerState) {
        match self {
            PassengerCommand::Increment => state.increment(),
            PassengerCommand::Decrement => state.decrement(),
            PassengerCommand::QuickAdd => state.quick_add(),
            PassengerCommand::Reset => state.reset_count(),
            PassengerCommand::Commit => state.commit(),
            PassengerCommand::Undo => state.undo(),
            PassengerCommand::ClearHistory => state.clear_history(),
            PassengerCommand::ToggleTheme => state.toggle_theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries_sum(state: &PassengerState) -> u64 {
        state.entries.iter().map(|entry| entry.value).sum()
    }

    #[test]
    fn decrement_never_goes_below_zero() {
        let mut state = PassengerState::default();
        state.decrement();
        assert_eq!(state.count, 0);

        for step in 0..40u32 {
            if step % 3 == 0 {
                state.increment();
            } else {
                state.decrement();
            }
            assert!(state.count <= 40);
        }
        state.increment();
        state.decrement();
        state.decrement();
        assert_eq!(state.count, 0);
    }

    #[test]
    fn commit_with_zero_count_records_nothing() {
        let mut state = PassengerState::default();
        state.commit();
        assert!(state.entries.is_empty());
        assert_eq!(state.total, 0);
    }

    #[test]
    fn shift_scenario_commit_quick_add_and_undo() {
        let mut state = PassengerState::default();
        assert_eq!(state.goal, 120.0);

        for _ in 0..7 {
            state.increment();
        }
        assert_eq!(state.count, 7);

        state.commit();
        assert_eq!(state.count, 0);
        assert_eq!(state.total, 7);
        assert_eq!(state.entries.len(), 1);

        state.quick_add();
        assert_eq!(state.count, 5);
        state.commit();
        assert_eq!(state.total, 12);
        assert_eq!(state.entries.len(), 2);

        state.undo();
        assert_eq!(state.total, 7);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.count, 5);
    }

    #[test]
    fn commit_then_undo_restores_log_and_total() {
        let mut state = PassengerState::default();
        state.quick_add();
        state.commit();
        let entries = state.entries.clone();
        let total = state.total;

        state.increment();
        state.increment();
        state.commit();
        state.undo();

        assert_eq!(state.entries, entries);
        assert_eq!(state.total, total);
    }

    #[test]
    fn total_tracks_entries_through_mixed_commands() {
        let mut state = PassengerState::default();
        let script = "++c+-5cu5c-cxu+++cuu5c";
        for command in script.chars() {
            match command {
                '+' => state.increment(),
                '-' => state.decrement(),
                '5' => state.quick_add(),
                'c' => state.commit(),
                'u' => state.undo(),
                'x' => state.clear_history(),
                _ => unreachable!(),
            }
            assert_eq!(state.total, entries_sum(&state), "after {command}");
        }
    }

    #[test]
    fn undo_on_empty_log_is_noop() {
        let mut state = PassengerState::default();
        state.increment();
        state.undo();
        assert_eq!(state.count, 1);
        assert_eq!(state.total, 0);
    }

    #[test]
    fn reset_and_clear_touch_only_their_fields() {
        let mut state = PassengerState::default();
        state.quick_add();
        state.commit();
        state.increment();

        state.clear_history();
        assert_eq!(state.count, 1);
        assert_eq!(state.total, 0);

        state.quick_add();
        state.commit();
        state.increment();
        state.reset_count();
        assert_eq!(state.count, 0);
        assert_eq!(state.total, 6);
        assert_eq!(state.entries.len(), 1);
    }

    #[test]
    fn entry_captures_station_and_line_at_commit() {
        let mut state = PassengerState::default();
        state.set_station("  Airport  ");
        state.set_line("Blue").unwrap();
        state.increment();
        state.commit();
        state.set_station("Harbor");

        let entry = &state.entries[0];
        assert_eq!(entry.station, "Airport");
        assert_eq!(entry.line, "Blue");
    }

    #[test]
    fn goal_below_floor_is_rejected() {
        let mut state = PassengerState::default();
        let err = state.set_goal("5").unwrap_err();
        assert_eq!(err.field, "goal");
        assert_eq!(state.goal, 120.0);

        assert!(state.set_goal("abc").is_err());
        assert!(state.set_goal("inf").is_err());
        assert!(state.set_goal("NaN").is_err());
        assert_eq!(state.goal, 120.0);

        state.set_goal(" 250 ").unwrap();
        assert_eq!(state.goal, 250.0);
        state.set_goal("10").unwrap();
        assert_eq!(state.goal, 10.0);
    }

    #[test]
    fn empty_station_falls_back_and_empty_line_is_rejected() {
        let mut state = PassengerState::default();
        state.set_station("Harbor");
        state.set_station("   ");
        assert_eq!(state.station, DEFAULT_STATION);

        assert!(state.set_line("  ").is_err());
        assert_eq!(state.line, "Orange");
    }

    #[test]
    fn commands_parse_from_action_names() {
        let mut state = PassengerState::default();
        for action in ["increment", "increment", " quick_add ", "save"] {
            PassengerCommand::parse(action).expect("known action").apply(&mut state);
        }
        assert_eq!(state.total, 7);
        assert!(PassengerCommand::parse("explode").is_none());
    }

    #[test]
    fn theme_toggles_back_and_forth() {
        let mut state = PassengerState::default();
        state.toggle_theme();
        assert_eq!(state.theme, Theme::Light);
        state.toggle_theme();
        assert_eq!(state.theme, Theme::Dark);
    }
}
