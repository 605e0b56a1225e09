use crate::errors::Rejected;
use crate::models::{
    DEFAULT_AWAY_NAME, DEFAULT_HOME_NAME, Play, QUARTER_SECONDS, ScoreState, Scorecard, Side,
};

impl Scorecard {
    /// Records a scoring play. The state before the play is pushed as an undo snapshot.
    pub fn add_points(&mut self, side: Side, points: u8) -> Result<(), Rejected> {
        if !(1..=3).contains(&points) {
            return Err(Rejected::new("points", format!("{points} is not 1, 2 or 3")));
        }

        self.undo_stack.push(self.game.clone());

        let game = &mut self.game;
        let team = game.team_mut(side);
        team.score = team.score.saturating_add(u32::from(points));
        game.history.push(Play {
            side,
            points,
            quarter: game.quarter,
            clock_remaining: game.clock.remaining,
        });
        game.possession = side.other();
        Ok(())
    }

    /// Replaces the whole game with the last snapshot. Returns whether anything was restored.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.game = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn set_team_name(&mut self, side: Side, value: &str) {
        let trimmed = value.trim();
        let name = if trimmed.is_empty() {
            match side {
                Side::Home => DEFAULT_HOME_NAME,
                Side::Away => DEFAULT_AWAY_NAME,
            }
        } else {
            trimmed
        };
        self.game.team_mut(side).name = name.to_string();
    }

    pub fn new_game(&mut self) {
        *self = Scorecard::default();
    }
}

impl ScoreState {
    /// Flips the running flag. Starting an expired clock does nothing.
    pub fn toggle_running(&mut self) -> bool {
        if !self.clock.running && self.clock.remaining == 0 {
            return false;
        }
        self.clock.running = !self.clock.running;
        self.clock.running
    }

    /// One second of game time. Returns `false` once the clock should stop ticking.
    pub fn tick(&mut self) -> bool {
        if !self.clock.running {
            return false;
        }
        self.clock.remaining = self.clock.remaining.saturating_sub(1);
        if self.clock.remaining == 0 {
            self.clock.running = false;
        }
        self.clock.running
    }

    pub fn reset_clock(&mut self) {
        self.clock.remaining = QUARTER_SECONDS;
        self.clock.running = false;
    }

    pub fn advance_quarter(&mut self) {
        self.reset_clock();
        self.quarter = self.quarter.saturating_add(1);
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn play_note(points: u8) -> &'static str {
    match points {
        1 => "Free throw",
        2 => "Field goal",
        _ => "Three pointer",
    }
}
