use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATION: &str = "Downtown Hub";
pub const DEFAULT_LINE: &str = "Orange";
pub const DEFAULT_GOAL: f64 = 120.0;
pub const DEFAULT_HOME_NAME: &str = "Home";
pub const DEFAULT_AWAY_NAME: &str = "Away";
/// Length of one quarter in seconds.
pub const QUARTER_SECONDS: u32 = 12 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// One committed passenger count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub value: u64,
    pub station: String,
    pub line: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerState {
    pub count: u64,
    pub total: u64,
    pub goal: f64,
    pub station: String,
    pub line: String,
    pub shift_start: DateTime<Utc>,
    pub entries: Vec<Entry>,
    pub theme: Theme,
}

impl Default for PassengerState {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0,
            goal: DEFAULT_GOAL,
            station: DEFAULT_STATION.to_string(),
            line: DEFAULT_LINE.to_string(),
            shift_start: Utc::now(),
            entries: Vec::new(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" | "a" => Some(Side::Home),
            "away" | "b" => Some(Side::Away),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    pub remaining: u32,
    pub running: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            remaining: QUARTER_SECONDS,
            running: false,
        }
    }
}

/// One scoring play as shown in the scorecard history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub side: Side,
    pub points: u8,
    pub quarter: u32,
    pub clock_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub home: Team,
    pub away: Team,
    pub possession: Side,
    pub quarter: u32,
    pub clock: GameClock,
    pub history: Vec<Play>,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            home: Team {
                name: DEFAULT_HOME_NAME.to_string(),
                score: 0,
            },
            away: Team {
                name: DEFAULT_AWAY_NAME.to_string(),
                score: 0,
            },
            possession: Side::Home,
            quarter: 1,
            clock: GameClock::default(),
            history: Vec::new(),
        }
    }
}

impl ScoreState {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// Scorecard state plus the stack of snapshots taken before each scoring play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Scorecard {
    #[serde(flatten)]
    pub game: ScoreState,
    pub undo_stack: Vec<ScoreState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerCommand {
    Increment,
    Decrement,
    QuickAdd,
    Reset,
    Commit,
    Undo,
    ClearHistory,
    ToggleTheme,
}

impl PassengerCommand {
    pub fn parse(action: &str) -> Option<Self> {
        let command = match action.trim() {
            "increment" => Self::Increment,
            "decrement" => Self::Decrement,
            "quick_add" => Self::QuickAdd,
            "reset" => Self::Reset,
            "commit" | "save" => Self::Commit,
            "undo" => Self::Undo,
            "clear_history" => Self::ClearHistory,
            "toggle_theme" => Self::ToggleTheme,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCommand {
    Undo,
    ToggleClock,
    ResetClock,
    AdvanceQuarter,
    NewGame,
}

impl ScoreCommand {
    pub fn parse(action: &str) -> Option<Self> {
        let command = match action.trim() {
            "undo" => Self::Undo,
            "toggle_clock" => Self::ToggleClock,
            "reset_clock" => Self::ResetClock,
            "advance_quarter" => Self::AdvanceQuarter,
            "new_game" => Self::NewGame,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PassengerConfigRequest {
    pub station: Option<String>,
    pub goal: Option<String>,
    pub line: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScorecardConfigRequest {
    pub home_name: Option<String>,
    pub away_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointsRequest {
    pub side: String,
    pub points: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Surge,
    Healthy,
    Steady,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Surge => "Surge incoming",
            Trend::Healthy => "Healthy flow",
            Trend::Steady => "Steady flow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leader {
    Home,
    Away,
    Tied,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PassengerMetrics {
    pub average_per_entry: u64,
    pub entry_count: usize,
    pub last_entry_time: Option<DateTime<Utc>>,
    pub progress_percent: f64,
    pub trend: Trend,
    pub trend_label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PassengerView {
    pub state: PassengerState,
    pub metrics: PassengerMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScorecardMetrics {
    pub leader: Leader,
    pub margin: u32,
    pub clock_display: String,
    pub undo_depth: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScorecardView {
    pub state: ScoreState,
    pub metrics: ScorecardMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
}
