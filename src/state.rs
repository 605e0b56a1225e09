use crate::clock::Countdown;
use crate::config::Config;
use crate::errors::{AppError, Rejected};
use crate::export::{CsvExport, passenger_csv, scorecard_csv};
use crate::models::{
    PassengerCommand, PassengerConfigRequest, PassengerState, PassengerView, ScoreCommand,
    Scorecard, ScorecardConfigRequest, ScorecardView, Side,
};
use crate::stats::{build_passenger_view, build_scorecard_view};
use crate::storage::{Slot, load_state};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The scorecard together with the countdown that drives its clock.
#[derive(Debug, Default)]
pub struct ScoreSession {
    pub card: Scorecard,
    pub countdown: Countdown,
}

impl ScoreSession {
    /// Makes the countdown task agree with `clock.running`.
    fn sync_countdown(&mut self, shared: &Arc<Mutex<ScoreSession>>, slot: &Slot) {
        let clock = &mut self.card.game.clock;
        if clock.remaining == 0 {
            clock.running = false;
        }
        if clock.running {
            if !self.countdown.is_ticking() {
                self.countdown.start(Arc::clone(shared), slot.clone());
            }
        } else {
            self.countdown.cancel();
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub passenger: Arc<Mutex<PassengerState>>,
    pub passenger_slot: Slot,
    pub scorecard: Arc<Mutex<ScoreSession>>,
    pub scorecard_slot: Slot,
}

impl AppState {
    pub fn new(
        passenger: PassengerState,
        passenger_slot: Slot,
        card: Scorecard,
        scorecard_slot: Slot,
    ) -> Self {
        Self {
            passenger: Arc::new(Mutex::new(passenger)),
            passenger_slot,
            scorecard: Arc::new(Mutex::new(ScoreSession {
                card,
                countdown: Countdown::default(),
            })),
            scorecard_slot,
        }
    }

    pub async fn load(config: &Config) -> Self {
        let passenger_path = config.passenger_path();
        let scorecard_path = config.scorecard_path();

        let mut passenger: PassengerState = load_state(&passenger_path).await;
        passenger.recompute_total();

        let mut card: Scorecard = load_state(&scorecard_path).await;
        card.game.clock.running = false;

        info!(
            entries = passenger.entries.len(),
            plays = card.game.history.len(),
            "state loaded"
        );

        Self::new(
            passenger,
            Slot::spawn(passenger_path),
            card,
            Slot::spawn(scorecard_path),
        )
    }

    pub async fn passenger_view(&self) -> PassengerView {
        let state = self.passenger.lock().await;
        build_passenger_view(&state)
    }

    pub async fn passenger_command(&self, command: PassengerCommand) -> PassengerView {
        let mut state = self.passenger.lock().await;
        command.apply(&mut state);
        debug!(?command, count = state.count, total = state.total, "passenger command");
        self.passenger_slot.save(&*state);
        build_passenger_view(&state)
    }

    /// Applies every field present in `request`. Refused fields keep their
    /// previous value and are listed in the returned view.
    pub async fn passenger_config(&self, request: PassengerConfigRequest) -> PassengerView {
        let mut state = self.passenger.lock().await;
        let mut rejected: Vec<Rejected> = Vec::new();

        if let Some(station) = request.station.as_deref() {
            state.set_station(station);
        }
        if let Some(goal) = request.goal.as_deref() {
            if let Err(err) = state.set_goal(goal) {
                rejected.push(err);
            }
        }
        if let Some(line) = request.line.as_deref() {
            if let Err(err) = state.set_line(line) {
                rejected.push(err);
            }
        }

        for err in &rejected {
            debug!("{err}");
        }
        self.passenger_slot.save(&*state);

        let mut view = build_passenger_view(&state);
        view.rejected = rejected.iter().map(|err| err.field.to_string()).collect();
        view
    }

    pub async fn passenger_export(&self) -> Option<CsvExport> {
        let state = self.passenger.lock().await;
        passenger_csv(&state)
    }

    pub async fn scorecard_view(&self) -> ScorecardView {
        let session = self.scorecard.lock().await;
        build_scorecard_view(&session.card)
    }

    pub async fn add_points(&self, side: Side, points: u8) -> Result<ScorecardView, Rejected> {
        let mut session = self.scorecard.lock().await;
        session.card.add_points(side, points)?;
        self.scorecard_slot.save(&session.card);
        Ok(build_scorecard_view(&session.card))
    }

    pub async fn scorecard_command(&self, command: ScoreCommand) -> ScorecardView {
        let mut session = self.scorecard.lock().await;
        match command {
            ScoreCommand::Undo => {
                if session.card.undo() {
                    session.sync_countdown(&self.scorecard, &self.scorecard_slot);
                }
            }
            ScoreCommand::ToggleClock => {
                session.card.game.toggle_running();
                session.sync_countdown(&self.scorecard, &self.scorecard_slot);
            }
            ScoreCommand::ResetClock => {
                session.countdown.cancel();
                session.card.game.reset_clock();
            }
            ScoreCommand::AdvanceQuarter => {
                session.countdown.cancel();
                session.card.game.advance_quarter();
            }
            ScoreCommand::NewGame => {
                session.countdown.cancel();
                session.card.new_game();
            }
        }
        debug!(?command, quarter = session.card.game.quarter, "scorecard command");
        self.scorecard_slot.save(&session.card);
        build_scorecard_view(&session.card)
    }

    pub async fn scorecard_config(&self, request: ScorecardConfigRequest) -> ScorecardView {
        let mut session = self.scorecard.lock().await;
        if let Some(name) = request.home_name.as_deref() {
            session.card.set_team_name(Side::Home, name);
        }
        if let Some(name) = request.away_name.as_deref() {
            session.card.set_team_name(Side::Away, name);
        }
        self.scorecard_slot.save(&session.card);
        build_scorecard_view(&session.card)
    }

    pub async fn scorecard_export(&self) -> Option<CsvExport> {
        let session = self.scorecard.lock().await;
        scorecard_csv(&session.card)
    }

    /// Final blocking save of both tallies, used on shutdown.
    pub async fn flush(&self) -> Result<(), AppError> {
        {
            let state = self.passenger.lock().await;
            self.passenger_slot.flush(&*state).await?;
        }
        let mut session = self.scorecard.lock().await;
        session.countdown.cancel();
        self.scorecard_slot.flush(&session.card).await
    }
}
