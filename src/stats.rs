use crate::models::{
    Entry, Leader, PassengerMetrics, PassengerState, PassengerView, Scorecard, ScorecardMetrics,
    ScorecardView, Trend,
};
use crate::scorecard::format_clock;

const TREND_WINDOW: usize = 3;

pub fn average_per_entry(total: u64, entries: &[Entry]) -> u64 {
    if entries.is_empty() {
        return 0;
    }
    (total as f64 / entries.len() as f64).round() as u64
}

pub fn trend(entries: &[Entry]) -> Trend {
    let latest = &entries[entries.len().saturating_sub(TREND_WINDOW)..];
    let mean = if latest.is_empty() {
        0.0
    } else {
        latest.iter().map(|entry| entry.value as f64).sum::<f64>() / latest.len() as f64
    };

    if mean >= 20.0 {
        Trend::Surge
    } else if mean >= 10.0 {
        Trend::Healthy
    } else {
        Trend::Steady
    }
}

pub fn progress_percent(total: u64, goal: f64) -> f64 {
    if !goal.is_finite() || goal <= 0.0 {
        return 0.0;
    }
    let percent = total as f64 / goal * 100.0;
    if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) }
}

pub fn build_passenger_view(state: &PassengerState) -> PassengerView {
    let trend = trend(&state.entries);
    PassengerView {
        metrics: PassengerMetrics {
            average_per_entry: average_per_entry(state.total, &state.entries),
            entry_count: state.entries.len(),
            last_entry_time: state.entries.last().map(|entry| entry.time),
            progress_percent: progress_percent(state.total, state.goal),
            trend,
            trend_label: trend.label().to_string(),
        },
        state: state.clone(),
        rejected: Vec::new(),
    }
}

pub fn build_scorecard_view(card: &Scorecard) -> ScorecardView {
    let game = &card.game;
    let leader = match game.home.score.cmp(&game.away.score) {
        std::cmp::Ordering::Greater => Leader::Home,
        std::cmp::Ordering::Less => Leader::Away,
        std::cmp::Ordering::Equal => Leader::Tied,
    };

    ScorecardView {
        metrics: ScorecardMetrics {
            leader,
            margin: game.home.score.abs_diff(game.away.score),
            clock_display: format_clock(game.clock.remaining),
            undo_depth: card.undo_stack.len(),
        },
        state: game.clone(),
        rejected: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use chrono::Utc;

    fn entries(values: &[u64]) -> Vec<Entry> {
        values
            .iter()
            .map(|&value| Entry {
                value,
                station: "Downtown Hub".to_string(),
                line: "Orange".to_string(),
                time: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn average_is_zero_without_entries_and_rounds_otherwise() {
        assert_eq!(average_per_entry(0, &[]), 0);
        assert_eq!(average_per_entry(12, &entries(&[7, 5])), 6);
        assert_eq!(average_per_entry(7, &entries(&[3, 4])), 4);
        assert_eq!(average_per_entry(10, &entries(&[3, 3, 4])), 3);
    }

    #[test]
    fn trend_uses_last_three_entries() {
        assert_eq!(trend(&[]), Trend::Steady);
        assert_eq!(trend(&entries(&[9])), Trend::Steady);
        assert_eq!(trend(&entries(&[10])), Trend::Healthy);
        assert_eq!(trend(&entries(&[19, 20, 20])), Trend::Healthy);
        assert_eq!(trend(&entries(&[20, 20, 20])), Trend::Surge);
        // Old surge falls out of the window.
        assert_eq!(trend(&entries(&[90, 1, 2, 3])), Trend::Steady);
    }

    #[test]
    fn progress_stays_within_bounds() {
        assert_eq!(progress_percent(0, 120.0), 0.0);
        assert_eq!(progress_percent(60, 120.0), 50.0);
        assert_eq!(progress_percent(10_000, 120.0), 100.0);
        assert_eq!(progress_percent(u64::MAX, 10.0), 100.0);
        assert_eq!(progress_percent(50, 0.0), 0.0);
        assert_eq!(progress_percent(50, f64::NAN), 0.0);
        assert_eq!(progress_percent(50, -3.0), 0.0);
    }

    #[test]
    fn passenger_view_reports_metrics() {
        let mut state = PassengerState::default();
        for value in [12, 8, 25] {
            state.count = value;
            state.commit();
        }
        let view = build_passenger_view(&state);
        assert_eq!(view.metrics.entry_count, 3);
        assert_eq!(view.metrics.average_per_entry, 15);
        assert_eq!(view.metrics.trend, Trend::Healthy);
        assert_eq!(view.metrics.trend_label, "Healthy flow");
        assert_eq!(view.metrics.last_entry_time, Some(state.entries[2].time));
        assert!((view.metrics.progress_percent - 37.5).abs() < 1e-9);
    }

    #[test]
    fn scorecard_view_reports_leader() {
        let mut card = Scorecard::default();
        assert_eq!(build_scorecard_view(&card).metrics.leader, Leader::Tied);

        card.add_points(Side::Away, 3).unwrap();
        card.add_points(Side::Home, 1).unwrap();
        let view = build_scorecard_view(&card);
        assert_eq!(view.metrics.leader, Leader::Away);
        assert_eq!(view.metrics.margin, 2);
        assert_eq!(view.metrics.clock_display, "12:00");
        assert_eq!(view.metrics.undo_depth, 2);
    }
}
