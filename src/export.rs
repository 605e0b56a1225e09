use crate::models::{PassengerState, Scorecard};
use crate::scorecard::{format_clock, play_note};
use chrono::SecondsFormat;

pub const PASSENGER_HEADER: [&str; 4] = ["Value", "Station", "Line", "Time"];
pub const SCORECARD_HEADER: [&str; 5] = ["Quarter", "Time", "Team", "Points", "Note"];

/// A rendered CSV document and the file name it should be offered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

pub fn passenger_csv(state: &PassengerState) -> Option<CsvExport> {
    if state.entries.is_empty() {
        return None;
    }

    let header = PASSENGER_HEADER.iter().map(|cell| cell.to_string()).collect();
    let mut rows: Vec<Vec<String>> = vec![header];
    for entry in &state.entries {
        rows.push(vec![
            entry.value.to_string(),
            entry.station.clone(),
            entry.line.clone(),
            entry.time.to_rfc3339_opts(SecondsFormat::Millis, true),
        ]);
    }

    Some(CsvExport {
        filename: format!("{}_log.csv", underscored(&state.station)),
        body: to_csv(&rows),
    })
}

pub fn scorecard_csv(card: &Scorecard) -> Option<CsvExport> {
    let game = &card.game;
    if game.history.is_empty() {
        return None;
    }

    let header = SCORECARD_HEADER.iter().map(|cell| cell.to_string()).collect();
    let mut rows: Vec<Vec<String>> = vec![header];
    for play in &game.history {
        rows.push(vec![
            play.quarter.to_string(),
            format_clock(play.clock_remaining),
            game.team(play.side).name.clone(),
            play.points.to_string(),
            play_note(play.points).to_string(),
        ]);
    }

    Some(CsvExport {
        filename: format!(
            "{}_vs_{}_scorecard.csv",
            underscored(&game.home.name),
            underscored(&game.away.name)
        ),
        body: to_csv(&rows),
    })
}

fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|cell| quote(cell)).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Joins whitespace runs with `_` and swaps anything that is not safe inside a
/// quoted `Content-Disposition` file name for `_` as well.
fn underscored(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|ch| match ch {
                    '"' | '\\' | '/' => '_',
                    ch if ch.is_ascii_graphic() => ch,
                    _ => '_',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_")
}
