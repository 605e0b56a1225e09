use crate::models::{PassengerView, ScorecardView, Side, Theme};
use crate::scorecard::{format_clock, play_note};

pub fn render_passenger(view: &PassengerView) -> String {
    let state = &view.state;
    let metrics = &view.metrics;

    let history: String = state
        .entries
        .iter()
        .rev()
        .map(|entry| {
            format!(
                "<li><div><strong>{} passengers</strong><span>{} &bull; {} Line</span></div><span>{}</span></li>",
                entry.value,
                escape_html(&entry.station),
                escape_html(&entry.line),
                entry.time.format("%H:%M"),
            )
        })
        .collect();

    let last_entry = metrics
        .last_entry_time
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--".to_string());
    let body_class = match state.theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };

    PASSENGER_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{THEME}}", body_class)
        .replace("{{STATION}}", &escape_html(&state.station))
        .replace("{{LINE}}", &escape_html(&state.line))
        .replace("{{SHIFT_START}}", &state.shift_start.format("%b %-d %H:%M").to_string())
        .replace("{{COUNT}}", &state.count.to_string())
        .replace("{{TOTAL}}", &state.total.to_string())
        .replace("{{GOAL}}", &state.goal.to_string())
        .replace("{{PROGRESS}}", &format!("{:.1}", metrics.progress_percent))
        .replace("{{AVERAGE}}", &metrics.average_per_entry.to_string())
        .replace("{{ENTRIES}}", &metrics.entry_count.to_string())
        .replace("{{LAST_ENTRY}}", &last_entry)
        .replace("{{TREND_CLASS}}", &format!("{:?}", metrics.trend).to_lowercase())
        .replace("{{TREND}}", &metrics.trend_label)
        .replace("{{HISTORY}}", &history)
}

pub fn render_scorecard(view: &ScorecardView) -> String {
    let state = &view.state;

    let history: String = state
        .history
        .iter()
        .rev()
        .map(|play| {
            format!(
                "<li><div><strong>{} +{}</strong><span>{}</span></div><span>Q{} &bull; {}</span></li>",
                escape_html(&state.team(play.side).name),
                play.points,
                play_note(play.points),
                play.quarter,
                format_clock(play.clock_remaining),
            )
        })
        .collect();

    let possession = escape_html(&state.team(state.possession).name);
    let clock_button = if state.clock.running { "Stop clock" } else { "Start clock" };

    SCORECARD_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{HOME_NAME}}", &escape_html(&state.home.name))
        .replace("{{AWAY_NAME}}", &escape_html(&state.away.name))
        .replace("{{HOME_SCORE}}", &state.home.score.to_string())
        .replace("{{AWAY_SCORE}}", &state.away.score.to_string())
        .replace("{{HOME_BUTTONS}}", &point_buttons(Side::Home))
        .replace("{{AWAY_BUTTONS}}", &point_buttons(Side::Away))
        .replace("{{QUARTER}}", &state.quarter.to_string())
        .replace("{{CLOCK}}", &view.metrics.clock_display)
        .replace("{{CLOCK_BUTTON}}", clock_button)
        .replace("{{RUNNING}}", if state.clock.running { "true" } else { "false" })
        .replace("{{POSSESSION}}", &possession)
        .replace("{{UNDO_DEPTH}}", &view.metrics.undo_depth.to_string())
        .replace("{{HISTORY}}", &history)
}

fn point_buttons(side: Side) -> String {
    let side = match side {
        Side::Home => "home",
        Side::Away => "away",
    };
    (1..=3)
        .map(|points| {
            format!(
                r#"<form method="post" action="/scorecard/points/{side}/{points}"><button class="btn-add" type="submit">+{points}</button></form>"#
            )
        })
        .collect()
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // Keeps stored text from being read as a template placeholder.
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const STYLE: &str = r#"
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    body.dark {
      --bg-1: #14181d;
      --bg-2: #2f4858;
      --ink: #f3efe8;
      --card: rgba(28, 33, 40, 0.9);
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 0;
      opacity: 0.7;
    }

    .panel, .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .stat {
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(127, 127, 127, 0.2);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      opacity: 0.7;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
    }

    .count {
      font-size: 4rem;
      font-weight: 600;
      text-align: center;
    }

    .progress {
      height: 10px;
      border-radius: 999px;
      background: rgba(127, 127, 127, 0.2);
      overflow: hidden;
    }

    .progress div {
      height: 100%;
      background: var(--accent);
    }

    .trend {
      padding: 6px 12px;
      border-radius: 999px;
      justify-self: start;
    }

    .trend.surge { background: rgba(255, 95, 109, 0.2); color: #ff5f6d; }
    .trend.healthy { background: rgba(39, 197, 128, 0.2); color: #27c580; }
    .trend.steady { background: rgba(255, 183, 3, 0.2); color: #ffb703; }

    form { margin: 0; }

    button {
      border: none;
      border-radius: 999px;
      padding: 14px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      width: 100%;
    }

    .btn-add { background: var(--accent); color: white; }
    .btn-sub { background: var(--accent-2); color: white; }

    ul.history {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    ul.history li {
      display: flex;
      justify-content: space-between;
      padding: 12px 16px;
      border-radius: 14px;
      border: 1px solid rgba(127, 127, 127, 0.2);
    }

    ul.history li span {
      display: block;
      opacity: 0.7;
    }
"#;

const PASSENGER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Passenger Counter</title>
  <style>{{STYLE}}</style>
</head>
<body class="{{THEME}}">
  <main class="app">
    <header>
      <h1>{{STATION}}</h1>
      <p class="subtitle">{{LINE}} Line &bull; shift started {{SHIFT_START}} &bull; <a href="/scorecard">scorecard</a></p>
    </header>
    <div class="count" id="count">{{COUNT}}</div>
    <section class="actions">
      <form method="post" action="/passenger/increment"><button class="btn-add" type="submit">+1</button></form>
      <form method="post" action="/passenger/decrement"><button class="btn-sub" type="submit">-1</button></form>
      <form method="post" action="/passenger/quick_add"><button class="btn-add" type="submit">+5</button></form>
      <form method="post" action="/passenger/commit"><button class="btn-sub" type="submit">Save entry</button></form>
      <form method="post" action="/passenger/reset"><button class="btn-sub" type="submit">Reset</button></form>
      <form method="post" action="/passenger/undo"><button class="btn-sub" type="submit">Undo</button></form>
    </section>
    <section class="panel">
      <div class="stat"><span class="label">Shift total</span><span class="value">{{TOTAL}}</span></div>
      <div class="stat"><span class="label">Goal</span><span class="value">{{GOAL}}</span></div>
      <div class="stat"><span class="label">Average</span><span class="value">{{AVERAGE}}</span></div>
      <div class="stat"><span class="label">Entries</span><span class="value">{{ENTRIES}}</span></div>
      <div class="stat"><span class="label">Last entry</span><span class="value">{{LAST_ENTRY}}</span></div>
    </section>
    <div class="progress"><div style="width: {{PROGRESS}}%"></div></div>
    <span class="trend {{TREND_CLASS}}">{{TREND}}</span>
    <form class="panel" method="post" action="/passenger-config">
      <input name="station" value="{{STATION}}" aria-label="Station" />
      <input name="line" value="{{LINE}}" aria-label="Line" />
      <input name="goal" value="{{GOAL}}" aria-label="Goal" />
      <button class="btn-sub" type="submit">Apply</button>
    </form>
    <section class="actions">
      <form method="get" action="/api/passenger/export"><button class="btn-sub" type="submit">Export CSV</button></form>
      <form method="post" action="/passenger/clear_history"><button class="btn-sub" type="submit">Clear history</button></form>
      <form method="post" action="/passenger/toggle_theme"><button class="btn-sub" type="submit">Toggle theme</button></form>
    </section>
    <ul class="history">{{HISTORY}}</ul>
  </main>
  <script>
    const send = (action) =>
      fetch('/api/passenger/command', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ action }),
      }).then(() => window.location.reload());

    document.addEventListener('keydown', (event) => {
      if (event.target instanceof HTMLInputElement) return;
      if (event.key === 'Enter') send('commit');
      if (event.key === '+') send('increment');
      if (event.key === '-') send('decrement');
    });
  </script>
</body>
</html>
"#;

const SCORECARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Scorecard</title>
  <style>{{STYLE}}</style>
</head>
<body class="light">
  <main class="app">
    <header>
      <h1>{{HOME_NAME}} vs {{AWAY_NAME}}</h1>
      <p class="subtitle">Quarter {{QUARTER}} &bull; possession {{POSSESSION}} &bull; <a href="/">passenger counter</a></p>
    </header>
    <section class="panel">
      <div class="stat"><span class="label">{{HOME_NAME}}</span><span class="value">{{HOME_SCORE}}</span></div>
      <div class="stat"><span class="label">Clock</span><span class="value" id="clock">{{CLOCK}}</span></div>
      <div class="stat"><span class="label">{{AWAY_NAME}}</span><span class="value">{{AWAY_SCORE}}</span></div>
    </section>
    <section class="actions">{{HOME_BUTTONS}}</section>
    <section class="actions">{{AWAY_BUTTONS}}</section>
    <section class="actions">
      <form method="post" action="/scorecard/toggle_clock"><button class="btn-sub" type="submit">{{CLOCK_BUTTON}}</button></form>
      <form method="post" action="/scorecard/reset_clock"><button class="btn-sub" type="submit">Reset clock</button></form>
      <form method="post" action="/scorecard/advance_quarter"><button class="btn-sub" type="submit">Next quarter</button></form>
      <form method="post" action="/scorecard/undo"><button class="btn-sub" type="submit">Undo ({{UNDO_DEPTH}})</button></form>
    </section>
    <form class="panel" method="post" action="/scorecard-config">
      <input name="home_name" value="{{HOME_NAME}}" aria-label="Home team" />
      <input name="away_name" value="{{AWAY_NAME}}" aria-label="Away team" />
      <button class="btn-sub" type="submit">Rename</button>
    </form>
    <section class="actions">
      <form method="get" action="/api/scorecard/export"><button class="btn-sub" type="submit">Export CSV</button></form>
      <form method="post" action="/scorecard/new_game"><button class="btn-sub" type="submit">New game</button></form>
    </section>
    <ul class="history">{{HISTORY}}</ul>
  </main>
  <script>
    if ({{RUNNING}}) {
      const clock = document.getElementById('clock');
      setInterval(async () => {
        const response = await fetch('/api/scorecard');
        if (!response.ok) return;
        const view = await response.json();
        clock.textContent = view.metrics.clock_display;
        if (!view.state.clock.running) window.location.reload();
      }, 1000);
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassengerState, Scorecard};
    use crate::stats::{build_passenger_view, build_scorecard_view};

    #[test]
    fn passenger_page_escapes_station_names() {
        let mut state = PassengerState::default();
        state.set_station("<b>Pier</b>");
        state.quick_add();
        state.commit();
        let html = render_passenger(&build_passenger_view(&state));
        assert!(html.contains("&lt;b&gt;Pier&lt;/b&gt;"));
        assert!(!html.contains("<b>Pier</b>"));
        assert!(html.contains("5 passengers"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn placeholder_text_in_names_is_shown_verbatim() {
        let mut state = PassengerState::default();
        state.set_station("{{TOTAL}} Pier");
        state.set_line("{{HISTORY}}").unwrap();
        state.count = 42;
        state.commit();
        let html = render_passenger(&build_passenger_view(&state));
        assert!(html.contains("<h1>&#123;&#123;TOTAL&#125;&#125; Pier</h1>"));
        assert!(!html.contains("<h1>42 Pier</h1>"));
        assert!(html.contains("&#123;&#123;HISTORY&#125;&#125; Line"));

        let mut card = Scorecard::default();
        card.set_team_name(Side::Home, "{{AWAY_SCORE}}");
        card.add_points(Side::Away, 3).unwrap();
        let html = render_scorecard(&build_scorecard_view(&card));
        assert!(html.contains("<h1>&#123;&#123;AWAY_SCORE&#125;&#125; vs Away</h1>"));
    }

    #[test]
    fn scorecard_page_shows_scores_and_clock() {
        let mut card = Scorecard::default();
        card.add_points(Side::Away, 2).unwrap();
        let html = render_scorecard(&build_scorecard_view(&card));
        assert!(html.contains("12:00"));
        assert!(html.contains("/scorecard/points/home/3"));
        assert!(html.contains("Field goal"));
        assert!(!html.contains("{{"));
    }
}
