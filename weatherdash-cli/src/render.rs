//! Text rendering of the conditions card and the trend chart.

use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone};
use ratatui::{
    buffer::{Buffer, Cell},
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Widget},
};
use weatherdash_core::{DailyAverage, QueryState, View, WeatherSnapshot};

pub const NO_CHART: &str = "No data to display chart.";
pub const CHART_TITLE: &str = "Weather Data for the Last 7 Days";
pub const TEMPERATURE_LEGEND: &str = "Temperature (°C)";
pub const WIND_LEGEND: &str = "Wind Speed (m/s)";

const CHART_WIDTH: u16 = 72;
const CHART_HEIGHT: u16 = 20;

/// Render whatever the state currently holds.
pub fn render_state(state: &QueryState) -> String {
    match state.view() {
        View::Idle => String::new(),
        View::Loading => "Loading...\n".to_string(),
        View::Failed(msg) => format!("error: {msg}\n"),
        View::Loaded(report) => {
            let mut out = render_card(&report.snapshot);
            out.push('\n');
            out.push_str(&render_chart(Some(&report.forecast)));
            out
        }
    }
}

/// Current-conditions card.
pub fn render_card(snapshot: &WeatherSnapshot) -> String {
    render_card_in(snapshot, &Local)
}

fn render_card_in<Tz>(snapshot: &WeatherSnapshot, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let place = if snapshot.country.is_empty() {
        snapshot.location_name.clone()
    } else {
        format!("{}, {}", snapshot.location_name, snapshot.country)
    };

    let mut out = String::new();
    let _ = writeln!(out, "{place}");
    let _ = writeln!(out, "  {}°C", snapshot.temperature_c.round() as i64);
    let _ = writeln!(out, "  {}", snapshot.condition);
    let _ = writeln!(out, "  💧 Humidity: {}%", snapshot.humidity_pct);
    let _ = writeln!(out, "  🌬 Wind: {} m/s", snapshot.wind_speed_mps);
    let _ = writeln!(out, "  Observed {}", local_time(snapshot.observation_time, tz));
    out
}

fn local_time<Tz>(t: DateTime<chrono::Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    t.with_timezone(tz).format("%a %H:%M").to_string()
}

/// Dual-series line chart of the daily averages, keyed by day label.
pub fn render_chart(days: Option<&[DailyAverage]>) -> String {
    let days = match days {
        Some(days) if !days.is_empty() => days,
        _ => return format!("{NO_CHART}\n"),
    };

    let temps: Vec<(f64, f64)> =
        days.iter().enumerate().map(|(i, d)| (i as f64, d.temperature_c)).collect();
    let winds: Vec<(f64, f64)> =
        days.iter().enumerate().map(|(i, d)| (i as f64, d.wind_speed_mps)).collect();

    // day i sits on x = i and labels are spread evenly over the same range
    let x_max = days.len().saturating_sub(1).max(1) as f64;
    let mut x_labels: Vec<String> = days.iter().map(|d| d.day.clone()).collect();
    if x_labels.len() == 1 {
        // the axis needs two labels to draw any
        x_labels.push(String::new());
    }

    let (lo, hi) = value_bounds(days);

    let datasets = vec![
        Dataset::default()
            .name(TEMPERATURE_LEGEND)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&temps),
        Dataset::default()
            .name(WIND_LEGEND)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&winds),
    ];

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(CHART_TITLE))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([lo, hi]).labels(vec![
            format!("{lo:.0}"),
            format!("{:.0}", (lo + hi) / 2.0),
            format!("{hi:.0}"),
        ]))
        .legend_position(Some(LegendPosition::Top))
        .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));

    let area = Rect::new(0, 0, CHART_WIDTH, CHART_HEIGHT);
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_to_string(&buf)
}

/// One y range shared by both series, widened to whole units.
fn value_bounds(days: &[DailyAverage]) -> (f64, f64) {
    let (lo, hi) = days
        .iter()
        .flat_map(|d| [d.temperature_c, d.wind_speed_mps])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let (lo, hi) = (lo.floor(), hi.ceil());
    if hi - lo < 1.0 { (lo, lo + 1.0) } else { (lo, hi) }
}

fn buffer_to_string(buf: &Buffer) -> String {
    let width = usize::from(buf.area.width);
    let mut out = String::new();
    for row in buf.content.chunks(width) {
        let line: String = row.iter().map(Cell::symbol).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weatherdash_core::{Report, state::QueryKind};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "London".into(),
            country: "GB".into(),
            temperature_c: 11.62,
            humidity_pct: 81,
            wind_speed_mps: 4.63,
            condition: "light rain".into(),
            // Mon 2024-01-15 12:00 UTC
            observation_time: DateTime::<Utc>::from_timestamp(1_705_320_000, 0).unwrap(),
        }
    }

    fn day(label: &str, temp: f64, wind: f64) -> DailyAverage {
        DailyAverage { day: label.into(), temperature_c: temp, wind_speed_mps: wind, samples: 8 }
    }

    fn is_braille_dot(c: char) -> bool {
        ('\u{2801}'..='\u{28FF}').contains(&c)
    }

    #[test]
    fn card_rounds_temperature_and_lists_details() {
        let card = render_card_in(&snapshot(), &Utc);

        assert!(card.starts_with("London, GB\n"));
        assert!(card.contains("  12°C\n"));
        assert!(card.contains("light rain"));
        assert!(card.contains("Humidity: 81%"));
        assert!(card.contains("Wind: 4.63 m/s"));
        assert!(card.contains("Observed Mon 12:00"));
    }

    #[test]
    fn card_rounds_half_away_from_zero() {
        let mut s = snapshot();
        s.temperature_c = -2.5;

        assert!(render_card_in(&s, &Utc).contains("  -3°C\n"));
    }

    #[test]
    fn card_without_country_shows_only_name() {
        let mut s = snapshot();
        s.country.clear();

        assert!(render_card_in(&s, &Utc).starts_with("London\n"));
    }

    #[test]
    fn chart_placeholder_for_missing_or_empty_data() {
        assert_eq!(render_chart(None), format!("{NO_CHART}\n"));
        assert_eq!(render_chart(Some(&[])), format!("{NO_CHART}\n"));
    }

    #[test]
    fn chart_carries_title_and_both_legends() {
        let days = vec![day("Mon", 4.0, 2.0), day("Tue", 10.0, 6.0), day("Wed", 7.0, 4.0)];

        let chart = render_chart(Some(&days));

        assert!(chart.contains(CHART_TITLE));
        assert!(chart.contains(TEMPERATURE_LEGEND));
        assert!(chart.contains(WIND_LEGEND));
        assert_eq!(chart.lines().count(), usize::from(CHART_HEIGHT));
    }

    #[test]
    fn day_labels_run_along_the_category_axis_in_order() {
        let days = vec![day("Wed", 4.0, 2.0), day("Thu", 10.0, 6.0), day("Fri", 7.0, 4.0)];

        let chart = render_chart(Some(&days));
        let axis = chart
            .lines()
            .find(|l| l.contains("Wed") && l.contains("Thu") && l.contains("Fri"))
            .expect("one line holds every day label");

        let wed = axis.find("Wed").unwrap();
        let thu = axis.find("Thu").unwrap();
        let fri = axis.find("Fri").unwrap();
        assert!(wed < thu && thu < fri);
    }

    #[test]
    fn series_are_joined_across_days() {
        let days = vec![day("Mon", -5.0, 1.0), day("Tue", 15.0, 9.0), day("Wed", 3.0, 4.0)];

        let chart = render_chart(Some(&days));

        // two lines spanning the plot cover far more cells than six lone points
        let plotted = chart.chars().filter(|c| is_braille_dot(*c)).count();
        assert!(plotted > 20, "only {plotted} plotted cells:\n{chart}");
    }

    #[test]
    fn single_day_still_gets_its_label() {
        let chart = render_chart(Some(&[day("Sat", 3.0, 3.0)]));

        assert!(chart.contains("Sat"));
        assert!(chart.contains(TEMPERATURE_LEGEND));
    }

    #[test]
    fn both_series_share_one_value_range() {
        let days = vec![day("Mon", -5.2, 1.0), day("Tue", 15.4, 9.0)];
        assert_eq!(value_bounds(&days), (-6.0, 16.0));

        let flat = vec![day("Mon", 3.0, 3.0)];
        assert_eq!(value_bounds(&flat), (3.0, 4.0));
    }

    #[test]
    fn state_rendering_follows_the_view() {
        let mut state = QueryState::new();
        assert_eq!(render_state(&state), "");

        let id = state.begin(QueryKind::ByName);
        assert_eq!(render_state(&state), "Loading...\n");

        state.finish(id, Err("City not found".into()));
        assert_eq!(render_state(&state), "error: City not found\n");

        let id = state.begin(QueryKind::ByName);
        state.finish(id, Ok(Report { snapshot: snapshot(), forecast: vec![day("Mon", 1.0, 1.0)] }));
        let out = render_state(&state);
        assert!(out.starts_with("London, GB\n"));
        assert!(out.contains(CHART_TITLE));
    }
}
