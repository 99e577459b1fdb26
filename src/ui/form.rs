use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::state::{AppState, FormField};
use crate::domain::score::EVENT_PRESETS;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Plan");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = vec![
        field_line(state, FormField::Location, "Location", location_value(state)),
        field_line(state, FormField::Date, "Date", state.date_input.clone()),
        field_line(
            state,
            FormField::TimeOfDay,
            "Time of day",
            state.time_of_day.label().to_string(),
        ),
        field_line(state, FormField::Preset, "Preset", preset_value(state)),
        field_line(
            state,
            FormField::TempMin,
            "Temp min",
            format!("{:.0}°C", state.preferences.temp_min),
        ),
        field_line(
            state,
            FormField::TempMax,
            "Temp max",
            format!("{:.0}°C", state.preferences.temp_max),
        ),
        field_line(state, FormField::Rain, "Rain", rain_value(state)),
        field_line(state, FormField::Wind, "Wind", wind_value(state)),
        field_line(
            state,
            FormField::Years,
            "Years of data",
            state.years_of_data.to_string(),
        ),
    ];

    frame.render_widget(Paragraph::new(lines), inner);

    if state.show_suggestions {
        render_suggestions(frame, inner, state);
    }
}

fn field_line(state: &AppState, field: FormField, label: &str, value: String) -> Line<'static> {
    let focused = state.focus == field;
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused && matches!(field, FormField::Location | FormField::Date) {
        "▏"
    } else {
        ""
    };

    Line::from(vec![
        Span::styled(format!("{marker}{label:<14}"), label_style),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn location_value(state: &AppState) -> String {
    state.location_input.clone()
}

fn preset_value(state: &AppState) -> String {
    match state.preset_index {
        Some(idx) => EVENT_PRESETS[idx].name.to_string(),
        None => "—".to_string(),
    }
}

fn rain_value(state: &AppState) -> String {
    use crate::domain::score::RainPreference::*;
    match state.preferences.rain {
        AvoidRain => "Avoid rain",
        DontMindRain => "Don't mind rain",
        PreferSnow => "Prefer snow",
    }
    .to_string()
}

fn wind_value(state: &AppState) -> String {
    use crate::domain::score::WindPreference::*;
    match state.preferences.wind {
        Low => "Low (≤15 km/h)",
        Moderate => "Moderate (≤30 km/h)",
        DoesNotMatter => "Doesn't matter",
    }
    .to_string()
}

fn render_suggestions(frame: &mut Frame, form_area: Rect, state: &AppState) {
    let height = (state.suggestions.len() as u16 + 2).min(7);
    let popup = Rect {
        x: form_area.x + 2,
        y: form_area.y + 1,
        width: form_area.width.saturating_sub(2),
        height,
    };

    let items: Vec<ListItem> = state
        .suggestions
        .iter()
        .map(|place| ListItem::new(place.detailed_name()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Suggestions"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    list_state.select(Some(state.suggestion_selected));

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut list_state);
}
