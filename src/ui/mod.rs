pub mod form;
pub mod report;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::AppState;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    if area.width < 60 || area.height < 20 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 60x20.")
            .block(Block::default().borders(Borders::ALL).title("weather-compass"));
        frame.render_widget(warning, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(rows[0]);

    form::render(frame, columns[0], state);
    report::render(frame, columns[1], state);
    render_status_line(frame, rows[1], state);
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if let Some(status) = &state.status {
        status.clone()
    } else if state.analysis_in_flight {
        format!("Analyzing {} years of data...", state.years_of_data)
    } else {
        "Tab: next field  ←/→: adjust  Enter: analyze  ^T: tab  ^E: export CSV  Esc: quit"
            .to_string()
    };

    let style = if state.analysis_in_flight {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(Line::from(text)).style(style), area);
}
