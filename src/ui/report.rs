use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::app::state::{AppState, ReportTab};
use crate::domain::analysis::trend_sentence;
use crate::domain::comfort::ComfortBand;
use crate::domain::score::Verdict;
use crate::pipeline::AnalysisReport;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Report");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = &state.last_error {
        let message = Paragraph::new(format!("⚠ {error}"))
            .style(Style::default().fg(Color::LightRed))
            .wrap(Wrap { trim: true });
        frame.render_widget(message, inner);
        return;
    }

    if state.analysis_in_flight {
        let loading = Paragraph::new("Analyzing years of data...")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, inner);
        return;
    }

    let Some(report) = &state.report else {
        let idle = Paragraph::new(
            "Configure the event on the left and press Enter to generate a report.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
        frame.render_widget(idle, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    render_header(frame, chunks[0], report);
    render_tab_bar(frame, chunks[1], state.tab);
    match state.tab {
        ReportTab::Summary => render_summary(frame, chunks[2], report),
        ReportTab::Chart => render_chart(frame, chunks[2], report),
        ReportTab::Data => render_data(frame, chunks[2], report),
    }
}

fn render_header(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Report for {}", report.location_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} during the {}",
                report.target_date.format("%A, %B %-d"),
                report.time_of_day.name()
            ),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_tab_bar(frame: &mut Frame, area: Rect, tab: ReportTab) {
    let selected = match tab {
        ReportTab::Summary => 0,
        ReportTab::Chart => 1,
        ReportTab::Data => 2,
    };
    let tabs = Tabs::new(vec!["Summary", "Chart", "Data"])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn render_summary(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let total = report.score.total();
    let verdict = report.score.verdict();
    let verdict_color = match verdict {
        Verdict::Excellent => Color::Green,
        Verdict::Good => Color::Yellow,
        Verdict::Risky => Color::LightRed,
    };
    let comfort = report.comfort_band();
    let comfort_color = match comfort {
        ComfortBand::Comfortable => Color::Green,
        ComfortBand::Manageable => Color::Yellow,
        ComfortBand::Challenging => Color::LightRed,
    };
    let profile = &report.profile;

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("  {:.0} ", total.round()),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(verdict.label(), Style::default().fg(verdict_color)),
            Span::raw("  — suitability score"),
        ]),
        Line::from(format!(
            "    temperature {:.0} · precipitation {:.0} · wind {:.0}",
            report.score.temperature, report.score.precipitation, report.score.wind
        )),
        Line::default(),
        Line::from("Predicted conditions"),
        Line::from(format!("  Avg temperature   {:.1}°C", profile.avg_temp)),
        Line::from(format!("  Avg humidity      {:.1}%", profile.avg_humidity)),
        Line::from(format!(
            "  Rain probability  {:.0}%",
            profile.rain_probability
        )),
        Line::from(format!(
            "  Snow probability  {:.0}%",
            profile.snow_probability
        )),
        Line::from(format!("  Avg max wind      {:.1} km/h", profile.avg_max_wind)),
        Line::default(),
        Line::from(vec![
            Span::raw("Comfort: "),
            Span::styled(comfort.label(), Style::default().fg(comfort_color)),
            Span::raw(format!(" — feels like {:.1}°C", profile.avg_comfort)),
        ]),
        Line::from(trend_sentence(profile.temp_trend)),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_chart(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    // Bars cannot carry negatives; shift by the coldest year and label the
    // real values.
    let min_temp = report
        .profile
        .yearly
        .iter()
        .map(|y| y.temp_mean)
        .fold(f64::INFINITY, f64::min)
        .min(0.0);

    let bars: Vec<Bar> = report
        .profile
        .yearly
        .iter()
        .map(|y| {
            Bar::default()
                .value(((y.temp_mean - min_temp) * 10.0).round() as u64)
                .text_value(format!("{:.0}", y.temp_mean))
                .label(Line::from(format!("'{:02}", y.year % 100)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title("Mean temperature by year (°C)"),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

fn render_data(frame: &mut Frame, area: Rect, report: &AnalysisReport) {
    let header = Row::new(vec![
        "Year", "Temp", "Feels", "Hum %", "Wind", "Rain", "Snow",
    ])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = report
        .profile
        .yearly
        .iter()
        .map(|y| {
            Row::new(vec![
                y.year.to_string(),
                format!("{:.1}", y.temp_mean),
                format!("{:.1}", y.comfort_mean),
                format!("{:.1}", y.humidity_mean),
                format!("{:.1}", y.wind_max),
                format!("{:.2}", y.rain_sum),
                format!("{:.2}", y.snow_sum),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, area);
}
