use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lru::LruCache;
use tokio::sync::mpsc;

use crate::app::events::{AppEvent, schedule_suggest};
use crate::cli::Cli;
use crate::domain::export::write_csv;
use crate::domain::score::{
    EVENT_PRESETS, Preferences, RainPreference, TimeOfDay, WindPreference,
};
use crate::domain::series::{Coordinates, Place, parse_date};
use crate::pipeline::{AnalysisReport, AnalysisRequest, Clients, LocationQuery, run_analysis};

const SUGGEST_CACHE_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Location,
    Date,
    TimeOfDay,
    Preset,
    TempMin,
    TempMax,
    Rain,
    Wind,
    Years,
}

const FORM_ORDER: [FormField; 9] = [
    FormField::Location,
    FormField::Date,
    FormField::TimeOfDay,
    FormField::Preset,
    FormField::TempMin,
    FormField::TempMax,
    FormField::Rain,
    FormField::Wind,
    FormField::Years,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTab {
    Summary,
    Chart,
    Data,
}

impl ReportTab {
    pub fn next(self) -> Self {
        match self {
            Self::Summary => Self::Chart,
            Self::Chart => Self::Data,
            Self::Data => Self::Summary,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub focus: FormField,
    pub location_input: String,
    /// Coordinates given on the command line; cleared once the location
    /// text is edited.
    pub picked_point: Option<Coordinates>,
    pub date_input: String,
    pub time_of_day: TimeOfDay,
    pub preset_index: Option<usize>,
    pub preferences: Preferences,
    pub years_of_data: u32,
    pub suggestions: Vec<Place>,
    pub suggestion_selected: usize,
    pub show_suggestions: bool,
    pub suggest_token: u64,
    pub analysis_in_flight: bool,
    pub report: Option<AnalysisReport>,
    pub last_error: Option<String>,
    pub status: Option<String>,
    pub tab: ReportTab,
    suggest_cache: SuggestCache,
    clients: Clients,
}

/// Suggestion results keyed by query, bounded so a long session cannot grow
/// without limit.
struct SuggestCache(LruCache<String, Vec<Place>>);

impl SuggestCache {
    fn new() -> Self {
        Self(LruCache::new(
            NonZeroUsize::new(SUGGEST_CACHE_SIZE).expect("nonzero"),
        ))
    }

    fn get(&mut self, query: &str) -> Option<&Vec<Place>> {
        self.0.get(query)
    }

    fn put(&mut self, query: String, places: Vec<Place>) {
        self.0.put(query, places);
    }
}

impl std::fmt::Debug for SuggestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestCache")
            .field("len", &self.0.len())
            .finish()
    }
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        let picked_point = match (cli.lat, cli.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };
        let location_input = match picked_point {
            Some(coords) => coords.label(),
            None => cli.default_location(),
        };

        Self {
            running: true,
            focus: FormField::Location,
            location_input,
            picked_point,
            date_input: cli.target_date().format("%Y-%m-%d").to_string(),
            time_of_day: cli.time_of_day(),
            preset_index: None,
            preferences: cli.preferences(),
            years_of_data: cli.years,
            suggestions: Vec::new(),
            suggestion_selected: 0,
            show_suggestions: false,
            suggest_token: 0,
            analysis_in_flight: false,
            report: None,
            last_error: None,
            status: None,
            tab: ReportTab::Summary,
            suggest_cache: SuggestCache::new(),
            clients: Clients::from_cli(cli),
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match event {
            AppEvent::Input(input) => self.handle_input(input, tx).await?,
            AppEvent::SuggestDebounced { token, query } => {
                self.handle_suggest_debounced(token, query, tx);
            }
            AppEvent::SuggestionsReady {
                token,
                query,
                places,
            } => self.handle_suggestions_ready(token, query, places),
            AppEvent::AnalysisFinished(result) => self.handle_analysis_finished(*result),
            AppEvent::Quit => self.running = false,
        }
        Ok(())
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
        {
            self.handle_key_press(key, tx).await?;
        }
        Ok(())
    }

    async fn handle_key_press(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.handle_control_key(key.code, tx).await;
        }

        match key.code {
            KeyCode::Esc => {
                if self.show_suggestions {
                    self.close_suggestions();
                } else {
                    tx.send(AppEvent::Quit).await?;
                }
            }
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(-1),
            KeyCode::Enter => {
                if self.show_suggestions && self.focus == FormField::Location {
                    self.accept_suggestion();
                } else {
                    self.start_analysis(tx);
                }
            }
            KeyCode::Up if self.show_suggestions => {
                self.suggestion_selected = self.suggestion_selected.saturating_sub(1);
            }
            KeyCode::Down if self.show_suggestions => {
                if self.suggestion_selected + 1 < self.suggestions.len() {
                    self.suggestion_selected += 1;
                }
            }
            KeyCode::Left => self.adjust_focused_field(-1),
            KeyCode::Right => self.adjust_focused_field(1),
            KeyCode::Backspace => self.handle_backspace(tx),
            KeyCode::Char(c) => self.handle_char(c, tx),
            _ => {}
        }
        Ok(())
    }

    async fn handle_control_key(
        &mut self,
        code: KeyCode,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match code {
            KeyCode::Char('c' | 'C') => tx.send(AppEvent::Quit).await?,
            KeyCode::Char('e' | 'E') => self.export_csv(),
            KeyCode::Char('t' | 'T') => self.tab = self.tab.next(),
            _ => {}
        }
        Ok(())
    }

    fn handle_char(&mut self, c: char, tx: &mpsc::Sender<AppEvent>) {
        match self.focus {
            FormField::Location => {
                self.location_input.push(c);
                self.location_edited(tx);
            }
            FormField::Date if c.is_ascii_digit() || c == '-' => {
                self.date_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_backspace(&mut self, tx: &mpsc::Sender<AppEvent>) {
        match self.focus {
            FormField::Location => {
                self.location_input.pop();
                self.location_edited(tx);
            }
            FormField::Date => {
                self.date_input.pop();
            }
            _ => {}
        }
    }

    /// Every edit invalidates outstanding lookups: the token moves on and a
    /// fresh debounce timer starts.
    fn location_edited(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.picked_point = None;
        self.suggest_token += 1;
        self.close_suggestions();
        schedule_suggest(tx.clone(), self.suggest_token, self.location_input.clone());
    }

    fn handle_suggest_debounced(
        &mut self,
        token: u64,
        query: String,
        tx: &mpsc::Sender<AppEvent>,
    ) {
        if token != self.suggest_token {
            return; // superseded by a newer keystroke
        }
        if let Some(cached) = self.suggest_cache.get(&query).cloned() {
            self.install_suggestions(cached);
            return;
        }

        let geocode = self.clients.geocode.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let places = geocode.suggest(&query).await.unwrap_or_default();
            let _ = tx2
                .send(AppEvent::SuggestionsReady {
                    token,
                    query,
                    places,
                })
                .await;
        });
    }

    fn handle_suggestions_ready(&mut self, token: u64, query: String, places: Vec<Place>) {
        self.suggest_cache.put(query, places.clone());
        if token != self.suggest_token {
            return; // stale response, a newer query is in charge
        }
        self.install_suggestions(places);
    }

    fn install_suggestions(&mut self, places: Vec<Place>) {
        self.show_suggestions = !places.is_empty();
        self.suggestions = places;
        self.suggestion_selected = 0;
    }

    fn close_suggestions(&mut self) {
        self.show_suggestions = false;
        self.suggestions.clear();
        self.suggestion_selected = 0;
    }

    fn accept_suggestion(&mut self) {
        if let Some(place) = self.suggestions.get(self.suggestion_selected) {
            self.location_input = place.display_name();
            self.picked_point = None;
        }
        self.close_suggestions();
        // Accepting a pick must not resurrect an older in-flight lookup.
        self.suggest_token += 1;
    }

    fn cycle_focus(&mut self, step: i32) {
        let idx = FORM_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as i32;
        let len = FORM_ORDER.len() as i32;
        self.focus = FORM_ORDER[((idx + step).rem_euclid(len)) as usize];
        self.close_suggestions();
    }

    fn adjust_focused_field(&mut self, step: i32) {
        match self.focus {
            FormField::TimeOfDay => {
                self.time_of_day = cycle_time_of_day(self.time_of_day, step);
            }
            FormField::Preset => self.cycle_preset(step),
            FormField::TempMin => {
                self.preferences.temp_min =
                    (self.preferences.temp_min + f64::from(step)).min(self.preferences.temp_max);
            }
            FormField::TempMax => {
                self.preferences.temp_max =
                    (self.preferences.temp_max + f64::from(step)).max(self.preferences.temp_min);
            }
            FormField::Rain => {
                self.preferences.rain = cycle_rain(self.preferences.rain, step);
            }
            FormField::Wind => {
                self.preferences.wind = cycle_wind(self.preferences.wind, step);
            }
            FormField::Years => {
                let next = self.years_of_data as i64 + i64::from(step);
                self.years_of_data = next.clamp(1, 80) as u32;
            }
            FormField::Location | FormField::Date => {}
        }
    }

    fn cycle_preset(&mut self, step: i32) {
        let len = EVENT_PRESETS.len() as i32;
        let next = match self.preset_index {
            None if step > 0 => 0,
            None => len - 1,
            Some(i) => (i as i32 + step).rem_euclid(len),
        };
        let idx = next as usize;
        self.preset_index = Some(idx);
        EVENT_PRESETS[idx].apply(&mut self.preferences);
    }

    /// Kicks off an analysis run unless one is already in flight (the
    /// re-trigger is ignored until the current run settles).
    pub fn start_analysis(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.analysis_in_flight {
            return;
        }
        self.close_suggestions();
        self.status = None;

        let Some(target_date) = parse_date(self.date_input.trim()) else {
            self.last_error = Some(format!(
                "invalid input: \"{}\" is not a YYYY-MM-DD date",
                self.date_input
            ));
            return;
        };

        let location = match self.picked_point {
            Some(coords) => LocationQuery::Point(coords),
            None => LocationQuery::Name(self.location_input.clone()),
        };
        let request = AnalysisRequest {
            location,
            target_date,
            time_of_day: self.time_of_day,
            years_of_data: self.years_of_data,
            preferences: self.preferences,
            today: Local::now().date_naive(),
        };
        if let Err(err) = request.validate() {
            // Reported immediately; the pipeline is not started and any
            // previous report stays on screen.
            self.last_error = Some(err.to_string());
            return;
        }

        self.analysis_in_flight = true;
        self.report = None;
        self.last_error = None;

        let clients = self.clients.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = run_analysis(&clients, &request).await;
            let _ = tx2
                .send(AppEvent::AnalysisFinished(Box::new(result)))
                .await;
        });
    }

    fn handle_analysis_finished(
        &mut self,
        result: std::result::Result<AnalysisReport, crate::error::CompassError>,
    ) {
        self.analysis_in_flight = false;
        match result {
            Ok(report) => {
                self.report = Some(report);
                self.last_error = None;
                self.tab = ReportTab::Summary;
            }
            Err(err) => {
                self.report = None;
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn export_csv(&mut self) {
        let Some(report) = &self.report else {
            self.status = Some("Nothing to export yet".to_string());
            return;
        };
        match write_csv(
            Path::new("."),
            &report.location_name,
            report.target_date,
            &report.profile.yearly,
        ) {
            Ok(path) => self.status = Some(format!("Saved {}", path.display())),
            Err(err) => self.status = Some(format!("CSV export failed: {err}")),
        }
    }
}

fn cycle_time_of_day(current: TimeOfDay, step: i32) -> TimeOfDay {
    const ORDER: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];
    cycle(&ORDER, current, step)
}

fn cycle_rain(current: RainPreference, step: i32) -> RainPreference {
    const ORDER: [RainPreference; 3] = [
        RainPreference::AvoidRain,
        RainPreference::DontMindRain,
        RainPreference::PreferSnow,
    ];
    cycle(&ORDER, current, step)
}

fn cycle_wind(current: WindPreference, step: i32) -> WindPreference {
    const ORDER: [WindPreference; 3] = [
        WindPreference::Low,
        WindPreference::Moderate,
        WindPreference::DoesNotMatter,
    ];
    cycle(&ORDER, current, step)
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, step: i32) -> T {
    let idx = order.iter().position(|v| *v == current).unwrap_or(0) as i32;
    let len = order.len() as i32;
    order[((idx + step).rem_euclid(len)) as usize]
}
