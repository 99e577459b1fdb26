use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::time::sleep;

use crate::domain::series::Place;
use crate::error::CompassError;
use crate::pipeline::AnalysisReport;

/// Keystroke-to-lookup settling delay for the location typeahead.
pub const SUGGEST_DEBOUNCE_MS: u64 = 300;

#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    /// The debounce timer for `token` elapsed; look the query up if the
    /// token is still current.
    SuggestDebounced { token: u64, query: String },
    /// A suggestion lookup finished. Stale tokens are discarded so only the
    /// newest query's results ever render.
    SuggestionsReady {
        token: u64,
        query: String,
        places: Vec<Place>,
    },
    AnalysisFinished(Box<Result<AnalysisReport, CompassError>>),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// Echoes the token back after the debounce delay; the state machine decides
/// whether it is still the newest keystroke.
pub fn schedule_suggest(tx: tokio::sync::mpsc::Sender<AppEvent>, token: u64, query: String) {
    tokio::spawn(async move {
        sleep(Duration::from_millis(SUGGEST_DEBOUNCE_MS)).await;
        let _ = tx.send(AppEvent::SuggestDebounced { token, query }).await;
    });
}
