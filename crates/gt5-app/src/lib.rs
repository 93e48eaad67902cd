//! GT5 Application
//!
//! Headless application shell: replays recorded input against a canvas and
//! runs save, load and export requests.

mod app;

pub use app::{App, AppError, AppEvent, EventOutcome, ReplaySummary, load_script, parse_script};
