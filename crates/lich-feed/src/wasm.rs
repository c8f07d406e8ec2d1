//! WASM bindings for the frontend schedule page

#![cfg(feature = "wasm")]

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use crate::parse::parse_schedule;
use crate::schedule::{filter_events, format_date_range, EventWindow, ScheduleEvent};

fn parse_events(json: &str) -> Result<Vec<ScheduleEvent>, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid event list: {}", e)))
}

fn parse_day(iso: &str) -> Result<NaiveDate, JsError> {
    iso.parse()
        .map_err(|_| JsError::new(&format!("Invalid date: {} (expected YYYY-MM-DD)", iso)))
}

/// Extract events from the raw HTML of the schedule page.
///
/// Best-effort: a page the scanner cannot make sense of yields an empty
/// array, never an error. The fetch itself stays in the frontend.
///
/// # Returns
/// JSON-compatible array of `ScheduleEvent` values, de-duplicated by
/// href and ordered by start date with undated events last.
#[wasm_bindgen]
pub fn parse_schedule_page(html: &str) -> Result<JsValue, JsError> {
    let events = parse_schedule(html);
    serde_wasm_bindgen::to_value(&events)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Filter parsed events for display.
///
/// # Arguments
/// * `events_json` - JSON array of `ScheduleEvent` values from `parse_schedule_page`
/// * `window` - `"all"`, `"upcoming"` or `"past"`, relative to `today`
/// * `today` - reference day as `YYYY-MM-DD`
/// * `month` - optional start-month filter, 1-12
#[wasm_bindgen]
pub fn filter_schedule(
    events_json: &str,
    window: &str,
    today: &str,
    month: Option<u32>,
) -> Result<JsValue, JsError> {
    let events = parse_events(events_json)?;
    let window = match window {
        "all" => EventWindow::All,
        "upcoming" => EventWindow::Upcoming,
        "past" => EventWindow::Past,
        other => return Err(JsError::new(&format!("Unknown window: {}", other))),
    };
    let today = parse_day(today)?;
    let filtered = filter_events(&events, window, today, month);
    serde_wasm_bindgen::to_value(&filtered)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Short display form of one event's dates, falling back to the raw
/// scraped text when the dates did not parse.
#[wasm_bindgen]
pub fn display_date_range(event_json: &str) -> Result<String, JsError> {
    let event: ScheduleEvent = serde_json::from_str(event_json)
        .map_err(|e| JsError::new(&format!("Invalid event: {}", e)))?;
    Ok(format_date_range(event.start, event.end, &event.dates_text))
}
