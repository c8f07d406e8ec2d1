//! Schedule events and display filters

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Event tier shown on the schedule page, in detection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Ranking,
    Major,
    NonRanking,
    Junior,
    BlueRibbon,
}

impl EventCategory {
    /// Detection order matters: the page text is probed for each label
    /// in turn, and "Non-Ranking" must not be eaten by "Ranking".
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Ranking,
        EventCategory::Major,
        EventCategory::NonRanking,
        EventCategory::Junior,
        EventCategory::BlueRibbon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Ranking => "Ranking",
            EventCategory::Major => "Major",
            EventCategory::NonRanking => "Non-Ranking",
            EventCategory::Junior => "Junior",
            EventCategory::BlueRibbon => "Blue Ribbon",
        }
    }
}

/// One tournament pulled from the schedule page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub title: String,
    /// Raw date text as scraped, kept for display when parsing failed.
    pub dates_text: String,
    pub place: Option<String>,
    /// Prize fund as printed, e.g. `$200,000`.
    pub prize: Option<String>,
    pub category: Option<EventCategory>,
    /// Event page URL, also the dedup key.
    pub href: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Time window filter relative to a reference day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventWindow {
    All,
    Upcoming,
    Past,
}

/// Filter and order events for display.
///
/// The month filter (1-12) applies to the start date only; events with
/// no parsed start date never match a month filter and show up only in
/// the `All` window. `Upcoming` includes events starting today.
pub fn filter_events(
    events: &[ScheduleEvent],
    window: EventWindow,
    today: NaiveDate,
    month: Option<u32>,
) -> Vec<ScheduleEvent> {
    let mut out: Vec<ScheduleEvent> = events
        .iter()
        .filter(|event| match month {
            Some(m) => event.start.map(|s| s.month() == m).unwrap_or(false),
            None => true,
        })
        .filter(|event| match event.start {
            Some(start) => match window {
                EventWindow::All => true,
                EventWindow::Upcoming => start >= today,
                EventWindow::Past => start < today,
            },
            None => window == EventWindow::All,
        })
        .cloned()
        .collect();
    out.sort_by_key(|event| event.start.unwrap_or(NaiveDate::MAX));
    out
}

/// Short display form of an event's dates, falling back to the raw
/// scraped text when parsing failed.
pub fn format_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fallback: &str,
) -> String {
    match (start, end) {
        (Some(start), Some(end)) => {
            let start_str = start.format("%-d %b %Y").to_string();
            let end_str = end.format("%-d %b %Y").to_string();
            if start_str == end_str {
                start_str
            } else {
                format!("{} – {}", start_str, end_str)
            }
        }
        _ => fallback.to_string(),
    }
}
