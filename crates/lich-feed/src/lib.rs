//! Tournament schedule feed for Bi-a Helper
//!
//! Best-effort extraction of events from a third-party schedule page's
//! raw HTML, plus the display filters the schedule view needs. Advisory
//! data only: a page the scanner cannot make sense of yields an empty
//! list, never an error, and nothing here touches the ledger.
//! This crate is compiled to:
//! - Native (for tests and server-side use)
//! - WASM (for the frontend schedule page)

mod parse;
mod schedule;

#[cfg(feature = "wasm")]
mod wasm;

pub use parse::{parse_date_range, parse_schedule};
pub use schedule::{filter_events, format_date_range, EventCategory, EventWindow, ScheduleEvent};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_then_filter_flow() {
        let html = r#"
            <a href="https://matchroompool.com/events/uk-open-2025/">
                April 1-6, 2025 Ranking UK Open Pool Championship, Telford
            </a>
            <a href="https://matchroompool.com/events/hanoi-open-2025/">
                October 28 - November 2, 2025 Hanoi Open Pool Championship, Hanoi
            </a>
        "#;
        let events = parse_schedule(html);
        assert_eq!(events.len(), 2);

        let today = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap();
        let upcoming = filter_events(&events, EventWindow::Upcoming, today, None);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Hanoi Open Pool Championship");

        let past = filter_events(&events, EventWindow::Past, today, None);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].category, Some(EventCategory::Ranking));
    }
}
