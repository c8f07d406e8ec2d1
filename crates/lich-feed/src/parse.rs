//! Best-effort extraction of events from the schedule page HTML
//!
//! No DOM: the page is scanned byte-wise for anchor elements. An anchor
//! qualifies as an event when its visible text carries a standalone
//! year and an English month name, and its href points at an event page
//! on the tournament site. Anything the scanner cannot make sense of is
//! skipped; a page that matches nothing yields an empty list, never an
//! error.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::schedule::{EventCategory, ScheduleEvent};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// ── Scanning ─────────────────────────────────────────────────────────

fn find_from(hay: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    let mut i = from;
    while i + needle.len() <= hay.len() {
        if &hay[i..i + needle.len()] == needle {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Next `<a` that actually opens an anchor (not `<abbr` etc.).
fn find_anchor_open(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = find_from(bytes, b"<a", pos)?;
        match bytes.get(at + 2) {
            Some(b) if *b == b'>' || b.is_ascii_whitespace() => return Some(at),
            _ => pos = at + 2,
        }
    }
}

/// Position of the `>` ending an open tag, ignoring `>` inside quoted
/// attribute values.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

fn find_anchor_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = find_from(bytes, b"</a", pos)?;
        match bytes.get(at + 3) {
            None => return Some(at),
            Some(&b'>') => return Some(at),
            Some(b) if b.is_ascii_whitespace() => return Some(at),
            _ => pos = at + 3,
        }
    }
}

/// The href attribute value, sliced from the original-case document.
fn href_attr(html: &str, lower: &[u8], tag_start: usize, tag_close: usize) -> Option<String> {
    let mut pos = tag_start;
    loop {
        let at = find_from(&lower[..tag_close], b"href", pos)?;
        if at == 0 || !lower[at - 1].is_ascii_whitespace() {
            pos = at + 4;
            continue;
        }
        let mut i = at + 4;
        while i < tag_close && lower[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= tag_close || lower[i] != b'=' {
            pos = at + 4;
            continue;
        }
        i += 1;
        while i < tag_close && lower[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= tag_close {
            return None;
        }
        let quote = lower[i];
        let value = if quote == b'"' || quote == b'\'' {
            let start = i + 1;
            let end = find_from(&lower[..tag_close], &[quote], start)?;
            &html[start..end]
        } else {
            let start = i;
            let mut end = i;
            while end < tag_close && !lower[end].is_ascii_whitespace() {
                end += 1;
            }
            &html[start..end]
        };
        return Some(value.trim().to_string());
    }
}

// ── Text assembly ────────────────────────────────────────────────────

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    for c in fragment.chars() {
        if in_tag {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '>' => in_tag = false,
                None => {}
            }
        } else if c == '<' {
            in_tag = true;
        } else {
            out.push(c);
        }
    }
    out
}

const ENTITIES: [(&str, &str); 15] = [
    ("&amp;", "&"),
    ("&#038;", "&"),
    ("&#38;", "&"),
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&ndash;", "\u{2013}"),
    ("&#8211;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&#8212;", "\u{2014}"),
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Decode the handful of entities the schedule page actually uses.
/// Unknown entities pass through untouched.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        for (entity, replacement) in ENTITIES {
            if rest.starts_with(entity) {
                out.push_str(replacement);
                rest = &rest[entity.len()..];
                continue 'outer;
            }
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Field extraction ─────────────────────────────────────────────────

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End index of the first standalone `20xx` at or after `from`.
fn standalone_year_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 4 <= bytes.len() {
        if bytes[i] == b'2'
            && bytes[i + 1] == b'0'
            && bytes[i + 2].is_ascii_digit()
            && bytes[i + 3].is_ascii_digit()
            && (i == 0 || !is_word_byte(bytes[i - 1]))
            && (i + 4 == bytes.len() || !is_word_byte(bytes[i + 4]))
        {
            return Some(i + 4);
        }
        i += 1;
    }
    None
}

fn has_standalone_year(text: &str) -> bool {
    standalone_year_end(text.as_bytes(), 0).is_some()
}

fn has_month_name(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    MONTHS.iter().any(|m| lower.contains(m))
}

fn is_event_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.contains("matchroompool.com") && lower.contains("/events/")
}

/// `(full matched text, amount)` for a "Prize Fund: $200,000" mention.
fn find_prize(text: &str) -> Option<(String, String)> {
    let lower = text.to_ascii_lowercase();
    let at = lower.find("prize fund:")?;
    let bytes = text.as_bytes();
    let mut i = at + "prize fund:".len();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let symbol_len = ['$', '\u{20ac}', '\u{a3}']
        .into_iter()
        .find(|&s| text[i..].starts_with(s))
        .map(char::len_utf8)?;
    let amount_start = i;
    let mut end = i + symbol_len;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b',') {
        end += 1;
    }
    if end == i + symbol_len {
        return None;
    }
    Some((text[at..end].to_string(), text[amount_start..end].to_string()))
}

fn find_category(text: &str) -> Option<EventCategory> {
    EventCategory::ALL.into_iter().find(|category| {
        let padded = format!(" {} ", category.label());
        text.contains(&padded)
    })
}

/// The leading "Month ... 2025" span, when the text starts with one.
fn leading_date_text(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut letters = 0;
    while letters < bytes.len() && bytes[letters].is_ascii_alphabetic() {
        letters += 1;
    }
    if letters == 0 || bytes.get(letters) != Some(&b' ') {
        return None;
    }
    let end = standalone_year_end(bytes, letters + 1)?;
    Some(&text[..end])
}

fn split_title_place(rest: &str) -> (String, Option<String>) {
    match rest.rfind(", ") {
        // Short strings keep their comma: "UK Open, Leeds" is a title
        Some(idx) if idx > 10 => (
            rest[..idx].trim().to_string(),
            Some(rest[idx + 2..].trim().to_string()),
        ),
        _ => (rest.to_string(), None),
    }
}

// ── Date ranges ──────────────────────────────────────────────────────

fn take_day(bytes: &[u8], from: usize) -> Option<(u32, usize)> {
    let mut end = from;
    while end < bytes.len() && end - from < 2 && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == from {
        return None;
    }
    let mut value = 0u32;
    for &b in &bytes[from..end] {
        value = value * 10 + (b - b'0') as u32;
    }
    Some((value, end))
}

fn take_year(bytes: &[u8], i: usize) -> Option<i32> {
    if i + 4 > bytes.len() || bytes[i] != b'2' || bytes[i + 1] != b'0' {
        return None;
    }
    if !bytes[i + 2].is_ascii_digit() || !bytes[i + 3].is_ascii_digit() {
        return None;
    }
    Some(2000 + (bytes[i + 2] - b'0') as i32 * 10 + (bytes[i + 3] - b'0') as i32)
}

/// Optional "- [Month] day" continuation after the first day.
fn range_tail(bytes: &[u8], start: usize) -> Option<(Option<u32>, u32, usize)> {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'-' {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let mut month = None;
    for (month_index, name) in MONTHS.iter().enumerate() {
        if bytes[i..].starts_with(name.as_bytes()) {
            let mut j = i + name.len();
            let ws_start = j;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j == ws_start {
                return None;
            }
            month = Some(month_index as u32 + 1);
            i = j;
            break;
        }
    }
    let (day, next) = take_day(bytes, i)?;
    Some((month, day, next))
}

fn parse_range_at(bytes: &[u8], after_month: usize, first_month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let mut i = after_month;
    let ws_start = i;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i == ws_start {
        return None;
    }
    let (day_one, next) = take_day(bytes, i)?;
    i = next;

    let mut second_month = first_month;
    let mut day_two = day_one;
    if let Some((month, day, next)) = range_tail(bytes, i) {
        second_month = month.unwrap_or(first_month);
        day_two = day;
        i = next;
    }

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b',' {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let year = take_year(bytes, i)?;

    let start = NaiveDate::from_ymd_opt(year, first_month, day_one)?;
    let end = NaiveDate::from_ymd_opt(year, second_month, day_two)?;
    Some((start, end))
}

/// Parse "October 5-10, 2025", "October 28 - November 2, 2025" and the
/// like. A month without a day ("December 2025") does not parse; the
/// caller keeps the raw text for display instead.
pub fn parse_date_range(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let norm = text.replace('\u{2013}', "-");
    let lower = norm.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        for (month_index, name) in MONTHS.iter().enumerate() {
            if bytes[i..].starts_with(name.as_bytes()) {
                if let Some((start, end)) =
                    parse_range_at(bytes, i + name.len(), month_index as u32 + 1)
                {
                    return (Some(start), Some(end));
                }
            }
        }
        i += 1;
    }
    (None, None)
}

// ── Entry point ──────────────────────────────────────────────────────

/// Scan a schedule page for event anchors.
///
/// Result is de-duplicated by href (first mention wins) and ordered by
/// start date with undated events last.
pub fn parse_schedule(html: &str) -> Vec<ScheduleEvent> {
    let lower = html.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut events = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_anchor_open(bytes, pos) {
        let tag_close = match tag_end(bytes, open + 2) {
            Some(i) => i,
            None => break,
        };
        let content_start = tag_close + 1;
        let close = match find_anchor_close(bytes, content_start) {
            Some(i) => i,
            None => break,
        };
        pos = close + 3;

        let text = collapse_whitespace(&decode_entities(&strip_tags(&html[content_start..close])));
        if !has_standalone_year(&text) {
            continue;
        }
        if !has_month_name(&text) {
            continue;
        }
        let href = match href_attr(html, bytes, open + 2, tag_close) {
            Some(href) if is_event_href(&href) => href,
            _ => continue,
        };

        let prize = find_prize(&text);
        let category = find_category(&text);
        let when = leading_date_text(&text).unwrap_or("").to_string();

        let mut rest = text[when.len()..].trim().to_string();
        if let Some(category) = category {
            rest = rest.replacen(category.label(), "", 1).trim().to_string();
        }
        if let Some((full, _)) = &prize {
            rest = rest.replacen(full.as_str(), "", 1).trim().to_string();
        }

        let (title, place) = split_title_place(&rest);
        let (start, end) = parse_date_range(&when);

        events.push(ScheduleEvent {
            title,
            dates_text: when,
            place,
            prize: prize.map(|(_, amount)| amount),
            category,
            href,
            start,
            end,
        });
    }

    let mut seen = HashSet::new();
    events.retain(|event| seen.insert(event.href.clone()));
    events.sort_by_key(|event| event.start.unwrap_or(NaiveDate::MAX));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SCHEDULE_HTML: &str = r#"
<nav>
  <a href="https://matchroompool.com/schedule/">Schedule</a>
  <a href="https://matchroompool.com/events/uk-open-2025/tickets">Tickets</a>
</nav>
<div class="schedule-list">
  <a class="event" href="https://matchroompool.com/events/uk-open-2025/">
    <span class="event-date">April 1&ndash;6, 2025</span>
    <span class="event-tier"> Ranking </span>
    <span class="event-name">UK Open Pool Championship, Telford</span>
    <span class="event-prize">Prize Fund: $200,000</span>
  </a>
  <a class="event" href="https://matchroompool.com/events/hanoi-open-2025/">
    October 28 - November 2, 2025 Non-Ranking Hanoi Open Pool Championship, Hanoi Prize Fund: &#8364;100,000
  </a>
  <a class="event" href="https://matchroompool.com/events/mosconi-cup-2025/">
    December 2025 Major Mosconi Cup, Alexandra Palace London
  </a>
  <a class="event-image" href="https://matchroompool.com/events/uk-open-2025/">
    <img alt="" src="/uk.jpg"> April 1&ndash;6, 2025 Ranking UK Open Pool Championship, Telford
  </a>
  <a href="https://example.com/events/other-tour/">January 10, 2025 Some Other Tour Event, Berlin</a>
  <a href="https://matchroompool.com/news/april-2025-roundup/">April 2025 News Roundup</a>
</div>
"#;

    // -- Whole-page scans --

    #[test]
    fn test_parses_and_orders_events() {
        let events = parse_schedule(SCHEDULE_HTML);
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["UK Open Pool Championship", "Hanoi Open Pool Championship", "Mosconi Cup"],
        );
    }

    #[test]
    fn test_extracts_event_fields() {
        let events = parse_schedule(SCHEDULE_HTML);
        let uk = &events[0];
        assert_eq!(uk.place.as_deref(), Some("Telford"));
        assert_eq!(uk.prize.as_deref(), Some("$200,000"));
        assert_eq!(uk.category, Some(EventCategory::Ranking));
        assert_eq!(uk.dates_text, "April 1\u{2013}6, 2025");
        assert_eq!(uk.start, Some(date(2025, 4, 1)));
        assert_eq!(uk.end, Some(date(2025, 4, 6)));
        assert_eq!(uk.href, "https://matchroompool.com/events/uk-open-2025/");
    }

    #[test]
    fn test_cross_month_range_and_numeric_entity_prize() {
        let events = parse_schedule(SCHEDULE_HTML);
        let hanoi = &events[1];
        assert_eq!(hanoi.start, Some(date(2025, 10, 28)));
        assert_eq!(hanoi.end, Some(date(2025, 11, 2)));
        assert_eq!(hanoi.category, Some(EventCategory::NonRanking));
        assert_eq!(hanoi.prize.as_deref(), Some("\u{20ac}100,000"));
        assert_eq!(hanoi.place.as_deref(), Some("Hanoi"));
    }

    #[test]
    fn test_month_without_day_keeps_raw_text() {
        let events = parse_schedule(SCHEDULE_HTML);
        let mosconi = &events[2];
        assert_eq!(mosconi.start, None);
        assert_eq!(mosconi.end, None);
        assert_eq!(mosconi.dates_text, "December 2025");
        assert_eq!(mosconi.category, Some(EventCategory::Major));
        assert_eq!(mosconi.place.as_deref(), Some("Alexandra Palace London"));
    }

    #[test]
    fn test_dedupes_by_href_keeping_first() {
        let events = parse_schedule(SCHEDULE_HTML);
        let uk_count = events
            .iter()
            .filter(|e| e.href.contains("uk-open-2025"))
            .count();
        assert_eq!(uk_count, 1);
        // The first mention (with the prize) is the one kept
        assert!(events[0].prize.is_some());
    }

    #[test]
    fn test_skips_non_event_anchors() {
        let events = parse_schedule(SCHEDULE_HTML);
        assert!(events.iter().all(|e| e.href.contains("matchroompool.com")));
        assert!(events.iter().all(|e| e.href.contains("/events/")));
        assert!(!events.iter().any(|e| e.title.contains("News")));
        assert!(!events.iter().any(|e| e.title.contains("Tickets")));
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_schedule("").is_empty());
        assert!(parse_schedule("<html><body>no anchors here</body>").is_empty());
        assert!(parse_schedule("<a href='x' <broken").is_empty());
    }

    // -- Date ranges --

    #[test]
    fn test_date_range_same_month() {
        assert_eq!(
            parse_date_range("October 5-10, 2025"),
            (Some(date(2025, 10, 5)), Some(date(2025, 10, 10))),
        );
        // En dash and missing comma both parse
        assert_eq!(
            parse_date_range("October 5\u{2013}10 2025"),
            (Some(date(2025, 10, 5)), Some(date(2025, 10, 10))),
        );
    }

    #[test]
    fn test_date_range_cross_month() {
        assert_eq!(
            parse_date_range("October 28 - November 2, 2025"),
            (Some(date(2025, 10, 28)), Some(date(2025, 11, 2))),
        );
    }

    #[test]
    fn test_date_single_day() {
        assert_eq!(
            parse_date_range("August 21, 2026"),
            (Some(date(2026, 8, 21)), Some(date(2026, 8, 21))),
        );
    }

    #[test]
    fn test_date_range_rejects_month_only_and_bad_days() {
        assert_eq!(parse_date_range("December 2025"), (None, None));
        assert_eq!(parse_date_range("no dates at all"), (None, None));
        assert_eq!(parse_date_range("February 31, 2025"), (None, None));
    }

    #[test]
    fn test_date_range_skips_leading_noise() {
        // A stray month name without a day does not block the real date
        assert_eq!(
            parse_date_range("May Event October 5-10, 2025"),
            (Some(date(2025, 10, 5)), Some(date(2025, 10, 10))),
        );
    }

    // -- Field helpers --

    #[test]
    fn test_prize_is_case_insensitive_and_currency_aware() {
        assert_eq!(
            find_prize("PRIZE FUND: $5,000 on the line"),
            Some(("PRIZE FUND: $5,000".to_string(), "$5,000".to_string())),
        );
        assert_eq!(
            find_prize("Prize Fund: \u{a3}80,000"),
            Some(("Prize Fund: \u{a3}80,000".to_string(), "\u{a3}80,000".to_string())),
        );
        assert_eq!(find_prize("Prize Fund: TBA"), None);
    }

    #[test]
    fn test_category_needs_padding() {
        assert_eq!(find_category("a Non-Ranking event"), None);
        assert_eq!(find_category("a Non-Ranking event "), Some(EventCategory::NonRanking));
        assert_eq!(find_category("the Blue Ribbon final"), Some(EventCategory::BlueRibbon));
        assert_eq!(find_category("no tier here"), None);
    }

    #[test]
    fn test_leading_date_text_requires_date_first() {
        assert_eq!(
            leading_date_text("October 5-10, 2025 UK Open"),
            Some("October 5-10, 2025"),
        );
        assert_eq!(leading_date_text("UK Open October 5-10, 2025"), Some("UK Open October 5-10, 2025"));
        assert_eq!(leading_date_text("2025 UK Open"), None);
    }

    #[test]
    fn test_title_place_split_guard() {
        assert_eq!(
            split_title_place("UK Open Pool Championship, Telford"),
            ("UK Open Pool Championship".to_string(), Some("Telford".to_string())),
        );
        // Too short before the comma: keep as one title
        assert_eq!(split_title_place("UK Open, Leeds"), ("UK Open, Leeds".to_string(), None));
    }

    #[test]
    fn test_entity_decoding_in_titles() {
        let html = r#"<a href="https://matchroompool.com/events/doubles-2025/">March 3-4, 2025 Premier League Pool &amp; Friends Invitational, Leicester</a>"#;
        let events = parse_schedule(html);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Premier League Pool & Friends Invitational");
        assert_eq!(events[0].place.as_deref(), Some("Leicester"));
    }

    #[test]
    fn test_standalone_year_needs_word_boundary() {
        assert!(has_standalone_year("see you in 2025"));
        assert!(!has_standalone_year("order #12025x"));
        assert!(!has_standalone_year("ticket 20256"));
    }
}
